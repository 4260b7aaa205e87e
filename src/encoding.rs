//! # Parameter name encoding
//!
//! RFC 6570 varnames may only contain `ALPHA / DIGIT / "_" / pct-encoded`
//! (and `.` as a separator), so declared query parameter names such as
//! `api-key` have to be percent-encoded before they can appear inside a
//! `{?...}` expression. The characters handled here are the ones RAML/OpenAPI
//! descriptions commonly use in parameter names: `-`, `~` and `.`.
//!
//! ```rust
//! use apisail::encoding::encode_parameter_name;
//!
//! assert_eq!(encode_parameter_name("api-key"), "api%2Dkey");
//! assert_eq!(encode_parameter_name("page"), "page");
//! ```

/// Fixed percent-encoding for each reserved character (uppercase hex).
const RESERVED: [(char, &str); 3] = [('-', "%2D"), ('~', "%7E"), ('.', "%2E")];

/// Whether `c` is rewritten by [`encode_parameter_name`].
#[must_use]
pub fn is_reserved(c: char) -> bool {
    percent_encode_char(c).is_some()
}

/// The percent-encoded form of a reserved character, `None` for any other.
#[must_use]
pub fn percent_encode_char(c: char) -> Option<&'static str> {
    RESERVED
        .iter()
        .find(|(reserved, _)| *reserved == c)
        .map(|(_, encoded)| *encoded)
}

/// Percent-encode the reserved characters of a raw parameter name.
///
/// Every other character, `%` included, is copied through, so the output
/// of one pass contains no reserved characters and a second pass leaves it
/// unchanged.
#[must_use]
pub fn encode_parameter_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match percent_encode_char(c) {
            Some(encoded) => out.push_str(encoded),
            None => out.push(c),
        }
    }
    out
}
