//! # Expected headers
//!
//! Derives the header expectations a test step asserts on a response. A
//! required header must carry an example in the description, since that
//! example is the value the response is checked against; optional headers
//! map to their example when there is one and to `null` otherwise.

use crate::error::MissingExampleError;
use crate::spec::{BodyRef, Header, MethodRef, Response, ResponseRef};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Anything that can hand out the header declarations of a response.
pub trait HeaderSource {
    fn headers(&self) -> &[Header];
}

impl HeaderSource for Response {
    fn headers(&self) -> &[Header] {
        &self.headers
    }
}

impl HeaderSource for ResponseRef<'_> {
    fn headers(&self) -> &[Header] {
        &self.response.headers
    }
}

/// A body resolves through its parent response.
impl HeaderSource for BodyRef<'_> {
    fn headers(&self) -> &[Header] {
        &self.parent().headers
    }
}

/// Ordered header name → expected value mapping.
///
/// Serializes as a JSON object in declaration order, with `null` for
/// headers that have no expected value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedHeaders(Vec<(String, Option<String>)>);

impl ExpectedHeaders {
    /// `None` when the header is not declared, `Some(None)` when it is
    /// declared without an expected value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for ExpectedHeaders {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        ExpectedHeaders(iter.into_iter().collect())
    }
}

impl Serialize for ExpectedHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Resolve the expected headers of a response (or of a body, through its
/// parent response).
///
/// Stops at the first required header without an example; no partial
/// mapping is returned.
pub fn expected_headers<S>(source: &S) -> Result<ExpectedHeaders, MissingExampleError>
where
    S: HeaderSource + ?Sized,
{
    source
        .headers()
        .iter()
        .map(|header| match (&header.example, header.optional) {
            (None, false) => Err(MissingExampleError::header(&header.name)),
            (example, _) => Ok((header.name.clone(), example.clone())),
        })
        .collect()
}

/// Every required header without an example, in declaration order.
pub fn missing_header_examples<S>(source: &S) -> Vec<MissingExampleError>
where
    S: HeaderSource + ?Sized,
{
    source
        .headers()
        .iter()
        .filter(|h| !h.optional && h.example.is_none())
        .map(|h| MissingExampleError::header(&h.name))
        .collect()
}

/// Every required query parameter of a method without an example.
pub fn missing_parameter_examples(method: MethodRef<'_>) -> Vec<MissingExampleError> {
    method
        .query_parameters()
        .iter()
        .filter(|p| !p.optional && p.example.is_none())
        .map(|p| MissingExampleError::parameter(&p.name))
        .collect()
}
