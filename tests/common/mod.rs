#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Write `content` to a temp file ending in `suffix` (e.g. `.yaml`), so the
/// loader picks the format from the extension. Removed when dropped.
pub fn description_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

pub mod fixtures {
    use std::path::PathBuf;

    pub fn my_blog() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("my_blog.yaml")
    }
}
