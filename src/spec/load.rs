use super::types::ApiDescription;
use anyhow::Context;
use std::path::Path;

/// Serialization format of a description snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from the file extension; anything that is not
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Read an already parsed description graph from a YAML or JSON snapshot.
pub fn load_description(file_path: impl AsRef<Path>) -> anyhow::Result<ApiDescription> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read description {}", path.display()))?;
    load_description_from_str(&content, SnapshotFormat::from_path(path))
        .with_context(|| format!("failed to decode description {}", path.display()))
}

pub fn load_description_from_str(
    content: &str,
    format: SnapshotFormat,
) -> anyhow::Result<ApiDescription> {
    let description = match format {
        SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
        SnapshotFormat::Json => serde_json::from_str(content)?,
    };
    Ok(description)
}

/// Lowercase, underscore separated form of the description title.
pub fn description_slug(description: &ApiDescription) -> String {
    description
        .title
        .to_lowercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
        .trim_matches('_')
        .to_string()
}
