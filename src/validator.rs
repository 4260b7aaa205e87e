use crate::error::{LoadError, MissingExampleError, TraitError};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// A problem found while walking a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn missing_example(location: impl Into<String>, err: &MissingExampleError) -> Self {
        ValidationIssue::new(location, "MissingExample", err.to_string())
    }

    pub fn invalid_trait(location: impl Into<String>, err: &TraitError) -> Self {
        ValidationIssue::new(location, "InvalidTrait", err.to_string())
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

pub fn log_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        warn!(
            location = %issue.location,
            kind = %issue.kind,
            "{}",
            issue.message
        );
    }
}

/// Turn a collected issue list into a load result.
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), LoadError> {
    if issues.is_empty() {
        return Ok(());
    }
    log_issues(&issues);
    Err(LoadError::Invalid(issues))
}
