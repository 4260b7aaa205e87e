use crate::validator::ValidationIssue;
use std::fmt;

/// What kind of declaration is missing its example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleSubject {
    Header,
    Parameter,
}

impl fmt::Display for ExampleSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleSubject::Header => write!(f, "header"),
            ExampleSubject::Parameter => write!(f, "parameter"),
        }
    }
}

/// A required header or parameter was declared without an example value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingExampleError {
    pub subject: ExampleSubject,
    /// Declared name of the offending header or parameter.
    pub name: String,
}

impl MissingExampleError {
    pub fn header(name: impl Into<String>) -> Self {
        MissingExampleError {
            subject: ExampleSubject::Header,
            name: name.into(),
        }
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        MissingExampleError {
            subject: ExampleSubject::Parameter,
            name: name.into(),
        }
    }
}

impl fmt::Display for MissingExampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Required {} {} does not have an example value",
            self.subject, self.name
        )
    }
}

impl std::error::Error for MissingExampleError {}

/// A trait declaration that cannot become a context of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitError {
    /// The trait uses the name of the context every method belongs to.
    ReservedName(String),
    /// The same trait name appears more than once on one method.
    Duplicate(String),
}

impl TraitError {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TraitError::ReservedName(name) | TraitError::Duplicate(name) => name,
        }
    }
}

impl fmt::Display for TraitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitError::ReservedName(name) => {
                write!(f, "Trait {name} clashes with the context every method belongs to")
            }
            TraitError::Duplicate(name) => write!(f, "Trait {name} is declared more than once"),
        }
    }
}

impl std::error::Error for TraitError {}

/// Returned by [`crate::registry::Registry::load`].
///
/// A failed load leaves the registry exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The registry already holds a description; call `reset` first.
    AlreadyLoaded,
    /// Fail-fast mode hit a required declaration without an example.
    MissingExample {
        /// Where it was found, e.g. `GET /posts → 200`.
        location: String,
        source: MissingExampleError,
    },
    /// Fail-fast mode hit a trait that cannot be registered as a context.
    InvalidTrait {
        /// The declaring method, e.g. `GET /posts`.
        location: String,
        source: TraitError,
    },
    /// Aggregate mode collected one or more issues.
    Invalid(Vec<ValidationIssue>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::AlreadyLoaded => write!(
                f,
                "registry is already loaded; reset it before loading another description"
            ),
            LoadError::MissingExample { location, source } => {
                write!(f, "{location}: {source}")
            }
            LoadError::InvalidTrait { location, source } => write!(f, "{location}: {source}"),
            LoadError::Invalid(issues) => {
                write!(f, "description has {} issue(s)", issues.len())?;
                for issue in issues {
                    write!(f, "\n  {issue}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::MissingExample { source, .. } => Some(source),
            LoadError::InvalidTrait { source, .. } => Some(source),
            _ => None,
        }
    }
}
