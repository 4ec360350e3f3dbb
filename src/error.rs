//! Error types for the givens specification engine.

use thiserror::Error;

/// Errors raised while populating the context tree.
///
/// These abort case generation entirely: `Spec::cases` returns the first one
/// and produces no cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Reusing a given description: {description}")]
    DuplicateDescription { description: String },

    #[error("Reusing a behavior name: {name}")]
    DuplicateBehavior { name: String },

    #[error("Outcome '{outcome}' declared with no trigger bound")]
    MissingTrigger { outcome: String },
}

/// A panic caught inside an effect, carried as an ordinary fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("panicked: {message}")]
pub struct Panicked {
    pub message: String,
}

/// Failures of the explicit fault assertion made from inside an outcome check.
#[derive(Debug, Error)]
pub enum FaultAssertionError {
    #[error("Expected fault was not raised: {expected}")]
    NotRaised { expected: &'static str },

    #[error(
        "The expected fault type was raised but the specified constraint failed ({expected}). Constraint failure:\n{source}"
    )]
    ConstraintFailed {
        expected: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Failure of one generated case, as reported to the host.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Setup of '{context}' failed: {source}")]
    Setup {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// The trigger faulted and no outcome consumed it.
    #[error("{0}")]
    Fault(anyhow::Error),

    /// The outcome check failed with no fault pending.
    #[error("{0}")]
    Outcome(anyhow::Error),

    #[error("After hook failed: {0}")]
    AfterHook(anyhow::Error),

    #[error("{case}\nAfter hook also failed: {hook}")]
    WithAfterHook {
        case: Box<CaseError>,
        hook: anyhow::Error,
    },
}

impl CaseError {
    /// The underlying fault or check error, skipping setup/hook wrappers.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            CaseError::Setup { source, .. } => Some(source),
            CaseError::Fault(err) | CaseError::Outcome(err) | CaseError::AfterHook(err) => {
                Some(err)
            }
            CaseError::WithAfterHook { case, .. } => case.cause(),
        }
    }
}

/// Configuration and logging setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
