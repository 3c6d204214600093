use thiserror::Error;

use super::experiment::ExperimentValidationError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller misuse: malformed or inconsistent experiment input
    #[error(transparent)]
    Validation(#[from] ExperimentValidationError),

    #[error("Not implemented: {message}")]
    NotImplemented { message: String },

    #[error("Sampling error: {message}")]
    Sampling { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    pub fn sampling(message: impl Into<String>) -> Self {
        Self::Sampling {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the validation error if this is caller misuse
    pub fn as_validation(&self) -> Option<&ExperimentValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}
