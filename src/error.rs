//! Error types for the scoring boundary

use std::fmt;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Field name as it appears in profile files and CLI flags
    pub field: &'static str,
    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Loan risk error
#[derive(Debug, Error)]
pub enum Error {
    /// One or more input fields failed validation
    #[error("invalid input: {}", ValidationList(.0))]
    Validation(Vec<ValidationError>),

    /// Unknown enumerated value (profession, client type)
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

struct ValidationList<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}
