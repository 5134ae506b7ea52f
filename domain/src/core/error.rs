//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No model available in gateway capabilities")]
    NoModelAvailable,
}

impl DomainError {
    /// Check if this error means no model could be selected
    pub fn is_no_model(&self) -> bool {
        matches!(self, DomainError::NoModelAvailable)
    }
}
