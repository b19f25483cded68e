//! Error types for the ticket engine

use thiserror::Error;

/// Domain error raised by ticket operations.
///
/// Every variant is recoverable: the operation that produced it applied no
/// mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// A required field was blank or an input was inconsistent
    #[error("validation failed: {0}")]
    Validation(String),

    /// The acting user may not perform the operation
    #[error("permission denied: {0}")]
    Permission(String),

    /// A single-ticket operation referenced an unknown entity
    #[error("not found: {0}")]
    NotFound(String),
}

impl TicketError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Result type for ticket operations
pub type TicketResult<T> = Result<T, TicketError>;

/// Reject blank (empty or whitespace-only) input for a named field.
pub(crate) fn require_text(field: &str, value: &str) -> TicketResult<()> {
    if value.trim().is_empty() {
        return Err(TicketError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
