use thiserror::Error;

use crate::models::SlotId;

/// Coarse classification of an [`AgendaError`].
///
/// Callers and tests match on the kind instead of the rendered message, which
/// for parse failures embeds chrono's own wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed timestamp or date, or an empty time range. User-correctable.
    InvalidInput,
    /// A referenced slot does not exist.
    NotFound,
    /// The store rejected a write because the slot is already booked.
    ConstraintViolation,
    /// Transport or database fault. Not retried by this service.
    Storage,
    /// The notifier or another downstream service failed.
    Dependency,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::Storage => "storage",
            ErrorKind::Dependency => "dependency",
        }
    }
}

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("{field} invalid format: {source}")]
    InvalidFormat {
        field: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid time range: start {start} is not before end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Storage(#[from] eyre::Report),

    #[error("Dependency error: {0}")]
    Dependency(#[source] eyre::Report),
}

impl AgendaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgendaError::InvalidFormat { .. }
            | AgendaError::InvalidRange { .. }
            | AgendaError::UnknownTimezone(_) => ErrorKind::InvalidInput,
            AgendaError::SlotNotFound(_) => ErrorKind::NotFound,
            AgendaError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            AgendaError::Storage(_) => ErrorKind::Storage,
            AgendaError::Dependency(_) => ErrorKind::Dependency,
        }
    }
}

pub type AgendaResult<T> = Result<T, AgendaError>;
