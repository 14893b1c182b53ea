use std::fmt;

use crate::context::CancelReason;
use crate::entity::EntityId;

/// Result alias used across the store, order and reporting layers.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every store operation and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed or missing required input.
    Validation { kind: &'static str, message: String },
    /// Unknown identifier for the given entity kind.
    NotFound { kind: &'static str, id: EntityId },
    /// An order line asked for more copies than the book has in stock.
    InsufficientStock {
        book_id: EntityId,
        title: String,
        available: u32,
        requested: u32,
    },
    /// Snapshot read or write failed.
    Persistence { location: String, message: String },
    /// The caller's context was cancelled or ran past its deadline.
    Cancelled(CancelReason),
    /// A store lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
}

impl Error {
    pub fn validation(kind: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            kind,
            message: message.into(),
        }
    }

    pub fn persistence(location: impl fmt::Display, message: impl fmt::Display) -> Self {
        Error::Persistence {
            location: location.to_string(),
            message: message.to_string(),
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::InsufficientStock { .. } => 400,
            Error::Persistence { .. } => 500,
            Error::Cancelled(_) => 408,
            Error::LockPoisoned(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation { kind, message } => write!(f, "invalid {}: {}", kind, message),
            Error::NotFound { kind, id } => write!(f, "{} not found with id: {}", kind, id),
            Error::InsufficientStock {
                book_id,
                title,
                available,
                requested,
            } => write!(
                f,
                "insufficient stock for book {} ({}): requested {}, available {}",
                book_id, title, requested, available
            ),
            Error::Persistence { location, message } => {
                write!(f, "persistence error at {}: {}", location, message)
            }
            Error::Cancelled(reason) => write!(f, "operation aborted: {}", reason),
            Error::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for Error {}
