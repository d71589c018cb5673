use std::fmt;

use uuid::Uuid;

use crate::error::AppError;

pub mod memory;

pub use memory::MemoryStore;

/// Failures surfaced by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    /// Composite-uniqueness violation on (funding_request, founder, investor)
    DuplicateMatch { investor_ids: Vec<Uuid> },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "{} not found", what),
            StoreError::DuplicateMatch { investor_ids } => {
                let ids: Vec<String> = investor_ids.iter().map(|id| id.to_string()).collect();
                write!(f, "Match already exists for investor(s): {}", ids.join(", "))
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::DuplicateMatch { .. } => AppError::Conflict(err.to_string()),
        }
    }
}
