//! Error types for the durable store.

use thiserror::Error;

use crate::framework::FrameworkError;

/// Errors a store can report.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// A record with the same key already exists. Saves never upsert.
    #[error("order with UID {0} already exists")]
    Duplicate(String),

    /// No record matches the requested key.
    #[error("order not found: {0}")]
    NotFound(String),

    /// The store could not be reached or did not answer.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::Duplicate(key) => StoreError::Duplicate(key),
            FrameworkError::NotFound(key) => StoreError::NotFound(key),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                StoreError::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_errors_map_onto_store_taxonomy() {
        assert_eq!(
            StoreError::from(FrameworkError::Duplicate("o1".into())),
            StoreError::Duplicate("o1".into())
        );
        assert!(StoreError::from(FrameworkError::NotFound("o1".into())).is_not_found());

        let closed = StoreError::from(FrameworkError::ActorClosed);
        assert_eq!(closed, StoreError::Unavailable("Actor closed".into()));
        assert!(closed.is_transient());
        assert!(!closed.is_not_found());
    }
}
