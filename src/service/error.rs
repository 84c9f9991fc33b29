//! Error types for the order service.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by [`OrderService`](super::OrderService).
///
/// Store failures are passed through as the error source with the key
/// that was being worked on attached.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The store refused or failed to persist the order. The cache was not touched.
    #[error("failed to save order {order_uid}: {source}")]
    Save {
        order_uid: String,
        #[source]
        source: StoreError,
    },

    /// The order was not cached and the store could not return it.
    #[error("failed to get order {order_uid}: {source}")]
    Fetch {
        order_uid: String,
        #[source]
        source: StoreError,
    },
}

impl OrderError {
    /// The underlying store error.
    pub fn store_error(&self) -> &StoreError {
        match self {
            OrderError::Save { source, .. } | OrderError::Fetch { source, .. } => source,
        }
    }

    /// Whether the order genuinely does not exist.
    pub fn is_not_found(&self) -> bool {
        self.store_error().is_not_found()
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.store_error(), StoreError::Duplicate(_))
    }
}
