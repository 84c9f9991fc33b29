//! Error types for message-stream ingestion.

use thiserror::Error;

use crate::model::ValidationError;
use crate::service::OrderError;

/// Why a single inbound message was not ingested.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload is not a JSON order.
    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded but failed validation.
    #[error("order validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The service refused to save the order.
    #[error(transparent)]
    Save(#[from] OrderError),
}

/// Errors that can occur while publishing to the stream.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    /// The subscriber has stopped and the stream is closed.
    #[error("stream {0} closed")]
    Closed(String),
}
