//! # Core Record Framework
//!
//! This module defines the generic building blocks shared by the cache and the
//! in-memory store.
//!
//! ## Key Types
//!
//! - [`Record`]: The trait that all keyed records must implement.
//! - [`RecordActor`]: A task that owns a keyed collection and serializes every request.
//! - [`RecordClient`]: The cloneable client for communicating with the actor.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, Duplicate, NotFound).

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any keyed record must implement to be held by a
/// [`Cache`](crate::cache::Cache) or a [`RecordActor`].
///
/// # Architecture Note
/// The key is carried *inside* the record (an order knows its own
/// `order_uid`), so callers never pass a key and a record that disagree.
/// The associated `Key` type keeps a cache of orders from being queried
/// with some other kind of identifier.
pub trait Record: Clone + Send + Sync + 'static {
    /// The unique, immutable identifier of this record.
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Returns the record's key.
    fn key(&self) -> &Self::Key;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the record framework itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Record already exists: {0}")]
    Duplicate(String),
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// There is deliberately no update variant: a record is written once and
/// only ever read afterwards.
///
/// - **Insert**: Adds a new record. Rejected if the key is already taken.
/// - **Get**: Fetches a record by key.
/// - **List**: Returns every record currently held.
#[derive(Debug)]
pub enum RecordRequest<T: Record> {
    Insert {
        record: T,
        respond_to: Response<()>,
    },
    Get {
        key: T::Key,
        respond_to: Response<T>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a keyed collection of records.
///
/// # Architecture Note
/// The actor processes its messages *sequentially* in a loop, so the
/// existence check and the insert of `Insert` can never interleave with
/// another request. Two concurrent inserts of the same key always resolve to
/// exactly one success and one [`FrameworkError::Duplicate`].
pub struct RecordActor<T: Record> {
    receiver: mpsc::Receiver<RecordRequest<T>>,
    records: HashMap<T::Key, T>,
}

impl<T: Record> RecordActor<T> {
    pub fn new(buffer_size: usize) -> (Self, RecordClient<T>) {
        Self::with_records(buffer_size, Vec::new())
    }

    /// Creates an actor that starts out holding `records`.
    ///
    /// Later entries win when keys repeat.
    pub fn with_records(
        buffer_size: usize,
        records: impl IntoIterator<Item = T>,
    ) -> (Self, RecordClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: records
                .into_iter()
                .map(|record| (record.key().clone(), record))
                .collect(),
        };
        let client = RecordClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Order" instead of "order_cache::model::order::Order")
        let record_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(record_type, size = self.records.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RecordRequest::Insert { record, respond_to } => {
                    let key = record.key().clone();
                    if self.records.contains_key(&key) {
                        warn!(record_type, %key, "Duplicate");
                        let _ = respond_to.send(Err(FrameworkError::Duplicate(key.to_string())));
                        continue;
                    }
                    self.records.insert(key.clone(), record);
                    info!(record_type, %key, size = self.records.len(), "Inserted");
                    let _ = respond_to.send(Ok(()));
                }
                RecordRequest::Get { key, respond_to } => {
                    let result = self
                        .records
                        .get(&key)
                        .cloned()
                        .ok_or_else(|| FrameworkError::NotFound(key.to_string()));
                    debug!(record_type, %key, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                RecordRequest::List { respond_to } => {
                    debug!(record_type, size = self.records.len(), "List");
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
            }
        }

        info!(record_type, size = self.records.len(), "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `RecordActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
#[derive(Clone)]
pub struct RecordClient<T: Record> {
    sender: mpsc::Sender<RecordRequest<T>>,
}

impl<T: Record> RecordClient<T> {
    pub fn new(sender: mpsc::Sender<RecordRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn insert(&self, record: T) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(RecordRequest::Insert { record, respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, key: T::Key) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(RecordRequest::Get { key, respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(RecordRequest::List { respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
