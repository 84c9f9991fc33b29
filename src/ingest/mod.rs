//! Message-stream ingestion.
//!
//! A [`Subscriber`] drains an in-process stream of raw order payloads. Each
//! payload is decoded, validated and handed to
//! [`OrderService::save_order`]. A bad message is logged and skipped; it never
//! stops the subscriber. The [`Publisher`] is the sending half of the stream.

pub mod error;

pub use error::*;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::model::Order;
use crate::service::OrderService;
use crate::store::OrderStore;

/// Counts of what a subscriber did before its stream closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub processed: usize,
    pub rejected: usize,
}

/// Creates a stream named `subject` feeding `service`.
///
/// The caller must spawn `subscriber.run()`.
pub fn channel<S: OrderStore>(
    buffer_size: usize,
    subject: impl Into<String>,
    service: Arc<OrderService<S>>,
) -> (Subscriber<S>, Publisher) {
    let subject = subject.into();
    let (sender, receiver) = mpsc::channel(buffer_size);
    let subscriber = Subscriber {
        subject: subject.clone(),
        receiver,
        service,
    };
    let publisher = Publisher { subject, sender };
    (subscriber, publisher)
}

/// Consumes order payloads and saves them through the service.
pub struct Subscriber<S: OrderStore> {
    subject: String,
    receiver: mpsc::Receiver<Vec<u8>>,
    service: Arc<OrderService<S>>,
}

impl<S: OrderStore> Subscriber<S> {
    /// Processes messages until every [`Publisher`] is dropped.
    pub async fn run(mut self) -> IngestStats {
        info!(subject = %self.subject, "Subscribed");
        let mut stats = IngestStats::default();

        while let Some(payload) = self.receiver.recv().await {
            match self.process_message(&payload).await {
                Ok(order_uid) => {
                    stats.processed += 1;
                    info!(%order_uid, "Order processed");
                }
                Err(e) => {
                    stats.rejected += 1;
                    warn!(subject = %self.subject, error = %e, "Failed to process message");
                }
            }
        }

        info!(
            subject = %self.subject,
            processed = stats.processed,
            rejected = stats.rejected,
            "Unsubscribed"
        );
        stats
    }

    /// Decodes, validates and saves one payload, returning the saved order's key.
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub async fn process_message(&self, payload: &[u8]) -> Result<String, IngestError> {
        debug!(payload = %String::from_utf8_lossy(payload), "Received message");
        let order: Order = serde_json::from_slice(payload)?;
        order.validate()?;

        let order_uid = order.order_uid.clone();
        self.service.save_order(order).await?;
        Ok(order_uid)
    }
}

/// The sending half of an order stream. Cheap to clone.
#[derive(Clone)]
pub struct Publisher {
    subject: String,
    sender: mpsc::Sender<Vec<u8>>,
}

impl Publisher {
    /// Encodes `order` as JSON and publishes it.
    pub async fn publish(&self, order: &Order) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(order)?;
        self.publish_raw(payload).await
    }

    /// Publishes a payload as-is.
    pub async fn publish_raw(&self, payload: impl Into<Vec<u8>>) -> Result<(), PublishError> {
        self.sender
            .send(payload.into())
            .await
            .map_err(|_| PublishError::Closed(self.subject.clone()))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}
