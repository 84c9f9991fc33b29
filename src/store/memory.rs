use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{OrderStore, StoreError};
use crate::framework::{RecordActor, RecordClient};
use crate::model::Order;

/// An in-memory [`OrderStore`] backed by a [`RecordActor`].
///
/// Requests are serialized by the actor, so the duplicate check and the
/// insert happen as one step. Once the actor task stops, every call fails
/// with [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct MemoryStore {
    inner: RecordClient<Order>,
}

impl MemoryStore {
    pub fn new(inner: RecordClient<Order>) -> Self {
        Self { inner }
    }

    /// Creates an empty store actor and the store wrapping its client.
    ///
    /// The caller must spawn `actor.run()`.
    pub fn spawnable(buffer_size: usize) -> (RecordActor<Order>, Self) {
        Self::with_records(buffer_size, Vec::new())
    }

    /// Like [`MemoryStore::spawnable`], but the actor starts out holding `orders`.
    pub fn with_records(buffer_size: usize, orders: Vec<Order>) -> (RecordActor<Order>, Self) {
        let (actor, client) = RecordActor::with_records(buffer_size, orders);
        (actor, Self::new(client))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    #[instrument(skip(self, order), fields(order_uid = %order.order_uid))]
    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        debug!("Sending request");
        self.inner.insert(order.clone()).await.map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn get_by_key(&self, order_uid: &str) -> Result<Order, StoreError> {
        debug!("Sending request");
        self.inner.get(order_uid.to_string()).await.map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        debug!("Sending request");
        self.inner.list().await.map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let (actor, store) = MemoryStore::spawnable(8);
        tokio::spawn(actor.run());

        let order = Order::sample("o1");
        store.save(&order).await.unwrap();

        assert_eq!(store.get_by_key("o1").await.unwrap(), order);
        assert_eq!(
            store.get_by_key("o2").await,
            Err(StoreError::NotFound("o2".to_string()))
        );
        assert_eq!(
            store.save(&order).await,
            Err(StoreError::Duplicate("o1".to_string()))
        );
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_after_shutdown_is_unavailable() {
        let (actor, store) = MemoryStore::with_records(8, vec![Order::sample("o1")]);
        drop(actor);

        let err = store.get_all().await.unwrap_err();
        assert!(err.is_transient());
    }
}
