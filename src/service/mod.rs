//! Order orchestration: cache-then-store reads and store-then-cache writes.
//!
//! [`OrderService`] is the only component that mutates the store on the
//! ingestion path, and the only one that reconciles it with the cache.
//!
//! # Consistency
//!
//! - Writes go to the store first. The cache is updated only after the store
//!   accepted the order, so the cache never holds an order the store rejected.
//! - Reads check the cache first. A miss is filled from the store, so each
//!   key costs at most one store round-trip per process lifetime.
//! - On startup the whole store is copied into the cache. A failure there is
//!   logged and the service starts anyway; misses are still filled lazily.
//!
//! Two concurrent saves of one key are decided by the store's uniqueness
//! check. Resubmitting an order that was already saved fails with a
//! duplicate error; saves are not idempotent.

pub mod error;

pub use error::*;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache::Cache;
use crate::model::Order;
use crate::store::{OrderStore, StoreError};

/// Reconciles the order cache with the durable store.
///
/// Construct one per process and share it behind an [`Arc`] with every task
/// that ingests or reads orders.
pub struct OrderService<S: OrderStore> {
    store: S,
    cache: Cache<Order>,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates the service and warms the cache from the store.
    ///
    /// A failed warm-up is logged and the service starts with whatever the
    /// cache holds.
    pub async fn new(store: S) -> Self {
        let service = Self::cold(store);
        if let Err(e) = service.restore_cache().await {
            warn!(error = %e, "Failed to restore cache");
        }
        service
    }

    /// Creates the service with an empty cache, skipping warm-up.
    pub fn cold(store: S) -> Self {
        Self {
            store,
            cache: Cache::new(),
        }
    }

    /// Loads every stored order into the cache and returns how many were loaded.
    #[instrument(skip(self))]
    pub async fn restore_cache(&self) -> Result<usize, StoreError> {
        let orders = self.store.get_all().await?;
        let count = orders.len();
        for order in orders {
            self.cache.set(order);
        }
        info!(count, size = self.cache.size(), "Cache restored");
        Ok(count)
    }

    /// Persists `order`, then caches it.
    ///
    /// The order is expected to be validated already. If the store rejects
    /// it, the error is returned and the cache is left untouched.
    #[instrument(skip(self, order), fields(order_uid = %order.order_uid))]
    pub async fn save_order(&self, order: Order) -> Result<(), OrderError> {
        debug!(?order, "save_order called");
        if let Err(source) = self.store.save(&order).await {
            warn!(error = %source, "Store rejected order");
            return Err(OrderError::Save {
                order_uid: order.order_uid,
                source,
            });
        }

        self.cache.set(order);
        info!(size = self.cache.size(), "Order saved to store and cache");
        Ok(())
    }

    /// Returns the order stored under `order_uid`.
    ///
    /// Served from the cache when possible; otherwise fetched from the store
    /// and cached before being returned. A failed fetch leaves the cache
    /// untouched.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_uid: &str) -> Result<Arc<Order>, OrderError> {
        let key = order_uid.to_string();
        if let Some(order) = self.cache.get(&key) {
            debug!("Cache hit");
            return Ok(order);
        }

        let order = self
            .store
            .get_by_key(order_uid)
            .await
            .map_err(|source| OrderError::Fetch {
                order_uid: key,
                source,
            })?;

        let order = Arc::new(order);
        self.cache.set_shared(Arc::clone(&order));
        info!(size = self.cache.size(), "Order loaded from store and cached");
        Ok(order)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.size()
    }

    pub fn cache(&self) -> &Cache<Order> {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    #[tokio::test]
    async fn test_save_then_get_is_a_cache_hit() {
        let store = MockStore::new();
        let service = OrderService::new(store.clone()).await;

        let order = Order::sample("o1");
        service.save_order(order.clone()).await.unwrap();

        let fetched = service.get_order("o1").await.unwrap();
        assert_eq!(*fetched, order);
        assert_eq!(store.save_calls(), 1);
        assert_eq!(store.get_by_key_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_save_does_not_touch_cache() {
        let store = MockStore::new();
        store.expect_get_all().return_ok(vec![]);
        store.expect_save().return_err(StoreError::Duplicate("o1".into()));
        let service = OrderService::new(store.clone()).await;

        let err = service.save_order(Order::sample("o1")).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(err.store_error(), &StoreError::Duplicate("o1".into()));
        assert!(service.cache().get(&"o1".to_string()).is_none());
        assert_eq!(service.cache_size(), 0);
        store.verify();
    }

    #[tokio::test]
    async fn test_resubmission_fails_and_keeps_first_write() {
        let store = MockStore::new();
        let service = OrderService::new(store.clone()).await;

        let first = Order::sample("o1");
        let mut second = Order::sample("o1");
        second.track_number = "RESUBMITTED".to_string();

        service.save_order(first.clone()).await.unwrap();
        let err = service.save_order(second).await.unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(service.get_order("o1").await.unwrap().track_number, first.track_number);
    }

    #[tokio::test]
    async fn test_warm_up_fills_cache() {
        let store = MockStore::with_records(vec![Order::sample("A"), Order::sample("B")]);
        let service = OrderService::new(store.clone()).await;

        assert_eq!(service.cache_size(), 2);
        let a = service.get_order("A").await.unwrap();
        assert_eq!(a.order_uid, "A");
        assert_eq!(store.get_all_calls(), 1);
        assert_eq!(store.get_by_key_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_warm_up_is_not_fatal() {
        let store = MockStore::new();
        store.expect_get_all().return_err(StoreError::Unavailable("timeout".into()));
        store.expect_get_by_key("o1").return_ok(Order::sample("o1"));

        let service = OrderService::new(store.clone()).await;
        assert_eq!(service.cache_size(), 0);

        // The store is still consulted on demand.
        assert_eq!(service.get_order("o1").await.unwrap().order_uid, "o1");
        assert_eq!(service.cache_size(), 1);
        store.verify();
    }

    #[tokio::test]
    async fn test_miss_is_filled_once() {
        let store = MockStore::new();
        let service = OrderService::cold(store.clone());
        store.save(&Order::sample("o1")).await.unwrap();

        service.get_order("o1").await.unwrap();
        service.get_order("o1").await.unwrap();

        assert_eq!(store.get_by_key_calls(), 1);
        assert_eq!(service.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let store = MockStore::new();
        store.expect_get_by_key("o1").return_err(StoreError::Unavailable("timeout".into()));
        let service = OrderService::cold(store.clone());

        let err = service.get_order("o1").await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "failed to get order o1: store unavailable: timeout");

        let err = service.get_order("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.cache_size(), 0);
        store.verify();
    }

    #[tokio::test]
    async fn test_cold_service_skips_warm_up() {
        let store = MockStore::with_records(vec![Order::sample("A")]);
        let service = OrderService::cold(store.clone());
        assert_eq!(service.cache_size(), 0);
        assert_eq!(store.get_all_calls(), 0);

        assert_eq!(service.restore_cache().await, Ok(1));
        assert_eq!(service.cache_size(), 1);
    }
}
