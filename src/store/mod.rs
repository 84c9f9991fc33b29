//! The durable, authoritative order store.
//!
//! [`OrderStore`] is the seam between the service and whatever actually
//! persists orders. The service only ever calls it through this trait, so
//! tests can substitute [`MockStore`] and count round-trips.

pub mod error;
pub mod memory;
pub mod mock;

pub use error::*;
pub use memory::*;
pub use mock::MockStore;

use crate::model::Order;
use async_trait::async_trait;

/// Keyed storage for orders.
///
/// Each call is treated as atomic by its caller. Uniqueness of `order_uid`
/// is the store's responsibility: `save` on an existing key must fail with
/// [`StoreError::Duplicate`] rather than overwrite.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order.
    async fn save(&self, order: &Order) -> Result<(), StoreError>;

    /// Fetches one order. A missing key is [`StoreError::NotFound`].
    async fn get_by_key(&self, order_uid: &str) -> Result<Order, StoreError>;

    /// Fetches every stored order, in no particular order.
    async fn get_all(&self) -> Result<Vec<Order>, StoreError>;
}
