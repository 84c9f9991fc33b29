//! # Mock Store
//!
//! A scriptable [`OrderStore`] for testing the service in isolation.
//!
//! Scripted responses are consumed in order via the `expect_*` builders.
//! Once the script is exhausted, calls fall through to an in-memory map that
//! behaves like a real store (duplicates rejected, misses reported), so the
//! mock doubles as a plain counting stub.
//!
//! Every call is counted whether scripted or not. Clones share the script,
//! the map and the counters, so a test can hand one clone to the service and
//! inspect another.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{OrderStore, StoreError};
use crate::model::Order;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call to the mock store.
enum Expectation {
    Save {
        response: Result<(), StoreError>,
    },
    GetByKey {
        order_uid: String,
        response: Result<Order, StoreError>,
    },
    GetAll {
        response: Result<Vec<Order>, StoreError>,
    },
}

#[derive(Default)]
struct CallCounts {
    save: AtomicUsize,
    get_by_key: AtomicUsize,
    get_all: AtomicUsize,
}

/// A mock store with expectation tracking and call counting.
///
/// # Example
/// ```ignore
/// let store = MockStore::new();
/// store.expect_save().return_err(StoreError::Duplicate("o1".into()));
///
/// let service = OrderService::new(store.clone()).await;
/// assert!(service.save_order(order).await.is_err());
///
/// store.verify(); // Ensures all expectations were met
/// assert_eq!(store.save_calls(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    records: Arc<Mutex<HashMap<String, Order>>>,
    calls: Arc<CallCounts>,
}

impl MockStore {
    /// Creates an empty mock store with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store whose fallback map starts out holding `orders`.
    pub fn with_records(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        store.records.lock().unwrap().extend(
            orders
                .into_iter()
                .map(|order| (order.order_uid.clone(), order)),
        );
        store
    }

    /// Expects a `save` call.
    pub fn expect_save(&self) -> SaveExpectationBuilder {
        SaveExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `get_by_key` call for `order_uid`.
    pub fn expect_get_by_key(&self, order_uid: impl Into<String>) -> GetByKeyExpectationBuilder {
        GetByKeyExpectationBuilder {
            order_uid: order_uid.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `get_all` call.
    pub fn expect_get_all(&self) -> GetAllExpectationBuilder {
        GetAllExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    pub fn save_calls(&self) -> usize {
        self.calls.save.load(Ordering::SeqCst)
    }

    pub fn get_by_key_calls(&self) -> usize {
        self.calls.get_by_key.load(Ordering::SeqCst)
    }

    pub fn get_all_calls(&self) -> usize {
        self.calls.get_all.load(Ordering::SeqCst)
    }

    /// Whether the fallback map holds `order_uid`.
    pub fn contains(&self, order_uid: &str) -> bool {
        self.records.lock().unwrap().contains_key(order_uid)
    }

    fn next_expectation(&self) -> Option<Expectation> {
        self.expectations.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl OrderStore for MockStore {
    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        self.calls.save.fetch_add(1, Ordering::SeqCst);
        match self.next_expectation() {
            Some(Expectation::Save { response }) => response,
            Some(_) => panic!("Unexpected save request or expectation mismatch"),
            None => {
                let mut records = self.records.lock().unwrap();
                if records.contains_key(&order.order_uid) {
                    return Err(StoreError::Duplicate(order.order_uid.clone()));
                }
                records.insert(order.order_uid.clone(), order.clone());
                Ok(())
            }
        }
    }

    async fn get_by_key(&self, order_uid: &str) -> Result<Order, StoreError> {
        self.calls.get_by_key.fetch_add(1, Ordering::SeqCst);
        match self.next_expectation() {
            Some(Expectation::GetByKey { order_uid: expected, response }) => {
                assert_eq!(order_uid, expected, "get_by_key called with unexpected key");
                response
            }
            Some(_) => panic!("Unexpected get_by_key request or expectation mismatch"),
            None => self
                .records
                .lock()
                .unwrap()
                .get(order_uid)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(order_uid.to_string())),
        }
    }

    async fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        self.calls.get_all.fetch_add(1, Ordering::SeqCst);
        match self.next_expectation() {
            Some(Expectation::GetAll { response }) => response,
            Some(_) => panic!("Unexpected get_all request or expectation mismatch"),
            None => Ok(self.records.lock().unwrap().values().cloned().collect()),
        }
    }
}

/// Builder for `save` expectations.
pub struct SaveExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl SaveExpectationBuilder {
    /// Sets the expectation to return a successful result.
    ///
    /// A scripted success does not record the order in the fallback map.
    pub fn return_ok(self) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Save { response: Ok(()) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Save { response: Err(error) });
    }
}

/// Builder for `get_by_key` expectations.
pub struct GetByKeyExpectationBuilder {
    order_uid: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl GetByKeyExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, order: Order) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::GetByKey {
            order_uid: self.order_uid,
            response: Ok(order),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::GetByKey {
            order_uid: self.order_uid,
            response: Err(error),
        });
    }
}

/// Builder for `get_all` expectations.
pub struct GetAllExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl GetAllExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, orders: Vec<Order>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::GetAll { response: Ok(orders) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::GetAll { response: Err(error) });
    }
}
