//! Transport-free read interface.
//!
//! The functions here are what an HTTP layer calls for `GET /order/{id}` and
//! `GET /health`. They never touch the store directly.
//!
//! A store outage is reported separately from a missing order: only
//! [`StoreError::NotFound`] becomes [`ApiError::NotFound`].

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::Order;
use crate::service::OrderService;
use crate::store::{OrderStore, StoreError};

/// A failed read, as seen by the caller of the read interface.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("order id is required")]
    BadRequest,

    #[error("order not found: {0}")]
    NotFound(String),

    #[error("order {0} is temporarily unavailable")]
    Unavailable(String),
}

impl ApiError {
    /// The HTTP status code that corresponds to this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Unavailable(_) => 503,
        }
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(rename = "cacheSize")]
    pub cache_size: usize,
}

/// Looks up the order named by a path segment.
///
/// The key is used exactly as given. Only an empty key is rejected, since
/// ingestion accepts any non-empty `order_uid`, surrounding spaces included.
pub async fn lookup_order<S: OrderStore>(
    service: &OrderService<S>,
    order_uid: &str,
) -> Result<Arc<Order>, ApiError> {
    if order_uid.is_empty() {
        return Err(ApiError::BadRequest);
    }

    match service.get_order(order_uid).await {
        Ok(order) => {
            info!(%order_uid, "Order sent");
            Ok(order)
        }
        Err(e) => {
            warn!(%order_uid, error = %e, "Order lookup failed");
            Err(match e.store_error() {
                StoreError::NotFound(_) => ApiError::NotFound(order_uid.to_string()),
                _ => ApiError::Unavailable(order_uid.to_string()),
            })
        }
    }
}

pub fn health<S: OrderStore>(service: &OrderService<S>) -> HealthReport {
    HealthReport {
        status: "ok",
        cache_size: service.cache_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    #[tokio::test]
    async fn test_lookup_maps_store_errors() {
        let store = MockStore::with_records(vec![Order::sample("o1")]);
        let service = OrderService::cold(store.clone());

        assert_eq!(lookup_order(&service, "o1").await.unwrap().order_uid, "o1");
        assert_eq!(lookup_order(&service, "").await, Err(ApiError::BadRequest));

        store.expect_get_by_key("o2").return_err(StoreError::Unavailable("timeout".into()));

        let err = lookup_order(&service, "o2").await.unwrap_err();
        assert_eq!(err, ApiError::Unavailable("o2".into()));
        assert_eq!(err.status_code(), 503);

        let err = lookup_order(&service, "o3").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("o3".into()));
        assert_eq!(err.status_code(), 404);
        store.verify();
    }

    #[tokio::test]
    async fn test_lookup_uses_key_verbatim() {
        let store = MockStore::default();
        let service = OrderService::cold(store.clone());

        for uid in [" o1 ", "  "] {
            let order = Order::sample(uid);
            assert!(order.validate().is_ok());
            service.save_order(order).await.unwrap();
        }

        assert_eq!(lookup_order(&service, " o1 ").await.unwrap().order_uid, " o1 ");
        assert_eq!(lookup_order(&service, "  ").await.unwrap().order_uid, "  ");

        // A trimmed key is a different key.
        assert_eq!(lookup_order(&service, "o1").await, Err(ApiError::NotFound("o1".into())));
    }

    #[tokio::test]
    async fn test_health_reports_cache_size() {
        let store = MockStore::with_records(vec![Order::sample("A"), Order::sample("B")]);
        let service = OrderService::new(store).await;

        let report = health(&service);
        assert_eq!(report.cache_size, 2);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "status": "ok", "cacheSize": 2 })
        );
    }
}
