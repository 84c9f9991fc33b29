use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::framework::Record;

/// An order as delivered by the message stream and persisted by the store.
///
/// # Record
/// This struct implements the [`Record`] trait keyed by `order_uid`,
/// allowing it to be held by a [`Cache`](crate::cache::Cache) and a
/// [`RecordActor`](crate::framework::RecordActor).
///
/// Missing JSON fields decode to their defaults; required fields are checked
/// separately by [`Order::validate`](crate::model::Order::validate).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    pub items: Vec<Item>,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i32,
    pub date_created: DateTime<Utc>,
    pub oof_shard: String,
}

/// Delivery details, one per order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

/// Payment details, one per order. `transaction` carries the order's `order_uid`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub transaction: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i32,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i32,
    pub goods_total: i32,
    pub custom_fee: i32,
}

/// A single line item of an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i32,
    pub rid: String,
    pub name: String,
    pub sale: i32,
    pub size: String,
    pub total_price: i32,
    pub nm_id: i64,
    pub brand: String,
    pub status: i32,
}

impl Order {
    /// Builds a complete sample order keyed by `order_uid`.
    ///
    /// Used by the demo binary and tests; the payment transaction is set to
    /// the same key so the result passes validation.
    pub fn sample(order_uid: impl Into<String>) -> Self {
        let order_uid = order_uid.into();
        Self {
            track_number: "WBILMTESTTRACK".to_string(),
            entry: "WBIL".to_string(),
            delivery: Delivery {
                name: "Test Testov".to_string(),
                phone: "+9720000000".to_string(),
                zip: "2639809".to_string(),
                city: "Kiryat Mozkin".to_string(),
                address: "Ploshad Mira 15".to_string(),
                region: "Kraiot".to_string(),
                email: "test@gmail.com".to_string(),
            },
            payment: Payment {
                transaction: order_uid.clone(),
                request_id: String::new(),
                currency: "USD".to_string(),
                provider: "wbpay".to_string(),
                amount: 1817,
                payment_dt: 1637907727,
                bank: "alpha".to_string(),
                delivery_cost: 1500,
                goods_total: 317,
                custom_fee: 0,
            },
            items: vec![Item {
                chrt_id: 9934930,
                track_number: "WBILMTESTTRACK".to_string(),
                price: 453,
                rid: "ab4219087a764ae0btest".to_string(),
                name: "Mascaras".to_string(),
                sale: 30,
                size: "0".to_string(),
                total_price: 317,
                nm_id: 2389212,
                brand: "Vivienne Sabo".to_string(),
                status: 202,
            }],
            locale: "en".to_string(),
            internal_signature: String::new(),
            customer_id: "test".to_string(),
            delivery_service: "meest".to_string(),
            shardkey: "9".to_string(),
            sm_id: 99,
            date_created: Utc::now(),
            oof_shard: "1".to_string(),
            order_uid,
        }
    }
}

impl Record for Order {
    type Key = String;

    fn key(&self) -> &String {
        &self.order_uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_payload() {
        let payload = r#"{
            "order_uid": "b563feb7b2b84b6test",
            "track_number": "WBILMTESTTRACK",
            "entry": "WBIL",
            "delivery": { "name": "Test Testov", "city": "Kiryat Mozkin" },
            "payment": { "transaction": "b563feb7b2b84b6test", "amount": 1817, "payment_dt": 1637907727 },
            "items": [ { "chrt_id": 9934930, "price": 453, "brand": "Vivienne Sabo", "status": 202 } ],
            "locale": "en",
            "sm_id": 99,
            "date_created": "2021-11-26T06:22:19Z"
        }"#;

        let order: Order = serde_json::from_str(payload).unwrap();
        assert_eq!(order.key(), "b563feb7b2b84b6test");
        assert_eq!(order.payment.amount, 1817);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].nm_id, 0);
        assert_eq!(order.delivery.email, "");
        assert_eq!(order.date_created.timestamp(), 1637907739);
    }

    #[test]
    fn test_sample_is_keyed_consistently() {
        let order = Order::sample("o1");
        assert_eq!(order.key(), "o1");
        assert_eq!(order.payment.transaction, "o1");
    }
}
