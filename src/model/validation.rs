//! Ingestion-side checks for inbound orders.
//!
//! The store does not enforce these; the message-stream subscriber runs
//! [`Order::validate`] before an order reaches
//! [`OrderService::save_order`](crate::service::OrderService::save_order).

use thiserror::Error;

use super::Order;

/// A malformed or inconsistent inbound order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required field was empty or missing from the payload.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// `payment.transaction` does not carry the order's key.
    #[error("payment.transaction {transaction:?} must match order_uid {order_uid:?}")]
    TransactionMismatch { order_uid: String, transaction: String },
}

impl Order {
    /// Checks the required fields and the transaction/key equality.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("order_uid", &self.order_uid),
            ("track_number", &self.track_number),
            ("entry", &self.entry),
            ("payment.transaction", &self.payment.transaction),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }

        if self.payment.transaction != self.order_uid {
            return Err(ValidationError::TransactionMismatch {
                order_uid: self.order_uid.clone(),
                transaction: self.payment.transaction.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_passes() {
        assert_eq!(Order::sample("o1").validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut order = Order::sample("o1");
        order.track_number.clear();
        order.entry.clear();
        assert_eq!(order.validate(), Err(ValidationError::MissingField("track_number")));

        let order = Order::default();
        assert_eq!(order.validate(), Err(ValidationError::MissingField("order_uid")));
    }

    #[test]
    fn test_transaction_must_match_key() {
        let mut order = Order::sample("o1");
        order.payment.transaction = "o2".to_string();
        let err = order.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::TransactionMismatch {
                order_uid: "o1".to_string(),
                transaction: "o2".to_string(),
            }
        );
        assert!(err.to_string().contains("must match order_uid"));
    }
}
