use order_cache::api;
use order_cache::config::Config;
use order_cache::lifecycle::{setup_tracing, OrderSystem};
use order_cache::model::Order;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::from_env();
    info!(?config, "Starting order service");

    // Pretend the store survived a previous run with one order in it
    let system = OrderSystem::start_with_records(config, vec![Order::sample("restored-order")]).await;

    let order_uid = format!("test-order-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());

    let span = tracing::info_span!("publishing");
    async {
        info!(%order_uid, "Publishing sample order");
        system
            .publisher
            .publish(&Order::sample(order_uid.clone()))
            .await
            .map_err(|e| e.to_string())?;

        // Malformed payloads are logged and skipped by the subscriber
        system
            .publisher
            .publish_raw(r#"{"order_uid": ""}"#)
            .await
            .map_err(|e| e.to_string())?;
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    // Wait for the subscriber to store the order
    let mut attempts = 0;
    while system.service.cache().get(&order_uid).is_none() {
        attempts += 1;
        if attempts > 200 {
            return Err(format!("order {} was never ingested", order_uid));
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let span = tracing::info_span!("reading");
    async {
        for id in [order_uid.as_str(), "restored-order", "missing-order"] {
            match api::lookup_order(&*system.service, id).await {
                Ok(order) => info!(order_uid = %order.order_uid, items = order.items.len(), "Order found"),
                Err(e) => error!(error = %e, status = e.status_code(), "Order lookup failed"),
            }
        }

        let health = serde_json::to_string(&api::health(&*system.service)).map_err(|e| e.to_string())?;
        info!(%health, "Health");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    // Shutdown system gracefully
    let stats = system.shutdown().await?;

    info!(processed = stats.processed, rejected = stats.rejected, "Application completed successfully");
    Ok(())
}
