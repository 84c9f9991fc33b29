use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::Config;
use crate::ingest::{self, IngestStats, Publisher};
use crate::model::Order;
use crate::service::OrderService;
use crate::store::MemoryStore;

/// The runtime orchestrator for the order service.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the store actor and the subscriber
/// - **Dependency Wiring**: Handing one shared [`OrderService`] to both the ingest and read paths
/// - **Warm-up**: Filling the cache from the store before any message is consumed
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(Config::from_env()).await;
///
/// system.publisher.publish(&order).await?;
/// let order = system.service.get_order("o1").await?;
///
/// // Gracefully shut down when done
/// let stats = system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Shared service used by the read path
    pub service: Arc<OrderService<MemoryStore>>,

    /// Sending half of the order stream
    pub publisher: Publisher,

    store_handle: tokio::task::JoinHandle<()>,
    subscriber_handle: tokio::task::JoinHandle<IngestStats>,
    shutdown_timeout: Duration,
}

impl OrderSystem {
    /// Starts a system over an empty store.
    pub async fn start(config: Config) -> Self {
        Self::start_with_records(config, Vec::new()).await
    }

    /// Starts a system whose store already holds `orders`, as after a restart.
    ///
    /// This method:
    /// 1. Spawns the store actor
    /// 2. Builds the service, warming the cache unless disabled
    /// 3. Spawns the subscriber on the configured subject
    pub async fn start_with_records(config: Config, orders: Vec<Order>) -> Self {
        let shutdown_timeout = config.shutdown_timeout;
        let (store_actor, store) = MemoryStore::with_records(config.store_buffer, orders);
        let store_handle = tokio::spawn(store_actor.run());

        let service = if config.restore_on_start {
            OrderService::new(store).await
        } else {
            OrderService::cold(store)
        };
        let service = Arc::new(service);
        info!(size = service.cache_size(), "Service started");

        let (subscriber, publisher) =
            ingest::channel(config.ingest_buffer, config.subject, Arc::clone(&service));
        let subscriber_handle = tokio::spawn(subscriber.run());

        Self {
            service,
            publisher,
            store_handle,
            subscriber_handle,
            shutdown_timeout,
        }
    }

    /// Gracefully shuts down the system and returns the subscriber's counts.
    ///
    /// Dropping the publisher closes the stream; the subscriber drains what is
    /// queued and exits. Dropping the last service handle then closes the store
    /// actor's channel. If another clone of `service` keeps the store open for
    /// longer than [`Config::shutdown_timeout`], the store task is aborted and
    /// an error is returned.
    pub async fn shutdown(self) -> Result<IngestStats, String> {
        info!("Shutting down system...");

        let OrderSystem {
            service,
            publisher,
            mut store_handle,
            subscriber_handle,
            shutdown_timeout,
        } = self;

        drop(publisher);
        let stats = match subscriber_handle.await {
            Ok(stats) => stats,
            Err(e) => {
                error!("Subscriber task failed: {:?}", e);
                return Err(format!("Subscriber task failed: {:?}", e));
            }
        };

        let outstanding = Arc::strong_count(&service) - 1;
        drop(service);
        match tokio::time::timeout(shutdown_timeout, &mut store_handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
            Err(_) => {
                store_handle.abort();
                error!(outstanding, "Store task did not stop, service still shared");
                return Err(format!(
                    "Store task did not stop within {:?}: {} service handle(s) still alive",
                    shutdown_timeout, outstanding
                ));
            }
        }

        info!(
            processed = stats.processed,
            rejected = stats.rejected,
            "System shutdown complete."
        );
        Ok(stats)
    }
}
