#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Order Cache
//!
//! > **Durable order ingestion with a read-through in-memory cache.**
//!
//! Orders arrive on a message stream, are persisted to an authoritative
//! store, and are served back from an in-process cache that is warmed from
//! the store on startup and filled lazily on misses.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### The store leads, the cache follows
//!
//! Every write reaches the store before it reaches the cache, so the cache
//! never holds an order the store does not. After a crash the cache is
//! rebuilt from the store on the next startup, or one key at a time as
//! reads miss.
//!
//! ### One lock, no I/O under it
//!
//! The [`Cache`](cache::Cache) is a single readers-writer-locked map. Store
//! round-trips happen outside the lock, so a slow store never blocks readers
//! of already-cached orders.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer defines its own error type (`StoreError`, `OrderError`,
//! `IngestError`, `ApiError`) with `thiserror`. Store errors travel upward as
//! the `source` of the service error, so callers can still tell a missing
//! order from an unreachable store.
//!
//! ### 2. Explicit Context
//! There is no global service. [`OrderSystem`](lifecycle::OrderSystem)
//! builds one [`OrderService`](service::OrderService) and shares it behind an
//! `Arc` with the subscriber and the read path.
//!
//! ### 3. Concurrency Model
//! The in-memory store is a [`RecordActor`](framework::RecordActor) task that
//! handles requests one at a time, which makes its duplicate check atomic.
//! The cache is shared directly between tasks and threads.
//!
//! ### 4. Observability
//! We use `tracing` everywhere with structured fields. See the
//! [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: the [`Order`](model::Order) record and its ingestion checks.
//! - [`framework`]: the generic [`Record`](framework::Record) trait and record actor.
//! - [`cache`]: the concurrent keyed cache.
//! - [`store`]: the [`OrderStore`](store::OrderStore) seam, in-memory and mock stores.
//! - [`service`]: [`OrderService`](service::OrderService), the cache/store reconciler.
//! - [`ingest`]: the message-stream subscriber and publisher.
//! - [`api`]: the transport-free read interface.
//! - [`lifecycle`]: wiring, shutdown and tracing setup.
//! - [`config`]: runtime settings.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod framework;
pub mod ingest;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod store;
