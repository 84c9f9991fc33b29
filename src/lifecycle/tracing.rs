//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Log lines use the compact format and hide the module prefix
//! (`with_target(false)`); structured fields such as `order_uid` and `size`
//! carry the context instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show cache hits and full payloads
//! RUST_LOG=debug cargo run
//!
//! # Filter to specific modules
//! RUST_LOG=order_cache::service=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Actor started record_type="Order" size=0
//! INFO restore_cache: Cache restored count=0 size=0
//! INFO Service started size=0
//! INFO Subscribed subject=orders
//! INFO process_message:save_order: Inserted record_type="Order" key=o1 size=1
//! INFO process_message:save_order: Order saved to store and cache bytes=812 order_uid="o1" size=1
//! INFO Order processed order_uid=o1
//! ```
//!
//! **With `RUST_LOG=debug`**, a second read of the same order shows the cache hit:
//!
//! ```text
//! DEBUG get_order: Cache hit order_uid="o1"
//! ```

/// Initializes the tracing subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; spans and fields carry the context
        .compact() // Compact format shows spans inline (e.g., "process_message:save_order")
        .init();
}
