//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`OrderSystem`] - Starts the store actor, the service and the subscriber, and shuts them down
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use self::tracing::*;
