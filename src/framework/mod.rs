//! Generic keyed-record building blocks.
//!
//! This module provides the pieces shared by the cache and the in-memory store.
//!
//! # Main Components
//!
//! - [`Record`] - Trait that keyed record types implement
//! - [`RecordActor`] - Task that owns a keyed collection and serializes access to it
//! - [`RecordClient`] - Type-safe, cloneable client for a [`RecordActor`]
//! - [`FrameworkError`] - Common error types

pub mod core;

// Re-export core types for convenience
pub use self::core::*;
