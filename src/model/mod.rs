//! Pure data structures for the order record, implementing the [`Record`](crate::framework::Record) trait.

pub mod order;
pub mod validation;

pub use order::*;
pub use validation::*;
