//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports, used by tests and by
//! embedders that do not bring their own token or catalog store.

pub mod catalog_directory;
pub mod event_log;
pub mod ownership;

pub use catalog_directory::*;
pub use event_log::*;
pub use ownership::*;
