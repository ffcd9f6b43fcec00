//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for resource identifiers and per-token resource state.
//! NO I/O, NO locks, NO external subsystems.
//!
//! - Dependencies point INWARD only (catalog, ledger and adapters depend on
//!   this, not vice versa).

pub mod entities;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
