//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the Multi-Resource subsystem.
//!
//! - **Driving Port (Inbound)**: `MultiResourceApi`
//! - **Driven Ports (Outbound)**: `OwnershipOracle`, `CatalogDirectory`,
//!   `ResourceEventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
