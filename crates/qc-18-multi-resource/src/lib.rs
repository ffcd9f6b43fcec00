//! # QC-18 Multi-Resource - Resource Registry & Token Resource Ledger
//!
//! **Subsystem ID:** 18
//! **Status:** Production-Ready (in-memory adapters)
//!
//! ## Purpose
//!
//! Lets a single token carry several alternative content representations.
//! Issuers register resource descriptors in a catalog and propose them to
//! tokens; token owners accept or reject each proposal and order the accepted
//! ones by display priority.
//!
//! ## Identifiers
//!
//! | Id | Width | Scope |
//! |----|-------|-------|
//! | `ResourceId` | 8 bytes | unique within one catalog, non-zero |
//! | `GlobalResourceId` | 16 bytes | `keccak256(catalog ‖ resource_id)[..16]` |
//! | `TokenId` | 256 bits | one token of the collection |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Pending and active are disjoint | `domain/invariants.rs` - `check_disjoint_invariant()` |
//! | INVARIANT-2 | No duplicates within a list | `domain/invariants.rs` - `check_unique_invariant()` |
//! | INVARIANT-3 | Pending cap per token | `domain/invariants.rs` - `check_pending_cap_invariant()` |
//! | INVARIANT-4 | Priority is a permutation of active | `domain/invariants.rs` - `check_priority_permutation()` |
//! | INVARIANT-5 | Overwrite proposals track pending | `domain/invariants.rs` - `check_overwrite_invariant()` |
//!
//! ## Authorization
//!
//! | Operation | Required Role | Enforcement |
//! |-----------|---------------|-------------|
//! | `add_resource_entry` | Issuer | `catalog.rs` |
//! | `add_resource_to_token` | Issuer | `ledger.rs` |
//! | `register_catalog`, `grant_issuer`, `revoke_issuer` | Issuer | `service.rs` |
//! | `accept_resource`, `reject_resource`, `reject_all_resources`, `set_priority` | Token owner or approved | `ledger.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Owner | Trait | Purpose |
//! |-------|-------|---------|
//! | Token subsystem | `OwnershipOracle` | Owner and approval lookups |
//! | Catalog registry | `CatalogDirectory` | Resolve catalog addresses |
//! | Event bus | `ResourceEventSink` | Publish committed changes |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_multi_resource::prelude::*;
//!
//! let service = create_test_service();
//! let owner = Address::from_low_u64(1);
//! service.oracle().mint(owner, TokenId::from(1));
//!
//! service.add_resource_entry(owner, ResourceId::from_u64(1), "ipfs://src", "", "")?;
//! let id = service.add_resource_to_token(
//!     owner,
//!     TokenId::from(1),
//!     service.resource_storage(),
//!     ResourceId::from_u64(1),
//!     GlobalResourceId::ZERO,
//! )?;
//! service.accept_resource(owner, TokenId::from(1), 0)?;
//! assert_eq!(service.get_active_resources(TokenId::from(1)), vec![id]);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod access;
pub mod adapters;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod ports;
pub mod service;
pub mod telemetry;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        AcceptOutcome, LocalResource, ResourceEntry, TokenResourceState,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        Address, GlobalResourceId, ResourceId, Role, TokenId, U256,
    };

    // Domain services
    pub use crate::domain::services::{
        derive_catalog_address, hash_resource16, keccak256, verify_resource_id,
    };

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, check_priority_permutation, InvariantCheckResult,
        InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::MultiResourceApi;
    pub use crate::ports::outbound::{CatalogDirectory, OwnershipOracle, ResourceEventSink};

    // Components
    pub use crate::access::{AccessControl, IssuerSet};
    pub use crate::catalog::ResourceCatalog;
    pub use crate::ledger::TokenResourceLedger;

    // Events
    pub use crate::events::{ResourceEvent, TOPIC};

    // Errors
    pub use crate::errors::{ConfigError, ResourceError, ResourceResult};

    // Adapters
    pub use crate::adapters::{
        FanoutEventSink, InMemoryCatalogDirectory, InMemoryOwnership, RecordingEventSink,
        TracingEventSink,
    };

    // Configuration
    pub use crate::config::MultiResourceConfig;
    pub use crate::telemetry::init_logging;

    // Service
    pub use crate::service::{create_test_service, MultiResourceService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID for IPC.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Multi-Resource";

// =============================================================================
// TESTS
// =============================================================================
