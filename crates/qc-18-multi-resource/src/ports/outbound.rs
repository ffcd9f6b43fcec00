//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the Multi-Resource subsystem depends on:
//! - Token ownership (owned by the token subsystem, excluded here)
//! - Catalog lookup by address
//! - Event publication
//!
//! All ports are synchronous reads of already-committed state. None of them
//! may block on I/O while a token lock is held.

use crate::catalog::ResourceCatalog;
use crate::domain::value_objects::{Address, TokenId};
use crate::events::ResourceEvent;
use std::sync::Arc;

// =============================================================================
// OWNERSHIP ORACLE
// =============================================================================

/// Who owns a token, and who may act for the owner.
///
/// Queried on every mutating ledger call; answers are never cached since
/// ownership may change between calls.
pub trait OwnershipOracle: Send + Sync {
    /// Current owner, or `None` if the token does not exist.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Returns true if `operator` is approved for `token_id`.
    fn is_approved(&self, operator: Address, token_id: TokenId) -> bool;

    /// Returns true if `caller` owns `token_id` or is approved for it.
    fn is_owner_or_approved(&self, caller: Address, token_id: TokenId) -> bool {
        self.owner_of(token_id) == Some(caller) || self.is_approved(caller, token_id)
    }
}

// =============================================================================
// CATALOG DIRECTORY
// =============================================================================

/// Resolves catalog addresses to catalog instances.
///
/// One token collection may reference several catalogs.
pub trait CatalogDirectory: Send + Sync {
    /// Catalog registered at `address`.
    fn resolve(&self, address: Address) -> Option<Arc<ResourceCatalog>>;

    /// Registers a catalog under its own address.
    ///
    /// Returns false (and keeps the existing one) if the address is taken.
    fn register(&self, catalog: Arc<ResourceCatalog>) -> bool;

    /// Addresses of all registered catalogs.
    fn addresses(&self) -> Vec<Address>;

    /// Returns true if a catalog is registered at `address`.
    fn contains(&self, address: Address) -> bool {
        self.resolve(address).is_some()
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Receives events after each committed mutation.
pub trait ResourceEventSink: Send + Sync {
    /// Publish one event. Must not fail the already-committed operation.
    fn publish(&self, event: ResourceEvent);
}

// =============================================================================
// TESTS
// =============================================================================
