//! # Resource Catalog
//!
//! Authoritative store of resource descriptors for one issuing entity.
//! Entries are append-only: once registered an entry is never changed or
//! removed.

use crate::access::IssuerSet;
use crate::domain::entities::ResourceEntry;
use crate::domain::value_objects::{Address, ResourceId};
use crate::errors::{ResourceError, ResourceResult};
use crate::events::ResourceEvent;
use crate::ports::outbound::ResourceEventSink;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Default)]
struct CatalogEntries {
    by_id: HashMap<ResourceId, ResourceEntry>,
    /// Registration order.
    order: Vec<ResourceId>,
}

/// Catalog of resource entries, addressed by `address`.
pub struct ResourceCatalog {
    address: Address,
    name: String,
    issuers: Arc<IssuerSet>,
    entries: RwLock<CatalogEntries>,
    events: Option<Arc<dyn ResourceEventSink>>,
}

impl ResourceCatalog {
    /// Creates an empty catalog whose writers are `issuers`.
    pub fn new(address: Address, name: impl Into<String>, issuers: Arc<IssuerSet>) -> Self {
        Self {
            address,
            name: name.into(),
            issuers,
            entries: RwLock::new(CatalogEntries::default()),
            events: None,
        }
    }

    /// Attaches a sink that receives `ResourceStorageSet` events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn ResourceEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Catalog address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Display name fixed at construction.
    #[must_use]
    pub fn get_resource_name(&self) -> &str {
        &self.name
    }

    /// Returns true if `account` may register entries.
    #[must_use]
    pub fn is_issuer(&self, account: Address) -> bool {
        self.issuers.contains(account)
    }

    /// Issuer set shared with the owning collection.
    #[must_use]
    pub fn issuers(&self) -> &Arc<IssuerSet> {
        &self.issuers
    }

    /// Registers a new entry.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not an issuer
    /// - `ZeroIdentifier` if `resource_id` is zero
    /// - `DuplicateResource` if the id is taken
    pub fn add_resource_entry(
        &self,
        caller: Address,
        resource_id: ResourceId,
        src: &str,
        thumb: &str,
        metadata_uri: &str,
    ) -> ResourceResult<()> {
        self.issuers.require(caller)?;
        if resource_id.is_zero() {
            return Err(ResourceError::ZeroIdentifier);
        }

        let mut entries = self.entries.write();
        if entries.by_id.contains_key(&resource_id) {
            return Err(ResourceError::DuplicateResource(resource_id));
        }
        entries
            .by_id
            .insert(resource_id, ResourceEntry::new(resource_id, src, thumb, metadata_uri));
        entries.order.push(resource_id);

        info!(catalog = ?self.address, resource_id = %resource_id, "Resource entry registered");
        if let Some(sink) = &self.events {
            sink.publish(ResourceEvent::ResourceStorageSet {
                catalog: self.address,
                resource_id,
            });
        }
        Ok(())
    }

    /// Entry registered under `resource_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    pub fn get_resource(&self, resource_id: ResourceId) -> ResourceResult<ResourceEntry> {
        let entry = self.entries.read().by_id.get(&resource_id).cloned();
        debug!(catalog = ?self.address, resource_id = %resource_id, found = entry.is_some(), "Catalog lookup");
        entry.ok_or(ResourceError::NotFound(resource_id))
    }

    /// Returns true if `resource_id` is registered.
    #[must_use]
    pub fn contains(&self, resource_id: ResourceId) -> bool {
        self.entries.read().by_id.contains_key(&resource_id)
    }

    /// Registered ids in registration order.
    #[must_use]
    pub fn get_resource_ids(&self) -> Vec<ResourceId> {
        self.entries.read().order.clone()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResourceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCatalog")
            .field("address", &self.address)
            .field("name", &self.name)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
