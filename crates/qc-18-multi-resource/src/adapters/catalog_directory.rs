//! # Catalog Directory Adapter
//!
//! In-memory address -> catalog map.

use crate::catalog::ResourceCatalog;
use crate::domain::value_objects::Address;
use crate::ports::outbound::CatalogDirectory;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Catalogs known to one collection.
#[derive(Debug, Default)]
pub struct InMemoryCatalogDirectory {
    catalogs: RwLock<BTreeMap<Address, Arc<ResourceCatalog>>>,
}

impl InMemoryCatalogDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.read().len()
    }

    /// Returns true if no catalog is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CatalogDirectory for InMemoryCatalogDirectory {
    fn resolve(&self, address: Address) -> Option<Arc<ResourceCatalog>> {
        self.catalogs.read().get(&address).cloned()
    }

    fn register(&self, catalog: Arc<ResourceCatalog>) -> bool {
        let address = catalog.address();
        let mut catalogs = self.catalogs.write();
        if catalogs.contains_key(&address) {
            return false;
        }
        info!(catalog = ?address, name = catalog.get_resource_name(), "Catalog registered");
        catalogs.insert(address, catalog);
        true
    }

    fn addresses(&self) -> Vec<Address> {
        self.catalogs.read().keys().copied().collect()
    }
}
