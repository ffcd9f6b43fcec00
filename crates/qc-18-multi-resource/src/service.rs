//! # Multi-Resource Service
//!
//! Wires the home catalog, the catalog directory, access control and the
//! token ledger into one [`MultiResourceApi`] implementation.
//!
//! ## Construction
//!
//! - The collection owner becomes the first issuer
//! - The home catalog is created at `derive_catalog_address(owner, name)`
//!   and registered in the directory
//! - Events go to the log, and to an in-memory log if `record_events` is set

use crate::access::{AccessControl, IssuerSet};
use crate::adapters::{
    FanoutEventSink, InMemoryCatalogDirectory, InMemoryOwnership, RecordingEventSink,
    TracingEventSink,
};
use crate::catalog::ResourceCatalog;
use crate::config::MultiResourceConfig;
use crate::domain::entities::{LocalResource, ResourceEntry};
use crate::domain::services::derive_catalog_address;
use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, TokenId};
use crate::errors::{ConfigError, ResourceError, ResourceResult};
use crate::events::ResourceEvent;
use crate::ledger::TokenResourceLedger;
use crate::ports::inbound::MultiResourceApi;
use crate::ports::outbound::{CatalogDirectory, OwnershipOracle, ResourceEventSink};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument};

/// Statistics for the Multi-Resource Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Mutations that committed.
    pub operations_committed: u64,
    /// Mutations that returned an error.
    pub operations_rejected: u64,
    /// Rejections caused by a missing role (subset of `operations_rejected`).
    pub unauthorized_attempts: u64,
}

/// The main Multi-Resource Service.
pub struct MultiResourceService<O: OwnershipOracle, D: CatalogDirectory> {
    config: MultiResourceConfig,
    home_catalog: Arc<ResourceCatalog>,
    ledger: TokenResourceLedger<O, D>,
    directory: Arc<D>,
    issuers: Arc<IssuerSet>,
    event_log: Option<Arc<RecordingEventSink>>,
    stats: RwLock<ServiceStats>,
}

impl<O: OwnershipOracle, D: CatalogDirectory> MultiResourceService<O, D> {
    /// Create a service for the collection owned by `owner`.
    ///
    /// # Errors
    ///
    /// - Any `validate()` failure of `config`
    /// - `HomeCatalogTaken` if the directory already holds the home address
    pub fn new(
        owner: Address,
        oracle: Arc<O>,
        directory: Arc<D>,
        config: MultiResourceConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let issuers = Arc::new(IssuerSet::new(owner));
        let event_log = config
            .record_events
            .then(|| Arc::new(RecordingEventSink::new()));
        let mut fanout = FanoutEventSink::new().with(Arc::new(TracingEventSink));
        if let Some(log) = &event_log {
            fanout = fanout.with(log.clone());
        }
        let sink: Arc<dyn ResourceEventSink> = Arc::new(fanout);

        let home_address = derive_catalog_address(owner, &config.resource_name);
        let home_catalog = Arc::new(
            ResourceCatalog::new(home_address, config.resource_name.clone(), issuers.clone())
                .with_event_sink(sink.clone()),
        );
        if !directory.register(home_catalog.clone()) {
            return Err(ConfigError::HomeCatalogTaken(home_address));
        }

        let ledger = TokenResourceLedger::new(
            AccessControl::new(issuers.clone(), oracle),
            directory.clone(),
            sink,
            config.max_pending_per_token,
        );

        info!(
            owner = ?owner,
            catalog = ?home_address,
            name = %config.resource_name,
            max_pending = config.max_pending_per_token,
            "Multi-resource service created"
        );

        Ok(Self {
            config,
            home_catalog,
            ledger,
            directory,
            issuers,
            event_log,
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MultiResourceConfig {
        &self.config
    }

    /// Get current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Recorded events, oldest first. Empty when `record_events` is off.
    #[must_use]
    pub fn events(&self) -> Vec<ResourceEvent> {
        self.event_log
            .as_ref()
            .map(|log| log.events())
            .unwrap_or_default()
    }

    /// The catalog created at construction.
    #[must_use]
    pub fn home_catalog(&self) -> &Arc<ResourceCatalog> {
        &self.home_catalog
    }

    /// Catalog directory shared with the ledger.
    #[must_use]
    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Ownership oracle backing token-controller checks.
    #[must_use]
    pub fn oracle(&self) -> &Arc<O> {
        self.ledger.access().oracle()
    }

    /// Token resource ledger.
    #[must_use]
    pub fn ledger(&self) -> &TokenResourceLedger<O, D> {
        &self.ledger
    }

    /// Returns true if `account` holds the issuer role.
    #[must_use]
    pub fn is_issuer(&self, account: Address) -> bool {
        self.issuers.contains(account)
    }

    /// Make another catalog resolvable for `add_resource_to_token`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `CatalogExists`.
    #[instrument(skip(self, catalog), fields(catalog = ?catalog.address()))]
    pub fn register_catalog(
        &self,
        caller: Address,
        catalog: Arc<ResourceCatalog>,
    ) -> ResourceResult<()> {
        let address = catalog.address();
        let result = self.issuers.require(caller).and_then(|()| {
            if self.directory.register(catalog) {
                Ok(())
            } else {
                Err(ResourceError::CatalogExists(address))
            }
        });
        self.track(result)
    }

    /// Grant the issuer role.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` is not an issuer.
    #[instrument(skip(self))]
    pub fn grant_issuer(&self, caller: Address, account: Address) -> ResourceResult<bool> {
        self.track(self.issuers.grant(caller, account))
    }

    /// Revoke the issuer role.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `LastIssuer`.
    #[instrument(skip(self))]
    pub fn revoke_issuer(&self, caller: Address, account: Address) -> ResourceResult<bool> {
        self.track(self.issuers.revoke(caller, account))
    }

    fn track<T>(&self, result: ResourceResult<T>) -> ResourceResult<T> {
        let mut stats = self.stats.write();
        match &result {
            Ok(_) => stats.operations_committed += 1,
            Err(err) => {
                stats.operations_rejected += 1;
                if err.is_authorization_failure() {
                    stats.unauthorized_attempts += 1;
                }
            }
        }
        result
    }
}

/// Create a service over in-memory adapters, owned by `Address::from_low_u64(1)`.
pub fn create_test_service() -> MultiResourceService<InMemoryOwnership, InMemoryCatalogDirectory> {
    let created = MultiResourceService::new(
        Address::from_low_u64(1),
        Arc::new(InMemoryOwnership::new()),
        Arc::new(InMemoryCatalogDirectory::new()),
        MultiResourceConfig::default(),
    );
    match created {
        Ok(service) => service,
        // Default config on a fresh directory cannot fail.
        Err(err) => unreachable!("test service construction failed: {err}"),
    }
}

// =============================================================================
// MultiResourceApi Implementation
// =============================================================================

impl<O: OwnershipOracle, D: CatalogDirectory> MultiResourceApi for MultiResourceService<O, D> {
    fn resource_storage(&self) -> Address {
        self.home_catalog.address()
    }

    fn get_resource_name(&self) -> String {
        self.home_catalog.get_resource_name().to_string()
    }

    fn add_resource_entry(
        &self,
        caller: Address,
        resource_id: ResourceId,
        src: &str,
        thumb: &str,
        metadata_uri: &str,
    ) -> ResourceResult<()> {
        self.track(
            self.home_catalog
                .add_resource_entry(caller, resource_id, src, thumb, metadata_uri),
        )
    }

    fn get_resource(&self, resource_id: ResourceId) -> ResourceResult<ResourceEntry> {
        self.home_catalog.get_resource(resource_id)
    }

    fn add_resource_to_token(
        &self,
        caller: Address,
        token_id: TokenId,
        catalog: Address,
        resource_id: ResourceId,
        overwrites: GlobalResourceId,
    ) -> ResourceResult<GlobalResourceId> {
        self.track(
            self.ledger
                .add_resource_to_token(caller, token_id, catalog, resource_id, overwrites),
        )
    }

    fn accept_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId> {
        self.track(self.ledger.accept_resource(caller, token_id, index))
    }

    fn reject_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId> {
        self.track(self.ledger.reject_resource(caller, token_id, index))
    }

    fn reject_all_resources(&self, caller: Address, token_id: TokenId) -> ResourceResult<usize> {
        self.track(self.ledger.reject_all_resources(caller, token_id))
    }

    fn set_priority(
        &self,
        caller: Address,
        token_id: TokenId,
        ordered: &[GlobalResourceId],
    ) -> ResourceResult<()> {
        self.track(self.ledger.set_priority(caller, token_id, ordered))
    }

    fn get_pending_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId> {
        self.ledger.get_pending_resources(token_id)
    }

    fn get_active_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId> {
        self.ledger.get_active_resources(token_id)
    }

    fn get_renderable_resource(&self, token_id: TokenId) -> ResourceResult<LocalResource> {
        self.ledger.get_renderable_resource(token_id)
    }

    fn get_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry> {
        self.ledger.get_resource_object_by_index(token_id, index)
    }

    fn get_pending_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry> {
        self.ledger
            .get_pending_resource_object_by_index(token_id, index)
    }

    fn get_resource_overwrites(
        &self,
        token_id: TokenId,
        resource: GlobalResourceId,
    ) -> Option<GlobalResourceId> {
        self.ledger.get_resource_overwrites(token_id, resource)
    }

    fn get_local_resource(&self, resource: GlobalResourceId) -> ResourceResult<LocalResource> {
        self.ledger.get_local_resource(resource)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::hash_resource16;

    fn owner() -> Address {
        Address::from_low_u64(1)
    }

    #[test]
    fn test_service_creation() {
        let service = create_test_service();
        assert_eq!(service.get_resource_name(), "TestResource");
        assert_eq!(
            service.resource_storage(),
            derive_catalog_address(owner(), "TestResource")
        );
        assert!(service.is_issuer(owner()));
        assert_eq!(service.stats(), ServiceStats::default());
        assert!(service.directory().contains(service.resource_storage()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MultiResourceService::new(
            owner(),
            Arc::new(InMemoryOwnership::new()),
            Arc::new(InMemoryCatalogDirectory::new()),
            MultiResourceConfig::default().with_max_pending(0),
        );
        assert!(matches!(
            result,
            Err(ConfigError::PendingCapOutOfRange { value: 0, .. })
        ));
    }

    #[test]
    fn test_home_catalog_address_collision() {
        let directory = Arc::new(InMemoryCatalogDirectory::new());
        let first = MultiResourceService::new(
            owner(),
            Arc::new(InMemoryOwnership::new()),
            directory.clone(),
            MultiResourceConfig::default(),
        );
        assert!(first.is_ok());

        let second = MultiResourceService::new(
            owner(),
            Arc::new(InMemoryOwnership::new()),
            directory,
            MultiResourceConfig::default(),
        );
        assert!(matches!(second, Err(ConfigError::HomeCatalogTaken(_))));
    }

    #[test]
    fn test_stats_track_outcomes() {
        let service = create_test_service();
        let id = ResourceId::from_u64(1);

        service.add_resource_entry(owner(), id, "", "", "").unwrap();
        let _ = service.add_resource_entry(owner(), id, "", "", "");
        let _ = service.add_resource_entry(Address::from_low_u64(2), ResourceId::from_u64(2), "", "", "");
        // Queries are not counted
        let _ = service.get_resource(ResourceId::from_u64(9));

        assert_eq!(
            service.stats(),
            ServiceStats {
                operations_committed: 1,
                operations_rejected: 2,
                unauthorized_attempts: 1,
            }
        );
    }

    #[test]
    fn test_full_lifecycle_through_api() {
        let service = create_test_service();
        let token = TokenId::from(1);
        service.oracle().mint(owner(), token);
        let storage = service.resource_storage();

        service
            .add_resource_entry(owner(), ResourceId::from_u64(1), "src", "thumb", "meta")
            .unwrap();
        let added = service
            .add_resource_to_token(owner(), token, storage, ResourceId::from_u64(1), GlobalResourceId::ZERO)
            .unwrap();
        assert_eq!(added, service.hash_resource16(storage, ResourceId::from_u64(1)));

        service.accept_resource(owner(), token, 0).unwrap();
        let entry = service.get_resource_object_by_index(token, 0).unwrap();
        assert_eq!(entry.thumb, "thumb");
        assert_eq!(
            service.get_renderable_resource(token).unwrap(),
            LocalResource::new(storage, ResourceId::from_u64(1))
        );

        let names: Vec<_> = service.events().iter().map(ResourceEvent::name).collect();
        assert_eq!(
            names,
            vec!["ResourceStorageSet", "ResourceAddedToToken", "ResourceAccepted"]
        );
    }

    #[test]
    fn test_register_foreign_catalog() {
        let service = create_test_service();
        let token = TokenId::from(3);
        service.oracle().mint(owner(), token);

        let foreign_issuer = Address::from_low_u64(0x77);
        let foreign = Arc::new(ResourceCatalog::new(
            Address::from_low_u64(0xF0),
            "Foreign",
            Arc::new(IssuerSet::new(foreign_issuer)),
        ));
        foreign
            .add_resource_entry(foreign_issuer, ResourceId::from_u64(1), "f", "", "")
            .unwrap();

        // Not resolvable until registered
        assert!(service
            .add_resource_to_token(owner(), token, foreign.address(), ResourceId::from_u64(1), GlobalResourceId::ZERO)
            .is_err());

        assert!(service
            .register_catalog(foreign_issuer, foreign.clone())
            .unwrap_err()
            .is_authorization_failure());
        service.register_catalog(owner(), foreign.clone()).unwrap();
        assert_eq!(
            service.register_catalog(owner(), foreign.clone()),
            Err(ResourceError::CatalogExists(foreign.address()))
        );

        let id = service
            .add_resource_to_token(owner(), token, foreign.address(), ResourceId::from_u64(1), GlobalResourceId::ZERO)
            .unwrap();
        assert_eq!(id, hash_resource16(foreign.address(), ResourceId::from_u64(1)));
        assert_eq!(
            service.get_pending_resource_object_by_index(token, 0).unwrap().src,
            "f"
        );
    }

    #[test]
    fn test_issuer_management() {
        let service = create_test_service();
        let delegate = Address::from_low_u64(5);

        assert_eq!(service.grant_issuer(owner(), delegate), Ok(true));
        service
            .add_resource_entry(delegate, ResourceId::from_u64(1), "", "", "")
            .unwrap();

        assert_eq!(service.revoke_issuer(delegate, owner()), Ok(true));
        assert!(!service.is_issuer(owner()));
        assert_eq!(
            service.revoke_issuer(delegate, delegate),
            Err(ResourceError::LastIssuer(delegate))
        );
    }

    #[test]
    fn test_event_log_disabled() {
        let mut config = MultiResourceConfig::default();
        config.record_events = false;
        let service = MultiResourceService::new(
            owner(),
            Arc::new(InMemoryOwnership::new()),
            Arc::new(InMemoryCatalogDirectory::new()),
            config,
        )
        .unwrap();

        service
            .add_resource_entry(owner(), ResourceId::from_u64(1), "", "", "")
            .unwrap();
        assert!(service.events().is_empty());
    }
}
