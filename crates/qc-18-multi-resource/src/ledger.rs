//! # Token Resource Ledger
//!
//! Per-token pending and active resource lists.
//!
//! ## Locking
//!
//! - `tokens`: map lock, held only to find or create a token's state. Only a
//!   successful add creates an entry; controller calls on a token with no
//!   entry run against a detached empty state that is never stored
//! - per-token `Mutex<TokenResourceState>`: held for the whole
//!   validate-mutate-publish sequence of one call
//! - `local_resources`: taken after the token lock, never before
//!
//! Calls on different tokens never wait on each other beyond the map lock.

use crate::access::AccessControl;
use crate::domain::entities::{LocalResource, ResourceEntry, TokenResourceState};
use crate::domain::invariants::check_all_invariants;
use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, TokenId};
use crate::errors::{ResourceError, ResourceResult};
use crate::events::ResourceEvent;
use crate::ports::outbound::{CatalogDirectory, OwnershipOracle, ResourceEventSink};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

type SharedState = Arc<Mutex<TokenResourceState>>;

/// Resource lists of every token in one collection.
pub struct TokenResourceLedger<O: OwnershipOracle, D: CatalogDirectory> {
    max_pending: usize,
    access: AccessControl<O>,
    directory: Arc<D>,
    events: Arc<dyn ResourceEventSink>,
    tokens: RwLock<HashMap<TokenId, SharedState>>,
    /// Every global id ever attached, mapped to its pre-image. Never shrinks.
    local_resources: RwLock<HashMap<GlobalResourceId, LocalResource>>,
}

impl<O: OwnershipOracle, D: CatalogDirectory> TokenResourceLedger<O, D> {
    /// Creates an empty ledger.
    pub fn new(
        access: AccessControl<O>,
        directory: Arc<D>,
        events: Arc<dyn ResourceEventSink>,
        max_pending: usize,
    ) -> Self {
        Self {
            max_pending,
            access,
            directory,
            events,
            tokens: RwLock::new(HashMap::new()),
            local_resources: RwLock::new(HashMap::new()),
        }
    }

    /// Pending cap per token.
    #[must_use]
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Authorization gate used by this ledger.
    #[must_use]
    pub fn access(&self) -> &AccessControl<O> {
        &self.access
    }

    /// Number of tokens with recorded state.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.read().len()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Proposes `(catalog, resource_id)` for `token_id`.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `UnknownToken`, `UnknownResource`, `DuplicateOnToken`
    /// or `PendingFull`.
    #[instrument(skip(self), fields(token_id = %token_id))]
    pub fn add_resource_to_token(
        &self,
        caller: Address,
        token_id: TokenId,
        catalog: Address,
        resource_id: ResourceId,
        overwrites: GlobalResourceId,
    ) -> ResourceResult<GlobalResourceId> {
        self.access.require_issuer(caller)?;
        if self.access.oracle().owner_of(token_id).is_none() {
            return Err(ResourceError::UnknownToken(token_id));
        }
        let local = self.require_catalog_entry(catalog, resource_id)?;
        let resource = local.global_id();
        let overwrites = (!overwrites.is_zero()).then_some(overwrites);
        // Proposing into a fresh state fails only on a zero cap.
        if self.max_pending == 0 {
            return Err(ResourceError::PendingFull {
                token_id,
                max: self.max_pending,
            });
        }

        let shared = self.state_for_write(token_id);
        let mut state = shared.lock();
        state.propose(token_id, resource, overwrites, self.max_pending)?;
        self.local_resources.write().insert(resource, local);
        self.debug_check(&state);

        info!(
            resource = %resource,
            pending = state.pending().len(),
            "Resource added to token"
        );
        if let Some(target) = overwrites {
            self.events.publish(ResourceEvent::ResourceOverwriteProposed {
                token_id,
                resource,
                overwrites: target,
            });
        }
        self.events.publish(ResourceEvent::ResourceAddedToToken { token_id, resource });
        Ok(resource)
    }

    /// Moves `pending[index]` to the tail of active.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `IndexOutOfRange`.
    #[instrument(skip(self), fields(token_id = %token_id))]
    pub fn accept_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId> {
        self.access.require_token_controller(caller, token_id)?;

        let shared = self.state_for_control(token_id);
        let mut state = shared.lock();
        let outcome = state.accept(index)?;
        self.debug_check(&state);

        info!(
            resource = %outcome.accepted,
            active = state.active().len(),
            "Resource accepted"
        );
        if let Some(overwritten) = outcome.overwritten {
            info!(overwritten = %overwritten, "Active resource overwritten");
            self.events
                .publish(ResourceEvent::ResourceOverwritten { token_id, overwritten });
        }
        self.events.publish(ResourceEvent::ResourceAccepted {
            token_id,
            resource: outcome.accepted,
        });
        Ok(outcome.accepted)
    }

    /// Drops `pending[index]`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `IndexOutOfRange`.
    #[instrument(skip(self), fields(token_id = %token_id))]
    pub fn reject_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId> {
        self.access.require_token_controller(caller, token_id)?;

        let shared = self.state_for_control(token_id);
        let mut state = shared.lock();
        let rejected = state.reject(index)?;
        self.debug_check(&state);

        info!(resource = %rejected, "Resource rejected");
        self.events.publish(ResourceEvent::ResourceRejected {
            token_id,
            resource: Some(rejected),
        });
        Ok(rejected)
    }

    /// Drops every pending resource and returns how many were dropped.
    ///
    /// Publishes `ResourceRejected { resource: None }` only when something
    /// was dropped.
    ///
    /// # Errors
    ///
    /// `Unauthorized`.
    #[instrument(skip(self), fields(token_id = %token_id))]
    pub fn reject_all_resources(&self, caller: Address, token_id: TokenId) -> ResourceResult<usize> {
        self.access.require_token_controller(caller, token_id)?;

        let shared = self.state_for_control(token_id);
        let mut state = shared.lock();
        let dropped = state.reject_all().len();
        self.debug_check(&state);
        if dropped == 0 {
            debug!("No pending resources to reject");
            return Ok(0);
        }

        info!(dropped, "All pending resources rejected");
        self.events.publish(ResourceEvent::ResourceRejected {
            token_id,
            resource: None,
        });
        Ok(dropped)
    }

    /// Replaces the active order with `ordered`.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `BadLength`, `UnknownActiveResource` or
    /// `DuplicatePriorityEntry`.
    #[instrument(skip(self, ordered), fields(token_id = %token_id, len = ordered.len()))]
    pub fn set_priority(
        &self,
        caller: Address,
        token_id: TokenId,
        ordered: &[GlobalResourceId],
    ) -> ResourceResult<()> {
        self.access.require_token_controller(caller, token_id)?;

        let shared = self.state_for_control(token_id);
        let mut state = shared.lock();
        state.set_priority(ordered)?;
        self.debug_check(&state);

        info!("Resource priority set");
        self.events
            .publish(ResourceEvent::ResourcePrioritySet { token_id });
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Pending ids in insertion order. Empty for unknown tokens.
    #[must_use]
    pub fn get_pending_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId> {
        self.read_state(token_id, |state| state.pending().to_vec())
            .unwrap_or_default()
    }

    /// Active ids in priority order. Empty for unknown tokens.
    #[must_use]
    pub fn get_active_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId> {
        self.read_state(token_id, |state| state.active().to_vec())
            .unwrap_or_default()
    }

    /// Overwrite target recorded for a pending resource.
    #[must_use]
    pub fn get_resource_overwrites(
        &self,
        token_id: TokenId,
        resource: GlobalResourceId,
    ) -> Option<GlobalResourceId> {
        self.read_state(token_id, |state| state.overwrite_of(resource))
            .flatten()
    }

    /// Pre-image of the highest-priority active resource.
    ///
    /// # Errors
    ///
    /// `NoActiveResource` if active is empty.
    pub fn get_renderable_resource(&self, token_id: TokenId) -> ResourceResult<LocalResource> {
        let top = self
            .read_state(token_id, |state| state.active().first().copied())
            .flatten()
            .ok_or(ResourceError::NoActiveResource(token_id))?;
        self.get_local_resource(top)
    }

    /// Catalog entry behind `active[index]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange`, or a lookup error if the entry cannot be resolved.
    pub fn get_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry> {
        let active = self.get_active_resources(token_id);
        let resource = active
            .get(index)
            .copied()
            .ok_or(ResourceError::IndexOutOfRange {
                index,
                len: active.len(),
            })?;
        self.resolve_entry(resource)
    }

    /// Catalog entry behind `pending[index]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange`, or a lookup error if the entry cannot be resolved.
    pub fn get_pending_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry> {
        let pending = self.get_pending_resources(token_id);
        let resource = pending
            .get(index)
            .copied()
            .ok_or(ResourceError::IndexOutOfRange {
                index,
                len: pending.len(),
            })?;
        self.resolve_entry(resource)
    }

    /// Pre-image of a global id that was attached to some token.
    ///
    /// # Errors
    ///
    /// `UnresolvedResource` if the id was never attached.
    pub fn get_local_resource(&self, resource: GlobalResourceId) -> ResourceResult<LocalResource> {
        self.local_resources
            .read()
            .get(&resource)
            .copied()
            .ok_or(ResourceError::UnresolvedResource(resource))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn state_for_write(&self, token_id: TokenId) -> SharedState {
        if let Some(shared) = self.tokens.read().get(&token_id) {
            return Arc::clone(shared);
        }
        Arc::clone(self.tokens.write().entry(token_id).or_default())
    }

    /// State of a token for controller calls. A token with no entry gets a
    /// detached empty state: every controller call on it either fails or
    /// leaves it empty, so it is never stored.
    fn state_for_control(&self, token_id: TokenId) -> SharedState {
        self.tokens.read().get(&token_id).cloned().unwrap_or_default()
    }

    fn read_state<T>(
        &self,
        token_id: TokenId,
        read: impl FnOnce(&TokenResourceState) -> T,
    ) -> Option<T> {
        let shared = self.tokens.read().get(&token_id).cloned()?;
        let state = shared.lock();
        Some(read(&state))
    }

    fn require_catalog_entry(
        &self,
        catalog: Address,
        resource_id: ResourceId,
    ) -> ResourceResult<LocalResource> {
        let known = !resource_id.is_zero()
            && self
                .directory
                .resolve(catalog)
                .is_some_and(|c| c.contains(resource_id));
        if known {
            Ok(LocalResource::new(catalog, resource_id))
        } else {
            Err(ResourceError::UnknownResource {
                catalog,
                resource_id,
            })
        }
    }

    fn resolve_entry(&self, resource: GlobalResourceId) -> ResourceResult<ResourceEntry> {
        let local = self.get_local_resource(resource)?;
        let catalog = self
            .directory
            .resolve(local.catalog)
            .ok_or(ResourceError::UnknownResource {
                catalog: local.catalog,
                resource_id: local.resource_id,
            })?;
        debug!(resource = %resource, catalog = ?local.catalog, "Resolving resource entry");
        catalog.get_resource(local.resource_id)
    }

    fn debug_check(&self, state: &TokenResourceState) {
        debug_assert!(
            check_all_invariants(state, self.max_pending).is_valid(),
            "token resource invariants violated: {:?}",
            check_all_invariants(state, self.max_pending)
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================
