//! # Domain Entities
//!
//! Catalog records and the per-token resource state machine.
//!
//! Per (token, resource) pair: `ABSENT -> PENDING -> ACTIVE`, plus
//! `PENDING -> ABSENT` on reject. `ACTIVE` ids only change position, except
//! when an accepted resource overwrites one of them.

use crate::domain::invariants::check_priority_permutation;
use crate::domain::services::hash_resource16;
use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, TokenId};
use crate::errors::{ResourceError, ResourceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// RESOURCE ENTRY
// =============================================================================

/// Content descriptor stored in a catalog. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Catalog-local id (non-zero).
    pub id: ResourceId,
    /// Primary content locator. May be empty.
    pub src: String,
    /// Thumbnail locator. May be empty.
    pub thumb: String,
    /// Metadata locator. May be empty.
    pub metadata_uri: String,
}

impl ResourceEntry {
    /// Creates an entry.
    pub fn new(
        id: ResourceId,
        src: impl Into<String>,
        thumb: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Self {
        Self {
            id,
            src: src.into(),
            thumb: thumb.into(),
            metadata_uri: metadata_uri.into(),
        }
    }
}

// =============================================================================
// LOCAL RESOURCE
// =============================================================================

/// Pre-image of a global id: the catalog and the id inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalResource {
    /// Catalog address.
    pub catalog: Address,
    /// Catalog-local id.
    pub resource_id: ResourceId,
}

impl LocalResource {
    /// Creates a local resource reference.
    #[must_use]
    pub const fn new(catalog: Address, resource_id: ResourceId) -> Self {
        Self {
            catalog,
            resource_id,
        }
    }

    /// Derives the global id for this reference.
    #[must_use]
    pub fn global_id(&self) -> GlobalResourceId {
        hash_resource16(self.catalog, self.resource_id)
    }
}

// =============================================================================
// TOKEN RESOURCE STATE
// =============================================================================

/// Outcome of a successful accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptOutcome {
    /// Id moved from pending to the tail of active.
    pub accepted: GlobalResourceId,
    /// Active id removed because the accepted one overwrites it.
    pub overwritten: Option<GlobalResourceId>,
}

/// Pending and active resources of one token.
///
/// Every mutator validates before it writes, so a returned error means the
/// state is unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenResourceState {
    pending: Vec<GlobalResourceId>,
    active: Vec<GlobalResourceId>,
    /// pending id -> active id it is meant to replace
    overwrites: HashMap<GlobalResourceId, GlobalResourceId>,
}

impl TokenResourceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending ids in insertion order.
    #[must_use]
    pub fn pending(&self) -> &[GlobalResourceId] {
        &self.pending
    }

    /// Active ids in priority order.
    #[must_use]
    pub fn active(&self) -> &[GlobalResourceId] {
        &self.active
    }

    /// Returns true if `id` is pending or active.
    #[must_use]
    pub fn contains(&self, id: GlobalResourceId) -> bool {
        self.pending.contains(&id) || self.active.contains(&id)
    }

    /// Overwrite target recorded for a pending id.
    #[must_use]
    pub fn overwrite_of(&self, id: GlobalResourceId) -> Option<GlobalResourceId> {
        self.overwrites.get(&id).copied()
    }

    /// Number of recorded overwrite proposals.
    #[must_use]
    pub fn overwrite_count(&self) -> usize {
        self.overwrites.len()
    }

    /// Appends `id` to the tail of pending.
    ///
    /// # Errors
    ///
    /// - `DuplicateOnToken` if `id` is already pending or active
    /// - `PendingFull` if pending already holds `max_pending` ids
    pub fn propose(
        &mut self,
        token_id: TokenId,
        id: GlobalResourceId,
        overwrites: Option<GlobalResourceId>,
        max_pending: usize,
    ) -> ResourceResult<()> {
        if self.contains(id) {
            return Err(ResourceError::DuplicateOnToken {
                token_id,
                resource: id,
            });
        }
        if self.pending.len() >= max_pending {
            return Err(ResourceError::PendingFull {
                token_id,
                max: max_pending,
            });
        }

        self.pending.push(id);
        if let Some(target) = overwrites.filter(|target| !target.is_zero()) {
            self.overwrites.insert(id, target);
        }
        Ok(())
    }

    /// Moves the pending id at `index` to the tail of active.
    ///
    /// If an overwrite was proposed for it and the target is active, the
    /// target is removed in the same step.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `index` is not a pending position
    pub fn accept(&mut self, index: usize) -> ResourceResult<AcceptOutcome> {
        let accepted = self.take_pending(index)?;

        let overwritten = self
            .overwrites
            .remove(&accepted)
            .and_then(|target| {
                let position = self.active.iter().position(|id| *id == target)?;
                Some(self.active.remove(position))
            });

        self.active.push(accepted);
        Ok(AcceptOutcome {
            accepted,
            overwritten,
        })
    }

    /// Drops the pending id at `index`.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `index` is not a pending position
    pub fn reject(&mut self, index: usize) -> ResourceResult<GlobalResourceId> {
        let rejected = self.take_pending(index)?;
        self.overwrites.remove(&rejected);
        Ok(rejected)
    }

    /// Drops every pending id and overwrite proposal. Returns the dropped ids.
    pub fn reject_all(&mut self) -> Vec<GlobalResourceId> {
        self.overwrites.clear();
        std::mem::take(&mut self.pending)
    }

    /// Replaces the active order with `ordered`.
    ///
    /// # Errors
    ///
    /// - `BadLength`, `UnknownActiveResource` or `DuplicatePriorityEntry` if
    ///   `ordered` is not a permutation of the active set
    pub fn set_priority(&mut self, ordered: &[GlobalResourceId]) -> ResourceResult<()> {
        check_priority_permutation(&self.active, ordered)?;
        self.active.clear();
        self.active.extend_from_slice(ordered);
        Ok(())
    }

    fn take_pending(&mut self, index: usize) -> ResourceResult<GlobalResourceId> {
        if index >= self.pending.len() {
            return Err(ResourceError::IndexOutOfRange {
                index,
                len: self.pending.len(),
            });
        }
        // Order-preserving: pending must keep insertion order.
        Ok(self.pending.remove(index))
    }
}

// =============================================================================
// TESTS
// =============================================================================
