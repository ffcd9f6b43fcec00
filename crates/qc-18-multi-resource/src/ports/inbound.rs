//! # Driving Ports (API - Inbound)
//!
//! The public call surface of the Multi-Resource subsystem. Every call is
//! synchronous and either fully commits or fails with no side effects.

use crate::domain::entities::{LocalResource, ResourceEntry};
use crate::domain::services;
use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, TokenId};
use crate::errors::ResourceResult;

// =============================================================================
// MULTI-RESOURCE API (Primary Driving Port)
// =============================================================================

/// Catalog and token-resource operations of one token collection.
///
/// Catalog calls (`add_resource_entry`, `get_resource`, `get_resource_name`)
/// target the collection's home catalog.
pub trait MultiResourceApi: Send + Sync {
    /// Derives the global id of `(catalog, resource_id)`.
    ///
    /// Pure; matches any off-system recomputation.
    fn hash_resource16(&self, catalog: Address, resource_id: ResourceId) -> GlobalResourceId {
        services::hash_resource16(catalog, resource_id)
    }

    /// Address of the home catalog.
    fn resource_storage(&self) -> Address;

    /// Display name of the home catalog.
    fn get_resource_name(&self) -> String;

    /// Registers an entry in the home catalog. Issuer only.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `ZeroIdentifier` or `DuplicateResource`.
    fn add_resource_entry(
        &self,
        caller: Address,
        resource_id: ResourceId,
        src: &str,
        thumb: &str,
        metadata_uri: &str,
    ) -> ResourceResult<()>;

    /// Entry of the home catalog.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    fn get_resource(&self, resource_id: ResourceId) -> ResourceResult<ResourceEntry>;

    /// Appends `hash_resource16(catalog, resource_id)` to the token's pending
    /// list. Issuer only. A non-zero `overwrites` names the active resource the
    /// new one replaces on accept.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `UnknownToken`, `UnknownResource`, `DuplicateOnToken`
    /// or `PendingFull`.
    fn add_resource_to_token(
        &self,
        caller: Address,
        token_id: TokenId,
        catalog: Address,
        resource_id: ResourceId,
        overwrites: GlobalResourceId,
    ) -> ResourceResult<GlobalResourceId>;

    /// Moves `pending[index]` to the tail of active. Token controller only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `IndexOutOfRange`.
    fn accept_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId>;

    /// Drops `pending[index]`. Token controller only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` or `IndexOutOfRange`.
    fn reject_resource(
        &self,
        caller: Address,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<GlobalResourceId>;

    /// Drops every pending resource. Token controller only.
    ///
    /// Returns how many were dropped.
    ///
    /// # Errors
    ///
    /// `Unauthorized`.
    fn reject_all_resources(&self, caller: Address, token_id: TokenId) -> ResourceResult<usize>;

    /// Replaces the active order. Token controller only.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `BadLength`, `UnknownActiveResource` or
    /// `DuplicatePriorityEntry`.
    fn set_priority(
        &self,
        caller: Address,
        token_id: TokenId,
        ordered: &[GlobalResourceId],
    ) -> ResourceResult<()>;

    /// Pending ids in insertion order.
    fn get_pending_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId>;

    /// Active ids in priority order.
    fn get_active_resources(&self, token_id: TokenId) -> Vec<GlobalResourceId>;

    /// Pre-image of the highest-priority active resource.
    ///
    /// # Errors
    ///
    /// `NoActiveResource` if active is empty.
    fn get_renderable_resource(&self, token_id: TokenId) -> ResourceResult<LocalResource>;

    /// Catalog entry behind `active[index]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange`, or a lookup error if the catalog is gone.
    fn get_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry>;

    /// Catalog entry behind `pending[index]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange`, or a lookup error if the catalog is gone.
    fn get_pending_resource_object_by_index(
        &self,
        token_id: TokenId,
        index: usize,
    ) -> ResourceResult<ResourceEntry>;

    /// Overwrite target recorded for a pending resource.
    fn get_resource_overwrites(
        &self,
        token_id: TokenId,
        resource: GlobalResourceId,
    ) -> Option<GlobalResourceId>;

    /// Pre-image of a global id that was attached to some token.
    ///
    /// # Errors
    ///
    /// `UnresolvedResource` if the id was never attached.
    fn get_local_resource(&self, resource: GlobalResourceId) -> ResourceResult<LocalResource>;
}
