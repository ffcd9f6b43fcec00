//! # Event Schema
//!
//! Events emitted after each committed catalog or ledger mutation.
//! Payloads are serde-serializable so they can be wrapped in
//! `AuthenticatedMessage<T>` envelopes for transport.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `ResourceStorageSet` | `add_resource_entry` |
//! | `ResourceAddedToToken` | `add_resource_to_token` |
//! | `ResourceOverwriteProposed` | `add_resource_to_token` with non-zero `overwrites` |
//! | `ResourceAccepted` | `accept_resource` |
//! | `ResourceOverwritten` | `accept_resource` that replaced an active id |
//! | `ResourceRejected` | `reject_resource`, `reject_all_resources` |
//! | `ResourcePrioritySet` | `set_priority` |

use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, TokenId};
use serde::{Deserialize, Serialize};

/// Event bus topic for this subsystem.
pub const TOPIC: &str = "multi-resource";

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceEvent {
    /// A catalog registered a new entry.
    ResourceStorageSet {
        /// Catalog address.
        catalog: Address,
        /// New entry id.
        resource_id: ResourceId,
    },
    /// A resource was appended to a token's pending list.
    ResourceAddedToToken {
        /// Target token.
        token_id: TokenId,
        /// Global id of the resource.
        resource: GlobalResourceId,
    },
    /// A pending resource was proposed as a replacement for another.
    ResourceOverwriteProposed {
        /// Target token.
        token_id: TokenId,
        /// Pending resource.
        resource: GlobalResourceId,
        /// Active resource it should replace.
        overwrites: GlobalResourceId,
    },
    /// A pending resource moved to the tail of active.
    ResourceAccepted {
        /// Target token.
        token_id: TokenId,
        /// Accepted resource.
        resource: GlobalResourceId,
    },
    /// An active resource was replaced during accept.
    ResourceOverwritten {
        /// Target token.
        token_id: TokenId,
        /// Removed active resource.
        overwritten: GlobalResourceId,
    },
    /// Pending resources were dropped. `None` means all of them.
    ResourceRejected {
        /// Target token.
        token_id: TokenId,
        /// Dropped resource, or `None` for a reject-all.
        resource: Option<GlobalResourceId>,
    },
    /// The active list was reordered.
    ResourcePrioritySet {
        /// Target token.
        token_id: TokenId,
    },
}

impl ResourceEvent {
    /// Token the event refers to, if any.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::ResourceStorageSet { .. } => None,
            Self::ResourceAddedToToken { token_id, .. }
            | Self::ResourceOverwriteProposed { token_id, .. }
            | Self::ResourceAccepted { token_id, .. }
            | Self::ResourceOverwritten { token_id, .. }
            | Self::ResourceRejected { token_id, .. }
            | Self::ResourcePrioritySet { token_id } => Some(*token_id),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResourceStorageSet { .. } => "ResourceStorageSet",
            Self::ResourceAddedToToken { .. } => "ResourceAddedToToken",
            Self::ResourceOverwriteProposed { .. } => "ResourceOverwriteProposed",
            Self::ResourceAccepted { .. } => "ResourceAccepted",
            Self::ResourceOverwritten { .. } => "ResourceOverwritten",
            Self::ResourceRejected { .. } => "ResourceRejected",
            Self::ResourcePrioritySet { .. } => "ResourcePrioritySet",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
