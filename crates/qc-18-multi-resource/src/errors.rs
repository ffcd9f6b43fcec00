//! # Error Types
//!
//! All error types for the resource registry and token ledger.
//!
//! Every error is a rejected call: state is untouched and the caller may retry
//! with corrected input. There is no fatal class.

use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId, Role, TokenId};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type ResourceResult<T> = Result<T, ResourceError>;

// =============================================================================
// RESOURCE ERRORS
// =============================================================================

/// Errors returned by catalog, access control and ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Attempted to register the zero sentinel id.
    #[error("resource id must be non-zero")]
    ZeroIdentifier,

    /// The local id is already registered in the catalog.
    #[error("resource {0} already exists in catalog")]
    DuplicateResource(ResourceId),

    /// No catalog entry with this id.
    #[error("resource {0} not found")]
    NotFound(ResourceId),

    /// Caller lacks the role required for the mutation.
    #[error("unauthorized: {caller:?} lacks {role} role")]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
        /// Role that was required.
        role: Role,
    },

    /// The referenced catalog or catalog entry does not exist.
    #[error("no resource {resource_id} in catalog {catalog:?}")]
    UnknownResource {
        /// Catalog address given by the caller.
        catalog: Address,
        /// Local id given by the caller.
        resource_id: ResourceId,
    },

    /// The resource is already pending or active on the token.
    #[error("resource {resource} already exists on token {token_id}")]
    DuplicateOnToken {
        /// Target token.
        token_id: TokenId,
        /// Global id that is already present.
        resource: GlobalResourceId,
    },

    /// Position is outside the addressed list.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// Priority list length differs from the active list.
    #[error("bad priority list length: expected {expected}, got {actual}")]
    BadLength {
        /// Length of the active list.
        expected: usize,
        /// Length of the submitted list.
        actual: usize,
    },

    /// Priority list names an id that is not active on the token.
    #[error("cannot reprioritize non-active resource {0}")]
    UnknownActiveResource(GlobalResourceId),

    /// Priority list names the same id twice.
    #[error("resource {0} appears more than once in priority list")]
    DuplicatePriorityEntry(GlobalResourceId),

    /// Render query on a token without active resources.
    #[error("token {0} has no active resource")]
    NoActiveResource(TokenId),

    /// The ownership oracle has no owner for the token.
    #[error("token {0} does not exist")]
    UnknownToken(TokenId),

    /// The pending list reached its configured cap.
    #[error("max pending resources reached for token {token_id} ({max})")]
    PendingFull {
        /// Target token.
        token_id: TokenId,
        /// Configured cap.
        max: usize,
    },

    /// Revoking would leave the issuer set empty.
    #[error("cannot revoke last issuer {0:?}")]
    LastIssuer(Address),

    /// A catalog is already registered under this address.
    #[error("catalog already registered at {0:?}")]
    CatalogExists(Address),

    /// The global id was never attached to any token.
    #[error("global resource id {0} is not resolvable")]
    UnresolvedResource(GlobalResourceId),
}

impl ResourceError {
    /// Returns true if the caller lacked a role.
    #[must_use]
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true if the error reports a missing record.
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::UnknownResource { .. }
                | Self::UnknownToken(_)
                | Self::NoActiveResource(_)
                | Self::UnresolvedResource(_)
        )
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// Pending cap outside the supported range.
    #[error("max pending per token out of range: {value} not in 1..={max}")]
    PendingCapOutOfRange {
        /// Configured value.
        value: usize,
        /// Upper bound.
        max: usize,
    },

    /// The home catalog needs a display name.
    #[error("resource name must not be empty")]
    EmptyResourceName,

    /// The directory already holds a catalog at the home catalog address.
    #[error("home catalog address {0:?} already registered")]
    HomeCatalogTaken(Address),
}

// =============================================================================
// TESTS
// =============================================================================
