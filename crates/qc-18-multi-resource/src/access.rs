//! # Access Control
//!
//! Single authorization gate for catalog and ledger mutations.
//!
//! | Role | Granted to | Checked by |
//! |------|-----------|------------|
//! | Issuer | members of an [`IssuerSet`] | `add_resource_entry`, `add_resource_to_token`, `register_catalog` |
//! | Token controller | token owner or approved operator (oracle) | `accept_resource`, `reject_resource`, `reject_all_resources`, `set_priority` |
//!
//! Token-controller checks go to the [`OwnershipOracle`] on every call.

use crate::domain::value_objects::{Address, Role, TokenId};
use crate::errors::{ResourceError, ResourceResult};
use crate::ports::outbound::OwnershipOracle;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

// =============================================================================
// ISSUER SET
// =============================================================================

/// Addresses holding the issuer role. Never empty.
#[derive(Debug)]
pub struct IssuerSet {
    members: RwLock<BTreeSet<Address>>,
}

impl IssuerSet {
    /// Creates a set with a single issuer.
    #[must_use]
    pub fn new(initial: Address) -> Self {
        Self {
            members: RwLock::new(BTreeSet::from([initial])),
        }
    }

    /// Returns true if `account` is an issuer.
    #[must_use]
    pub fn contains(&self, account: Address) -> bool {
        self.members.read().contains(&account)
    }

    /// Current issuers, sorted.
    #[must_use]
    pub fn members(&self) -> Vec<Address> {
        self.members.read().iter().copied().collect()
    }

    /// Fails unless `caller` is an issuer.
    ///
    /// # Errors
    ///
    /// `Unauthorized` with [`Role::Issuer`].
    pub fn require(&self, caller: Address) -> ResourceResult<()> {
        if self.contains(caller) {
            Ok(())
        } else {
            warn!(caller = ?caller, "Rejected caller without issuer role");
            Err(ResourceError::Unauthorized {
                caller,
                role: Role::Issuer,
            })
        }
    }

    /// Grants the issuer role. Returns false if `account` already held it.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if `caller` is not an issuer.
    pub fn grant(&self, caller: Address, account: Address) -> ResourceResult<bool> {
        let mut members = self.members.write();
        if !members.contains(&caller) {
            warn!(caller = ?caller, "Rejected issuer grant");
            return Err(ResourceError::Unauthorized {
                caller,
                role: Role::Issuer,
            });
        }
        let added = members.insert(account);
        if added {
            info!(account = ?account, "Issuer role granted");
        }
        Ok(added)
    }

    /// Revokes the issuer role. Returns false if `account` did not hold it.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not an issuer
    /// - `LastIssuer` if `account` is the only issuer left
    pub fn revoke(&self, caller: Address, account: Address) -> ResourceResult<bool> {
        let mut members = self.members.write();
        if !members.contains(&caller) {
            warn!(caller = ?caller, "Rejected issuer revoke");
            return Err(ResourceError::Unauthorized {
                caller,
                role: Role::Issuer,
            });
        }
        if members.len() == 1 && members.contains(&account) {
            return Err(ResourceError::LastIssuer(account));
        }
        let removed = members.remove(&account);
        if removed {
            info!(account = ?account, "Issuer role revoked");
        }
        Ok(removed)
    }
}

// =============================================================================
// ACCESS CONTROL
// =============================================================================

/// Issuer and token-controller checks for one token collection.
pub struct AccessControl<O: OwnershipOracle> {
    issuers: Arc<IssuerSet>,
    oracle: Arc<O>,
}

impl<O: OwnershipOracle> AccessControl<O> {
    /// Creates the gate from an issuer set and an ownership oracle.
    pub fn new(issuers: Arc<IssuerSet>, oracle: Arc<O>) -> Self {
        Self { issuers, oracle }
    }

    /// Issuer set of the collection.
    #[must_use]
    pub fn issuers(&self) -> &Arc<IssuerSet> {
        &self.issuers
    }

    /// Ownership oracle backing token-controller checks.
    #[must_use]
    pub fn oracle(&self) -> &Arc<O> {
        &self.oracle
    }

    /// Fails unless `caller` holds the issuer role.
    ///
    /// # Errors
    ///
    /// `Unauthorized` with [`Role::Issuer`].
    pub fn require_issuer(&self, caller: Address) -> ResourceResult<()> {
        self.issuers.require(caller)
    }

    /// Returns true if `caller` owns `token_id` or is approved for it.
    #[must_use]
    pub fn is_token_controller(&self, caller: Address, token_id: TokenId) -> bool {
        self.oracle.is_owner_or_approved(caller, token_id)
    }

    /// Fails unless `caller` owns `token_id` or is approved for it.
    ///
    /// # Errors
    ///
    /// `Unauthorized` with [`Role::TokenController`]. Also returned for
    /// tokens the oracle does not know.
    pub fn require_token_controller(&self, caller: Address, token_id: TokenId) -> ResourceResult<()> {
        if self.is_token_controller(caller, token_id) {
            Ok(())
        } else {
            warn!(
                caller = ?caller,
                token_id = %token_id,
                "Rejected caller that neither owns nor is approved for token"
            );
            Err(ResourceError::Unauthorized {
                caller,
                role: Role::TokenController,
            })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
