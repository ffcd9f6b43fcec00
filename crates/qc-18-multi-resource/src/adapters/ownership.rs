//! # Ownership Adapter
//!
//! In-memory token ownership with ERC-721 style approvals.
//! A production deployment reads ownership from the token subsystem instead.

use crate::domain::value_objects::{Address, TokenId};
use crate::ports::outbound::OwnershipOracle;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Clone, Copy, Debug)]
struct TokenRecord {
    owner: Address,
    approved: Option<Address>,
}

/// In-memory ownership records.
#[derive(Debug, Default)]
pub struct InMemoryOwnership {
    tokens: RwLock<HashMap<TokenId, TokenRecord>>,
    /// (owner, operator) pairs approved for every token of the owner.
    operators: RwLock<HashSet<(Address, Address)>>,
}

impl InMemoryOwnership {
    /// Create an empty ownership table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `token_id` to `owner`. Returns false if it already exists.
    pub fn mint(&self, owner: Address, token_id: TokenId) -> bool {
        let mut tokens = self.tokens.write();
        if tokens.contains_key(&token_id) {
            return false;
        }
        tokens.insert(
            token_id,
            TokenRecord {
                owner,
                approved: None,
            },
        );
        debug!(token_id = %token_id, owner = ?owner, "Token minted");
        true
    }

    /// Remove `token_id`. Returns false if it did not exist.
    pub fn burn(&self, token_id: TokenId) -> bool {
        self.tokens.write().remove(&token_id).is_some()
    }

    /// Move `token_id` to `to`, clearing its single-token approval.
    /// Returns false if the token does not exist.
    pub fn transfer(&self, token_id: TokenId, to: Address) -> bool {
        match self.tokens.write().get_mut(&token_id) {
            Some(record) => {
                record.owner = to;
                record.approved = None;
                true
            }
            None => false,
        }
    }

    /// Approve `operator` for one token. Returns false if it does not exist.
    pub fn approve(&self, token_id: TokenId, operator: Address) -> bool {
        match self.tokens.write().get_mut(&token_id) {
            Some(record) => {
                record.approved = Some(operator);
                true
            }
            None => false,
        }
    }

    /// Clear the single-token approval of `token_id`.
    pub fn revoke_approval(&self, token_id: TokenId) {
        if let Some(record) = self.tokens.write().get_mut(&token_id) {
            record.approved = None;
        }
    }

    /// Approve or revoke `operator` for every token of `owner`.
    pub fn set_approval_for_all(&self, owner: Address, operator: Address, approved: bool) {
        let mut operators = self.operators.write();
        if approved {
            operators.insert((owner, operator));
        } else {
            operators.remove(&(owner, operator));
        }
    }

    /// Number of existing tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.read().len()
    }
}

impl OwnershipOracle for InMemoryOwnership {
    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.tokens.read().get(&token_id).map(|record| record.owner)
    }

    fn is_approved(&self, operator: Address, token_id: TokenId) -> bool {
        let Some(record) = self.tokens.read().get(&token_id).copied() else {
            return false;
        };
        record.approved == Some(operator)
            || self.operators.read().contains(&(record.owner, operator))
    }
}
