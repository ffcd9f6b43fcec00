//! # Value Objects
//!
//! Immutable identifiers used by the resource catalogs and the token ledger.
//! All of them are defined by their bytes: equality and ordering are bitwise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for token ids
pub use primitive_types::U256;

/// Parses a fixed-width hex string, with or without the `0x` prefix.
fn parse_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes)?;
    Ok(bytes)
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte Ethereum-style address.
///
/// Identifies catalogs as well as callers (issuers, owners, operators).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose low 8 bytes hold `value` (big-endian).
    ///
    /// Mirrors `hexZeroPad(value, 20)`; handy for fixtures.
    #[must_use]
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}...{}", hex::encode(&self.0[..4]), hex::encode(&self.0[18..]))
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed_hex(s).map(Self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// RESOURCE ID (8 bytes, catalog-local)
// =============================================================================

/// An 8-byte resource id, unique within one catalog.
///
/// The all-zero value is a sentinel and is never a valid entry id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ResourceId(pub [u8; 8]);

impl ResourceId {
    /// The zero id (sentinel, never stored).
    pub const ZERO: Self = Self([0u8; 8]);

    /// Creates a resource id from an 8-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Creates a resource id from a big-endian integer (`0x01` -> `0x0000000000000001`).
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Returns the id as a big-endian integer.
    #[must_use]
    pub const fn to_u64(self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Returns true if this is the zero sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 8]
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ResourceId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed_hex(s).map(Self)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

// =============================================================================
// GLOBAL RESOURCE ID (16 bytes, hash-derived)
// =============================================================================

/// A 16-byte global resource id: `keccak256(catalog ++ resource_id)[..16]`.
///
/// The only handle tokens hold for resources. Computed by
/// [`hash_resource16`](crate::domain::services::hash_resource16).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GlobalResourceId(pub [u8; 16]);

impl GlobalResourceId {
    /// The zero id. Used as "no overwrite" in add requests.
    pub const ZERO: Self = Self([0u8; 16]);

    /// Creates a global id from a 16-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a global id from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns true if this is the zero id.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 16]
    }
}

impl fmt::Debug for GlobalResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for GlobalResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for GlobalResourceId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed_hex(s).map(Self)
    }
}

impl From<[u8; 16]> for GlobalResourceId {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// TOKEN ID (uint256)
// =============================================================================

/// Identifier of a token in the external ownership subsystem.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TokenId(pub U256);

impl TokenId {
    /// Creates a token id from a U256.
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Returns the inner U256.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Roles checked by [`AccessControl`](crate::access::AccessControl).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May register catalog content and propose resources to tokens.
    Issuer,
    /// Owner of a token or an operator approved for it.
    TokenController,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer => write!(f, "issuer"),
            Self::TokenController => write!(f, "token controller"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
