//! # Domain Services
//!
//! Pure identifier derivation. These functions are deterministic, have no side
//! effects and can be reproduced by any off-system verifier from public inputs.

use crate::domain::value_objects::{Address, GlobalResourceId, ResourceId};
use sha3::{Digest, Keccak256};

// =============================================================================
// HASHING
// =============================================================================

/// Computes the Keccak-256 hash of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Derives the global resource id for `(catalog, resource_id)`.
///
/// `keccak256(catalog ++ resource_id)[..16]`, i.e. the tight
/// `abi.encodePacked(address, bytes8)` packing truncated to 16 bytes.
#[must_use]
pub fn hash_resource16(catalog: Address, resource_id: ResourceId) -> GlobalResourceId {
    let mut hasher = Keccak256::new();
    hasher.update(catalog.as_bytes());
    hasher.update(resource_id.as_bytes());
    let digest = hasher.finalize();

    let mut id = [0u8; 16];
    id.copy_from_slice(&digest[..16]);
    GlobalResourceId::new(id)
}

/// Checks a claimed global id against its public pre-image.
#[must_use]
pub fn verify_resource_id(
    claimed: GlobalResourceId,
    catalog: Address,
    resource_id: ResourceId,
) -> bool {
    hash_resource16(catalog, resource_id) == claimed
}

// =============================================================================
// CATALOG ADDRESS DERIVATION
// =============================================================================

/// Derives the address of a catalog deployed by `deployer` under `name`.
///
/// Address = keccak256(0xff ++ deployer ++ `keccak256(name)`)\[12:\]
///
/// Same shape as a CREATE2 address with the name hash as salt, so a home
/// catalog gets a stable address without a deployment nonce.
#[must_use]
pub fn derive_catalog_address(deployer: Address, name: &str) -> Address {
    let salt = keccak256(name.as_bytes());

    let mut data = Vec::with_capacity(53);
    data.push(0xff);
    data.extend_from_slice(deployer.as_bytes());
    data.extend_from_slice(&salt);

    let hash = keccak256(&data);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

// =============================================================================
// TESTS
// =============================================================================
