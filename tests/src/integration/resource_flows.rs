//! # Resource Flow Tests
//!
//! End-to-end catalog -> token -> render scenarios against
//! `qc-18-multi-resource` through its public API.
//!
//! ## Flows Tested:
//!
//! 1. **Add resource**: entry registration, proposal, catalog rejections
//! 2. **Accept resource**: pending -> active, renderable pre-image
//! 3. **Multiple resources**: priority reorder and its rejections
//! 4. **Overwrite**: accept that replaces an active resource
//!
//! ## Parties:
//!
//! - Deployer: collection owner and sole issuer
//! - Holder A: owns tokens 1-10
//! - Holder B: owns tokens 11-20

#[cfg(test)]
mod tests {
    use qc_18_multi_resource::prelude::*;
    use sha3::{Digest, Keccak256};
    use std::sync::Arc;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const THUMB_0: &str = "ipfs://ipfs/QmR3rK1P4n24PPqvfjGYNXWixPJpyBKTV6rYzAS2TYHLpT";
    const SRC_1: &str = "ipfs://ipfs/QmQBhz44R6K6DeKJCCycgAn9RxPo6tn8Tg7vsEX3wewupP/99.png";
    const THUMB_1: &str = "ipfs://ipfs/QmZFWSK9cyfSTgdDVWJucn1eNLtmkBaFEqM8CmfNrhkaZU/99_thumb.png";

    type Service = MultiResourceService<InMemoryOwnership, InMemoryCatalogDirectory>;

    fn deployer() -> Address {
        Address::from_low_u64(0xD0)
    }

    fn holder_a() -> Address {
        Address::from_low_u64(0xA0)
    }

    fn holder_b() -> Address {
        Address::from_low_u64(0xB0)
    }

    fn fixture(index: usize) -> ResourceEntry {
        match index {
            0 => ResourceEntry::new(ResourceId::from_u64(1), "", THUMB_0, ""),
            _ => ResourceEntry::new(ResourceId::from_u64(2), SRC_1, THUMB_1, ""),
        }
    }

    /// Deploys the collection and mints tokens 1-10 to A, 11-20 to B.
    fn deploy() -> Service {
        let service = MultiResourceService::new(
            deployer(),
            Arc::new(InMemoryOwnership::new()),
            Arc::new(InMemoryCatalogDirectory::new()),
            MultiResourceConfig::default().with_resource_name("TestResource"),
        )
        .unwrap();
        for n in 1..=10 {
            service.oracle().mint(holder_a(), TokenId::from(n));
        }
        for n in 11..=20 {
            service.oracle().mint(holder_b(), TokenId::from(n));
        }
        service
    }

    fn register(service: &Service, index: usize) {
        let entry = fixture(index);
        service
            .add_resource_entry(
                deployer(),
                entry.id,
                &entry.src,
                &entry.thumb,
                &entry.metadata_uri,
            )
            .unwrap();
    }

    fn propose(service: &Service, token: u64, index: usize) -> ResourceResult<GlobalResourceId> {
        service.add_resource_to_token(
            deployer(),
            TokenId::from(token),
            service.resource_storage(),
            fixture(index).id,
            GlobalResourceId::ZERO,
        )
    }

    /// Independent recomputation: keccak256(abi.encodePacked(address, bytes8))[..16].
    fn packed_keccak16(catalog: Address, resource_id: ResourceId) -> GlobalResourceId {
        let mut hasher = Keccak256::new();
        hasher.update(catalog.as_bytes());
        hasher.update(resource_id.as_bytes());
        let digest = hasher.finalize();
        GlobalResourceId::from_slice(&digest[..16]).unwrap()
    }

    // =============================================================================
    // INIT
    // =============================================================================

    #[test]
    fn test_init_state() {
        let service = deploy();
        assert_eq!(service.get_resource_name(), "TestResource");
        assert_eq!(service.oracle().owner_of(TokenId::from(10)), Some(holder_a()));
        assert_eq!(service.oracle().owner_of(TokenId::from(20)), Some(holder_b()));
        assert_eq!(
            service.resource_storage(),
            derive_catalog_address(deployer(), "TestResource")
        );
    }

    // =============================================================================
    // FLOW 1: ADD RESOURCE
    // =============================================================================

    #[test]
    fn test_add_resource_flow() {
        let service = deploy();
        let storage = service.resource_storage();
        let expected = packed_keccak16(storage, fixture(0).id);

        // On-system and off-system hashing agree
        assert_eq!(service.hash_resource16(storage, fixture(0).id), expected);

        register(&service, 0);
        assert_eq!(service.get_resource(fixture(0).id).unwrap(), fixture(0));

        assert_eq!(propose(&service, 1, 0), Ok(expected));
        assert_eq!(service.get_pending_resources(TokenId::from(1)), vec![expected]);
        assert!(service.get_active_resources(TokenId::from(1)).is_empty());

        // Catalog rejections
        let entry = fixture(0);
        assert_eq!(
            service.add_resource_entry(deployer(), entry.id, &entry.src, &entry.thumb, ""),
            Err(ResourceError::DuplicateResource(entry.id))
        );
        assert_eq!(
            service.add_resource_entry(deployer(), ResourceId::ZERO, &entry.src, &entry.thumb, ""),
            Err(ResourceError::ZeroIdentifier)
        );
    }

    // =============================================================================
    // FLOW 2: ACCEPT RESOURCE
    // =============================================================================

    #[test]
    fn test_accept_resource_flow() {
        let service = deploy();
        let token = TokenId::from(1);
        let storage = service.resource_storage();
        let expected = packed_keccak16(storage, fixture(0).id);

        register(&service, 0);
        propose(&service, 1, 0).unwrap();
        service.accept_resource(holder_a(), token, 0).unwrap();

        assert!(service.get_pending_resources(token).is_empty());
        assert_eq!(service.get_active_resources(token), vec![expected]);
        assert_eq!(
            service.get_renderable_resource(token).unwrap(),
            LocalResource::new(storage, fixture(0).id)
        );
    }

    // =============================================================================
    // FLOW 3: MULTIPLE RESOURCES AND PRIORITY
    // =============================================================================

    #[test]
    fn test_multiple_resources_and_priority_flow() {
        let service = deploy();
        let token = TokenId::from(1);
        let storage = service.resource_storage();
        let id_1 = packed_keccak16(storage, fixture(0).id);
        let id_2 = packed_keccak16(storage, fixture(1).id);

        register(&service, 0);
        register(&service, 1);
        propose(&service, 1, 0).unwrap();
        propose(&service, 1, 1).unwrap();
        assert_eq!(service.get_pending_resources(token), vec![id_1, id_2]);

        service.accept_resource(holder_a(), token, 0).unwrap();
        service.accept_resource(holder_a(), token, 0).unwrap();
        assert!(service.get_pending_resources(token).is_empty());
        assert_eq!(service.get_active_resources(token), vec![id_1, id_2]);
        assert_eq!(service.get_resource_object_by_index(token, 0).unwrap(), fixture(0));

        service.set_priority(holder_a(), token, &[id_2, id_1]).unwrap();
        assert_eq!(service.get_active_resources(token), vec![id_2, id_1]);
        assert_eq!(service.get_resource_object_by_index(token, 0).unwrap(), fixture(1));
        assert_eq!(
            service.get_renderable_resource(token).unwrap().resource_id,
            fixture(1).id
        );

        // Holder B does not control token 1
        assert_eq!(
            service.set_priority(holder_b(), token, &[id_2, id_1]),
            Err(ResourceError::Unauthorized {
                caller: holder_b(),
                role: Role::TokenController
            })
        );
        assert_eq!(
            service.set_priority(holder_a(), token, &[id_2]),
            Err(ResourceError::BadLength {
                expected: 2,
                actual: 1
            })
        );
        let foreign_1: GlobalResourceId = "0x000000000000000000000000000aaaaa".parse().unwrap();
        let foreign_2: GlobalResourceId = "0x0000000000000000000000000000bbbb".parse().unwrap();
        assert_eq!(
            service.set_priority(holder_a(), token, &[foreign_1, foreign_2]),
            Err(ResourceError::UnknownActiveResource(foreign_1))
        );

        assert_eq!(
            propose(&service, 1, 1),
            Err(ResourceError::DuplicateOnToken {
                token_id: token,
                resource: id_2
            })
        );
        let unknown = ResourceId::from_u64(0xa1a2a3);
        assert_eq!(
            service.add_resource_to_token(deployer(), token, storage, unknown, GlobalResourceId::ZERO),
            Err(ResourceError::UnknownResource {
                catalog: storage,
                resource_id: unknown
            })
        );

        // Failed calls left the order alone
        assert_eq!(service.get_active_resources(token), vec![id_2, id_1]);
    }

    // =============================================================================
    // FLOW 4: OVERWRITE
    // =============================================================================

    #[test]
    fn test_overwrite_flow() {
        let service = deploy();
        let token = TokenId::from(12);
        let storage = service.resource_storage();

        register(&service, 0);
        register(&service, 1);
        let old = propose(&service, 12, 0).unwrap();
        service.accept_resource(holder_b(), token, 0).unwrap();

        let new = service
            .add_resource_to_token(deployer(), token, storage, fixture(1).id, old)
            .unwrap();
        assert_eq!(service.get_resource_overwrites(token, new), Some(old));
        assert_eq!(
            service.get_pending_resource_object_by_index(token, 0).unwrap(),
            fixture(1)
        );

        service.accept_resource(holder_b(), token, 0).unwrap();
        assert_eq!(service.get_active_resources(token), vec![new]);
        assert_eq!(service.get_resource_overwrites(token, new), None);

        // The pre-image of the replaced id stays resolvable
        assert_eq!(
            service.get_local_resource(old).unwrap(),
            LocalResource::new(storage, fixture(0).id)
        );

        let tail: Vec<_> = service
            .events()
            .into_iter()
            .rev()
            .take(2)
            .collect();
        assert_eq!(
            tail,
            vec![
                ResourceEvent::ResourceAccepted {
                    token_id: token,
                    resource: new
                },
                ResourceEvent::ResourceOverwritten {
                    token_id: token,
                    overwritten: old
                },
            ]
        );
    }

    #[test]
    fn test_reject_flows_keep_tokens_isolated() {
        let service = deploy();
        register(&service, 0);
        register(&service, 1);
        for token in [1, 11] {
            propose(&service, token, 0).unwrap();
            propose(&service, token, 1).unwrap();
        }

        service.reject_resource(holder_a(), TokenId::from(1), 0).unwrap();
        assert_eq!(
            service.reject_all_resources(holder_b(), TokenId::from(11)),
            Ok(2)
        );

        assert_eq!(service.get_pending_resources(TokenId::from(1)).len(), 1);
        assert!(service.get_pending_resources(TokenId::from(11)).is_empty());
        assert!(service
            .reject_all_resources(holder_a(), TokenId::from(11))
            .unwrap_err()
            .is_authorization_failure());
    }

    #[test]
    fn test_events_serialize_for_transport() {
        let service = deploy();
        register(&service, 0);
        propose(&service, 1, 0).unwrap();

        for event in service.events() {
            let json = serde_json::to_string(&event).unwrap();
            let back: ResourceEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }
}
