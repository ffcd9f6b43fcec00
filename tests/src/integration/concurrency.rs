//! # Concurrency Tests
//!
//! Many threads mutating one service. Per-token operations must serialize;
//! different tokens must not interfere.

#[cfg(test)]
mod tests {
    use qc_18_multi_resource::prelude::*;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    const ENTRIES: u64 = 64;
    const THREADS: u64 = 8;

    type Service = MultiResourceService<InMemoryOwnership, InMemoryCatalogDirectory>;

    fn owner() -> Address {
        Address::from_low_u64(1)
    }

    fn holder() -> Address {
        Address::from_low_u64(2)
    }

    fn setup(tokens: u64) -> Arc<Service> {
        let service = MultiResourceService::new(
            owner(),
            Arc::new(InMemoryOwnership::new()),
            Arc::new(InMemoryCatalogDirectory::new()),
            MultiResourceConfig::default(),
        )
        .unwrap();
        for n in 1..=ENTRIES {
            service
                .add_resource_entry(owner(), ResourceId::from_u64(n), "", "", "")
                .unwrap();
        }
        for t in 1..=tokens {
            service.oracle().mint(holder(), TokenId::from(t));
        }
        Arc::new(service)
    }

    fn assert_token_consistent(service: &Service, token: TokenId) {
        let pending = service.get_pending_resources(token);
        let active = service.get_active_resources(token);
        let pending_set: HashSet<_> = pending.iter().collect();
        let active_set: HashSet<_> = active.iter().collect();

        assert_eq!(pending_set.len(), pending.len());
        assert_eq!(active_set.len(), active.len());
        assert!(pending_set.is_disjoint(&active_set));
    }

    #[test]
    fn test_racing_adds_of_same_resource_single_winner() {
        let service = setup(1);
        let token = TokenId::from(1);
        let winners = Arc::new(Mutex::new(0usize));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let service = Arc::clone(&service);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    let result = service.add_resource_to_token(
                        owner(),
                        token,
                        service.resource_storage(),
                        ResourceId::from_u64(1),
                        GlobalResourceId::ZERO,
                    );
                    match result {
                        Ok(_) => *winners.lock() += 1,
                        Err(err) => assert!(matches!(err, ResourceError::DuplicateOnToken { .. })),
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*winners.lock(), 1);
        assert_eq!(service.get_pending_resources(token).len(), 1);
    }

    #[test]
    fn test_mixed_operations_on_one_token() {
        let service = setup(1);
        let token = TokenId::from(1);

        let handles: Vec<_> = (0..THREADS)
            .map(|seed| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let storage = service.resource_storage();
                    for _ in 0..200 {
                        match rng.gen_range(0..4) {
                            0 | 1 => {
                                let _ = service.add_resource_to_token(
                                    owner(),
                                    token,
                                    storage,
                                    ResourceId::from_u64(rng.gen_range(1..=ENTRIES)),
                                    GlobalResourceId::ZERO,
                                );
                            }
                            2 => {
                                let _ = service.accept_resource(holder(), token, 0);
                            }
                            _ => {
                                let mut active = service.get_active_resources(token);
                                active.reverse();
                                // May race with an accept and fail with BadLength
                                let _ = service.set_priority(holder(), token, &active);
                            }
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_token_consistent(&service, token);
        let stats = service.stats();
        assert_eq!(stats.unauthorized_attempts, 0);
    }

    #[test]
    fn test_tokens_do_not_interfere() {
        let service = setup(THREADS);

        let handles: Vec<_> = (1..=THREADS)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let token = TokenId::from(t);
                    let storage = service.resource_storage();
                    for n in 1..=ENTRIES {
                        service
                            .add_resource_to_token(
                                owner(),
                                token,
                                storage,
                                ResourceId::from_u64(n),
                                GlobalResourceId::ZERO,
                            )
                            .unwrap();
                    }
                    for _ in 0..ENTRIES / 2 {
                        service.accept_resource(holder(), token, 0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let storage = service.resource_storage();
        for t in 1..=THREADS {
            let token = TokenId::from(t);
            let active = service.get_active_resources(token);
            let expected: Vec<_> = (1..=ENTRIES / 2)
                .map(|n| hash_resource16(storage, ResourceId::from_u64(n)))
                .collect();
            assert_eq!(active, expected);
            assert_eq!(
                service.get_pending_resources(token).len(),
                (ENTRIES / 2) as usize
            );
        }
    }

    #[test]
    fn test_events_per_token_in_commit_order() {
        let service = setup(THREADS);

        let handles: Vec<_> = (1..=THREADS)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let token = TokenId::from(t);
                    service
                        .add_resource_to_token(
                            owner(),
                            token,
                            service.resource_storage(),
                            ResourceId::from_u64(t),
                            GlobalResourceId::ZERO,
                        )
                        .unwrap();
                    service.accept_resource(holder(), token, 0).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = service.events();
        for t in 1..=THREADS {
            let token = TokenId::from(t);
            let names: Vec<_> = events
                .iter()
                .filter(|event| event.token_id() == Some(token))
                .map(ResourceEvent::name)
                .collect();
            assert_eq!(names, vec!["ResourceAddedToToken", "ResourceAccepted"]);
        }
    }
}
