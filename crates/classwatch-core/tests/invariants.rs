//! Randomized construct/destroy sequences
//!
//! Drives the registry with seeded random event streams and checks the
//! counting invariants after every step.

use std::collections::HashMap;
use std::sync::Arc;

use classwatch_core::{DescriptorId, MemoryTypeSystem, MetaRegistry, ObjectId, TrackedObject};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Fixture {
    registry: MetaRegistry,
    /// (descriptor, reports a dynamic descriptor)
    kinds: Vec<(DescriptorId, bool)>,
}

fn fixture() -> Fixture {
    let host = Arc::new(MemoryTypeSystem::new("Object"));
    let root = host.root();
    let widget = host.define_static("Widget", Some(root));
    let button = host.define_static("Button", Some(widget));
    let check = host.define_static("CheckBox", Some(button));
    let timer = host.define_static("Timer", Some(root));
    let gadget = host.define_static("Gadget", None);

    // Regenerated descriptors: several instances per class name
    let mut kinds = vec![
        (root, false),
        (widget, false),
        (button, false),
        (check, false),
        (timer, false),
        (gadget, false),
    ];
    for _ in 0..3 {
        kinds.push((host.define_dynamic("QuickItem", Some(widget)), true));
        kinds.push((host.define_dynamic("QuickRect", Some(button)), true));
        kinds.push((host.define_dynamic("Loose", None), true));
    }

    host.register_type("Widget*", Some(widget));
    host.register_type("Timer*", Some(timer));

    let registry = MetaRegistry::with_defaults(host).unwrap();
    Fixture { registry, kinds }
}

fn subtree_self_alive(registry: &MetaRegistry, d: DescriptorId) -> u64 {
    let own = registry.entry(d).map_or(0, |e| e.self_alive_count());
    own + registry
        .children_of(d)
        .iter()
        .map(|c| subtree_self_alive(registry, *c))
        .sum::<u64>()
}

fn check_invariants(registry: &MetaRegistry, live: &HashMap<ObjectId, DescriptorId>) {
    let mut expected_self_alive: HashMap<DescriptorId, u64> = HashMap::new();
    for canonical in live.values() {
        *expected_self_alive.entry(*canonical).or_default() += 1;
    }

    for d in registry.descriptors() {
        let entry = registry.entry(d).unwrap();

        assert!(entry.inclusive_alive_count() >= entry.self_alive_count());
        assert!(entry.inclusive_count() >= entry.self_count());
        assert!(entry.self_count() >= entry.self_alive_count());
        assert_eq!(
            entry.inclusive_alive_count(),
            subtree_self_alive(registry, d),
            "inclusive alive of {}",
            entry.class_name()
        );
        assert_eq!(
            entry.self_alive_count(),
            expected_self_alive.get(&d).copied().unwrap_or(0)
        );

        if entry.is_invalid() {
            assert!(!entry.is_static());
            assert_eq!(entry.inclusive_alive_count(), 0);
        }
        if entry.inclusive_alive_count() > 0 {
            assert!(!entry.is_invalid());
        }

        if entry.is_dynamic() {
            let pool = registry.alive_pool(d).unwrap();
            assert_eq!(pool.len() as u64, entry.self_alive_count());
            for member in pool.iter() {
                assert_eq!(registry.canonical_descriptor(member), d);
            }
        }

        if let Some(parent) = registry.parent_of(d) {
            assert!(registry.children_of(parent).contains(&d));
        }
        assert!(registry.ancestors(d).count() < registry.len());
    }

    assert_eq!(registry.tracked_objects(), live.len());
}

fn run(seed: u64, steps: usize) {
    let Fixture {
        mut registry,
        kinds,
    } = fixture();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut live: HashMap<ObjectId, DescriptorId> = HashMap::new();
    let mut next_object = 1u64;

    for _ in 0..steps {
        let roll = rng.gen_range(0..10);
        if roll < 5 || live.is_empty() {
            let (descriptor, dynamic) = kinds[rng.gen_range(0..kinds.len())];
            let id = ObjectId::from_u64(next_object);
            next_object += 1;
            let object = if dynamic {
                TrackedObject::dynamic(id, descriptor)
            } else {
                TrackedObject::new(id, descriptor)
            };
            let canonical = registry.object_constructed(object).unwrap();
            live.insert(id, canonical);
        } else if roll < 9 {
            let mut ids: Vec<_> = live.keys().copied().collect();
            ids.sort();
            let id = ids[rng.gen_range(0..ids.len())];
            assert!(registry.object_destroyed(id));
            live.remove(&id);
        } else {
            // Never constructed, or already destroyed
            let id = ObjectId::from_u64(rng.gen_range(next_object..next_object + 100));
            assert!(!registry.object_destroyed(id));
        }

        check_invariants(&registry, &live);
    }
}

#[test]
fn test_invariants_hold_for_random_sequences() {
    for seed in 0..16 {
        run(seed, 300);
    }
}

#[test]
fn test_drain_everything() {
    let Fixture {
        mut registry,
        kinds,
    } = fixture();
    let mut live = HashMap::new();

    for (i, (descriptor, dynamic)) in kinds.iter().copied().enumerate() {
        let id = ObjectId::from_u64(i as u64 + 1);
        let object = if dynamic {
            TrackedObject::dynamic(id, descriptor)
        } else {
            TrackedObject::new(id, descriptor)
        };
        live.insert(id, registry.object_constructed(object).unwrap());
    }
    check_invariants(&registry, &live);

    let ids: Vec<_> = live.keys().copied().collect();
    for id in ids {
        assert!(registry.object_destroyed(id));
        live.remove(&id);
    }
    check_invariants(&registry, &live);

    for d in registry.descriptors() {
        let entry = registry.entry(d).unwrap();
        assert_eq!(entry.inclusive_alive_count(), 0);
        assert_eq!(entry.is_invalid(), !entry.is_static());
        if entry.is_dynamic() {
            assert_eq!(registry.alive_instance(d), None);
        }
    }
}
