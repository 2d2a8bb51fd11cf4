//! Integration tests for multi-type queries
//!
//! Tests intersection semantics across reverse indices.

use std::collections::BTreeSet;

use tickwork_foundation::EntityId;
use tickwork_storage::ComponentStore;

struct Position;
struct Velocity;
struct Frozen;
struct Unused;

fn sorted(entities: Vec<EntityId>) -> BTreeSet<EntityId> {
    entities.into_iter().collect()
}

fn populated() -> (ComponentStore, Vec<EntityId>) {
    let mut store = ComponentStore::new();
    let ids: Vec<_> = (0..6).map(|_| store.create_entity()).collect();
    for (i, &e) in ids.iter().enumerate() {
        store.add_component(e, Position);
        if i % 2 == 0 {
            store.add_component(e, Velocity);
        }
        if i % 3 == 0 {
            store.add_component(e, Frozen);
        }
    }
    (store, ids)
}

#[test]
fn single_type_query() {
    let (store, ids) = populated();
    assert_eq!(sorted(store.entities_with::<(Velocity,)>()), sorted(vec![ids[0], ids[2], ids[4]]));
}

#[test]
fn intersection_of_types() {
    let (store, ids) = populated();
    assert_eq!(
        sorted(store.entities_with::<(Position, Velocity, Frozen)>()),
        sorted(vec![ids[0]])
    );
    assert_eq!(
        sorted(store.entities_with::<(Position, Frozen)>()),
        sorted(vec![ids[0], ids[3]])
    );
}

#[test]
fn query_order_does_not_matter() {
    let (store, _) = populated();
    assert_eq!(
        sorted(store.entities_with::<(Velocity, Position)>()),
        sorted(store.entities_with::<(Position, Velocity)>())
    );
}

#[test]
fn unregistered_type_yields_nothing() {
    let (store, _) = populated();
    assert!(store.entities_with::<(Position, Unused)>().is_empty());
}

#[test]
fn empty_query_yields_nothing() {
    let (store, _) = populated();
    assert!(store.entities_with::<()>().is_empty());
    assert!(store.entities_with_ids(&[]).is_empty());
}

#[test]
fn destroyed_entities_leave_results() {
    let (mut store, ids) = populated();
    store.destroy_entity(ids[0]).unwrap();

    let result = sorted(store.entities_with::<(Position, Velocity)>());
    assert_eq!(result, sorted(vec![ids[2], ids[4]]));
}

#[test]
fn query_by_ids() {
    let (store, ids) = populated();
    let frozen = store.component_id::<Frozen>().unwrap();
    assert_eq!(sorted(store.entities_with_ids(&[frozen])), sorted(vec![ids[0], ids[3]]));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn result_matches_has_component(
            layout in prop::collection::vec((any::<bool>(), any::<bool>()), 0..40),
            destroyed in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut store = ComponentStore::new();
            let mut ids = Vec::new();
            for &(pos, vel) in &layout {
                let e = store.create_entity();
                if pos {
                    store.add_component(e, Position);
                }
                if vel {
                    store.add_component(e, Velocity);
                }
                ids.push(e);
            }
            if !ids.is_empty() {
                for index in destroyed {
                    let e = ids[index.index(ids.len())];
                    let _ = store.destroy_entity(e);
                }
            }

            let result = sorted(store.entities_with::<(Position, Velocity)>());
            let expected: BTreeSet<_> = store
                .all_entities()
                .into_iter()
                .filter(|&e| store.has_component::<Position>(e) && store.has_component::<Velocity>(e))
                .collect();
            prop_assert_eq!(result, expected);
        }
    }
}
