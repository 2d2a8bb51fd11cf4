//! Integration tests for component storage
//!
//! Tests attachment, typed reads, multiple instances, and identity-based removal.

use tickwork_foundation::EntityId;
use tickwork_storage::{ComponentStore, StoreConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, PartialEq)]
struct Health(i32);

#[derive(Debug, PartialEq)]
struct Buff(&'static str);

// =============================================================================
// Attach and Read
// =============================================================================

#[test]
fn get_returns_attached_component() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    store.add_component(e, Position { x: 1.0, y: 2.0 });

    assert_eq!(store.get_component::<Position>(e), Some(&Position { x: 1.0, y: 2.0 }));
    assert!(store.has_component::<Position>(e));
}

#[test]
fn get_misses_are_soft() {
    let mut store = ComponentStore::with_config(StoreConfig::new().with_warn_on_missing(false));
    let e = store.create_entity();
    store.add_component(e, Health(3));

    assert!(store.get_component::<Position>(e).is_none());
    assert!(store.get_component::<Health>(EntityId::new(50)).is_none());
}

#[test]
fn get_mut_updates_in_place() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    store.add_component(e, Health(10));

    store.get_component_mut::<Health>(e).unwrap().0 -= 4;
    assert_eq!(store.get_component::<Health>(e), Some(&Health(6)));
}

#[test]
fn components_are_per_entity() {
    let mut store = ComponentStore::new();
    let a = store.create_entity();
    let b = store.create_entity();
    store.add_component(a, Health(1));
    store.add_component(b, Health(2));

    assert_eq!(store.get_component::<Health>(a), Some(&Health(1)));
    assert_eq!(store.get_component::<Health>(b), Some(&Health(2)));
}

// =============================================================================
// Multiple Instances
// =============================================================================

#[test]
fn first_instance_wins_on_typed_read() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    store.add_component(e, Buff("haste"));
    store.add_component(e, Buff("shield"));

    assert_eq!(store.get_component::<Buff>(e), Some(&Buff("haste")));
    let all: Vec<_> = store.components_of::<Buff>(e).map(|b| b.0).collect();
    assert_eq!(all, vec!["haste", "shield"]);
}

#[test]
fn removing_one_instance_keeps_the_type() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    let haste = store.add_component(e, Buff("haste"));
    let shield = store.add_component(e, Buff("shield"));

    assert!(store.remove_component(e, haste).unwrap());
    assert_eq!(store.get_component::<Buff>(e), Some(&Buff("shield")));
    assert_eq!(store.entities_with::<(Buff,)>(), vec![e]);

    assert!(store.remove_component(e, shield).unwrap());
    assert!(!store.has_component::<Buff>(e));
    assert!(store.entities_with::<(Buff,)>().is_empty());
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_is_by_identity() {
    let mut store = ComponentStore::new();
    let a = store.create_entity();
    let b = store.create_entity();
    let handle = store.add_component(a, Health(5));
    store.add_component(b, Health(5));

    // Equal value on another entity is a different instance.
    assert!(!store.remove_component(b, handle).unwrap());
    assert!(store.has_component::<Health>(b));

    assert!(store.remove_component(a, handle).unwrap());
    assert!(!store.remove_component(a, handle).unwrap());
}

#[test]
fn remove_from_dead_entity_is_an_error() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    let handle = store.add_component(e, Health(1));
    store.destroy_entity(e).unwrap();

    assert!(store.remove_component(e, handle).is_err());
}

#[test]
fn remove_components_counts_hits() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    let handles = store.add_components(e, (Health(1), Buff("haste"), Position { x: 0.0, y: 0.0 }));
    assert_eq!(handles.len(), 3);

    let removed = store.remove_components(e, &[handles[0], handles[0], handles[2]]).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.component_count(), 1);
    assert!(store.has_component::<Buff>(e));
}

#[test]
fn signature_tracks_types() {
    let mut store = ComponentStore::new();
    let e = store.create_entity();
    store.add_component(e, Health(1));
    let pos = store.add_component(e, Position { x: 0.0, y: 0.0 });

    let health_id = store.component_id::<Health>().unwrap();
    let pos_id = store.component_id::<Position>().unwrap();
    assert!(store.signature(e).unwrap().contains_all(&[health_id, pos_id]));

    store.remove_component(e, pos).unwrap();
    assert!(!store.signature(e).unwrap().contains(pos_id));
    assert_eq!(store.signature(e).unwrap().len(), 1);
}
