//! Integration tests for the dependency graph
//!
//! Tests ordering, cycle detection, and cache invalidation.

use tickwork_engine::DependencyGraph;
use tickwork_foundation::{ErrorKind, SystemId};

fn graph(count: u32) -> (DependencyGraph, Vec<SystemId>) {
    let mut graph = DependencyGraph::new();
    let ids: Vec<_> = (0..count).map(SystemId::new).collect();
    for &id in &ids {
        graph.add_system(id);
    }
    (graph, ids)
}

fn position(order: &[SystemId], system: SystemId) -> usize {
    order.iter().position(|&s| s == system).unwrap()
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn dependencies_run_first() {
    let (mut graph, ids) = graph(5);
    // 0 needs 1 and 2; 2 needs 3; 4 is independent
    graph.add_dependency(ids[0], ids[1]).unwrap();
    graph.add_dependency(ids[0], ids[2]).unwrap();
    graph.add_dependency(ids[2], ids[3]).unwrap();

    let order = graph.topological_sort().unwrap().to_vec();
    assert_eq!(order.len(), 5);
    assert!(position(&order, ids[1]) < position(&order, ids[0]));
    assert!(position(&order, ids[2]) < position(&order, ids[0]));
    assert!(position(&order, ids[3]) < position(&order, ids[2]));
}

#[test]
fn order_is_deterministic_for_same_registration() {
    let build = || {
        let (mut graph, ids) = graph(6);
        graph.add_dependency(ids[5], ids[0]).unwrap();
        graph.add_dependency(ids[3], ids[1]).unwrap();
        graph
    };

    let mut first = build();
    let mut second = build();
    assert_eq!(
        first.topological_sort().unwrap(),
        second.topological_sort().unwrap()
    );
}

#[test]
fn independent_systems_sort_in_reverse_registration_order() {
    let (mut graph, ids) = graph(3);
    assert_eq!(graph.topological_sort().unwrap(), &[ids[2], ids[1], ids[0]]);
}

#[test]
fn mixed_graph_has_exact_order() {
    // 0 needs 1; 2 is independent. The queue starts as [0, 2], then 1 is
    // released by 0, giving [0, 2, 1] before reversal.
    let (mut graph, ids) = graph(3);
    graph.add_dependency(ids[0], ids[1]).unwrap();
    assert_eq!(graph.topological_sort().unwrap(), &[ids[1], ids[2], ids[0]]);
}

#[test]
fn duplicate_edges_are_harmless() {
    let (mut graph, ids) = graph(2);
    graph.add_dependency(ids[0], ids[1]).unwrap();
    graph.add_dependency(ids[0], ids[1]).unwrap();

    assert_eq!(graph.topological_sort().unwrap(), &[ids[1], ids[0]]);
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn three_node_cycle_is_detected() {
    let (mut graph, ids) = graph(4);
    graph.add_dependency(ids[0], ids[1]).unwrap();
    graph.add_dependency(ids[1], ids[2]).unwrap();
    graph.add_dependency(ids[2], ids[0]).unwrap();

    assert!(graph.has_cycle());
    let err = graph.topological_sort().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { unresolved: 3 }));
    assert!(err.to_string().contains("cycle detected in dependency graph"));
}

#[test]
fn has_cycle_does_not_touch_cache() {
    let (mut graph, ids) = graph(2);
    graph.add_dependency(ids[0], ids[1]).unwrap();
    graph.topological_sort().unwrap();

    assert!(!graph.has_cycle());
    assert!(!graph.is_dirty());
    assert_eq!(graph.sort_count(), 1);
}

// =============================================================================
// Cache Invalidation
// =============================================================================

#[test]
fn every_mutation_dirties_the_cache() {
    let (mut graph, ids) = graph(2);
    graph.topological_sort().unwrap();

    graph.add_dependency(ids[0], ids[1]).unwrap();
    assert!(graph.is_dirty());
    graph.topological_sort().unwrap();

    graph.add_system(SystemId::new(9));
    assert!(graph.is_dirty());
    graph.topological_sort().unwrap();

    graph.remove_dependency(ids[0], ids[1]).unwrap();
    assert!(graph.is_dirty());
    graph.topological_sort().unwrap();

    assert_eq!(graph.sort_count(), 4);
}

#[test]
fn failed_edge_leaves_cache_clean() {
    let (mut graph, ids) = graph(1);
    graph.topological_sort().unwrap();

    assert!(graph.add_dependency(ids[0], SystemId::new(3)).is_err());
    assert!(!graph.is_dirty());
}
