//! Dependency graph over registered systems.
//!
//! An edge `system -> dependency` means `dependency` must run before
//! `system`. Kahn's algorithm is run over the edges as declared (so a
//! dependency's in-degree counts how many systems depend on it) and the
//! result is reversed, which puts dependencies ahead of their dependents.
//!
//! The computed order is cached until the next `add_system`,
//! `add_dependency` or `remove_dependency`.

use std::collections::{HashMap, HashSet, VecDeque};

use tickwork_foundation::{Error, Result, SystemId};

/// Directed graph of systems with a cached execution order.
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    /// Nodes in registration order.
    nodes: Vec<SystemId>,
    /// Position of each node in `nodes`.
    positions: HashMap<SystemId, usize>,
    /// Declared dependencies per node, parallel to `nodes`.
    adjacency: Vec<Vec<SystemId>>,
    /// Last successfully computed order.
    cached: Option<Vec<SystemId>>,
    /// True when the graph changed since `cached` was computed.
    dirty: bool,
    /// Number of times an order was actually computed.
    sorts: u64,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates an empty graph. A new graph starts dirty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            positions: HashMap::new(),
            adjacency: Vec::new(),
            cached: None,
            dirty: true,
            sorts: 0,
        }
    }

    /// Adds a system node. Returns false if it was already present.
    pub fn add_system(&mut self, system: SystemId) -> bool {
        if self.positions.contains_key(&system) {
            return false;
        }
        self.positions.insert(system, self.nodes.len());
        self.nodes.push(system);
        self.adjacency.push(Vec::new());
        self.dirty = true;
        true
    }

    /// Declares that `dependency` must run before `system`.
    ///
    /// # Errors
    ///
    /// Returns an error if either system is not in the graph.
    pub fn add_dependency(&mut self, system: SystemId, dependency: SystemId) -> Result<()> {
        let (pos, _) = self.endpoints(system, dependency)?;
        self.adjacency[pos].push(dependency);
        self.dirty = true;
        Ok(())
    }

    /// Removes one declared `system -> dependency` edge.
    ///
    /// Returns false if no such edge was declared.
    ///
    /// # Errors
    ///
    /// Returns an error if either system is not in the graph.
    pub fn remove_dependency(&mut self, system: SystemId, dependency: SystemId) -> Result<bool> {
        let (pos, _) = self.endpoints(system, dependency)?;
        let edges = &mut self.adjacency[pos];
        let Some(edge) = edges.iter().position(|&d| d == dependency) else {
            return Ok(false);
        };
        edges.remove(edge);
        self.dirty = true;
        Ok(true)
    }

    /// Returns the declared dependencies of a system (empty if unknown).
    #[must_use]
    pub fn dependencies(&self, system: SystemId) -> &[SystemId] {
        self.positions
            .get(&system)
            .map_or(&[][..], |&pos| &self.adjacency[pos])
    }

    /// Returns every system in registration order.
    #[must_use]
    pub fn systems(&self) -> &[SystemId] {
        &self.nodes
    }

    /// Checks if a system is in the graph.
    #[must_use]
    pub fn contains(&self, system: SystemId) -> bool {
        self.positions.contains_key(&system)
    }

    /// Number of systems in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no systems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the cached order is stale.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of times an order has been computed rather than served from cache.
    #[must_use]
    pub fn sort_count(&self) -> u64 {
        self.sorts
    }

    /// Checks for a cycle with a depth-first search.
    ///
    /// Does not touch the cached order.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        self.nodes
            .iter()
            .any(|&system| self.visit(system, &mut visited, &mut on_stack))
    }

    /// Returns an execution order in which every dependency precedes its dependents.
    ///
    /// The queue is seeded in registration order, so the result is
    /// deterministic for a fixed registration sequence. It is cached until
    /// the graph changes.
    ///
    /// # Errors
    ///
    /// Returns a cycle error if the graph cannot be linearized. Nothing is
    /// cached in that case, so the next call tries again.
    pub fn topological_sort(&mut self) -> Result<&[SystemId]> {
        if self.dirty || self.cached.is_none() {
            self.cached = None;
            let order = self.compute_order()?;
            self.cached = Some(order);
            self.dirty = false;
            self.sorts += 1;
        }
        Ok(self.cached.as_deref().unwrap_or_default())
    }

    // --- Private helpers ---

    fn endpoints(&self, system: SystemId, dependency: SystemId) -> Result<(usize, usize)> {
        match (self.positions.get(&system), self.positions.get(&dependency)) {
            (Some(&s), Some(&d)) => Ok((s, d)),
            _ => Err(Error::system_not_found(system, dependency)),
        }
    }

    fn visit(
        &self,
        system: SystemId,
        visited: &mut HashSet<SystemId>,
        on_stack: &mut HashSet<SystemId>,
    ) -> bool {
        if on_stack.contains(&system) {
            return true;
        }
        if !visited.insert(system) {
            return false;
        }

        on_stack.insert(system);
        for &dep in self.dependencies(system) {
            if self.visit(dep, visited, on_stack) {
                return true;
            }
        }
        on_stack.remove(&system);
        false
    }

    fn compute_order(&self) -> Result<Vec<SystemId>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for deps in &self.adjacency {
            for dep in deps {
                in_degree[self.positions[dep]] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&pos| in_degree[pos] == 0)
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(pos) = queue.pop_front() {
            sorted.push(self.nodes[pos]);
            for dep in &self.adjacency[pos] {
                let dep_pos = self.positions[dep];
                in_degree[dep_pos] -= 1;
                if in_degree[dep_pos] == 0 {
                    queue.push_back(dep_pos);
                }
            }
        }

        if sorted.len() != self.nodes.len() {
            return Err(Error::cycle_detected(self.nodes.len() - sorted.len()));
        }

        sorted.reverse();
        Ok(sorted)
    }
}
