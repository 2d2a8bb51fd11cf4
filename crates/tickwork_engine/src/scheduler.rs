//! Tick orchestration.
//!
//! The scheduler owns the registered systems and a [`DependencyGraph`] over
//! their handles. Each tick it asks the graph for the current order and runs
//! every system in that order, strictly one after another.
//!
//! A tick either runs to completion or fails:
//! - a cycle aborts the tick before any system runs
//! - a failing system aborts the rest of the tick
//!
//! Nothing is rolled back in either case.

use std::any::Any;

use log::{debug, trace};
use tickwork_foundation::{ErrorContext, Result, SystemId};

use crate::config::SchedulerConfig;
use crate::graph::DependencyGraph;
use crate::system::{AsAny, AsyncSystem, Blocking, System};

/// Runs registered systems once per tick in dependency order.
pub struct Scheduler<C> {
    config: SchedulerConfig,
    systems: Vec<Box<dyn System<C>>>,
    graph: DependencyGraph,
    tick_number: u64,
}

impl<C: 'static> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.systems.iter().map(|s| s.name()).collect();
        f.debug_struct("Scheduler")
            .field("systems", &names)
            .field("graph", &self.graph)
            .field("tick_number", &self.tick_number)
            .finish_non_exhaustive()
    }
}

impl<C: 'static> Scheduler<C> {
    /// Creates a new scheduler with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates a new scheduler with the given configuration.
    #[must_use]
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            systems: Vec::new(),
            graph: DependencyGraph::new(),
            tick_number: 0,
        }
    }

    /// Returns the scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Registers a system, returning its handle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_system<S: System<C>>(&mut self, system: S) -> SystemId {
        let id = SystemId::new(self.systems.len() as u32);
        debug!("registering {} as {id}", system.name());
        self.systems.push(Box::new(system));
        self.graph.add_system(id);
        id
    }

    /// Registers an asynchronous system. Its future is awaited to completion
    /// before the next system starts.
    ///
    /// The system is stored wrapped in [`Blocking`]; type lookups find it
    /// under either `S` or `Blocking<S>`.
    pub fn add_async_system<S: AsyncSystem<C>>(&mut self, system: S) -> SystemId {
        self.add_system(Blocking(system))
    }

    /// Declares that `dependency` must run before `system`.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle was not issued by this scheduler.
    pub fn add_dependency(&mut self, system: SystemId, dependency: SystemId) -> Result<()> {
        self.graph.add_dependency(system, dependency)
    }

    /// Removes a previously declared dependency. Returns false if it was not declared.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle was not issued by this scheduler.
    pub fn remove_dependency(&mut self, system: SystemId, dependency: SystemId) -> Result<bool> {
        self.graph.remove_dependency(system, dependency)
    }

    /// Returns the dependency graph.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Returns the system registered under `id`.
    #[must_use]
    pub fn system(&self, id: SystemId) -> Option<&dyn System<C>> {
        self.systems.get(id.index()).map(|s| &**s)
    }

    /// Returns the system registered under `id` as a concrete type.
    pub fn system_mut<S: Any>(&mut self, id: SystemId) -> Option<&mut S> {
        self.systems
            .get_mut(id.index())
            .and_then(|s| downcast_mut::<C, S>(&mut **s))
    }

    /// Returns the first registered system of type `S`.
    #[must_use]
    pub fn get_system<S: Any>(&self) -> Option<&S> {
        self.systems.iter().find_map(|s| downcast_ref::<C, S>(&**s))
    }

    /// Returns the first registered system of type `S`, mutably.
    pub fn get_system_mut<S: Any>(&mut self) -> Option<&mut S> {
        self.systems
            .iter_mut()
            .find_map(|s| downcast_mut::<C, S>(&mut **s))
    }

    /// Returns every registered system of type `S`, in registration order.
    #[must_use]
    pub fn get_systems<S: Any>(&self) -> Vec<&S> {
        self.systems
            .iter()
            .filter_map(|s| downcast_ref::<C, S>(&**s))
            .collect()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns true if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Number of ticks that have started running systems.
    #[must_use]
    pub fn tick_number(&self) -> u64 {
        self.tick_number
    }

    /// Returns the current execution order without running anything.
    ///
    /// # Errors
    ///
    /// Returns a cycle error if the graph cannot be linearized.
    pub fn order(&mut self) -> Result<&[SystemId]> {
        self.graph.topological_sort()
    }

    /// Runs one tick: every system, in dependency order, with elapsed time `dt`.
    ///
    /// # Errors
    ///
    /// Returns a cycle error (no system runs) or the first system error
    /// (later systems do not run).
    pub fn run(&mut self, ctx: &mut C, dt: f64) -> Result<()> {
        if self.graph.is_dirty() {
            debug!("recomputing order for {} systems", self.systems.len());
        }
        let tick = self.tick_number + 1;
        let order = self.graph.topological_sort().map_err(|err| {
            err.with_context(ErrorContext::new().with_source("scheduler").with_tick(tick))
        })?;
        self.tick_number = tick;

        for &id in order {
            let system = &mut self.systems[id.index()];
            if self.config.trace_systems {
                trace!("tick {tick}: running {} ({id})", system.name());
            }
            system.update(ctx, dt).map_err(|mut err| {
                let context = err.context.take().unwrap_or_default();
                err.with_context(context.with_source(system.name()).with_tick(tick))
            })?;
        }
        Ok(())
    }
}

/// Downcasts a registered system, looking through adapters such as [`Blocking`].
fn downcast_ref<C: 'static, S: Any>(system: &dyn System<C>) -> Option<&S> {
    AsAny::as_any(system)
        .downcast_ref::<S>()
        .or_else(|| system.wrapped().and_then(|inner| inner.downcast_ref::<S>()))
}

fn downcast_mut<C: 'static, S: Any>(system: &mut dyn System<C>) -> Option<&mut S> {
    if AsAny::as_any(&*system).is::<S>() {
        return AsAny::as_any_mut(system).downcast_mut::<S>();
    }
    system.wrapped_mut().and_then(|inner| inner.downcast_mut::<S>())
}
