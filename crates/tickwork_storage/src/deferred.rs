//! Deferred store mutations.
//!
//! Systems iterating query results must not mutate the store underneath
//! themselves. Instead they queue operations here and the queue is replayed
//! against the store after the tick, in FIFO order.

use std::collections::VecDeque;
use std::fmt;

use log::error;
use tickwork_foundation::{EntityId, Result};

use crate::bundle::ComponentBundle;
use crate::component::{Component, ComponentHandle};
use crate::store::ComponentStore;

type DeferredOp = Box<dyn FnOnce(&mut ComponentStore) -> Result<()>>;

/// FIFO queue of pending store mutations.
#[derive(Default)]
pub struct Deferred {
    queue: VecDeque<(&'static str, DeferredOp)>,
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl Deferred {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an arbitrary store operation.
    pub fn defer<F>(&mut self, op: F)
    where
        F: FnOnce(&mut ComponentStore) -> Result<()> + 'static,
    {
        self.push("deferred operation", op);
    }

    /// Queues creation of an empty entity.
    pub fn defer_create(&mut self) {
        self.push("create entity", |store| {
            store.create_entity();
            Ok(())
        });
    }

    /// Queues creation of an entity carrying `bundle`.
    pub fn defer_spawn<B: ComponentBundle>(&mut self, bundle: B) {
        self.push("spawn entity", move |store| {
            let entity = store.create_entity();
            store.add_components(entity, bundle);
            Ok(())
        });
    }

    /// Queues destruction of an entity.
    pub fn defer_destroy(&mut self, entity: EntityId) {
        self.push("destroy entity", move |store| store.destroy_entity(entity));
    }

    /// Queues attaching a component.
    pub fn defer_add<T: Component>(&mut self, entity: EntityId, component: T) {
        self.push("add component", move |store| {
            store.add_component(entity, component);
            Ok(())
        });
    }

    /// Queues removal of a component instance.
    pub fn defer_remove(&mut self, entity: EntityId, handle: ComponentHandle) {
        self.push("remove component", move |store| {
            store.remove_component(entity, handle).map(|_| ())
        });
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Replays every queued operation against `store`, oldest first.
    ///
    /// A failing operation is logged and skipped; the rest still run.
    /// Returns the number of failures. The queue is empty afterwards.
    pub fn apply(&mut self, store: &mut ComponentStore) -> usize {
        let mut failures = 0;
        while let Some((label, op)) = self.queue.pop_front() {
            if let Err(err) = op(store) {
                error!("error processing deferred {label}: {err}");
                failures += 1;
            }
        }
        failures
    }

    fn push<F>(&mut self, label: &'static str, op: F)
    where
        F: FnOnce(&mut ComponentStore) -> Result<()> + 'static,
    {
        self.queue.push_back((label, Box::new(op)));
    }
}
