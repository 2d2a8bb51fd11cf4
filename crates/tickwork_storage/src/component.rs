//! Component storage primitives.
//!
//! Each component type gets its own [`ComponentPool`], which owns every
//! instance of that type and the type's reverse index (entities holding at
//! least one instance). A per-entity [`Signature`] records which pools hold
//! an entry for the entity.

use std::any::Any;
use std::collections::HashMap;

use tickwork_foundation::{ComponentTypeId, EntityId};

/// Marker for data that can be attached to an entity.
///
/// Implemented for every `'static` type; the concrete type is the tag.
pub trait Component: Any {}

impl<T: Any> Component for T {}

/// Stable handle to one attached component instance.
///
/// Returned by `add_component` and consumed by `remove_component`. Serials are
/// never reused, so a handle to a removed instance simply stops matching.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    type_id: ComponentTypeId,
    serial: u64,
}

impl ComponentHandle {
    pub(crate) fn new(type_id: ComponentTypeId, serial: u64) -> Self {
        Self { type_id, serial }
    }

    /// Returns the component type this handle refers to.
    #[must_use]
    pub fn component_type(self) -> ComponentTypeId {
        self.type_id
    }

    /// Returns the attachment serial.
    #[must_use]
    pub fn serial(self) -> u64 {
        self.serial
    }
}

/// The set of component types an entity currently holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    /// Component types, sorted by index.
    components: Vec<ComponentTypeId>,
}

impl Signature {
    /// Creates a new empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signature from a list of components.
    #[must_use]
    pub fn from_components(mut components: Vec<ComponentTypeId>) -> Self {
        components.sort();
        components.dedup();
        Self { components }
    }

    /// Returns the components in this signature.
    #[must_use]
    pub fn components(&self) -> &[ComponentTypeId] {
        &self.components
    }

    /// Checks if this signature contains a component.
    #[must_use]
    pub fn contains(&self, component: ComponentTypeId) -> bool {
        self.components.binary_search(&component).is_ok()
    }

    /// Checks if this signature contains all listed components.
    #[must_use]
    pub fn contains_all(&self, other: &[ComponentTypeId]) -> bool {
        other.iter().all(|c| self.contains(*c))
    }

    /// Adds a component. Returns false if it was already present.
    pub fn insert(&mut self, component: ComponentTypeId) -> bool {
        match self.components.binary_search(&component) {
            Ok(_) => false,
            Err(pos) => {
                self.components.insert(pos, component);
                true
            }
        }
    }

    /// Removes a component. Returns false if it was absent.
    pub fn remove(&mut self, component: ComponentTypeId) -> bool {
        match self.components.binary_search(&component) {
            Ok(pos) => {
                self.components.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of distinct component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component types are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Removes every component type.
    pub fn clear(&mut self) {
        self.components.clear();
    }
}

/// Outcome of removing a single instance from a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Removal {
    /// No instance with that serial was attached to the entity.
    Missing,
    /// The instance was dropped; more of the same type remain.
    Removed,
    /// The instance was dropped and it was the entity's last of this type.
    RemovedLast,
}

#[derive(Debug)]
struct Slot<T> {
    serial: u64,
    value: T,
}

/// Storage for every instance of one component type.
#[derive(Debug)]
pub struct ComponentPool<T> {
    /// Instances per entity, in attachment order.
    instances: HashMap<EntityId, Vec<Slot<T>>>,
    /// Reverse index: entities holding at least one instance, in insertion order.
    entities: Vec<EntityId>,
}

impl<T> Default for ComponentPool<T> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
            entities: Vec::new(),
        }
    }
}

impl<T: Component> ComponentPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instance for `entity`.
    pub(crate) fn push(&mut self, entity: EntityId, serial: u64, value: T) {
        let slots = self.instances.entry(entity).or_default();
        if slots.is_empty() {
            self.entities.push(entity);
        }
        slots.push(Slot { serial, value });
    }

    /// Returns the first instance attached to `entity`.
    #[must_use]
    pub fn first(&self, entity: EntityId) -> Option<&T> {
        self.instances
            .get(&entity)
            .and_then(|slots| slots.first())
            .map(|slot| &slot.value)
    }

    /// Returns the first instance attached to `entity`, mutably.
    pub fn first_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.instances
            .get_mut(&entity)
            .and_then(|slots| slots.first_mut())
            .map(|slot| &mut slot.value)
    }

    /// Iterates every instance attached to `entity`, in attachment order.
    pub fn all(&self, entity: EntityId) -> impl Iterator<Item = &T> + '_ {
        self.instances
            .get(&entity)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|slot| &slot.value))
    }
}

/// Type-erased view of a [`ComponentPool`] so the store can hold one per type.
pub(crate) trait ErasedPool: Any {
    /// Drops every instance attached to `entity` and clears it from the reverse index.
    fn remove_entity(&mut self, entity: EntityId) -> usize;

    /// Drops the instance with `serial` attached to `entity`.
    fn remove_instance(&mut self, entity: EntityId, serial: u64) -> Removal;

    /// The reverse index.
    fn entities(&self) -> &[EntityId];

    /// Total instances across all entities.
    fn instance_count(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedPool for ComponentPool<T> {
    fn remove_entity(&mut self, entity: EntityId) -> usize {
        let dropped = self.instances.remove(&entity).map_or(0, |slots| slots.len());
        if let Some(pos) = self.entities.iter().position(|&e| e == entity) {
            self.entities.remove(pos);
        }
        dropped
    }

    fn remove_instance(&mut self, entity: EntityId, serial: u64) -> Removal {
        let Some(slots) = self.instances.get_mut(&entity) else {
            return Removal::Missing;
        };
        let Some(pos) = slots.iter().position(|slot| slot.serial == serial) else {
            return Removal::Missing;
        };

        slots.remove(pos);
        if !slots.is_empty() {
            return Removal::Removed;
        }

        self.instances.remove(&entity);
        if let Some(pos) = self.entities.iter().position(|&e| e == entity) {
            self.entities.remove(pos);
        }
        Removal::RemovedLast
    }

    fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    fn instance_count(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
