//! The entity/component store.
//!
//! `ComponentStore` owns entity identifier lifecycle and every attached
//! component. Data is kept in two indices that are updated together:
//!
//! - forward: entity -> [`Signature`] (which component types it holds)
//! - reverse: component type -> entities holding at least one instance
//!
//! Removal against an unknown entity is an error; reads against an unknown
//! entity or a missing component are logged and resolve to `None`.

use std::fmt;

use log::{debug, warn};
use tickwork_foundation::{ComponentTypeId, EntityId, Error, Result};

use crate::bundle::{ComponentBundle, ComponentQuery};
use crate::component::{Component, ComponentHandle, ComponentPool, ErasedPool, Removal, Signature};
use crate::config::StoreConfig;
use crate::entity::EntityAllocator;
use crate::registry::ComponentRegistry;

/// Stores entities and their components.
pub struct ComponentStore {
    config: StoreConfig,
    entities: EntityAllocator,
    /// Forward index, one slot per entity index. `None` for dead slots.
    signatures: Vec<Option<Signature>>,
    registry: ComponentRegistry,
    /// One pool per registered type, indexed by `ComponentTypeId`.
    pools: Vec<Box<dyn ErasedPool>>,
    next_serial: u64,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStore")
            .field("entities", &self.entities.len())
            .field("component_types", &self.registry.len())
            .field("components", &self.component_count())
            .finish()
    }
}

impl ComponentStore {
    /// Creates a new empty store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            entities: EntityAllocator::with_capacity(config.entity_capacity),
            signatures: Vec::with_capacity(config.entity_capacity),
            config,
            registry: ComponentRegistry::new(),
            pools: Vec::new(),
            next_serial: 0,
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the component type registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // --- Entities ---

    /// Creates an entity with no components.
    ///
    /// Returns the most recently destroyed identifier if any are waiting for
    /// reuse, otherwise the next never-used one.
    pub fn create_entity(&mut self) -> EntityId {
        let entity = self.entities.spawn();
        *self.signature_slot(entity) = Some(Signature::new());
        entity
    }

    /// Destroys an entity, dropping all of its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist (never created or
    /// already destroyed).
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<()> {
        let signature = self
            .signatures
            .get_mut(entity.slot())
            .and_then(Option::take)
            .ok_or_else(|| Error::entity_not_found(entity))?;

        for &type_id in signature.components() {
            self.pools[type_id.index()].remove_entity(entity);
        }
        self.entities.destroy(entity)
    }

    /// Checks if an entity currently exists.
    #[must_use]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns every live entity in ascending order.
    #[must_use]
    pub fn all_entities(&self) -> Vec<EntityId> {
        self.entities.iter().collect()
    }

    /// Returns the set of component types attached to an entity.
    #[must_use]
    pub fn signature(&self, entity: EntityId) -> Option<&Signature> {
        self.signatures.get(entity.slot()).and_then(Option::as_ref)
    }

    // --- Components ---

    /// Registers a component type, returning its id.
    ///
    /// Types are registered implicitly on first attachment; explicit
    /// registration only fixes the id order.
    pub fn register<T: Component>(&mut self) -> ComponentTypeId {
        let (id, fresh) = self.registry.register::<T>();
        if fresh {
            self.pools.push(Box::new(ComponentPool::<T>::new()));
        }
        id
    }

    /// Looks up the id of a component type, if it has been registered.
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.registry.get::<T>()
    }

    /// Attaches a component to an entity.
    ///
    /// Multiple instances of one type may be attached; typed reads return the
    /// first. If the entity has no index yet it is brought to life.
    ///
    /// Bringing an id to life reserves a slot for every index below it (see
    /// [`EntityAllocator::adopt`]), so untracked ids should stay close to the
    /// ones already handed out.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> ComponentHandle {
        let type_id = self.register::<T>();
        let serial = self.next_serial;
        self.next_serial += 1;

        if !self.entities.is_alive(entity) {
            debug!("adding component to untracked {entity}, adopting it");
            self.entities.adopt(entity);
        }
        self.signature_slot(entity)
            .get_or_insert_with(Signature::new)
            .insert(type_id);

        if let Some(pool) = self.pool_mut::<T>(type_id) {
            pool.push(entity, serial, component);
        }
        ComponentHandle::new(type_id, serial)
    }

    /// Attaches every component of a bundle, returning one handle per component.
    pub fn add_components<B: ComponentBundle>(&mut self, entity: EntityId, bundle: B) -> Vec<ComponentHandle> {
        let mut handles = Vec::with_capacity(B::len());
        bundle.attach(self, entity, &mut handles);
        handles
    }

    /// Removes the component instance identified by `handle`.
    ///
    /// Returns `Ok(false)` if the instance is not attached to `entity`.
    /// Once the entity's last instance of a type is gone, the type leaves the
    /// entity's signature and the entity leaves the type's reverse index.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist.
    pub fn remove_component(&mut self, entity: EntityId, handle: ComponentHandle) -> Result<bool> {
        let signature = self
            .signatures
            .get_mut(entity.slot())
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::entity_not_found(entity))?;

        let type_id = handle.component_type();
        let Some(pool) = self.pools.get_mut(type_id.index()) else {
            return Ok(false);
        };

        match pool.remove_instance(entity, handle.serial()) {
            Removal::Missing => Ok(false),
            Removal::Removed => Ok(true),
            Removal::RemovedLast => {
                signature.remove(type_id);
                Ok(true)
            }
        }
    }

    /// Removes several component instances, returning how many were attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist.
    pub fn remove_components(&mut self, entity: EntityId, handles: &[ComponentHandle]) -> Result<usize> {
        let mut removed = 0;
        for &handle in handles {
            if self.remove_component(entity, handle)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns the first component of type `T` attached to an entity.
    ///
    /// A miss is logged, not an error.
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            self.report_miss(format_args!("entity {entity} does not exist"));
            return None;
        }
        let found = self
            .component_id::<T>()
            .and_then(|id| self.pool::<T>(id))
            .and_then(|pool| pool.first(entity));
        if found.is_none() {
            self.report_miss(format_args!(
                "{entity} has no {}",
                std::any::type_name::<T>()
            ));
        }
        found
    }

    /// Returns the first component of type `T` attached to an entity, mutably.
    ///
    /// Misses are logged like [`get_component`](Self::get_component).
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            self.report_miss(format_args!("entity {entity} does not exist"));
            return None;
        }
        let Some(id) = self
            .component_id::<T>()
            .filter(|&id| self.has_component_id(entity, id))
        else {
            self.report_miss(format_args!(
                "{entity} has no {}",
                std::any::type_name::<T>()
            ));
            return None;
        };
        self.pool_mut::<T>(id).and_then(|pool| pool.first_mut(entity))
    }

    /// Iterates every instance of `T` attached to an entity, in attachment order.
    pub fn components_of<T: Component>(&self, entity: EntityId) -> impl Iterator<Item = &T> + '_ {
        self.component_id::<T>()
            .and_then(|id| self.pool::<T>(id))
            .into_iter()
            .flat_map(move |pool| pool.all(entity))
    }

    /// Checks if an entity holds at least one component of type `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.component_id::<T>()
            .is_some_and(|id| self.has_component_id(entity, id))
    }

    /// Checks if an entity holds at least one component with the given type id.
    #[must_use]
    pub fn has_component_id(&self, entity: EntityId, type_id: ComponentTypeId) -> bool {
        self.signature(entity).is_some_and(|sig| sig.contains(type_id))
    }

    /// Returns the entities holding every component type in `Q`.
    ///
    /// An empty query returns no entities.
    #[must_use]
    pub fn entities_with<Q: ComponentQuery>(&self) -> Vec<EntityId> {
        let ids = Q::type_ids(&self.registry);
        if ids.iter().any(Option::is_none) {
            return Vec::new();
        }
        let ids: Vec<ComponentTypeId> = ids.into_iter().flatten().collect();
        self.entities_with_ids(&ids)
    }

    /// Returns the entities holding every listed component type.
    ///
    /// The reverse indices are ordered by length and the shortest one is
    /// filtered against the rest, so cost tracks the rarest type. Result order
    /// follows that shortest index.
    #[must_use]
    pub fn entities_with_ids(&self, type_ids: &[ComponentTypeId]) -> Vec<EntityId> {
        if type_ids.is_empty() {
            return Vec::new();
        }

        let mut sets: Vec<(ComponentTypeId, &[EntityId])> = type_ids
            .iter()
            .map(|&id| {
                let entities = self.pools.get(id.index()).map_or(&[][..], |p| p.entities());
                (id, entities)
            })
            .collect();
        sets.sort_by_key(|(_, entities)| entities.len());

        let Some(((_, smallest), rest)) = sets.split_first() else {
            return Vec::new();
        };

        smallest
            .iter()
            .copied()
            .filter(|&entity| {
                rest.iter()
                    .all(|&(id, _)| self.has_component_id(entity, id))
            })
            .collect()
    }

    /// Total number of attached component instances.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.pools.iter().map(|pool| pool.instance_count()).sum()
    }

    // --- Private helpers ---

    fn signature_slot(&mut self, entity: EntityId) -> &mut Option<Signature> {
        if self.signatures.len() <= entity.slot() {
            self.signatures.resize_with(entity.slot() + 1, || None);
        }
        &mut self.signatures[entity.slot()]
    }

    fn pool<T: Component>(&self, id: ComponentTypeId) -> Option<&ComponentPool<T>> {
        self.pools
            .get(id.index())
            .and_then(|pool| pool.as_any().downcast_ref::<ComponentPool<T>>())
    }

    fn pool_mut<T: Component>(&mut self, id: ComponentTypeId) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(id.index())
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<T>>())
    }

    fn report_miss(&self, message: fmt::Arguments<'_>) {
        if self.config.warn_on_missing {
            warn!("{message}");
        } else {
            debug!("{message}");
        }
    }
}
