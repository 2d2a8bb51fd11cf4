//! Component type registration.
//!
//! Every Rust type used as a component is issued a dense [`ComponentTypeId`]
//! the first time it is seen. The id doubles as the index of the type's pool.

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use tickwork_foundation::ComponentTypeId;

use crate::component::Component;

/// Maps component types to dense ids.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, returning its id and whether it was newly issued.
    #[allow(clippy::cast_possible_truncation)]
    pub fn register<T: Component>(&mut self) -> (ComponentTypeId, bool) {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return (id, false);
        }
        let id = ComponentTypeId::new(self.names.len() as u32);
        self.ids.insert(TypeId::of::<T>(), id);
        self.names.push(type_name::<T>());
        (id, true)
    }

    /// Looks up the id for `T` without registering it.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the Rust type name recorded for an id.
    #[must_use]
    pub fn name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
