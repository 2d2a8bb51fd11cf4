//! Tuple forms for batch attachment and multi-type queries.
//!
//! `(A, B, C)` can be attached in one call through [`ComponentBundle`] and
//! used as an intersection query through [`ComponentQuery`].

use tickwork_foundation::{ComponentTypeId, EntityId};

use crate::component::{Component, ComponentHandle};
use crate::registry::ComponentRegistry;
use crate::store::ComponentStore;

/// A group of components attached together.
pub trait ComponentBundle: 'static {
    /// Attaches each component to `entity`, appending one handle per component.
    fn attach(self, store: &mut ComponentStore, entity: EntityId, handles: &mut Vec<ComponentHandle>);

    /// Number of components in the bundle.
    fn len() -> usize;
}

/// A set of component types used as an intersection query.
pub trait ComponentQuery {
    /// Resolves each member type to its id; `None` for types never registered.
    fn type_ids(registry: &ComponentRegistry) -> Vec<Option<ComponentTypeId>>;
}

impl ComponentQuery for () {
    fn type_ids(_registry: &ComponentRegistry) -> Vec<Option<ComponentTypeId>> {
        Vec::new()
    }
}

macro_rules! impl_tuples {
    ($count:expr; $($name:ident),+) => {
        impl<$($name: Component),+> ComponentBundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn attach(
                self,
                store: &mut ComponentStore,
                entity: EntityId,
                handles: &mut Vec<ComponentHandle>,
            ) {
                let ($($name,)+) = self;
                $(handles.push(store.add_component(entity, $name));)+
            }

            fn len() -> usize {
                $count
            }
        }

        impl<$($name: Component),+> ComponentQuery for ($($name,)+) {
            fn type_ids(registry: &ComponentRegistry) -> Vec<Option<ComponentTypeId>> {
                vec![$(registry.get::<$name>()),+]
            }
        }
    };
}

impl_tuples!(1; A);
impl_tuples!(2; A, B);
impl_tuples!(3; A, B, C);
impl_tuples!(4; A, B, C, D);
impl_tuples!(5; A, B, C, D, E);
impl_tuples!(6; A, B, C, D, E, F);
impl_tuples!(7; A, B, C, D, E, F, G);
impl_tuples!(8; A, B, C, D, E, F, G, H);
