//! Entity-component storage for Tickwork.
//!
//! This crate provides:
//! - [`EntityAllocator`] - Identifier allocation with a LIFO free pool
//! - [`ComponentStore`] - Typed component storage with forward and reverse indices
//! - [`Deferred`] - FIFO queue of store mutations replayed after a tick

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod component;
pub mod config;
pub mod deferred;
pub mod entity;
pub mod registry;
pub mod store;

pub use bundle::{ComponentBundle, ComponentQuery};
pub use component::{Component, ComponentHandle, ComponentPool, Signature};
pub use config::StoreConfig;
pub use deferred::Deferred;
pub use entity::EntityAllocator;
pub use registry::ComponentRegistry;
pub use store::ComponentStore;
