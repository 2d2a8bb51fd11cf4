//! Tickwork - Entity-component store and dependency-ordered scheduler
//!
//! This crate re-exports all layers of the Tickwork system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tickwork_engine     - Dependency graph, scheduler, event channels
//! Layer 1: tickwork_storage    - Entity allocation, component store, deferred ops
//! Layer 0: tickwork_foundation - Core types (EntityId, SystemId, Error)
//! ```

pub use tickwork_engine as engine;
pub use tickwork_foundation as foundation;
pub use tickwork_storage as storage;
