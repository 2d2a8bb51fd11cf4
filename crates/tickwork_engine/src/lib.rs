//! Dependency-ordered system scheduling for Tickwork.
//!
//! This crate provides:
//! - [`DependencyGraph`] - Cycle detection and cached topological order
//! - [`Scheduler`] - Runs registered systems once per tick in dependency order
//! - [`System`] / [`AsyncSystem`] - Per-tick behaviour
//! - [`EventBus`] - Named publish/subscribe channels

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod event;
pub mod graph;
pub mod scheduler;
pub mod system;

pub use config::SchedulerConfig;
pub use event::{EventBus, SubscriptionId};
pub use graph::DependencyGraph;
pub use scheduler::Scheduler;
pub use system::{AsAny, AsyncSystem, Blocking, FnSystem, System, SystemFuture, system_fn};
