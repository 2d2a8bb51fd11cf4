//! Identifiers and error types shared by the Tickwork layers.
//!
//! This crate provides:
//! - [`EntityId`] - Recyclable entity identifiers
//! - [`SystemId`] - Handles issued to registered systems
//! - [`ComponentTypeId`] - Dense ids issued to registered component types
//! - [`Error`] - Error type with kind and optional context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod id;

pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind};
pub use id::{ComponentTypeId, SystemId};

/// Result type alias using the Tickwork [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
