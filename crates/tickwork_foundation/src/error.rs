//! Error types for the Tickwork system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::id::SystemId;

/// The main error type for Tickwork operations.
///
/// The context, when present, is appended to the message.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map_or_else(String::new, ToString::to_string))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a system-or-dependency not found error.
    #[must_use]
    pub fn system_not_found(system: SystemId, dependency: SystemId) -> Self {
        Self::new(ErrorKind::SystemNotFound { system, dependency })
    }

    /// Creates a cycle detected error.
    #[must_use]
    pub fn cycle_detected(unresolved: usize) -> Self {
        Self::new(ErrorKind::CycleDetected { unresolved })
    }

    /// Creates a system failure error.
    #[must_use]
    pub fn system_failed(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemFailed {
            system: system.into(),
            message: message.into(),
        })
    }

    /// Returns true if this is a cycle error.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self.kind, ErrorKind::CycleDetected { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity has no index in the store.
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),

    /// A dependency edge named an unregistered system.
    #[error("system or dependency not found in graph: {system} -> {dependency}")]
    SystemNotFound {
        /// The dependent system.
        system: SystemId,
        /// The declared dependency.
        dependency: SystemId,
    },

    /// The dependency graph cannot be linearized.
    #[error("cycle detected in dependency graph ({unresolved} systems unresolved)")]
    CycleDetected {
        /// Number of systems that never reached in-degree zero.
        unresolved: usize,
    },

    /// A system's update returned an error.
    #[error("system {system} failed: {message}")]
    SystemFailed {
        /// Name of the failing system.
        system: String,
        /// Description of the failure.
        message: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the operation or system that raised the error.
    pub source: Option<String>,
    /// Tick during which the error occurred.
    pub tick: Option<u64>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the tick number.
    #[must_use]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

/// Renders as ` (at <source>, tick <n>)`, omitting absent parts.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.tick) {
            (Some(source), Some(tick)) => write!(f, " (at {source}, tick {tick})"),
            (Some(source), None) => write!(f, " (at {source})"),
            (None, Some(tick)) => write!(f, " (tick {tick})"),
            (None, None) => Ok(()),
        }
    }
}
