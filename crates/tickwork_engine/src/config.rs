//! Configuration for the scheduler.

/// Configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Clone, Debug, Default)]
pub struct SchedulerConfig {
    /// Emit a trace-level log line before each system runs.
    pub trace_systems: bool,
}

impl SchedulerConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for debugging, with per-system tracing.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            trace_systems: true,
        }
    }

    /// Builder method to enable/disable per-system tracing.
    #[must_use]
    pub fn with_trace_systems(mut self, trace: bool) -> Self {
        self.trace_systems = trace;
        self
    }
}
