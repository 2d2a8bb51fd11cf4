//! Configuration for the component store.

/// Configuration for a [`ComponentStore`](crate::ComponentStore).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Number of entity slots to pre-allocate.
    pub entity_capacity: usize,

    /// Log soft misses from `get_component` at warn level (debug otherwise).
    pub warn_on_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 0,
            warn_on_missing: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the entity capacity.
    #[must_use]
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Builder method to enable/disable warn-level soft miss logging.
    #[must_use]
    pub fn with_warn_on_missing(mut self, warn: bool) -> Self {
        self.warn_on_missing = warn;
        self
    }
}
