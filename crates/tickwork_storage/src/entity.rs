//! Entity identifier allocation with a LIFO free pool.
//!
//! The `EntityAllocator` hands out the most recently freed identifier first,
//! otherwise the next never-used integer.

use tickwork_foundation::{EntityId, Error, Result};

/// Manages entity identifier lifecycle.
///
/// Identifiers are allocated from the free pool when available, otherwise
/// the next unused index is allocated. When an entity is destroyed its
/// index is pushed onto the free pool.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    /// Liveness flag per index ever allocated.
    live: Vec<bool>,
    /// Freed indices available for reuse. Popped from the back.
    free_list: Vec<u32>,
    /// Count of live entities.
    live_count: usize,
}

impl EntityAllocator {
    /// Creates a new empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with room for `capacity` identifiers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live_count: 0,
        }
    }

    /// Allocates an identifier.
    ///
    /// Reuses the most recently freed index when one exists.
    pub fn spawn(&mut self) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            self.live[index as usize] = true;
            EntityId::new(index)
        } else {
            let index = self.next_index();
            self.live.push(true);
            EntityId::new(index)
        }
    }

    /// Marks an identifier live that was never handed out by [`spawn`](Self::spawn).
    ///
    /// Indices skipped over on the way to `id` go onto the free pool so they
    /// remain allocatable. Returns false if `id` was already live.
    ///
    /// Memory is linear in the largest index ever adopted: every skipped
    /// index gets a liveness slot and a free pool entry. Only adopt ids near
    /// the allocated range; an id like `u32::MAX` reserves gigabytes.
    pub fn adopt(&mut self, id: EntityId) -> bool {
        if self.is_alive(id) {
            return false;
        }

        let next = self.next_index();
        if id.index() >= next {
            self.free_list.extend((next..id.index()).rev());
            self.live.resize(id.slot() + 1, false);
        } else if let Some(pos) = self.free_list.iter().rposition(|&i| i == id.index()) {
            self.free_list.remove(pos);
        }

        self.live[id.slot()] = true;
        self.live_count += 1;
        true
    }

    /// Releases an identifier back to the free pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not live.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        if !self.is_alive(id) {
            return Err(Error::entity_not_found(id));
        }

        self.live[id.slot()] = false;
        self.free_list.push(id.index());
        self.live_count -= 1;
        Ok(())
    }

    /// Checks if an identifier is currently live.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.live.get(id.slot()).copied().unwrap_or(false)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Returns the number of indices currently waiting in the free pool.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Iterates live identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(idx, _)| EntityId::new(idx as u32))
    }

    /// Upper bound (exclusive) of indices ever allocated.
    #[allow(clippy::cast_possible_truncation)]
    fn next_index(&self) -> u32 {
        self.live.len() as u32
    }
}
