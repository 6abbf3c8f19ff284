//! Task identity for keyed background work.
//!
//! Every task spawned through [`StateRuntime`](crate::StateRuntime) is tagged
//! with a `TaskId`: the key of the state it reports on plus a generation
//! counter. The runtime remembers the latest generation per key, which is how
//! results of superseded tasks are told apart from current ones.
//!
//! # Usage
//!
//! ```ignore
//! use stagepost_states::TaskId;
//!
//! let first = TaskId::new("record-1", 1);
//! let retry = TaskId::new("record-1", 2);
//!
//! assert_eq!(first.key(), retry.key());
//! assert!(retry.is_newer_than(&first));
//! ```

/// Unique identifier for a spawned task.
///
/// Combines the key of the state the task reports on with a generation
/// counter, so that:
/// - a second task for the same key can be recognised as the newer one
/// - events from a superseded task can be dropped on arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId<K> {
    key: K,
    generation: u64,
}

impl<K> TaskId<K> {
    /// Creates a new `TaskId` with the given key and generation.
    pub fn new(key: K, generation: u64) -> Self {
        Self { key, generation }
    }

    /// Returns the key component of this task identifier.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the generation counter of this task identifier.
    ///
    /// Higher generation values indicate more recently spawned tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` when `self` was spawned after `other`.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.generation > other.generation
    }
}
