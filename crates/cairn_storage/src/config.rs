//! Store configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How renormalize compacts several components of one type added for the
/// same entity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DuplicatePolicy {
    /// Keep the most recently added component.
    #[default]
    KeepLast,
    /// Keep the earliest added component.
    KeepFirst,
    /// Keep every component, in insertion order, as separate slots.
    KeepAll,
    /// Fail renormalize with a duplicate-entity error.
    Reject,
}

/// Configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreConfig {
    /// Compaction policy for same-type, same-entity adds.
    pub duplicates: DuplicatePolicy,

    /// Number of slots preallocated when a container is created.
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Creates a configuration that keeps every same-type component per
    /// entity, addressable by slot.
    #[must_use]
    pub fn multi_slot() -> Self {
        Self {
            duplicates: DuplicatePolicy::KeepAll,
            ..Self::default()
        }
    }

    /// Creates a configuration that rejects duplicate adds.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }

    /// Builder method to set the duplicate policy.
    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Builder method to set per-container preallocation.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
