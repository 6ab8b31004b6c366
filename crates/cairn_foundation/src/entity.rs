//! Entity identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entity identifier.
///
/// An entity has no data of its own. It exists for as long as some
/// container holds a component keyed by its ID. IDs come from a counter
/// scoped to one store and are never reused within that store.
///
/// IDs order by their raw index, which is the order containers are sorted
/// in after renormalization.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity ID from a raw index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index of this entity.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }

    /// Returns the bit pattern carried by 64-bit integer tree nodes.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn to_wire(self) -> i64 {
        self.0 as i64
    }

    /// Reinterprets a 64-bit integer tree node as an entity ID.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_wire(raw: i64) -> Self {
        Self(raw as u64)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(index: u64) -> Self {
        Self(index)
    }
}
