//! Cairn - Entity/component store with tagged-tree serialization
//!
//! This crate re-exports all layers of the Cairn system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cairn_serial     - Snapshot, create, merge, flatten/parse
//! Layer 2: cairn_engine     - Merge-join queries and systems
//! Layer 1: cairn_storage    - Type registry, containers, store
//! Layer 0: cairn_foundation - Core types (EntityId, Tree, Component, Error)
//! ```

pub use cairn_engine as engine;
pub use cairn_foundation as foundation;
pub use cairn_serial as serial;
pub use cairn_storage as storage;
