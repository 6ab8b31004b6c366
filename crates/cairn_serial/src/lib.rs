//! Tagged-tree serialization for Cairn stores.
//!
//! This crate provides:
//! - [`serialize_all_components`] / [`serialize_value`] - Store to document
//! - [`deserialize_component_create`] / [`deserialize_component_merge`] -
//!   Document to store
//! - [`flatten`] / [`parse`] - Document to bytes and back
//! - [`StoreSerialize`] - The same operations as methods on [`Store`]
//!
//! # Document shape
//!
//! ```text
//! { "<component name>": OBJ( ARRAY[ OBJ(schema dict), OBJ( ARRAY[ id, OBJ(fields), ... ] ) ] ),
//!   ... one section per registered type, in ascending ordinal order }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod document;
pub mod restore;
pub mod snapshot;

pub use codec::{flatten, parse};
pub use document::CINDEX_KEY;
pub use restore::{deserialize_component_create, deserialize_component_merge};
pub use snapshot::{serialize_all_components, serialize_value, serialize_value_at_slot};

use cairn_foundation::{Component, EntityId, Result, Tree};
use cairn_storage::Store;

/// Method-call access to serialization on a [`Store`].
pub trait StoreSerialize {
    /// See [`serialize_all_components`].
    ///
    /// # Errors
    ///
    /// Schema mismatch if a component diverges from its type's schema.
    fn serialize_all_components(&self) -> Result<Tree>;

    /// See [`serialize_value`].
    ///
    /// # Errors
    ///
    /// Not-registered or schema mismatch.
    fn serialize_value<T: Component>(&self, value: &T, entity: EntityId) -> Result<Tree>;

    /// See [`serialize_value_at_slot`].
    ///
    /// # Errors
    ///
    /// Not-registered or schema mismatch.
    fn serialize_value_at_slot<T: Component>(
        &self,
        value: &T,
        entity: EntityId,
        slot: usize,
    ) -> Result<Tree>;

    /// See [`deserialize_component_create`].
    ///
    /// # Errors
    ///
    /// See [`deserialize_component_create`].
    fn deserialize_component_create(&mut self, doc: &Tree) -> Result<usize>;

    /// See [`deserialize_component_merge`].
    ///
    /// # Errors
    ///
    /// See [`deserialize_component_merge`].
    fn deserialize_component_merge(&mut self, doc: &Tree, insert_missing: bool) -> Result<usize>;
}

impl StoreSerialize for Store {
    fn serialize_all_components(&self) -> Result<Tree> {
        snapshot::serialize_all_components(self)
    }

    fn serialize_value<T: Component>(&self, value: &T, entity: EntityId) -> Result<Tree> {
        snapshot::serialize_value(self, value, entity)
    }

    fn serialize_value_at_slot<T: Component>(
        &self,
        value: &T,
        entity: EntityId,
        slot: usize,
    ) -> Result<Tree> {
        snapshot::serialize_value_at_slot(self, value, entity, slot)
    }

    fn deserialize_component_create(&mut self, doc: &Tree) -> Result<usize> {
        restore::deserialize_component_create(self, doc)
    }

    fn deserialize_component_merge(&mut self, doc: &Tree, insert_missing: bool) -> Result<usize> {
        restore::deserialize_component_merge(self, doc, insert_missing)
    }
}
