//! Store to document.

use cairn_foundation::{Component, EntityId, Error, Result, Tree, encode_fields};
use cairn_storage::Store;
use tracing::debug;

use crate::document::{CINDEX_KEY, build_section};

/// Serializes every registered component type, in ascending ordinal order.
///
/// Each type's schema is captured from its first stored component the first
/// time it is needed; every component is checked against it. The store
/// should be renormalized so entries come out in ascending entity order.
///
/// # Errors
///
/// Returns a schema mismatch if a component's field routine diverges from
/// its type's first-observed schema.
pub fn serialize_all_components(store: &Store) -> Result<Tree> {
    let mut doc = Tree::dict();
    let mut total = 0usize;

    for descriptor in store.registry().iter() {
        let name = descriptor.name();
        let (section, count) =
            encode_section(store, name).map_err(|e| e.during("snapshot", name))?;
        total += count;
        doc.insert(name, section)?;
    }

    debug!(types = doc.len(), entries = total, "serialized store");
    Ok(doc)
}

fn encode_section(store: &Store, name: &str) -> Result<(Tree, usize)> {
    let schema = store.schema_by_name(name)?;
    let entries = store.erased_by_name(name)?.encode_entries(schema)?;
    let count = entries.len();
    Ok((build_section(schema, entries), count))
}

/// Serializes one value as a single-entry document addressed to `entity`.
///
/// The result has the shape of a full snapshot restricted to `T` and one
/// entry. The store's components are not read.
///
/// # Errors
///
/// Returns not-registered if `T` is not registered, or a schema mismatch if
/// `value` diverges from `T`'s schema.
pub fn serialize_value<T: Component>(store: &Store, value: &T, entity: EntityId) -> Result<Tree> {
    single_entry(store, value, entity, None)
}

/// Like [`serialize_value`], but the entry carries `__cindex` so a merge
/// patches the entity's `slot`-th component of type `T`.
///
/// # Errors
///
/// Same as [`serialize_value`].
pub fn serialize_value_at_slot<T: Component>(
    store: &Store,
    value: &T,
    entity: EntityId,
    slot: usize,
) -> Result<Tree> {
    single_entry(store, value, entity, Some(slot))
}

fn single_entry<T: Component>(
    store: &Store,
    value: &T,
    entity: EntityId,
    slot: Option<usize>,
) -> Result<Tree> {
    store.registry().ordinal_of::<T>()?;
    let schema = store
        .schema_by_name(T::NAME)
        .map_err(|e| e.during("serialize value", T::NAME))?;
    let mut fields =
        encode_fields(value, Some(schema)).map_err(|e| e.during("serialize value", T::NAME))?;

    if let Some(slot) = slot {
        let slot = i64::try_from(slot)
            .map_err(|_| Error::malformed(format!("{CINDEX_KEY} out of range: {slot}")))?;
        fields.push((CINDEX_KEY.to_owned(), Tree::Int64(slot)));
    }

    let mut doc = Tree::dict();
    doc.insert(T::NAME, build_section(schema, vec![(entity, fields)]))?;
    Ok(doc)
}
