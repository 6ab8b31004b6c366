//! Document to store: create and merge.

use cairn_foundation::{EntityId, Error, ErrorKind, FieldSchema, Result, Tree};
use cairn_storage::Store;
use tracing::{debug, trace};

use crate::document::{Section, check_header, note_ignored_fields, parse_document};

/// Loads every entry of `doc` into empty containers.
///
/// Containers pending a deferred clear count as empty. Every section is
/// validated before any entry is written. The store's entity counter is
/// advanced past the largest ID in the document. Returns the number of
/// components created.
///
/// # Errors
///
/// - unregistered component if a section names an unknown type
/// - schema mismatch if a header tag or a field node disagrees with the
///   component's routine
/// - container-not-empty if a target container still holds components
/// - malformed document for structural problems
///
/// A failure while writing entries leaves the entries written so far in
/// place; clear the store before retrying.
pub fn deserialize_component_create(store: &mut Store, doc: &Tree) -> Result<usize> {
    let sections = parse_document(doc).map_err(|e| e.during("create", "document"))?;

    let mut schemas = Vec::with_capacity(sections.len());
    for section in &sections {
        let schema = prepare(store, section, "create")?;
        let container = store
            .erased_by_name_mut(section.name)
            .map_err(|e| e.during("create", section.name))?;
        container.materialize_clear();
        if !container.is_empty() {
            return Err(Error::new(ErrorKind::ContainerNotEmpty(section.name.to_owned()))
                .during("create", section.name));
        }
        schemas.push(schema);
    }
    observe_highest(store, &sections);

    let mut created = 0usize;
    for (section, schema) in sections.iter().zip(&schemas) {
        let container = store
            .erased_by_name_mut(section.name)
            .map_err(|e| e.during("create", section.name))?;
        for (index, entry) in section.entries.iter().enumerate() {
            note_ignored_fields(section.name, entry, schema);
            container
                .create_entry(entry.entity, entry.fields)
                .map_err(|e| entry_error(e, index, entry.entity, "create", section.name))?;
        }
        created += section.entries.len();
    }

    debug!(sections = sections.len(), entries = created, "created components from document");
    Ok(created)
}

/// Patches live components with the fields present in `doc`.
///
/// Each target container is renormalized under the store's duplicate policy
/// before its entries are applied, so slots address compacted components.
/// Each entry targets its entity's component at the slot given by
/// `__cindex`, or slot 0. Only fields present in the entry are written.
/// When no component exists at the target, `insert_missing` decides between
/// failing and appending a default component patched with the entry; an
/// appended component leaves its container dirty until the next
/// renormalize. Returns the number of entries applied.
///
/// # Errors
///
/// - unregistered component if a section names an unknown type
/// - schema mismatch if a header tag or a field node disagrees with the
///   component's routine
/// - unknown entity if a target is absent and `insert_missing` is false, or
///   if `__cindex` skips past the entity's next free slot
/// - duplicate entity if a target container breaks the reject policy
/// - malformed document for structural problems
///
/// Entries applied before the failing one stay applied.
pub fn deserialize_component_merge(
    store: &mut Store,
    doc: &Tree,
    insert_missing: bool,
) -> Result<usize> {
    let sections = parse_document(doc).map_err(|e| e.during("merge", "document"))?;
    if insert_missing {
        observe_highest(store, &sections);
    }

    let policy = store.config().duplicates;
    let mut merged = 0usize;
    for section in &sections {
        let schema = prepare(store, section, "merge")?;
        let container = store
            .erased_by_name_mut(section.name)
            .map_err(|e| e.during("merge", section.name))?;
        container
            .renormalize(false, policy)
            .map_err(|e| e.during("merge", section.name))?;
        for (index, entry) in section.entries.iter().enumerate() {
            note_ignored_fields(section.name, entry, &schema);
            let outcome = entry
                .slot()
                .and_then(|slot| {
                    container.merge_entry(entry.entity, slot, entry.fields, insert_missing)
                })
                .map_err(|e| entry_error(e, index, entry.entity, "merge", section.name))?;
            trace!(component = section.name, entity = %entry.entity, ?outcome, "merged entry");
            merged += 1;
        }
    }

    debug!(sections = sections.len(), entries = merged, "merged document into store");
    Ok(merged)
}

fn prepare(store: &Store, section: &Section<'_>, operation: &str) -> Result<Vec<FieldSchema>> {
    let schema = store
        .schema_by_name(section.name)
        .map_err(|e| e.during(operation, section.name))?;
    check_header(section.name, section.header, schema)
        .map_err(|e| e.with_frame("schema header").during(operation, section.name))?;
    Ok(schema.to_vec())
}

fn observe_highest(store: &mut Store, sections: &[Section<'_>]) {
    let highest = sections
        .iter()
        .flat_map(|section| section.entries.iter().map(|entry| entry.entity))
        .max();
    if let Some(id) = highest {
        store.observe_entity_id(id);
    }
}

fn entry_error(err: Error, index: usize, entity: EntityId, operation: &str, name: &str) -> Error {
    err.with_frame(format!("entry {index} ({entity})"))
        .during(operation, name)
}
