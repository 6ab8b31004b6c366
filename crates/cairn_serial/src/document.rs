//! Document shape.
//!
//! A document is a dictionary keyed by component name. Each value is one
//! section:
//!
//! ```text
//! OBJ( ARRAY[ OBJ(schema dict), OBJ( ARRAY[ id, OBJ(fields dict), id, OBJ(fields dict), ... ] ) ] )
//! ```
//!
//! The schema dict maps field name to a type tag blob. Entity IDs are
//! 64-bit integer nodes. Building never fails; parsing checks the shape and
//! reports [`ErrorKind::MalformedDocument`](cairn_foundation::ErrorKind).

use std::collections::HashSet;

use cairn_foundation::{EntityId, Error, FieldSchema, FieldType, RESERVED_PREFIX, Result, Tree};
use cairn_storage::EncodedEntry;
use tracing::trace;

/// Reserved entry key selecting a slot among one entity's same-type
/// components.
pub const CINDEX_KEY: &str = "__cindex";

// =============================================================================
// Building
// =============================================================================

/// Builds the schema header dictionary.
#[must_use]
pub fn schema_dict(schema: &[FieldSchema]) -> Tree {
    schema
        .iter()
        .map(|field| (field.name.clone(), Tree::string(field.ty.as_str())))
        .collect()
}

/// Builds one component section from a schema and encoded entries.
#[must_use]
pub fn build_section(schema: &[FieldSchema], entries: Vec<EncodedEntry>) -> Tree {
    let mut flat = Vec::with_capacity(entries.len() * 2);
    for (id, fields) in entries {
        flat.push(Tree::Int64(id.to_wire()));
        flat.push(Tree::obj(Tree::Dict(fields)));
    }
    Tree::obj(Tree::Array(vec![
        Tree::obj(schema_dict(schema)),
        Tree::obj(Tree::Array(flat)),
    ]))
}

// =============================================================================
// Parsing
// =============================================================================

/// A parsed component section, borrowing from the document.
#[derive(Debug)]
pub struct Section<'a> {
    /// Component name.
    pub name: &'a str,
    /// Schema header entries as written in the document.
    pub header: &'a [(String, Tree)],
    /// Instance entries in document order.
    pub entries: Vec<Entry<'a>>,
}

/// One instance entry of a section.
#[derive(Debug)]
pub struct Entry<'a> {
    /// Entity the entry belongs to.
    pub entity: EntityId,
    /// Field nodes, possibly including reserved keys.
    pub fields: &'a [(String, Tree)],
}

impl Entry<'_> {
    /// Returns the slot selected by `__cindex`, if present.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if `__cindex` is not a
    /// non-negative integer node.
    pub fn slot(&self) -> Result<Option<usize>> {
        let Some((_, node)) = self.fields.iter().find(|(key, _)| key == CINDEX_KEY) else {
            return Ok(None);
        };
        let raw = match node {
            Tree::Int32(n) => i64::from(*n),
            Tree::Int64(n) => *n,
            other => {
                return Err(Error::malformed(format!(
                    "{CINDEX_KEY} must be an integer, found {}",
                    other.kind()
                )));
            }
        };
        usize::try_from(raw)
            .map(Some)
            .map_err(|_| Error::malformed(format!("{CINDEX_KEY} out of range: {raw}")))
    }
}

/// Splits a document into its sections, in document order.
///
/// # Errors
///
/// Returns a malformed-document error, framed with the offending section and
/// entry, if any node is of the wrong kind or a component name appears twice.
pub fn parse_document(doc: &Tree) -> Result<Vec<Section<'_>>> {
    let sections = doc
        .as_dict()
        .ok_or_else(|| Error::malformed(format!("document root is {}, expected dict", doc.kind())))?;
    let mut seen = HashSet::with_capacity(sections.len());
    sections
        .iter()
        .map(|(name, node)| {
            if !seen.insert(name.as_str()) {
                return Err(Error::malformed(format!("duplicate section {name}")));
            }
            parse_section(name, node).map_err(|e| e.with_frame(format!("section {name}")))
        })
        .collect()
}

fn parse_section<'a>(name: &'a str, node: &'a Tree) -> Result<Section<'a>> {
    let parts = node
        .as_obj()
        .and_then(Tree::as_array)
        .ok_or_else(|| Error::malformed("section is not an object-wrapped array"))?;
    let [header, body] = parts else {
        return Err(Error::malformed(format!(
            "section has {} parts, expected schema header and entries",
            parts.len()
        )));
    };

    let header = header
        .as_obj()
        .and_then(Tree::as_dict)
        .ok_or_else(|| Error::malformed("missing schema header"))?;
    let flat = body
        .as_obj()
        .and_then(Tree::as_array)
        .ok_or_else(|| Error::malformed("missing entry array"))?;
    if flat.len() % 2 != 0 {
        return Err(Error::malformed("entry array has a dangling entity id"));
    }

    let entries = flat
        .chunks_exact(2)
        .enumerate()
        .map(|(index, pair)| {
            parse_entry(&pair[0], &pair[1]).map_err(|e| e.with_frame(format!("entry {index}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Section {
        name,
        header,
        entries,
    })
}

fn parse_entry<'a>(id: &'a Tree, fields: &'a Tree) -> Result<Entry<'a>> {
    let raw = id
        .as_int64()
        .ok_or_else(|| Error::malformed(format!("entity id is {}, expected int64", id.kind())))?;
    let fields = fields
        .as_obj()
        .and_then(Tree::as_dict)
        .ok_or_else(|| Error::malformed("entry fields are not an object-wrapped dict"))?;
    Ok(Entry {
        entity: EntityId::from_wire(raw),
        fields,
    })
}

// =============================================================================
// Validation
// =============================================================================

/// Checks a section header against a component's schema.
///
/// Header fields the schema lacks are ignored without reading their tags.
/// Returns the number ignored.
///
/// # Errors
///
/// - malformed document if a known field's tag is not a known type tag blob
/// - schema mismatch if a known field carries a different tag
pub fn check_header(
    component: &str,
    header: &[(String, Tree)],
    schema: &[FieldSchema],
) -> Result<usize> {
    let mut ignored = 0;
    for (field, node) in header {
        let Some(known) = schema.iter().find(|known| known.name == *field) else {
            trace!(component, field = field.as_str(), "ignoring unknown header field");
            ignored += 1;
            continue;
        };
        let tag = node
            .as_str()
            .ok_or_else(|| Error::malformed(format!("type tag of {field} is {}", node.kind())))?;
        let ty = FieldType::from_tag(tag)
            .ok_or_else(|| Error::malformed(format!("unknown type tag {tag:?} for {field}")))?;
        if ty != known.ty {
            return Err(Error::schema_mismatch(component, field, known.ty.as_str(), tag));
        }
    }
    Ok(ignored)
}

/// Logs entry fields that neither the schema nor the document format
/// recognizes. They are skipped during replay.
pub fn note_ignored_fields(component: &str, entry: &Entry<'_>, schema: &[FieldSchema]) {
    for (field, _) in entry.fields {
        if field.starts_with(RESERVED_PREFIX) && field != CINDEX_KEY {
            trace!(component, field = field.as_str(), entity = %entry.entity, "skipping reserved field");
        } else if !field.starts_with(RESERVED_PREFIX)
            && !schema.iter().any(|known| known.name == *field)
        {
            trace!(component, field = field.as_str(), entity = %entry.entity, "ignoring unknown field");
        }
    }
}
