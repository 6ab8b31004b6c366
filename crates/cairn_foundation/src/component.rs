//! The component trait and its field visitor.
//!
//! A component exposes its data through one routine, [`Component::fields`],
//! which calls [`FieldSink::field`] once per field in a fixed order. The same
//! routine is driven by three sinks:
//!
//! - schema capture records each `(name, type tag)` pair in call order
//! - encoding records each `(name, encoded node)` pair, optionally checking
//!   every field against a previously captured schema
//! - decoding overwrites each field whose name is present in a field list,
//!   leaving the others untouched
//!
//! Field names starting with [`RESERVED_PREFIX`] belong to the document
//! format and may not be emitted by a component.

use crate::error::Error;
use crate::field::FieldValue;
use crate::tree::Tree;
use crate::types::FieldSchema;
use crate::Result;

/// Prefix of field names reserved for document bookkeeping (e.g. `__cindex`).
pub const RESERVED_PREFIX: &str = "__";

/// A plain data value that can be stored, walked and serialized.
///
/// # Example
///
/// ```
/// use cairn_foundation::{Component, FieldSink, Result};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Gameplay {
///     health: i32,
///     armor: i32,
/// }
///
/// impl Component for Gameplay {
///     const NAME: &'static str = "render:Gameplay";
///
///     fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
///         sink.field("health", &mut self.health)?;
///         sink.field("armor", &mut self.armor)
///     }
/// }
/// ```
pub trait Component: Clone + Default + 'static {
    /// Globally unique, namespaced type name (e.g. `"render:Position"`).
    const NAME: &'static str;

    /// Visits every field in a fixed order.
    ///
    /// # Errors
    ///
    /// Propagates whatever the sink reports; implementations should use `?`
    /// on each call and return the last call's result.
    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()>;
}

enum Mode<'a> {
    Schema(&'a mut Vec<FieldSchema>),
    Encode {
        out: &'a mut Vec<(String, Tree)>,
        expected: Option<&'a [FieldSchema]>,
    },
    Decode(&'a [(String, Tree)]),
}

/// Visitor handed to [`Component::fields`].
pub struct FieldSink<'a> {
    component: &'static str,
    mode: Mode<'a>,
    applied: usize,
}

impl FieldSink<'_> {
    /// Visits one field.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ReservedField`](crate::ErrorKind::ReservedField) if
    ///   `name` starts with [`RESERVED_PREFIX`]
    /// - [`ErrorKind::SchemaMismatch`](crate::ErrorKind::SchemaMismatch) if
    ///   the field disagrees with the expected schema while encoding, or the
    ///   node found while decoding is of the wrong kind
    pub fn field<T: FieldValue>(&mut self, name: &str, value: &mut T) -> Result<()> {
        let component = self.component;
        if name.starts_with(RESERVED_PREFIX) {
            return Err(Error::reserved_field(component, name));
        }

        match &mut self.mode {
            Mode::Schema(out) => out.push(FieldSchema::new(name, T::TYPE)),
            Mode::Encode { out, expected } => {
                if let Some(schema) = expected {
                    match schema.get(out.len()) {
                        Some(want) if want.name == name && want.ty == T::TYPE => {}
                        Some(want) => {
                            return Err(Error::schema_mismatch(
                                component,
                                &want.name,
                                want.ty.as_str(),
                                format!("{name}: {}", T::TYPE),
                            ));
                        }
                        None => {
                            return Err(Error::schema_mismatch(
                                component,
                                name,
                                "no field",
                                T::TYPE.as_str(),
                            ));
                        }
                    }
                }
                out.push((name.to_owned(), value.encode()));
            }
            Mode::Decode(fields) => {
                if let Some((_, node)) = fields.iter().find(|(key, _)| key == name) {
                    *value = T::decode(node).ok_or_else(|| {
                        Error::schema_mismatch(
                            component,
                            name,
                            T::TYPE.as_str(),
                            node.kind().to_string(),
                        )
                    })?;
                    self.applied += 1;
                }
            }
        }
        Ok(())
    }
}

/// Records the `(name, type tag)` sequence `value`'s field routine emits.
///
/// # Errors
///
/// Returns an error if the routine emits a reserved field name.
pub fn capture_schema<T: Component>(value: &T) -> Result<Vec<FieldSchema>> {
    let mut schema = Vec::new();
    let mut sink = FieldSink {
        component: T::NAME,
        mode: Mode::Schema(&mut schema),
        applied: 0,
    };
    value.clone().fields(&mut sink)?;
    Ok(schema)
}

/// Encodes `value` into an ordered `(name, node)` list.
///
/// When `expected` is given, every emitted field must match the schema entry
/// at the same position, and the routine must emit exactly as many fields.
///
/// # Errors
///
/// Returns a schema mismatch if the emitted fields diverge from `expected`,
/// or a reserved-field error.
pub fn encode_fields<T: Component>(
    value: &T,
    expected: Option<&[FieldSchema]>,
) -> Result<Vec<(String, Tree)>> {
    let mut out = Vec::new();
    let mut sink = FieldSink {
        component: T::NAME,
        mode: Mode::Encode {
            out: &mut out,
            expected,
        },
        applied: 0,
    };
    value.clone().fields(&mut sink)?;

    if let Some(missing) = expected.and_then(|schema| schema.get(out.len())) {
        return Err(Error::schema_mismatch(
            T::NAME,
            &missing.name,
            missing.ty.as_str(),
            "no field",
        ));
    }
    Ok(out)
}

/// Overwrites the fields of `value` that appear in `fields`.
///
/// Fields the routine visits but `fields` lacks keep their current value.
/// Entries in `fields` the routine never visits are ignored. Returns the
/// number of fields applied.
///
/// # Errors
///
/// Returns a schema mismatch if a present node has the wrong kind. Fields
/// visited before the failing one have already been written.
pub fn decode_fields<T: Component>(value: &mut T, fields: &[(String, Tree)]) -> Result<usize> {
    let mut sink = FieldSink {
        component: T::NAME,
        mode: Mode::Decode(fields),
        applied: 0,
    };
    value.fields(&mut sink)?;
    Ok(sink.applied)
}
