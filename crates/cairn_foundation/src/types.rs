//! Primitive type tags for component fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::TreeKind;

/// Primitive type tag of a component field.
///
/// The tag's string form is what a document's schema header records for the
/// field. Several tags share a carrier node: 32-bit values travel in
/// [`TreeKind::Int32`] nodes and 64-bit values in [`TreeKind::Int64`] nodes,
/// with floats carried as their IEEE-754 bit pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    UInt64,
    /// Boolean, carried as 0 or 1.
    Bool,
    /// UTF-8 string.
    String,
}

impl FieldType {
    /// All field types, in tag order.
    pub const ALL: [FieldType; 8] = [
        Self::Float,
        Self::Double,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Bool,
        Self::String,
    ];

    /// Returns the tag string recorded in schema headers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }

    /// Parses a tag string from a schema header.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    /// Returns the tree node kind that carries values of this type.
    #[must_use]
    pub const fn carrier(self) -> TreeKind {
        match self {
            Self::Float | Self::Int32 | Self::UInt32 | Self::Bool => TreeKind::Int32,
            Self::Double | Self::Int64 | Self::UInt64 => TreeKind::Int64,
            Self::String => TreeKind::Bin,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a component type's field schema.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSchema {
    /// Field name as emitted by the component's field routine.
    pub name: String,
    /// Field type tag.
    pub ty: FieldType,
}

impl FieldSchema {
    /// Creates a field schema entry.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
