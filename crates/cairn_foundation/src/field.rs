//! Conversion between primitive field values and tree nodes.

use crate::tree::Tree;
use crate::types::FieldType;

/// A primitive value a component field routine can expose.
///
/// Each implementation names its [`FieldType`] tag and how it maps onto the
/// tag's carrier node.
pub trait FieldValue: Sized {
    /// Type tag recorded in schema headers.
    const TYPE: FieldType;

    /// Encodes the value into its carrier node.
    fn encode(&self) -> Tree;

    /// Decodes a carrier node, returning `None` on a kind mismatch.
    fn decode(node: &Tree) -> Option<Self>;
}

impl FieldValue for f32 {
    const TYPE: FieldType = FieldType::Float;

    #[allow(clippy::cast_possible_wrap)]
    fn encode(&self) -> Tree {
        Tree::Int32(self.to_bits() as i32)
    }

    #[allow(clippy::cast_sign_loss)]
    fn decode(node: &Tree) -> Option<Self> {
        node.as_int32().map(|bits| f32::from_bits(bits as u32))
    }
}

impl FieldValue for f64 {
    const TYPE: FieldType = FieldType::Double;

    #[allow(clippy::cast_possible_wrap)]
    fn encode(&self) -> Tree {
        Tree::Int64(self.to_bits() as i64)
    }

    #[allow(clippy::cast_sign_loss)]
    fn decode(node: &Tree) -> Option<Self> {
        node.as_int64().map(|bits| f64::from_bits(bits as u64))
    }
}

impl FieldValue for i32 {
    const TYPE: FieldType = FieldType::Int32;

    fn encode(&self) -> Tree {
        Tree::Int32(*self)
    }

    fn decode(node: &Tree) -> Option<Self> {
        node.as_int32()
    }
}

impl FieldValue for u32 {
    const TYPE: FieldType = FieldType::UInt32;

    #[allow(clippy::cast_possible_wrap)]
    fn encode(&self) -> Tree {
        Tree::Int32(*self as i32)
    }

    #[allow(clippy::cast_sign_loss)]
    fn decode(node: &Tree) -> Option<Self> {
        node.as_int32().map(|n| n as u32)
    }
}

impl FieldValue for i64 {
    const TYPE: FieldType = FieldType::Int64;

    fn encode(&self) -> Tree {
        Tree::Int64(*self)
    }

    fn decode(node: &Tree) -> Option<Self> {
        node.as_int64()
    }
}

impl FieldValue for u64 {
    const TYPE: FieldType = FieldType::UInt64;

    #[allow(clippy::cast_possible_wrap)]
    fn encode(&self) -> Tree {
        Tree::Int64(*self as i64)
    }

    #[allow(clippy::cast_sign_loss)]
    fn decode(node: &Tree) -> Option<Self> {
        node.as_int64().map(|n| n as u64)
    }
}

impl FieldValue for bool {
    const TYPE: FieldType = FieldType::Bool;

    fn encode(&self) -> Tree {
        Tree::Int32(i32::from(*self))
    }

    fn decode(node: &Tree) -> Option<Self> {
        node.as_int32().map(|n| n != 0)
    }
}

impl FieldValue for String {
    const TYPE: FieldType = FieldType::String;

    fn encode(&self) -> Tree {
        Tree::string(self)
    }

    fn decode(node: &Tree) -> Option<Self> {
        node.as_str().map(str::to_owned)
    }
}
