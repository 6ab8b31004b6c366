//! The tagged-tree document model.
//!
//! A [`Tree`] is the in-memory form of every document the serialization
//! layer produces or consumes. It has six node kinds and no float kind:
//! floats travel as the bit pattern of an integer node of matching width.
//! Dictionaries keep insertion order, which is significant.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// A tagged-tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tree {
    /// 64-bit integer.
    Int64(i64),
    /// 32-bit integer, also carrying 32-bit float bit patterns.
    Int32(i32),
    /// Opaque binary blob, also carrying UTF-8 strings and type tags.
    Bin(Vec<u8>),
    /// Ordered key/value dictionary.
    Dict(Vec<(String, Tree)>),
    /// Ordered array.
    Array(Vec<Tree>),
    /// Object wrapper holding exactly one child.
    Obj(Box<Tree>),
}

/// The kind of a [`Tree`] node, used in error messages and schema checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// [`Tree::Int64`].
    Int64,
    /// [`Tree::Int32`].
    Int32,
    /// [`Tree::Bin`].
    Bin,
    /// [`Tree::Dict`].
    Dict,
    /// [`Tree::Array`].
    Array,
    /// [`Tree::Obj`].
    Obj,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int64 => "int64",
            Self::Int32 => "int32",
            Self::Bin => "bin",
            Self::Dict => "dict",
            Self::Array => "array",
            Self::Obj => "obj",
        })
    }
}

impl Tree {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn dict() -> Self {
        Self::Dict(Vec::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub fn array() -> Self {
        Self::Array(Vec::new())
    }

    /// Wraps a node in an object.
    #[must_use]
    pub fn obj(child: Tree) -> Self {
        Self::Obj(Box::new(child))
    }

    /// Creates a blob holding the UTF-8 bytes of `s`.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Bin(s.as_bytes().to_vec())
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> TreeKind {
        match self {
            Self::Int64(_) => TreeKind::Int64,
            Self::Int32(_) => TreeKind::Int32,
            Self::Bin(_) => TreeKind::Bin,
            Self::Dict(_) => TreeKind::Dict,
            Self::Array(_) => TreeKind::Array,
            Self::Obj(_) => TreeKind::Obj,
        }
    }

    /// Attempts to extract a 64-bit integer.
    #[must_use]
    pub const fn as_int64(&self) -> Option<i64> {
        match self {
            Self::Int64(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a 32-bit integer.
    #[must_use]
    pub const fn as_int32(&self) -> Option<i32> {
        match self {
            Self::Int32(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract blob bytes.
    #[must_use]
    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Self::Bin(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Attempts to read a blob as UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bin().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Attempts to extract dictionary entries.
    #[must_use]
    pub fn as_dict(&self) -> Option<&[(String, Tree)]> {
        match self {
            Self::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Attempts to extract array elements.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Tree]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to unwrap an object node.
    #[must_use]
    pub fn as_obj(&self) -> Option<&Tree> {
        match self {
            Self::Obj(child) => Some(child),
            _ => None,
        }
    }

    /// Looks up a key in a dictionary node.
    ///
    /// Returns `None` for non-dictionary nodes.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts into a dictionary node.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// previous value is returned. New keys are appended.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if this node is not a dictionary.
    pub fn insert(&mut self, key: impl Into<String>, value: Tree) -> Result<Option<Tree>> {
        let Self::Dict(entries) = self else {
            return Err(Error::malformed(format!(
                "cannot insert into {} node",
                self.kind()
            )));
        };
        let key = key.into();
        if let Some((_, slot)) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        entries.push((key, value));
        Ok(None)
    }

    /// Appends to an array node.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if this node is not an array.
    pub fn push(&mut self, value: Tree) -> Result<()> {
        let Self::Array(items) = self else {
            return Err(Error::malformed(format!(
                "cannot push onto {} node",
                self.kind()
            )));
        };
        items.push(value);
        Ok(())
    }

    /// Returns the number of direct children.
    ///
    /// Dictionaries and arrays report their entry count, objects report 1,
    /// scalars report 0.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dict(entries) => entries.len(),
            Self::Array(items) => items.len(),
            Self::Obj(_) => 1,
            Self::Int64(_) | Self::Int32(_) | Self::Bin(_) => 0,
        }
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<i64> for Tree {
    fn from(n: i64) -> Self {
        Self::Int64(n)
    }
}

impl From<i32> for Tree {
    fn from(n: i32) -> Self {
        Self::Int32(n)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl FromIterator<(String, Tree)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Tree)>>(iter: I) -> Self {
        Self::Dict(iter.into_iter().collect())
    }
}

impl FromIterator<Tree> for Tree {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}
