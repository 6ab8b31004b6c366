//! Core types for Cairn.
//!
//! This crate provides:
//! - [`EntityId`] - Store-scoped entity identifiers
//! - [`Error`] - Error kinds with operation context
//! - [`FieldType`] / [`FieldSchema`] - Primitive type tags for component fields
//! - [`Tree`] - The tagged-tree document model
//! - [`Component`] / [`FieldSink`] - The single field routine that drives
//!   schema capture, encoding, and decoding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod component;
pub mod entity;
pub mod error;
pub mod field;
pub mod tree;
pub mod types;

pub use component::{
    Component, FieldSink, RESERVED_PREFIX, capture_schema, decode_fields, encode_fields,
};
pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind};
pub use field::FieldValue;
pub use tree::{Tree, TreeKind};
pub use types::{FieldSchema, FieldType};

/// Result type alias using the Cairn [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
