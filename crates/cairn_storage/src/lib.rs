//! Type registry, component containers, and the entity/component store.
//!
//! This crate provides:
//! - [`TypeRegistry`] - Registration-order ordinals and lazily captured schemas
//! - [`Container`] - Per-type `(entity, value)` storage with deferred sorting
//! - [`Store`] - Entity allocation, containers, renormalize and clear
//! - [`StoreConfig`] - Duplicate policy and preallocation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod container;
pub mod registry;
pub mod store;

pub use config::{DuplicatePolicy, StoreConfig};
pub use container::{AnyContainer, Container, EncodedEntry, MergeOutcome};
pub use registry::{ComponentDescriptor, Ordinal, TypeRegistry};
pub use store::Store;
