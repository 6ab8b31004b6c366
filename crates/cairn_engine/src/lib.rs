//! System execution for Cairn.
//!
//! This crate provides:
//! - [`merge_join`] - Type-agnostic lock-step join over sorted entity columns
//! - [`Query`] - Tuples of component types resolved to store columns
//! - [`System`] - A callback over every entity holding all of a query's types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod join;
pub mod query;
pub mod system;

pub use join::merge_join;
pub use query::{Column, Query};
pub use system::System;
