//! Integration tests for Layer 0: Foundation
//!
//! Tests for the tagged tree, field encoding, component routines and errors.
