//! Flattening documents to bytes and parsing them back, using `MessagePack`.

use cairn_foundation::{Error, Result, Tree};

/// Flattens a document into an owned byte buffer.
///
/// # Errors
///
/// Returns a codec error if encoding fails.
pub fn flatten(doc: &Tree) -> Result<Vec<u8>> {
    rmp_serde::to_vec(doc).map_err(|e| Error::codec(e.to_string()))
}

/// Parses a byte buffer produced by [`flatten`].
///
/// # Errors
///
/// Returns a codec error if the bytes are not a valid document.
pub fn parse(bytes: &[u8]) -> Result<Tree> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::codec(e.to_string()))
}
