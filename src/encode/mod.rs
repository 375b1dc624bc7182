//! Serializing rendered tiles.

/// PNG encoding via the `image` crate.
pub mod png;
