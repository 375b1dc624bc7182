//! Tile rasterization on the CPU, powered by `vello_cpu`.

/// Render every tile under a canvas rectangle.
pub mod region;
pub(crate) mod stroke;
pub(crate) mod style;
/// Single-tile renderer and frame type.
pub mod tile;
pub(crate) mod transform;
