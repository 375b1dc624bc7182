//! tilesnap renders one square tile of an infinite drawing canvas from a list of vector
//! strokes and encodes it as a PNG.
//!
//! - Decode a [`RenderRequest`] (or build [`Stroke`]s directly)
//! - Render with [`render_tile`] / [`render_request`] into a [`FrameRGBA`]
//! - Encode with [`encode_png`]
//!
//! Rendering is a pure function of its inputs. Malformed stroke data degrades (black color,
//! dropped point, pen-like tool) instead of failing the tile.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod scene;

/// Encoding rendered tiles.
pub mod encode;
/// CPU tile rendering.
pub mod render;
/// HTTP boundary.
pub mod server;

pub use crate::assets::color::resolve as resolve_color;
pub use crate::foundation::core::{
    BezPath, DEFAULT_TILE_SIZE, Point, Rect, Rgb, TileAddress, TileSize,
};
pub use crate::foundation::error::{TileError, TileResult};

pub use crate::encode::png::encode_png;
pub use crate::render::region::{RegionOpts, RegionTile, render_region, tiles_covering};
pub use crate::render::tile::{FrameRGBA, RenderOpts, render_request, render_tile};
pub use crate::render::transform::to_local;
pub use crate::scene::request::RenderRequest;
pub use crate::scene::stroke::{Stroke, Tool};
pub use crate::server::http::{ServerOpts, TileServer};
