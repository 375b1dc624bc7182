use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{TileAddress, TileSize},
    foundation::error::{TileError, TileResult},
    scene::stroke::{Stroke, null_as_default},
};

/// Body of a render call: which tile, how big, and the strokes to paint in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tile_x: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tile_y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strokes: Vec<Stroke>,
}

impl RenderRequest {
    /// Parse a JSON request body.
    pub fn from_json(bytes: &[u8]) -> TileResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| TileError::decode(format!("invalid render request: {e}")))
    }

    pub fn from_path(path: &std::path::Path) -> TileResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn tile(&self) -> TileAddress {
        TileAddress::new(self.tile_x, self.tile_y)
    }

    /// Effective tile size, defaulted and bounded by `max`.
    pub fn size(&self, max: u16) -> TileResult<TileSize> {
        TileSize::from_wire(self.tile_size.unwrap_or(0), max)
    }
}
