use rayon::prelude::*;

use crate::{
    encode::png::encode_png,
    foundation::core::{Point, Rect, TileAddress, TileSize},
    foundation::error::{TileError, TileResult},
    render::tile::{RenderOpts, paint_tile},
    scene::stroke::Stroke,
};

/// Default cap on the number of tiles a single region render may touch.
pub const DEFAULT_MAX_TILES: usize = 100;

/// Controls for rendering every tile under a canvas rectangle.
#[derive(Clone, Debug)]
pub struct RegionOpts {
    /// When the region covers more tiles, each axis is cut to `floor(sqrt(max_tiles))` tiles.
    pub max_tiles: usize,
    /// Override rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for RegionOpts {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            threads: None,
        }
    }
}

/// One encoded tile of a region render.
#[derive(Clone, Debug)]
pub struct RegionTile {
    pub tile: TileAddress,
    /// Number of strokes that touched the tile.
    pub strokes: usize,
    pub png: Vec<u8>,
}

/// Tiles covering `area` in column-major order (`x` outer, `y` inner).
pub fn tiles_covering(area: Rect, size: TileSize, max_tiles: usize) -> Vec<TileAddress> {
    let area = area.abs();
    let min = TileAddress::containing(Point::new(area.x0, area.y0), size);
    let max = TileAddress::containing(Point::new(area.x1, area.y1), size);

    let span_x = i128::from(max.x) - i128::from(min.x) + 1;
    let span_y = i128::from(max.y) - i128::from(min.y) + 1;

    let (mut max_x, mut max_y) = (max.x, max.y);
    if span_x.saturating_mul(span_y) > max_tiles as i128 {
        let per_axis = (max_tiles as f64).sqrt().floor() as i64;
        tracing::warn!(
            requested = %span_x.saturating_mul(span_y),
            limit = max_tiles,
            "region covers too many tiles, limiting"
        );
        if per_axis == 0 {
            return Vec::new();
        }
        max_x = max_x.min(min.x.saturating_add(per_axis - 1));
        max_y = max_y.min(min.y.saturating_add(per_axis - 1));
    }

    (min.x..=max_x)
        .flat_map(|x| (min.y..=max_y).map(move |y| TileAddress::new(x, y)))
        .collect()
}

/// Render and encode every covering tile that at least one visible stroke touches.
///
/// Strokes keep their input order inside each tile. Tiles come back in
/// [`tiles_covering`] order.
pub fn render_region(
    area: Rect,
    size: TileSize,
    strokes: &[Stroke],
    render: &RenderOpts,
    region: &RegionOpts,
) -> TileResult<Vec<RegionTile>> {
    let tiles = tiles_covering(area, size, region.max_tiles);
    let pool = build_thread_pool(region.threads)?;

    pool.install(|| {
        tiles
            .par_iter()
            .filter_map(|&tile| {
                let touching: Vec<&Stroke> = strokes
                    .iter()
                    .filter(|s| !s.hidden && s.touches(tile, size))
                    .collect();
                if touching.is_empty() {
                    return None;
                }
                let n = touching.len();
                let frame = paint_tile(tile, size, touching, render);
                Some(encode_png(&frame).map(|png| RegionTile {
                    tile,
                    strokes: n,
                    png,
                }))
            })
            .collect()
    })
}

fn build_thread_pool(threads: Option<usize>) -> TileResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TileError::validation(
            "region 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TileError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}
