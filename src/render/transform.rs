use crate::foundation::core::{Point, TileAddress, TileSize};

/// Map a canvas-global point into `tile`'s pixel space.
///
/// No bounds checks: points outside `[0, size)` stay valid and get clipped by the surface.
pub fn to_local(p: Point, tile: TileAddress, size: TileSize) -> Point {
    let origin = tile.origin(size);
    Point::new(p.x - origin.x, p.y - origin.y)
}
