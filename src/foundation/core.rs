use crate::foundation::error::{TileError, TileResult};

pub use vello_cpu::kurbo::{BezPath, Point, Rect};

/// Edge length used when a request omits `tileSize` or sends a non-positive one.
pub const DEFAULT_TILE_SIZE: u16 = 512;

/// Offset that keeps packed tile ids positive for negative grid coordinates.
const TILE_ID_OFFSET: i64 = 500_000;

/// Integer grid coordinates of a tile on the infinite canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileAddress {
    /// Column, grows to the right.
    pub x: i64,
    /// Row, grows downwards.
    pub y: i64,
}

impl TileAddress {
    /// Create a tile address from grid coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The tile that contains canvas point `p` (floor division, so negative space works).
    pub fn containing(p: Point, size: TileSize) -> Self {
        let s = size.as_f64();
        Self {
            x: (p.x / s).floor() as i64,
            y: (p.y / s).floor() as i64,
        }
    }

    /// Canvas-space position of the tile's top-left pixel.
    pub fn origin(self, size: TileSize) -> Point {
        let s = size.as_f64();
        Point::new(self.x as f64 * s, self.y as f64 * s)
    }

    /// Canvas-space bounds, treated as half-open `[x0, x1) × [y0, y1)`.
    pub fn bounds(self, size: TileSize) -> Rect {
        let o = self.origin(size);
        let s = size.as_f64();
        Rect::new(o.x, o.y, o.x + s, o.y + s)
    }

    /// Return `true` when `p` lies in this tile's half-open bounds.
    pub fn contains(self, p: Point, size: TileSize) -> bool {
        let b = self.bounds(size);
        p.x >= b.x0 && p.x < b.x1 && p.y >= b.y0 && p.y < b.y1
    }

    /// Packed numeric id, `(x + 500000) * 1000000 + (y + 500000)`.
    ///
    /// `None` when the packing overflows `i64`.
    pub fn id(self) -> Option<i64> {
        self.x
            .checked_add(TILE_ID_OFFSET)?
            .checked_mul(1_000_000)?
            .checked_add(self.y.checked_add(TILE_ID_OFFSET)?)
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Edge length of a square tile in pixels. Always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileSize(u16);

impl TileSize {
    /// Normalize a wire value: anything `<= 0` becomes [`DEFAULT_TILE_SIZE`].
    ///
    /// Values above `max` (or above `u16::MAX`) are rejected.
    pub fn from_wire(raw: i64, max: u16) -> TileResult<Self> {
        if raw <= 0 {
            return Ok(Self::default());
        }
        match u16::try_from(raw) {
            Ok(v) if v <= max => Ok(Self(v)),
            _ => Err(TileError::validation(format!(
                "tileSize {raw} exceeds the limit of {max}"
            ))),
        }
    }

    /// Create a tile size from a non-zero edge length.
    pub fn new(px: u16) -> Option<Self> {
        (px > 0).then_some(Self(px))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self(DEFAULT_TILE_SIZE)
    }
}

/// Normalized sRGB color, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Quantize to 8-bit channels with `alpha` in `[0, 1]`.
    pub fn to_rgba8(self, alpha: f64) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(alpha)]
    }
}
