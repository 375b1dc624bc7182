use vello_cpu::peniko::Color;

use crate::{
    foundation::core::{Rect, TileAddress, TileSize},
    foundation::error::TileResult,
    render::stroke,
    scene::{request::RenderRequest, stroke::Stroke},
};

/// Largest tile edge accepted by default.
pub const DEFAULT_MAX_TILE_SIZE: u16 = 4096;

/// A rendered tile as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of pixel `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Renderer knobs shared by every tile.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Requests asking for a larger tile are rejected.
    pub max_tile_size: u16,
    /// Style pen-like tools by name (opacity, caps, dashes) instead of a plain round line.
    pub brush_styles: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            max_tile_size: DEFAULT_MAX_TILE_SIZE,
            brush_styles: false,
        }
    }
}

/// Render a decoded request. Only an out-of-range `tileSize` fails.
pub fn render_request(req: &RenderRequest, opts: &RenderOpts) -> TileResult<FrameRGBA> {
    let size = req.size(opts.max_tile_size)?;
    Ok(render_tile(req.tile(), size, &req.strokes, opts))
}

/// Paint `strokes` in order over a white `size × size` surface.
#[tracing::instrument(skip(size, strokes, opts), fields(size = size.get(), strokes = strokes.len()))]
pub fn render_tile(
    tile: TileAddress,
    size: TileSize,
    strokes: &[Stroke],
    opts: &RenderOpts,
) -> FrameRGBA {
    paint_tile(tile, size, strokes, opts)
}

pub(crate) fn paint_tile<'a>(
    tile: TileAddress,
    size: TileSize,
    strokes: impl IntoIterator<Item = &'a Stroke>,
    opts: &RenderOpts,
) -> FrameRGBA {
    let px = size.get();
    let edge = size.as_f64();

    let mut ctx = vello_cpu::RenderContext::new(px, px);
    ctx.set_paint(Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_rect(&Rect::new(0.0, 0.0, edge, edge));

    for s in strokes {
        stroke::paint(&mut ctx, s, tile, size, opts);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(px, px);
    ctx.render_to_pixmap(&mut pixmap);

    FrameRGBA {
        width: u32::from(px),
        height: u32::from(px),
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn size(px: u16) -> TileSize {
        TileSize::new(px).unwrap()
    }

    fn pen(color: &str, width: f64, points: &[(f64, f64)]) -> Stroke {
        let pts: Vec<_> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Stroke::new("pen", color, width, &pts)
    }

    #[test]
    fn empty_tile_is_white_and_square() {
        let f = render_tile(TileAddress::default(), size(8), &[], &RenderOpts::default());
        assert_eq!((f.width, f.height), (8, 8));
        assert_eq!(f.data.len(), 8 * 8 * 4);
        assert!(f.data.chunks_exact(4).all(|px| px == WHITE));
    }

    #[test]
    fn default_size_when_request_omits_it() {
        let req = RenderRequest::default();
        let f = render_request(&req, &RenderOpts::default()).unwrap();
        assert_eq!((f.width, f.height), (512, 512));
    }

    #[test]
    fn oversized_request_is_rejected() {
        let req = RenderRequest {
            tile_size: Some(64),
            ..Default::default()
        };
        let opts = RenderOpts {
            max_tile_size: 32,
            ..Default::default()
        };
        assert!(render_request(&req, &opts).is_err());
    }

    #[test]
    fn pen_stroke_darkens_pixels_on_its_path() {
        let s = pen("#000000", 2.0, &[(0.0, 8.0), (16.0, 8.0)]);
        let f = render_tile(TileAddress::default(), size(16), &[s], &RenderOpts::default());
        let [r, g, b, _] = f.pixel(8, 8).unwrap();
        assert!(r < 64 && g < 64 && b < 64, "{:?}", f.pixel(8, 8));
        assert_eq!(f.pixel(8, 2).unwrap(), WHITE);
    }

    #[test]
    fn later_strokes_paint_over_earlier_ones() {
        let red = pen("#FF0000", 4.0, &[(0.0, 8.0), (16.0, 8.0)]);
        let blue = pen("#0000FF", 4.0, &[(8.0, 0.0), (8.0, 16.0)]);
        let f = render_tile(
            TileAddress::default(),
            size(16),
            &[red, blue],
            &RenderOpts::default(),
        );
        let [r, _, b, _] = f.pixel(8, 8).unwrap();
        assert!(b > 200 && r < 50, "{:?}", f.pixel(8, 8));
    }

    #[test]
    fn hidden_strokes_do_not_change_pixels() {
        let visible = pen("#00FF00", 3.0, &[(1.0, 1.0), (14.0, 14.0)]);
        let hidden = pen("#FF0000", 6.0, &[(0.0, 8.0), (16.0, 8.0)]).hidden(true);
        let opts = RenderOpts::default();

        let a = render_tile(TileAddress::default(), size(16), &[visible.clone()], &opts);
        let b = render_tile(
            TileAddress::default(),
            size(16),
            &[hidden.clone(), visible, hidden],
            &opts,
        );
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn brush_styles_make_highlighter_translucent() {
        let mut s = pen("#000000", 4.0, &[(0.0, 8.0), (16.0, 8.0)]);
        s.tool = "highlighter".into();
        let opts = RenderOpts {
            brush_styles: true,
            ..Default::default()
        };
        let f = render_tile(TileAddress::default(), size(16), &[s.clone()], &opts);
        let [r, _, _, a] = f.pixel(8, 8).unwrap();
        assert_eq!(a, 255);
        assert!(r > 100 && r < 200, "{r}");

        let plain = render_tile(TileAddress::default(), size(16), &[s], &RenderOpts::default());
        assert!(plain.pixel(8, 8).unwrap()[0] < 64);
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let f = render_tile(TileAddress::default(), size(2), &[], &RenderOpts::default());
        assert!(f.pixel(2, 0).is_none());
        assert!(f.pixel(0, 2).is_none());
        assert_eq!(f.pixel(1, 1), Some(WHITE));
    }
}
