use vello_cpu::peniko::Color;

use crate::{
    assets::color,
    foundation::core::{BezPath, Rgb, TileAddress, TileSize},
    render::{style::BrushStyle, tile::RenderOpts, transform::to_local},
    scene::stroke::Stroke,
};

/// Paint one stroke onto `ctx` as an anti-aliased polyline.
///
/// Hidden strokes and strokes with fewer than two usable points leave the surface untouched.
/// The eraser paints opaque white whatever its declared color.
pub fn paint(
    ctx: &mut vello_cpu::RenderContext,
    stroke: &Stroke,
    tile: TileAddress,
    size: TileSize,
    opts: &RenderOpts,
) {
    if stroke.hidden {
        return;
    }

    let Some(path) = local_path(stroke, tile, size) else {
        tracing::debug!(id = %stroke.id, "stroke has fewer than 2 usable points");
        return;
    };

    let (rgb, style) = if stroke.tool.is_eraser() {
        (Rgb::WHITE, BrushStyle::default())
    } else if opts.brush_styles {
        (color::resolve(&stroke.color), BrushStyle::for_tool(&stroke.tool))
    } else {
        (color::resolve(&stroke.color), BrushStyle::default())
    };

    let [r, g, b, a] = rgb.to_rgba8(style.opacity);
    ctx.set_paint(Color::from_rgba8(r, g, b, a));
    ctx.set_stroke(style.stroke(stroke.width));
    ctx.stroke_path(&path);
}

/// Build the tile-local polyline, transforming each point on its own.
fn local_path(stroke: &Stroke, tile: TileAddress, size: TileSize) -> Option<BezPath> {
    let mut points = stroke.points().map(|p| to_local(p, tile, size));
    let first = points.next()?;

    let mut path = BezPath::new();
    path.move_to(first);
    let mut segments = 0usize;
    for p in points {
        path.line_to(p);
        segments += 1;
    }

    (segments > 0).then_some(path)
}

#[cfg(test)]
mod tests {
    use vello_cpu::kurbo::PathEl;

    use super::*;
    use crate::foundation::core::Point;
    use serde_json::json;

    fn size(px: u16) -> TileSize {
        TileSize::new(px).unwrap()
    }

    #[test]
    fn path_is_built_in_point_order_in_local_space() {
        let s = Stroke::new(
            "pen",
            "#000000",
            1.0,
            &[
                Point::new(15.0, 5.0),
                Point::new(18.0, 2.0),
                Point::new(11.0, 9.0),
            ],
        );
        let path = local_path(&s, TileAddress::new(1, 0), size(10)).unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(5.0, 5.0)),
                PathEl::LineTo(Point::new(8.0, 2.0)),
                PathEl::LineTo(Point::new(1.0, 9.0)),
            ]
        );
    }

    #[test]
    fn fewer_than_two_usable_points_yield_no_path() {
        let empty = Stroke::new("pen", "#000000", 1.0, &[]);
        assert!(local_path(&empty, TileAddress::default(), size(4)).is_none());

        let single = Stroke::new("pen", "#000000", 1.0, &[Point::new(1.0, 1.0)]);
        assert!(local_path(&single, TileAddress::default(), size(4)).is_none());

        let mut mostly_bad = single.clone();
        mostly_bad.raw_points = vec![json!([1, 1]), json!(["x", 2]), json!([3])];
        assert!(local_path(&mostly_bad, TileAddress::default(), size(4)).is_none());
    }
}
