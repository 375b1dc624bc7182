use vello_cpu::kurbo::{Cap, Join, Stroke as StrokeStyle};

use crate::scene::stroke::Tool;

/// Per-tool line styling, used when brush styles are enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushStyle {
    pub opacity: f64,
    pub cap: Cap,
    pub join: Join,
    pub dash: &'static [f64],
}

impl Default for BrushStyle {
    /// Opaque, round caps and joins, solid.
    fn default() -> Self {
        Self {
            opacity: 1.0,
            cap: Cap::Round,
            join: Join::Round,
            dash: &[],
        }
    }
}

impl BrushStyle {
    pub fn for_tool(tool: &Tool) -> Self {
        let base = Self::default();
        match tool.name() {
            "brush" => Self {
                opacity: 0.8,
                ..base
            },
            "marker" => Self {
                opacity: 0.7,
                cap: Cap::Square,
                join: Join::Miter,
                ..base
            },
            "highlighter" => Self {
                opacity: 0.4,
                ..base
            },
            "pencil" => Self {
                opacity: 0.9,
                ..base
            },
            "chalk" => Self {
                opacity: 0.85,
                dash: &[5.0, 5.0],
                ..base
            },
            // pen, eraser and anything unknown
            _ => base,
        }
    }

    /// Stroke parameters for a line of `width` pixels. The width is not validated.
    pub fn stroke(&self, width: f64) -> StrokeStyle {
        let stroke = StrokeStyle::new(width)
            .with_caps(self.cap)
            .with_join(self.join);
        if self.dash.is_empty() {
            stroke
        } else {
            stroke.with_dashes(0.0, self.dash.iter().copied())
        }
    }
}
