use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::core::{Point, TileAddress, TileSize};

/// Drawing tool tag as sent on the wire.
///
/// Only the eraser is special. Every other name, including ones we have never seen, is a
/// pen-like tool that paints with the stroke's declared color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tool {
    Eraser,
    Other(String),
}

impl Tool {
    pub const ERASER: &'static str = "eraser";

    pub fn is_eraser(&self) -> bool {
        matches!(self, Self::Eraser)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Eraser => Self::ERASER,
            Self::Other(name) => name,
        }
    }
}

impl Default for Tool {
    fn default() -> Self {
        Self::Other("pen".to_owned())
    }
}

impl From<String> for Tool {
    fn from(name: String) -> Self {
        if name == Self::ERASER {
            Self::Eraser
        } else {
            Self::Other(name)
        }
    }
}

impl From<&str> for Tool {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::Eraser => Tool::ERASER.to_owned(),
            Tool::Other(name) => name,
        }
    }
}

/// One freehand mark on the canvas.
///
/// `points` keeps the raw JSON entries so a single malformed point can be dropped without
/// rejecting the whole request; see [`Stroke::points`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, alias = "timestamp", deserialize_with = "null_as_default")]
    pub ts: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool: Tool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: f64,
    #[serde(default, rename = "points", deserialize_with = "null_as_default")]
    pub raw_points: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden: bool,
}

impl Stroke {
    /// Build a stroke from already-numeric points.
    pub fn new(tool: impl Into<Tool>, color: impl Into<String>, width: f64, points: &[Point]) -> Self {
        Self {
            tool: tool.into(),
            color: color.into(),
            width,
            raw_points: points
                .iter()
                .map(|p| serde_json::json!([p.x, p.y]))
                .collect(),
            ..Self::default()
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Usable points in path order. Malformed entries are skipped.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.raw_points.iter().filter_map(parse_point)
    }

    /// Return `true` when any usable point falls inside `tile`.
    pub fn touches(&self, tile: TileAddress, size: TileSize) -> bool {
        self.points().any(|p| tile.contains(p, size))
    }
}

/// Deserialize an explicit JSON `null` as `T::default()`, the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Decode one wire point: an array whose first two entries are numbers.
///
/// Extra trailing entries (pressure, tilt, ...) are ignored.
pub(crate) fn parse_point(v: &serde_json::Value) -> Option<Point> {
    let arr = v.as_array()?;
    let x = arr.first()?.as_f64()?;
    let y = arr.get(1)?.as_f64()?;
    Some(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_eraser_is_the_only_special_name() {
        assert_eq!(Tool::from("eraser"), Tool::Eraser);
        assert_eq!(Tool::from("pen"), Tool::Other("pen".into()));
        assert_eq!(Tool::from("Eraser"), Tool::Other("Eraser".into()));
        assert_eq!(
            Tool::from("laser-pointer-3000"),
            Tool::Other("laser-pointer-3000".into())
        );
        assert!(Tool::from("eraser").is_eraser());
        assert!(!Tool::default().is_eraser());
    }

    #[test]
    fn tool_round_trips_as_plain_string() {
        let t: Tool = serde_json::from_value(json!("eraser")).unwrap();
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("eraser"));
        let t: Tool = serde_json::from_value(json!("chalk")).unwrap();
        assert_eq!(t.name(), "chalk");
    }

    #[test]
    fn stroke_decodes_wire_shape() {
        let s: Stroke = serde_json::from_value(json!({
            "id": "s1",
            "ts": 1700000000000u64,
            "tool": "pen",
            "color": "#112233",
            "width": 3,
            "points": [[0, 0], [1.5, 2.5]],
            "authorId": "u1",
            "hidden": false
        }))
        .unwrap();

        assert_eq!(s.id, "s1");
        assert_eq!(s.tool, Tool::Other("pen".into()));
        assert_eq!(s.width, 3.0);
        assert_eq!(s.author_id.as_deref(), Some("u1"));
        let pts: Vec<_> = s.points().collect();
        assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(1.5, 2.5)]);
    }

    #[test]
    fn stroke_fields_default_when_absent() {
        let s: Stroke = serde_json::from_value(json!({ "timestamp": 5 })).unwrap();
        assert_eq!(s.ts, 5.0);
        assert_eq!(s.tool, Tool::default());
        assert!(s.color.is_empty());
        assert!(!s.hidden);
        assert_eq!(s.points().count(), 0);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let s: Stroke = serde_json::from_value(json!({
            "id": null,
            "ts": null,
            "tool": null,
            "color": null,
            "width": null,
            "points": null,
            "authorId": null,
            "hidden": null
        }))
        .unwrap();
        assert_eq!(s, Stroke::default());
        assert_eq!(s.tool, Tool::default());
    }

    #[test]
    fn malformed_points_are_dropped_individually() {
        let s: Stroke = serde_json::from_value(json!({
            "points": [[1, 2], [3], "x", null, ["a", 4], [5, "b"], {}, [6, 7, 0.5], [8e0, -9]]
        }))
        .unwrap();
        let pts: Vec<_> = s.points().collect();
        assert_eq!(
            pts,
            vec![
                Point::new(1.0, 2.0),
                Point::new(6.0, 7.0),
                Point::new(8.0, -9.0)
            ]
        );
    }

    #[test]
    fn touches_checks_half_open_tile_bounds() {
        let size = TileSize::new(10).unwrap();
        let s = Stroke::new("pen", "#000000", 1.0, &[Point::new(15.0, 5.0)]);
        assert!(s.touches(TileAddress::new(1, 0), size));
        assert!(!s.touches(TileAddress::new(0, 0), size));

        let edge = Stroke::new("pen", "#000000", 1.0, &[Point::new(10.0, 10.0)]);
        assert!(edge.touches(TileAddress::new(1, 1), size));
        assert!(!edge.touches(TileAddress::new(0, 0), size));
    }
}
