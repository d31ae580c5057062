use geo::{Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Map coordinate as (longitude, latitude) or planar (x, y)
pub type Coordinate = Coord<f64>;

/// Geometry produced by a drawing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawnGeometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
    Circle {
        center: Coordinate,
        radius: f64,
    },
}

impl DrawnGeometry {
    /// Get the geometry kind as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
            Self::Circle { .. } => "Circle",
        }
    }

    /// Exterior ring of a polygon, if this is one
    pub fn exterior(&self) -> Option<&LineString<f64>> {
        match self {
            Self::Polygon(polygon) => Some(polygon.exterior()),
            _ => None,
        }
    }
}

/// Closed regular polygon inscribed in the circle spanned by `center` and `edge`.
///
/// The first vertex lies on `edge`, the remaining ones follow counter-clockwise
/// every `2π / sides` radians. The ring is closed by repeating the first vertex.
pub fn regular_polygon(center: Coordinate, edge: Coordinate, sides: usize) -> Polygon<f64> {
    let dx = edge.x - center.x;
    let dy = edge.y - center.y;
    let radius = dx.hypot(dy);
    let start_angle = dy.atan2(dx);

    let ring: Vec<Coordinate> = (0..=sides)
        .map(|i| {
            let angle = start_angle + ((i % sides.max(1)) as f64) * 2.0 * PI / sides.max(1) as f64;
            Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();

    Polygon::new(LineString::new(ring), Vec::new())
}

/// Axis-aligned rectangle spanned by two opposite corners.
///
/// Ring order is `[start, (start.x, end.y), end, (end.x, start.y), start]`.
pub fn box_polygon(start: Coordinate, end: Coordinate) -> Polygon<f64> {
    let ring = vec![
        start,
        Coord { x: start.x, y: end.y },
        end,
        Coord { x: end.x, y: start.y },
        start,
    ];
    Polygon::new(LineString::new(ring), Vec::new())
}
