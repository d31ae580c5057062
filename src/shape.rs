use crate::geometry::{box_polygon, regular_polygon, Coordinate, DrawnGeometry};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while interpreting a shape request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Unsupported shape type: {0}")]
    Unsupported(String),
}

/// Shape a user can ask to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Point,
    LineString,
    Polygon,
    Circle,
    /// Four-sided regular polygon dragged out from its center
    Square,
    /// Axis-aligned rectangle spanned by two corners
    Box,
}

impl ShapeType {
    pub const ALL: [ShapeType; 6] = [
        ShapeType::Point,
        ShapeType::LineString,
        ShapeType::Polygon,
        ShapeType::Circle,
        ShapeType::Square,
        ShapeType::Box,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::Circle => "Circle",
            Self::Square => "Square",
            Self::Box => "Box",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ShapeError::Unsupported(s.to_owned()))
    }
}

/// Primitive the drawing session actually runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Point,
    LineString,
    Polygon,
    Circle,
}

impl PrimitiveType {
    /// Primitives whose pointer path is always a (start, end) pair
    pub fn is_two_point(&self) -> bool {
        matches!(self, Self::Circle)
    }
}

/// Custom geometry construction applied to the live pointer path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFunction {
    /// Regular polygon with `sides` vertices, center at the first pointer
    /// coordinate and one vertex at the last
    RegularPolygon { sides: usize },
    /// Rectangle spanned by the first two pointer coordinates
    Box,
}

impl GeometryFunction {
    /// Build the sketch geometry for the current pointer path.
    ///
    /// `previous` is the geometry returned by the last call for the same
    /// session. It is reused as storage where possible but its coordinates are
    /// always rebuilt from the live pointer path. Returns `None` for an empty path.
    pub fn apply(
        &self,
        path: &[Coordinate],
        previous: Option<DrawnGeometry>,
    ) -> Option<DrawnGeometry> {
        let start = *path.first()?;
        match self {
            Self::RegularPolygon { sides } => {
                let edge = *path.last()?;
                Some(DrawnGeometry::Polygon(regular_polygon(start, edge, *sides)))
            }
            Self::Box => {
                let end = path.get(1).copied().unwrap_or(start);
                let rect = box_polygon(start, end);
                match previous {
                    Some(DrawnGeometry::Polygon(mut polygon)) => {
                        polygon.exterior_mut(|ring| *ring = rect.exterior().clone());
                        Some(DrawnGeometry::Polygon(polygon))
                    }
                    _ => Some(DrawnGeometry::Polygon(rect)),
                }
            }
        }
    }
}

/// Concrete drawing configuration derived from a [`ShapeType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedShape {
    pub primitive: PrimitiveType,
    pub geometry_fn: Option<GeometryFunction>,
    pub max_vertices: Option<usize>,
}

impl ResolvedShape {
    const fn plain(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            geometry_fn: None,
            max_vertices: None,
        }
    }

    /// Geometry for `path` when no custom geometry function is attached
    pub fn default_geometry(&self, path: &[Coordinate]) -> Option<DrawnGeometry> {
        let first = *path.first()?;
        Some(match self.primitive {
            PrimitiveType::Point => DrawnGeometry::Point(Point::from(first)),
            PrimitiveType::LineString => DrawnGeometry::LineString(path.to_vec().into()),
            PrimitiveType::Polygon => {
                DrawnGeometry::Polygon(geo::Polygon::new(path.to_vec().into(), Vec::new()))
            }
            PrimitiveType::Circle => {
                let edge = *path.last()?;
                DrawnGeometry::Circle {
                    center: first,
                    radius: (edge.x - first.x).hypot(edge.y - first.y),
                }
            }
        })
    }

    /// Run the attached geometry function, or fall back to the primitive's own geometry
    pub fn build_geometry(
        &self,
        path: &[Coordinate],
        previous: Option<DrawnGeometry>,
    ) -> Option<DrawnGeometry> {
        match self.geometry_fn {
            Some(geometry_fn) => geometry_fn.apply(path, previous),
            None => self.default_geometry(path),
        }
    }
}

/// Map a requested shape onto the primitive drawing behaviour that produces it
pub fn resolve_shape(shape: ShapeType) -> ResolvedShape {
    match shape {
        ShapeType::Point => ResolvedShape::plain(PrimitiveType::Point),
        ShapeType::LineString => ResolvedShape::plain(PrimitiveType::LineString),
        ShapeType::Polygon => ResolvedShape::plain(PrimitiveType::Polygon),
        ShapeType::Circle => ResolvedShape::plain(PrimitiveType::Circle),
        ShapeType::Square => ResolvedShape {
            primitive: PrimitiveType::Circle,
            geometry_fn: Some(GeometryFunction::RegularPolygon { sides: 4 }),
            max_vertices: None,
        },
        ShapeType::Box => ResolvedShape {
            primitive: PrimitiveType::LineString,
            geometry_fn: Some(GeometryFunction::Box),
            max_vertices: Some(2),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    #[test]
    fn test_plain_shapes_map_to_themselves() {
        let cases = [
            (ShapeType::Point, PrimitiveType::Point),
            (ShapeType::LineString, PrimitiveType::LineString),
            (ShapeType::Polygon, PrimitiveType::Polygon),
            (ShapeType::Circle, PrimitiveType::Circle),
        ];
        for (shape, primitive) in cases {
            let resolved = resolve_shape(shape);
            assert_eq!(resolved.primitive, primitive);
            assert_eq!(resolved.geometry_fn, None);
            assert_eq!(resolved.max_vertices, None);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert_eq!(
            "Hexagon".parse::<ShapeType>(),
            Err(ShapeError::Unsupported("Hexagon".to_owned()))
        );
        assert_eq!("Box".parse::<ShapeType>(), Ok(ShapeType::Box));
    }

    #[test]
    fn test_box_rebuilds_previous_geometry() {
        let geometry_fn = GeometryFunction::Box;
        let first = geometry_fn
            .apply(&[Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }], None)
            .unwrap();
        let second = geometry_fn
            .apply(&[Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 5.0 }], Some(first))
            .unwrap();

        let ring = second.exterior().unwrap();
        assert_eq!(ring.0.len(), 5);
        assert_eq!(ring.0[2], Coord { x: 4.0, y: 5.0 });
    }

    #[test]
    fn test_empty_path_builds_nothing() {
        assert!(GeometryFunction::Box.apply(&[], None).is_none());
        assert!(resolve_shape(ShapeType::Point).build_geometry(&[], None).is_none());
    }
}
