use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tiny_skia::Transform;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformParseError {
    #[error("expected a `matrix(a, b, c, d, e, f)` value")]
    NotAMatrix,
    #[error("expected six finite numbers")]
    InvalidComponents,
}

/// 2D affine transform in CSS `matrix(a, b, c, d, e, f)` order.
///
/// A point `(x, y)` maps to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl CssMatrix {
    pub const IDENTITY: CssMatrix = CssMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Parse a CSS transform string of the exact form `matrix(...)`
    pub fn parse(value: &str) -> Result<Self, TransformParseError> {
        let inner = value
            .strip_prefix("matrix(")
            .and_then(|rest| rest.strip_suffix(')'))
            .filter(|inner| !inner.contains('('))
            .ok_or(TransformParseError::NotAMatrix)?;

        let components = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or(TransformParseError::InvalidComponents)?;

        match components[..] {
            [a, b, c, d, e, f] => Ok(Self { a, b, c, d, e, f }),
            _ => Err(TransformParseError::InvalidComponents),
        }
    }

    /// Build from a row-major 3x3 homogeneous matrix
    pub fn from_rows(m: &[[f64; 3]; 3]) -> Self {
        Self {
            a: m[0][0],
            b: m[1][0],
            c: m[0][1],
            d: m[1][1],
            e: m[0][2],
            f: m[1][2],
        }
    }

    /// Same transform for drawing with `tiny_skia`
    pub fn to_transform(&self) -> Transform {
        Transform::from_row(
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.e as f32,
            self.f as f32,
        )
    }
}

impl Default for CssMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for CssMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Placement of a layer canvas on screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayerTransform {
    /// Offset in pixels
    pub position: [f64; 2],
    /// Scale factor (1.0 = original size)
    pub scale: [f64; 2],
    /// Rotation in radians
    pub rotation: f64,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }
}

impl LayerTransform {
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            position: [x, y],
            ..Self::default()
        }
    }

    /// Computes the transformation matrix: scale, then rotate, then translate
    pub fn to_matrix(&self) -> CssMatrix {
        // Positive rotation is clockwise on screen, as CSS `rotate()`
        let cos = self.rotation.cos();
        let sin = self.rotation.sin();

        let scale = [
            [self.scale[0], 0.0, 0.0],
            [0.0, self.scale[1], 0.0],
            [0.0, 0.0, 1.0],
        ];
        let rotate = [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]];
        let translate = [
            [1.0, 0.0, self.position[0]],
            [0.0, 1.0, self.position[1]],
            [0.0, 0.0, 1.0],
        ];

        CssMatrix::from_rows(&multiply_matrices(
            &translate,
            &multiply_matrices(&rotate, &scale),
        ))
    }
}

fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    result
}
