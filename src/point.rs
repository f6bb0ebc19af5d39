//! Weighted control points.

use nalgebra::{Vector2, Vector3};

/// A control point of a (possibly rational) curve.
///
/// The position is stored de-homogenized, i.e. as the point the weight pulls the curve
/// towards. Use [`ControlPoint::homogeneous`] to get `(w·x, w·y, w)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// Cartesian position
    pub position: Vector2<f64>,

    /// Weight, must not be zero when the curve is evaluated
    pub weight: f64,
}

impl ControlPoint {
    /// Creates a control point with explicit weight
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        ControlPoint {
            position: Vector2::new(x, y),
            weight,
        }
    }

    /// Creates a control point with weight `1`
    pub fn unweighted(x: f64, y: f64) -> Self {
        ControlPoint::new(x, y, 1.0)
    }

    /// Creates a control point from homogeneous coordinates `(w·x, w·y, w)`.
    ///
    /// Returns `None` if `w` is zero, since the point has no cartesian position then.
    pub fn from_homogeneous(h: Vector3<f64>) -> Option<Self> {
        if h.z == 0.0 {
            return None;
        }
        Some(ControlPoint {
            position: Vector2::new(h.x / h.z, h.y / h.z),
            weight: h.z,
        })
    }

    /// Homogeneous coordinates `(w·x, w·y, w)`
    pub fn homogeneous(&self) -> Vector3<f64> {
        Vector3::new(
            self.position.x * self.weight,
            self.position.y * self.weight,
            self.weight,
        )
    }

    /// x coordinate
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// y coordinate
    pub fn y(&self) -> f64 {
        self.position.y
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        ControlPoint::unweighted(0.0, 0.0)
    }
}

impl From<Vector2<f64>> for ControlPoint {
    fn from(position: Vector2<f64>) -> Self {
        ControlPoint {
            position,
            weight: 1.0,
        }
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        ControlPoint::unweighted(x, y)
    }
}
