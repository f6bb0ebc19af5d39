//! Joining the end of one curve to the start of another.
//!
//! Only the trailing control points (and for B-splines the trailing knots) of the curve
//! being connected are touched. The other curve is only read, it's borrowed mutably
//! because Bézier evaluation refreshes its cache.

use nalgebra::Vector2;

use crate::curve::Curve;
use crate::error::{CurveError, Result};

/// How smooth the junction between two curves has to be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuity {
    /// Shared point
    C0,
    /// Shared point and equal derivative vectors
    C1,
    /// Shared point and parallel tangents
    G1,
}

impl Curve {
    /// Moves this curve's end onto `other`'s start with the requested continuity.
    ///
    /// A B-spline gets its trailing knots clamped first, so that its last control
    /// point is interpolated. Nothing is changed if any of the checks fail.
    pub fn connect(&mut self, other: &mut Curve, continuity: Continuity) -> Result<()> {
        self.check_connectable()?;
        other.check_connectable()?;
        self.validate()?;
        other.validate()?;

        let start = other.domain_start()?;
        let shared = other.evaluate(start)?;
        let tangent = match continuity {
            Continuity::C0 => Vector2::zeros(),
            Continuity::C1 | Continuity::G1 => {
                let tangent = other.derivative(start)?;
                if tangent.norm() <= f64::EPSILON {
                    return Err(CurveError::InsufficientGeometry(
                        "the other curve has no start tangent",
                    ));
                }
                tangent
            }
        };

        let mut connected = self.clone();
        if let Curve::BSpline(curve) = &mut connected {
            curve.clamp_end()?;
        }

        let last = connected.control_points().len() - 1;
        let previous = match continuity {
            Continuity::C0 => None,
            Continuity::C1 => {
                let scale = connected.end_derivative_scale()?;
                if scale == 0.0 || !scale.is_finite() {
                    return Err(CurveError::InsufficientGeometry("curve has no end tangent"));
                }
                Some(shared - tangent / scale)
            }
            Continuity::G1 => {
                let points = connected.control_points();
                let edge = (points[last].position - points[last - 1].position).norm();
                Some(shared - tangent.normalize() * edge)
            }
        };

        connected.update_control_point(last, shared)?;
        if let Some(previous) = previous {
            connected.update_control_point(last - 1, previous)?;
        }
        *self = connected;
        log::debug!("connected curve end to {:?} with {:?}", shared, continuity);
        Ok(())
    }
}

/// Connects `curves[this]` to `curves[other]`, for callers keeping their curves in a list.
pub fn connect_pair(
    curves: &mut [Curve],
    this: usize,
    other: usize,
    continuity: Continuity,
) -> Result<()> {
    let len = curves.len();
    for index in [this, other] {
        if index >= len {
            return Err(CurveError::IndexRange { index, len });
        }
    }
    if this == other {
        return Err(CurveError::InsufficientGeometry(
            "a curve can't be connected to itself",
        ));
    }

    let (this, other) = if this < other {
        let (head, tail) = curves.split_at_mut(other);
        (&mut head[this], &mut tail[0])
    } else {
        let (head, tail) = curves.split_at_mut(this);
        (&mut tail[0], &mut head[other])
    };
    this.connect(other, continuity)
}
