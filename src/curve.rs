//! The two curve kinds behind one type.

use nalgebra::Vector2;

use crate::base::CurveBase;
use crate::bezier::BezierCurve;
use crate::bspline::BSplineCurve;
use crate::error::{CurveError, Result};
use crate::options::CurveOptions;
use crate::point::ControlPoint;

/// A Bézier curve or a B-spline.
///
/// Most methods just forward to the wrapped curve. Those taking `&mut self` for
/// evaluation do so because Bézier curves rebuild their basis cache lazily.
#[derive(Clone, Debug)]
pub enum Curve {
    /// Bézier curve over `[0, 1]`
    Bezier(BezierCurve),
    /// B-spline over its knot vector's domain
    BSpline(BSplineCurve),
}

impl Curve {
    /// Get the point on the curve at parameter `t`
    pub fn evaluate(&mut self, t: f64) -> Result<Vector2<f64>> {
        match self {
            Curve::Bezier(curve) => curve.evaluate(t),
            Curve::BSpline(curve) => curve.evaluate(t),
        }
    }

    /// Tangent vector at `t`, not normalized
    pub fn derivative(&mut self, t: f64) -> Result<Vector2<f64>> {
        match self {
            Curve::Bezier(curve) => curve.derivative(t),
            Curve::BSpline(curve) => curve.derivative(t),
        }
    }

    /// First parameter of the domain
    pub fn domain_start(&self) -> Result<f64> {
        match self {
            Curve::Bezier(_) => Ok(0.0),
            Curve::BSpline(curve) => curve.domain_start(),
        }
    }

    /// Last parameter of the domain
    pub fn domain_end(&self) -> Result<f64> {
        match self {
            Curve::Bezier(_) => Ok(1.0),
            Curve::BSpline(curve) => curve.domain_end(),
        }
    }

    /// Whether the curve currently has a consistent order, control point and knot count
    pub fn is_degree_satisfied(&self) -> bool {
        match self {
            Curve::Bezier(curve) => curve.is_degree_satisfied(),
            Curve::BSpline(curve) => curve.is_degree_satisfied(),
        }
    }

    /// Evaluates `steps` points spread evenly over the domain, both ends included.
    ///
    /// This is what the renderer draws as a polyline.
    pub fn sample(&mut self, steps: usize) -> Result<Vec<Vector2<f64>>> {
        let start = self.domain_start()?;
        let end = self.domain_end()?;
        match steps {
            0 => Ok(Vec::new()),
            1 => Ok(vec![self.evaluate(start)?]),
            _ => {
                let last = (steps - 1) as f64;
                let mut samples = Vec::with_capacity(steps);
                for i in 0..steps - 1 {
                    samples.push(self.evaluate(start + (end - start) * i as f64 / last)?);
                }
                samples.push(self.evaluate(end)?);
                Ok(samples)
            }
        }
    }

    /// Samples at the resolution configured in `options`
    pub fn sample_with(&mut self, options: &CurveOptions) -> Result<Vec<Vector2<f64>>> {
        self.sample(options.sample_steps)
    }

    /// Shared control point storage
    pub fn base(&self) -> &CurveBase {
        match self {
            Curve::Bezier(curve) => curve.base(),
            Curve::BSpline(curve) => curve.base(),
        }
    }

    /// Mutable access to color and render handles
    pub fn base_mut(&mut self) -> &mut CurveBase {
        match self {
            Curve::Bezier(curve) => curve.base_mut(),
            Curve::BSpline(curve) => curve.base_mut(),
        }
    }

    /// Control points
    pub fn control_points(&self) -> &[ControlPoint] {
        self.base().control_points()
    }

    /// Order, i.e. degree + 1
    pub fn order(&self) -> usize {
        self.base().order()
    }

    /// Inserts a control point before `index`
    pub fn add_control_point(&mut self, point: ControlPoint, index: usize) -> Result<()> {
        match self {
            Curve::Bezier(curve) => curve.add_control_point(point, index),
            Curve::BSpline(curve) => curve.add_control_point(point, index),
        }
    }

    /// Removes the control point at `index`
    pub fn remove_control_point(&mut self, index: usize) -> Result<ControlPoint> {
        match self {
            Curve::Bezier(curve) => curve.remove_control_point(index),
            Curve::BSpline(curve) => curve.remove_control_point(index),
        }
    }

    /// Moves a control point
    pub fn update_control_point(&mut self, index: usize, position: Vector2<f64>) -> Result<()> {
        match self {
            Curve::Bezier(curve) => curve.update_control_point(index, position),
            Curve::BSpline(curve) => curve.update_control_point(index, position),
        }
    }

    /// Changes a control point's weight
    pub fn update_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        match self {
            Curve::Bezier(curve) => curve.update_weight(index, weight),
            Curve::BSpline(curve) => curve.update_weight(index, weight),
        }
    }

    /// Replaces a control point
    pub fn set_control_point(&mut self, index: usize, point: ControlPoint) -> Result<()> {
        match self {
            Curve::Bezier(curve) => curve.set_control_point(index, point),
            Curve::BSpline(curve) => curve.set_control_point(index, point),
        }
    }

    /// Checks the curve can be evaluated, without evaluating it
    pub fn validate(&mut self) -> Result<()> {
        match self {
            Curve::Bezier(curve) => curve.refresh(),
            Curve::BSpline(curve) => curve.validate(),
        }
    }

    /// Factor `s` with `C'(end) = s · (Pₙ - Pₙ₋₁)`, assuming the end is clamped
    pub(crate) fn end_derivative_scale(&self) -> Result<f64> {
        match self {
            Curve::Bezier(curve) => Ok(curve.end_derivative_scale()),
            Curve::BSpline(curve) => curve.end_derivative_scale(),
        }
    }

    /// The B-spline, if this is one
    pub fn as_bspline(&self) -> Option<&BSplineCurve> {
        match self {
            Curve::BSpline(curve) => Some(curve),
            Curve::Bezier(_) => None,
        }
    }

    /// The Bézier curve, if this is one
    pub fn as_bezier(&self) -> Option<&BezierCurve> {
        match self {
            Curve::Bezier(curve) => Some(curve),
            Curve::BSpline(_) => None,
        }
    }

    pub(crate) fn check_connectable(&self) -> Result<()> {
        if self.base().len() < 2 {
            Err(CurveError::InsufficientGeometry(
                "a connected curve needs at least two control points",
            ))
        } else {
            Ok(())
        }
    }
}

impl From<BezierCurve> for Curve {
    fn from(curve: BezierCurve) -> Self {
        Curve::Bezier(curve)
    }
}

impl From<BSplineCurve> for Curve {
    fn from(curve: BSplineCurve) -> Self {
        Curve::BSpline(curve)
    }
}
