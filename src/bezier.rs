//! Bézier curves evaluated through a cached power basis matrix.
//!
//! Instead of recomputing the Bernstein polynomials for every parameter, the curve keeps
//! the product `MP` of the Bernstein-to-power-basis matrix `M` and its control points `P`.
//! A point is then just the dot product of `[1, t, t², …, tⁿ]` with `MP`.

use nalgebra::{DMatrix, MatrixXx3, RowDVector, Vector2, Vector3};
use smallvec::SmallVec;

use crate::base::CurveBase;
use crate::error::{CurveError, Result};
use crate::options::{BezierForm, Color, CurveOptions};
use crate::point::ControlPoint;

/// Bézier curve of arbitrary degree over the domain `[0, 1]`
#[derive(Clone, Debug)]
pub struct BezierCurve {
    base: CurveBase,
    form: BezierForm,
    cache: BasisCache,
}

/// Highest degree evaluated through the power basis.
///
/// Above it the binomial products outgrow `u64` and the power basis loses too many digits
/// to cancellation, so such curves fall back to de Casteljau.
pub const MAX_POWER_BASIS_DEGREE: usize = 16;

/// `M` and `MP`, valid as long as the base isn't dirty
#[derive(Clone, Debug)]
struct BasisCache {
    coefficients: DMatrix<f64>,
    mp: MatrixXx3<f64>,
    /// Control points as evaluated (weighted or not), for the de Casteljau fallback
    weighted: Vec<Vector3<f64>>,
}

impl BasisCache {
    fn empty() -> Self {
        BasisCache {
            coefficients: DMatrix::zeros(0, 0),
            mp: MatrixXx3::zeros(0),
            weighted: Vec::new(),
        }
    }

    fn uses_power_basis(&self) -> bool {
        self.mp.nrows() == self.weighted.len()
    }
}

impl BezierCurve {
    /// Creates a polynomial Bézier curve whose order equals its number of control points
    pub fn new(points: Vec<ControlPoint>) -> Self {
        BezierCurve::with_options(points, &CurveOptions::default())
    }

    /// Creates a curve taking color and form from `options`
    pub fn with_options(points: Vec<ControlPoint>, options: &CurveOptions) -> Self {
        let order = points.len();
        BezierCurve::with_order(order, points, options.color, options.bezier_form)
    }

    /// Creates a curve with an explicit order.
    ///
    /// Such a curve can be invalid (see [`BezierCurve::is_degree_satisfied`]) until
    /// control points are added or removed.
    pub fn with_order(
        order: usize,
        points: Vec<ControlPoint>,
        color: Color,
        form: BezierForm,
    ) -> Self {
        BezierCurve {
            base: CurveBase::new(order, points, color),
            form,
            cache: BasisCache::empty(),
        }
    }

    /// Shared control point storage
    pub fn base(&self) -> &CurveBase {
        &self.base
    }

    /// Mutable access to color and render handles.
    ///
    /// Geometric changes through it still invalidate the cache, since the base tracks them itself.
    pub fn base_mut(&mut self) -> &mut CurveBase {
        &mut self.base
    }

    /// Control points
    pub fn control_points(&self) -> &[ControlPoint] {
        self.base.control_points()
    }

    /// Degree of the curve
    pub fn degree(&self) -> usize {
        self.base.degree()
    }

    /// Evaluation form
    pub fn form(&self) -> BezierForm {
        self.form
    }

    /// Switches between polynomial and rational evaluation
    pub fn set_form(&mut self, form: BezierForm) {
        if self.form != form {
            self.form = form;
            self.base.mark_dirty();
        }
    }

    /// A Bézier curve is valid when it has exactly `order` control points
    pub fn is_degree_satisfied(&self) -> bool {
        !self.base.is_empty() && self.base.len() == self.base.order()
    }

    /// Inserts a control point; the order follows the number of points.
    pub fn add_control_point(&mut self, point: ControlPoint, index: usize) -> Result<()> {
        self.base.add_control_point(point, index)?;
        self.base.set_order(self.base.len());
        Ok(())
    }

    /// Removes a control point; the order follows the number of points.
    pub fn remove_control_point(&mut self, index: usize) -> Result<ControlPoint> {
        let point = self.base.remove_control_point(index)?;
        self.base.set_order(self.base.len());
        Ok(point)
    }

    /// Moves a control point
    pub fn update_control_point(&mut self, index: usize, position: Vector2<f64>) -> Result<()> {
        self.base.update_control_point(index, position)
    }

    /// Changes a control point's weight
    pub fn update_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        self.base.update_weight(index, weight)
    }

    /// Replaces a control point
    pub fn set_control_point(&mut self, index: usize, point: ControlPoint) -> Result<()> {
        self.base.set_control_point(index, point)
    }

    /// Rebuilds `MP` if the control points changed since the last evaluation.
    pub fn refresh(&mut self) -> Result<()> {
        if self.base.is_empty() {
            return Err(CurveError::Malformed("curve has no control points"));
        }
        if !self.is_degree_satisfied() {
            return Err(CurveError::Malformed("bezier order differs from its control point count"));
        }
        self.base.check_weights()?;
        if !self.base.is_dirty() && self.cache.weighted.len() == self.base.len() {
            return Ok(());
        }

        let n = self.base.len() - 1;
        let form = self.form;
        self.cache.weighted = self
            .base
            .control_points()
            .iter()
            .map(|point| weighted(point, form))
            .collect();

        if self.cache.coefficients.nrows() != n + 1 {
            self.cache.coefficients = power_basis_matrix(n).unwrap_or_else(|| DMatrix::zeros(0, 0));
        }
        if self.cache.coefficients.nrows() == n + 1 {
            let weighted = &self.cache.weighted;
            let p = MatrixXx3::from_fn(n + 1, |i, j| weighted[i][j]);
            self.cache.mp = &self.cache.coefficients * p;
            log::trace!("rebuilt bezier power basis cache for degree {}", n);
        } else {
            self.cache.mp = MatrixXx3::zeros(0);
            log::trace!("degree {} is evaluated with de castlejau", n);
        }
        self.base.mark_clean();
        Ok(())
    }

    /// Get the point on the curve at parameter `t`.
    ///
    /// `t` isn't clamped: values outside `[0, 1]` extrapolate the curve's polynomial.
    pub fn evaluate(&mut self, t: f64) -> Result<Vector2<f64>> {
        self.refresh()?;
        let points = self.base.control_points();
        if t == 0.0 {
            return Ok(points[0].position);
        }
        if t == 1.0 {
            return Ok(points[points.len() - 1].position);
        }

        let h = self.homogeneous(t);
        match self.form {
            BezierForm::Polynomial => Ok(h.xy()),
            BezierForm::Rational => {
                if h.z.abs() <= f64::EPSILON {
                    Ok(castlejau_eval(points, t))
                } else {
                    Ok(h.xy() / h.z)
                }
            }
        }
    }

    /// Computes the curve's tangent vector at `t`.
    ///
    /// *The resulting vector is not normalized!*
    pub fn derivative(&mut self, t: f64) -> Result<Vector2<f64>> {
        self.refresh()?;
        let h = self.homogeneous(t);
        let dh = self.homogeneous_derivative(t);
        match self.form {
            BezierForm::Polynomial => Ok(dh.xy()),
            BezierForm::Rational => {
                if h.z.abs() <= f64::EPSILON {
                    return Err(CurveError::Malformed("weighted basis sum vanishes"));
                }
                Ok((dh.xy() * h.z - h.xy() * dh.z) / (h.z * h.z))
            }
        }
    }

    /// Factor `s` with `C'(1) = s · (Pₙ - Pₙ₋₁)` for the current weights.
    pub(crate) fn end_derivative_scale(&self) -> f64 {
        let points = self.base.control_points();
        let degree = self.base.degree() as f64;
        match (self.form, points) {
            (BezierForm::Rational, [.., previous, last]) => degree * previous.weight / last.weight,
            _ => degree,
        }
    }

    fn homogeneous(&self, t: f64) -> Vector3<f64> {
        if !self.cache.uses_power_basis() {
            return castlejau_homogeneous(self.cache.weighted.iter().copied(), t);
        }
        let n = self.cache.mp.nrows();
        let powers = RowDVector::from_fn(n, |_, i| t.powi(i as i32));
        (powers * &self.cache.mp).transpose()
    }

    fn homogeneous_derivative(&self, t: f64) -> Vector3<f64> {
        if !self.cache.uses_power_basis() {
            // Hodograph: n · (Pᵢ₊₁ - Pᵢ)
            let points = &self.cache.weighted;
            let degree = points.len().saturating_sub(1) as f64;
            let differences = points.windows(2).map(|pair| (pair[1] - pair[0]) * degree);
            return castlejau_homogeneous(differences, t);
        }
        let n = self.cache.mp.nrows();
        let powers = RowDVector::from_fn(n, |_, i| {
            if i == 0 {
                0.0
            } else {
                i as f64 * t.powi(i as i32 - 1)
            }
        });
        (powers * &self.cache.mp).transpose()
    }
}

fn weighted(point: &ControlPoint, form: BezierForm) -> Vector3<f64> {
    match form {
        BezierForm::Polynomial => Vector3::new(point.position.x, point.position.y, 1.0),
        BezierForm::Rational => point.homogeneous(),
    }
}

/// Constructs the matrix `M` turning control points into power basis coefficients.
///
/// `M[i][j] = C(n, i) · C(i, j) · (-1)^(i - j)` for `j ≤ i`, zero above the diagonal.
/// Row `i` holds the coefficient of `tⁱ`:
///
/// ```text
///   1  0  0  0
///  -3  3  0  0
///   3 -6  3  0
///  -1  3 -3  1
/// ```
///
/// Returns `None` above [`MAX_POWER_BASIS_DEGREE`].
pub fn power_basis_matrix(n: usize) -> Option<DMatrix<f64>> {
    if n > MAX_POWER_BASIS_DEGREE {
        return None;
    }
    Some(DMatrix::from_fn(n + 1, n + 1, |i, j| {
        if j > i {
            return 0.0;
        }
        let magnitude =
            num::integer::binomial(n as u64, i as u64) * num::integer::binomial(i as u64, j as u64);
        let sign = if (i - j) % 2 == 0 { 1.0 } else { -1.0 };
        sign * magnitude as f64
    }))
}

/// De Casteljau on homogeneous points; zero for no points.
fn castlejau_homogeneous(points: impl Iterator<Item = Vector3<f64>>, t: f64) -> Vector3<f64> {
    let t_inv = 1.0 - t;
    let mut buffer: Vec<Vector3<f64>> = points.collect();
    while buffer.len() > 1 {
        for i in 0..buffer.len() - 1 {
            buffer[i] = buffer[i] * t_inv + buffer[i + 1] * t;
        }
        buffer.pop();
    }
    buffer.first().copied().unwrap_or_else(Vector3::zeros)
}

/// Evaluates the control polygon's positions with de castlejau's algorithm, ignoring weights.
pub(crate) fn castlejau_eval(points: &[ControlPoint], t: f64) -> Vector2<f64> {
    let t_inv = 1.0 - t;
    let mut buffer: SmallVec<[Vector2<f64>; 8]> = points.iter().map(|p| p.position).collect();
    while buffer.len() > 1 {
        for i in 0..buffer.len() - 1 {
            buffer[i] = buffer[i] * t_inv + buffer[i + 1] * t;
        }
        buffer.pop();
    }
    buffer[0]
}
