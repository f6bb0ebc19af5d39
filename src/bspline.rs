//! B-spline (NURBS) curves: knot span search and Cox–de Boor evaluation.

use nalgebra::{Vector2, Vector3};
use smallvec::{smallvec, SmallVec};

use crate::base::CurveBase;
use crate::error::{CurveError, Result};
use crate::knots::{self, KnotVector, REMOVAL_TOLERANCE};
use crate::options::{Color, CurveOptions};
use crate::point::ControlPoint;

/// Basis function values, stack allocated up to degree 7
pub type Basis = SmallVec<[f64; 8]>;

/// Rational B-spline curve
#[derive(Clone, Debug, PartialEq)]
pub struct BSplineCurve {
    base: CurveBase,
    knots: KnotVector,
}

impl BSplineCurve {
    /// Creates a curve from raw parts.
    ///
    /// No validation happens here; a curve whose knot count doesn't match refuses to
    /// evaluate until its knot vector gets repaired.
    pub fn new(order: usize, points: Vec<ControlPoint>, knots: Vec<f64>) -> Self {
        BSplineCurve::with_color(order, points, knots, Color::default())
    }

    /// Same as [`BSplineCurve::new`] with an explicit color
    pub fn with_color(
        order: usize,
        points: Vec<ControlPoint>,
        knots: Vec<f64>,
        color: Color,
    ) -> Self {
        BSplineCurve {
            base: CurveBase::new(order, points, color),
            knots: KnotVector::new(knots),
        }
    }

    /// Creates a curve of `order` with a uniform open knot vector over `[0, 1]`
    pub fn open_uniform(order: usize, points: Vec<ControlPoint>, color: Color) -> Result<Self> {
        let mut curve = BSplineCurve::with_color(order, points, Vec::new(), color);
        curve.make_uniform_knot_vector(0.0, 1.0)?;
        curve.make_open_knot_vector()?;
        Ok(curve)
    }

    /// Creates an open uniform curve of the default order (lowered to fit few points)
    pub fn from_points(points: Vec<ControlPoint>, options: &CurveOptions) -> Result<Self> {
        let order = options.default_order.min(points.len());
        BSplineCurve::open_uniform(order, points, options.color)
    }

    /// Shared control point storage
    pub fn base(&self) -> &CurveBase {
        &self.base
    }

    /// Mutable access to color and render handles
    pub fn base_mut(&mut self) -> &mut CurveBase {
        &mut self.base
    }

    /// Control points
    pub fn control_points(&self) -> &[ControlPoint] {
        self.base.control_points()
    }

    /// Knot vector with its derived unique knots and multiplicities
    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    /// Order, i.e. degree + 1
    pub fn order(&self) -> usize {
        self.base.order()
    }

    /// Degree
    pub fn degree(&self) -> usize {
        self.base.degree()
    }

    /// Whether there are enough control points and exactly `points + order` knots
    pub fn is_degree_satisfied(&self) -> bool {
        let order = self.base.order();
        order > 0 && self.base.len() >= order && self.knots.len() == self.base.len() + order
    }

    /// Checks everything evaluation relies on except the weights.
    pub fn check_structure(&self) -> Result<()> {
        let order = self.base.order();
        let len = self.base.len();
        if order == 0 {
            return Err(CurveError::Malformed("order must be at least 1"));
        }
        if self.knots.len() != len + order {
            return Err(CurveError::KnotCount {
                expected: len + order,
                found: self.knots.len(),
            });
        }
        if len < order {
            return Err(CurveError::Malformed("fewer control points than the order"));
        }
        if !self.knots.is_non_decreasing() {
            return Err(CurveError::Malformed("knots are decreasing"));
        }
        if self.knots[order - 1] >= self.knots[len] {
            return Err(CurveError::Malformed("empty domain"));
        }
        Ok(())
    }

    /// Checks the structure and that no weight is zero
    pub fn validate(&self) -> Result<()> {
        self.check_structure()?;
        self.base.check_weights()
    }

    /// `(knots[degree], knots[n + 1])` with `n` the index of the last control point
    pub fn domain(&self) -> Result<(f64, f64)> {
        self.check_structure()?;
        Ok((self.knots[self.degree()], self.knots[self.base.len()]))
    }

    /// First parameter of the domain
    pub fn domain_start(&self) -> Result<f64> {
        self.domain().map(|(start, _)| start)
    }

    /// Last parameter of the domain
    pub fn domain_end(&self) -> Result<f64> {
        self.domain().map(|(_, end)| end)
    }

    /// Finds `i` with `knots[i] <= t < knots[i + 1]`.
    ///
    /// The domain end belongs to the last non empty span, usually `n`, so the curve is
    /// defined up to and including its end.
    pub fn find_knot_span(&self, t: f64) -> Result<usize> {
        let (start, end) = self.domain()?;
        if !t.is_finite() {
            return Err(CurveError::NonFinite(t));
        }
        if t < start || t > end {
            return Err(CurveError::Domain { t, start, end });
        }
        let n = self.base.len() - 1;
        if t >= self.knots[n + 1] {
            // Terminates at `degree` at the latest, the domain isn't empty
            let mut span = n;
            while self.knots[span] >= self.knots[span + 1] {
                span -= 1;
            }
            return Ok(span);
        }

        let (mut low, mut high) = (self.degree(), n + 1);
        let mut mid = (low + high) / 2;
        while t < self.knots[mid] || t >= self.knots[mid + 1] {
            if t < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        Ok(mid)
    }

    /// The `degree + 1` basis functions which are non zero on `span`, evaluated at `t`
    pub fn basis_functions(&self, span: usize, t: f64) -> Basis {
        basis_functions(&self.knots, span, t, self.degree())
    }

    /// Get the point on the curve at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Result<Vector2<f64>> {
        self.validate()?;
        let span = self.find_knot_span(t)?;
        let points = self.base.control_points();
        let (start, end) = self.domain()?;
        if t == start && self.is_clamped_start() {
            return Ok(points[0].position);
        }
        if t == end && self.is_clamped_end() {
            return Ok(points[points.len() - 1].position);
        }

        let basis = self.basis_functions(span, t);
        let (weighted, plain) = self.combine(span - self.degree(), &basis);
        Ok(project(weighted, plain))
    }

    /// Computes the curve's tangent vector at `t`.
    ///
    /// Uses the derivative of the homogeneous curve, whose control points are the
    /// scaled differences `p · (Pⱼ - Pⱼ₋₁) / (uⱼ₊ₚ - uⱼ)`, and the quotient rule.
    /// At the domain end this is the left derivative.
    ///
    /// *The resulting vector is not normalized!*
    pub fn derivative(&self, t: f64) -> Result<Vector2<f64>> {
        self.validate()?;
        let span = self.find_knot_span(t)?;
        let p = self.degree();
        if p == 0 {
            return Ok(Vector2::zeros());
        }
        let points = self.base.control_points();

        let basis = self.basis_functions(span, t);
        let (value, _) = self.combine(span - p, &basis);

        let lower = basis_functions(&self.knots, span, t, p - 1);
        let mut derivative = Vector3::zeros();
        let mut plain_derivative = Vector2::zeros();
        for (r, n) in lower.iter().enumerate() {
            let j = span + 1 - p + r;
            let delta = self.knots[j + p] - self.knots[j];
            if delta <= 0.0 {
                continue;
            }
            let factor = n * p as f64 / delta;
            derivative += (points[j].homogeneous() - points[j - 1].homogeneous()) * factor;
            plain_derivative += (points[j].position - points[j - 1].position) * factor;
        }

        if value.z.abs() <= f64::EPSILON {
            return Ok(plain_derivative);
        }
        Ok((derivative.xy() * value.z - value.xy() * derivative.z) / (value.z * value.z))
    }

    /// Factor `s` with `C'(end) = s · (Pₙ - Pₙ₋₁)`, valid for a clamped end.
    pub(crate) fn end_derivative_scale(&self) -> Result<f64> {
        let len = self.base.len();
        let p = self.degree();
        if p == 0 || len < 2 {
            return Err(CurveError::InsufficientGeometry("curve has no end tangent"));
        }
        let delta = self.knots[len] - self.knots[len - 1];
        if delta <= 0.0 {
            return Err(CurveError::InsufficientGeometry("last knot span is empty"));
        }
        let points = self.base.control_points();
        Ok(p as f64 / delta * points[len - 2].weight / points[len - 1].weight)
    }

    /// Sums `basis[j] · P[first + j]`, once weighted (homogeneous) and once plain.
    fn combine(&self, first: usize, basis: &[f64]) -> (Vector3<f64>, Vector2<f64>) {
        let points = self.base.control_points();
        let mut weighted = Vector3::zeros();
        let mut plain = Vector2::zeros();
        for (j, n) in basis.iter().enumerate() {
            let p = points[first + j];
            weighted += p.homogeneous() * *n;
            plain += p.position * *n;
        }
        (weighted, plain)
    }

    fn is_clamped_start(&self) -> bool {
        let order = self.order();
        self.knots[..order].iter().all(|&u| u == self.knots[0])
    }

    fn is_clamped_end(&self) -> bool {
        let len = self.base.len();
        self.knots[len..].iter().all(|&u| u == self.knots[len])
    }

    /// Inserts a control point before `index`.
    ///
    /// The knot vector isn't touched, so the curve is malformed until it gets a new one
    /// (e.g. through [`BSplineCurve::make_uniform_knot_vector`]).
    pub fn add_control_point(&mut self, point: ControlPoint, index: usize) -> Result<()> {
        self.base.add_control_point(point, index)
    }

    /// Removes a control point, leaving the knot vector as it is
    pub fn remove_control_point(&mut self, index: usize) -> Result<ControlPoint> {
        self.base.remove_control_point(index)
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

    /// Regenerates `points + order` equally spaced knots over `[start, end]`.
    pub fn make_uniform_knot_vector(&mut self, start: f64, end: f64) -> Result<()> {
        let count = self.base.len() + self.base.order();
        self.knots.make_uniform(count, start, end)?;
        self.base.mark_dirty();
        log::debug!("made knot vector uniform: {}", self.knots);
        Ok(())
    }

    /// Clamps both ends of the knot vector over its current range.
    ///
    /// A knot vector with the wrong length (e.g. after adding a control point) is made
    /// uniform over `[0, 1]` first.
    pub fn make_open_knot_vector(&mut self) -> Result<()> {
        let len = self.base.len();
        let order = self.base.order();
        if order == 0 || len < order {
            return Err(CurveError::Malformed("fewer control points than the order"));
        }
        let range = match (self.knots.first(), self.knots.last()) {
            (Some(&first), Some(&last)) if self.knots.len() == len + order && first < last => {
                Some((first, last))
            }
            _ => None,
        };
        let (start, end) = match range {
            Some(range) => range,
            None => {
                self.make_uniform_knot_vector(0.0, 1.0)?;
                (0.0, 1.0)
            }
        };
        self.make_open_knot_vector_over(start, end)
    }

    /// Clamps the first `order` knots to `start` and the last `order` to `end`
    pub fn make_open_knot_vector_over(&mut self, start: f64, end: f64) -> Result<()> {
        let count = self.base.len() + self.base.order();
        let mut knots = self.knots.clone();
        if knots.len() != count {
            knots.make_uniform(count, start, end)?;
        }
        knots.make_open(self.base.order(), start, end)?;
        self.knots = knots;
        self.base.mark_dirty();
        log::debug!("made knot vector open: {}", self.knots);
        Ok(())
    }

    /// Inserts a knot without changing the curve's shape (Boehm's algorithm).
    ///
    /// `value` has to lie in `[domain_start, domain_end)`.
    pub fn add_knot(&mut self, value: f64) -> Result<()> {
        self.validate()?;
        if !value.is_finite() {
            return Err(CurveError::NonFinite(value));
        }
        let (start, end) = self.domain()?;
        if value < start || value >= end {
            return Err(CurveError::Domain {
                t: value,
                start,
                end,
            });
        }
        let multiplicity = self.knots.multiplicity_of(value);
        if multiplicity >= self.order() {
            return Err(CurveError::KnotMultiplicity {
                value,
                multiplicity,
                order: self.order(),
            });
        }

        let (knots, points) =
            knots::insert(&self.knots, self.base.control_points(), self.degree(), value)?;
        self.knots.replace(knots);
        self.base.replace_control_points(points);
        log::debug!("inserted knot {}: {}", value, self.knots);
        Ok(())
    }

    /// Removes the interior knot at `index`, returning how far the curve had to move.
    ///
    /// A deviation of zero means the knot was redundant and the shape is unchanged.
    pub fn remove_knot(&mut self, index: usize) -> Result<f64> {
        self.validate()?;
        if index >= self.knots.len() {
            return Err(CurveError::IndexRange {
                index,
                len: self.knots.len(),
            });
        }
        let (start, end) = self.domain()?;
        let value = self.knots[index];
        if value <= start || value >= end {
            return Err(CurveError::IndexRange {
                index,
                len: self.knots.len(),
            });
        }
        if self.base.len() <= self.order() {
            return Err(CurveError::InsufficientGeometry(
                "removing a knot would leave fewer control points than the order",
            ));
        }

        let removal = knots::remove(&self.knots, self.base.control_points(), self.degree(), index)?;
        self.knots.replace(removal.knots);
        self.base.replace_control_points(removal.points);
        if removal.deviation > REMOVAL_TOLERANCE {
            log::warn!(
                "knot {} was not removable, the curve moved by {}",
                value,
                removal.deviation
            );
        } else {
            log::debug!("removed knot {}: {}", value, self.knots);
        }
        Ok(removal.deviation)
    }

    /// Overwrites a knot, then repairs the ordering and the multiplicities
    pub fn update_knot(&mut self, index: usize, value: f64) -> Result<()> {
        self.knots.update(index, value)?;
        self.base.mark_dirty();
        log::debug!("updated knot {} to {}: {}", index, value, self.knots);
        Ok(())
    }

    /// Knot vector as `knots[N] = k0 k1 ...`, for the knot editing dialog
    pub fn knot_description(&self) -> String {
        self.knots.to_string()
    }

    /// Replaces the knot vector with one parsed from `knots[N] = k0 k1 ...`.
    ///
    /// The vector must have `points + order` knots; nothing changes on error.
    pub fn set_knot_description(&mut self, text: &str) -> Result<()> {
        let knots: KnotVector = text.parse()?;
        let expected = self.base.len() + self.base.order();
        if knots.len() != expected {
            return Err(CurveError::KnotCount {
                expected,
                found: knots.len(),
            });
        }
        self.knots = knots;
        self.base.mark_dirty();
        Ok(())
    }

    /// Clamps the end so the last control point is interpolated
    pub(crate) fn clamp_end(&mut self) -> Result<()> {
        let end = self.domain_end()?;
        let mut knots = self.knots.clone();
        knots.clamp_end(self.order(), end);
        self.knots = knots;
        self.base.mark_dirty();
        Ok(())
    }
}

/// Iterative Cox–de Boor recurrence.
///
/// Computes the `degree + 1` basis functions `N[span - degree ..= span]` at `t` in
/// `O(degree²)` using the triangular table and two scratch arrays.
pub fn basis_functions(knots: &[f64], span: usize, t: f64, degree: usize) -> Basis {
    let mut n: Basis = smallvec![0.0; degree + 1];
    let mut left: Basis = smallvec![0.0; degree + 1];
    let mut right: Basis = smallvec![0.0; degree + 1];

    n[0] = 1.0;
    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

fn project(weighted: Vector3<f64>, plain: Vector2<f64>) -> Vector2<f64> {
    if weighted.z.abs() <= f64::EPSILON {
        plain
    } else {
        weighted.xy() / weighted.z
    }
}

#[cfg(test)]
mod tests {
    use super::BSplineCurve;
    use crate::error::CurveError;
    use crate::options::CurveOptions;
    use crate::point::ControlPoint;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn arch() -> BSplineCurve {
        BSplineCurve::new(
            4,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 2.0),
                ControlPoint::unweighted(2.0, 2.0),
                ControlPoint::unweighted(3.0, 0.0),
            ],
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
        )
    }

    fn wave() -> BSplineCurve {
        BSplineCurve::new(
            3,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 1.0),
                ControlPoint::new(2.0, -1.0, 2.0),
                ControlPoint::unweighted(3.0, 1.0),
                ControlPoint::unweighted(4.0, 0.0),
                ControlPoint::new(5.0, 2.0, 0.5),
            ],
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0],
        )
    }

    #[test]
    fn clamped_cubic() {
        let curve = arch();
        assert_eq!(curve.evaluate(0.0).unwrap(), Vector2::new(0.0, 0.0));
        assert_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(3.0, 0.0));
        // Single span clamped cubic equals the bezier curve
        assert_relative_eq!(
            curve.evaluate(0.5).unwrap(),
            Vector2::new(1.5, 1.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn span_search() {
        let curve = wave();
        assert_eq!(curve.find_knot_span(0.0).unwrap(), 2);
        assert_eq!(curve.find_knot_span(0.5).unwrap(), 2);
        assert_eq!(curve.find_knot_span(1.0).unwrap(), 3);
        assert_eq!(curve.find_knot_span(1.5).unwrap(), 3);
        // Double knot: the span right of it
        assert_eq!(curve.find_knot_span(2.0).unwrap(), 5);
        assert_eq!(curve.find_knot_span(3.0).unwrap(), 5);
        assert_eq!(
            curve.find_knot_span(3.5),
            Err(CurveError::Domain {
                t: 3.5,
                start: 0.0,
                end: 3.0
            })
        );
        assert!(curve.find_knot_span(-0.1).is_err());
    }

    #[test]
    fn partition_of_unity() {
        let curve = wave();
        for i in 0..=30 {
            let t = i as f64 / 10.0;
            let span = curve.find_knot_span(t).unwrap();
            let sum: f64 = curve.basis_functions(span, t).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn weights_pull() {
        let mut curve = wave();
        let before = curve.evaluate(1.2).unwrap();
        curve.update_weight(2, 10.0).unwrap();
        let after = curve.evaluate(1.2).unwrap();
        let target = Vector2::new(2.0, -1.0);
        assert!((after - target).norm() < (before - target).norm());
    }

    #[test]
    fn derivative_matches_difference_quotient() {
        let curve = wave();
        let h = 1e-6;
        for &t in &[0.3, 0.9, 1.4, 2.5] {
            let numeric = (curve.evaluate(t + h).unwrap() - curve.evaluate(t - h).unwrap()) / (2.0 * h);
            assert_relative_eq!(curve.derivative(t).unwrap(), numeric, epsilon = 1e-5);
        }
    }

    #[test]
    fn knot_insertion_keeps_shape() {
        let mut curve = wave();
        let samples: Vec<_> = (0..=30)
            .map(|i| curve.evaluate(i as f64 / 10.0).unwrap())
            .collect();
        curve.add_knot(0.5).unwrap();
        curve.add_knot(2.0).unwrap();
        assert_eq!(curve.control_points().len(), 8);
        assert_eq!(curve.knots().multiplicity_of(2.0), 3);
        for (i, sample) in samples.iter().enumerate() {
            assert_relative_eq!(curve.evaluate(i as f64 / 10.0).unwrap(), *sample, epsilon = 1e-12);
        }
    }

    #[test]
    fn knot_insertion_bounds() {
        let mut curve = wave();
        assert!(matches!(curve.add_knot(3.0), Err(CurveError::Domain { .. })));
        assert_eq!(
            curve.add_knot(0.0),
            Err(CurveError::KnotMultiplicity {
                value: 0.0,
                multiplicity: 3,
                order: 3
            })
        );
        assert_eq!(curve.control_points().len(), 6);
    }

    #[test]
    fn knot_removal_undoes_insertion() {
        let mut curve = wave();
        let original = curve.clone();
        curve.add_knot(1.5).unwrap();
        let deviation = curve.remove_knot(4).unwrap();
        assert!(deviation < 1e-12);
        assert_eq!(curve.knots().as_slice(), original.knots().as_slice());
        for i in 0..=30 {
            let t = i as f64 / 10.0;
            assert_relative_eq!(
                curve.evaluate(t).unwrap(),
                original.evaluate(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn knot_removal_bounds() {
        let mut curve = wave();
        assert_eq!(
            curve.remove_knot(2),
            Err(CurveError::IndexRange { index: 2, len: 9 })
        );
        assert_eq!(
            curve.remove_knot(9),
            Err(CurveError::IndexRange { index: 9, len: 9 })
        );
        let mut curve = arch();
        curve.add_knot(0.5).unwrap();
        curve.remove_knot(4).unwrap();
        assert!(matches!(
            curve.remove_knot(4),
            Err(CurveError::IndexRange { .. })
        ));
    }

    #[test]
    fn malformed_refuses_evaluation() {
        let mut curve = arch();
        curve
            .add_control_point(ControlPoint::unweighted(4.0, 1.0), 4)
            .unwrap();
        assert_eq!(
            curve.evaluate(0.5),
            Err(CurveError::KnotCount {
                expected: 9,
                found: 8
            })
        );
        curve.make_open_knot_vector().unwrap();
        assert_eq!(curve.knots().len(), 9);
        assert_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(4.0, 1.0));
    }

    #[test]
    fn uniform_then_open() {
        let mut curve = arch();
        curve.make_uniform_knot_vector(0.0, 7.0).unwrap();
        assert_eq!(
            curve.knots().as_slice(),
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]
        );
        assert_eq!(curve.domain().unwrap(), (3.0, 4.0));
        curve.make_open_knot_vector().unwrap();
        assert_eq!(
            curve.knots().as_slice(),
            &[0.0, 0.0, 0.0, 0.0, 7.0, 7.0, 7.0, 7.0]
        );
        assert_eq!(curve.evaluate(7.0).unwrap(), Vector2::new(3.0, 0.0));
    }

    #[test]
    fn knot_text() {
        let mut curve = arch();
        assert_eq!(curve.knot_description(), "knots[8] = 0 0 0 0 1 1 1 1");
        curve
            .set_knot_description("knots[8] = 0 0 0 0 2 2 2 2")
            .unwrap();
        assert_eq!(curve.domain().unwrap(), (0.0, 2.0));
        assert_eq!(
            curve.set_knot_description("knots[3] = 0 1 2"),
            Err(CurveError::KnotCount {
                expected: 8,
                found: 3
            })
        );
        assert_eq!(curve.domain().unwrap(), (0.0, 2.0));
    }

    #[test]
    fn update_knot_reorders() {
        let mut curve = wave();
        curve.update_knot(3, 2.5).unwrap();
        assert_eq!(
            curve.knots().as_slice(),
            &[0.0, 0.0, 0.0, 2.0, 2.0, 2.5, 3.0, 3.0, 3.0]
        );
        assert_eq!(curve.knots().multiplicity_of(2.0), 2);
        assert!(curve.evaluate(2.7).is_ok());
    }

    #[test]
    fn repeated_knot_at_domain_end() {
        // knots[n] == knots[n + 1] with an unclamped tail
        let mut curve = BSplineCurve::new(
            3,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 2.0),
                ControlPoint::unweighted(2.0, 2.0),
                ControlPoint::unweighted(3.0, 0.0),
            ],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0],
        );
        assert!(curve.validate().is_ok());
        assert_eq!(curve.domain().unwrap(), (0.0, 1.0));
        assert_eq!(curve.find_knot_span(1.0).unwrap(), 2);
        assert_relative_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(2.0, 2.0), epsilon = 1e-12);
        // Left derivative 2 (P2 - P1) over the span [0, 1]
        assert_relative_eq!(curve.derivative(1.0).unwrap(), Vector2::new(2.0, 0.0), epsilon = 1e-12);

        curve.make_uniform_knot_vector(0.0, 6.0).unwrap();
        curve.update_knot(3, 4.0).unwrap();
        assert_eq!(
            curve.knots().as_slice(),
            &[0.0, 1.0, 2.0, 4.0, 4.0, 5.0, 6.0]
        );
        let end = curve.domain_end().unwrap();
        assert_eq!(curve.find_knot_span(end).unwrap(), 2);
        assert!(curve.evaluate(end).unwrap().iter().all(|v| v.is_finite()));
        assert!(curve.derivative(end).unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn from_points_lowers_order() {
        let options = CurveOptions::default();
        let points = vec![
            ControlPoint::unweighted(0.0, 0.0),
            ControlPoint::unweighted(1.0, 1.0),
            ControlPoint::unweighted(2.0, 0.0),
        ];
        let curve = BSplineCurve::from_points(points.clone(), &options).unwrap();
        assert_eq!(curve.order(), 3);
        assert_eq!(curve.knots().as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

        let mut more = points;
        more.push(ControlPoint::unweighted(3.0, 1.0));
        more.push(ControlPoint::unweighted(4.0, 0.0));
        let curve = BSplineCurve::from_points(more, &options).unwrap();
        assert_eq!(curve.order(), options.default_order);
        assert_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(4.0, 0.0));
    }
}
