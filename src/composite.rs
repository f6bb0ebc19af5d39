//! Merging two curves into a single B-spline.

use thiserror::Error;

use crate::bspline::BSplineCurve;
use crate::curve::Curve;
use crate::error::CurveError;
use crate::options::Color;
use crate::point::ControlPoint;

/// Distance below which the end of the first curve and the start of the second count as one point
pub const COINCIDENCE_TOLERANCE: f64 = 1e-9;

/// A failed [`merge`], handing both curves back unchanged
#[derive(Debug, Error)]
#[error("could not merge curves: {source}")]
pub struct MergeError {
    /// Why the curves couldn't be merged
    #[source]
    pub source: CurveError,
    /// The first input
    pub first: Curve,
    /// The second input
    pub second: Curve,
}

/// The parts of a curve the merge needs
struct Piece {
    points: Vec<ControlPoint>,
    order: usize,
    start: f64,
    end: f64,
    interior: Vec<f64>,
    color: Color,
}

impl Piece {
    fn of(curve: &mut Curve) -> Result<Self, CurveError> {
        curve.validate()?;
        let base = curve.base();
        let order = base.order();
        let len = base.len();
        let (start, end, interior) = match curve.as_bspline() {
            Some(spline) => {
                let (start, end) = spline.domain()?;
                (start, end, spline.knots()[order..len].to_vec())
            }
            None => (0.0, 1.0, Vec::new()),
        };
        Ok(Piece {
            points: curve.control_points().to_vec(),
            order,
            start,
            end,
            interior,
            color: curve.base().color(),
        })
    }
}

/// Joins `second` after `first` into one B-spline.
///
/// The second curve's parameters get shifted to continue where the first one's domain
/// ends. If the second curve starts where the first one ends, the duplicate point is
/// dropped and the junction knot gets multiplicity `degree`, so both shapes are
/// reproduced exactly when the orders match. Otherwise (or if the knot counts don't
/// work out) the result falls back to a uniform open knot vector over the combined
/// domain.
///
/// The result takes the first curve's color.
pub fn merge(first: Curve, second: Curve) -> Result<BSplineCurve, MergeError> {
    let (mut first, mut second) = (first, second);
    let merged = Piece::of(&mut first)
        .and_then(|a| Piece::of(&mut second).map(|b| (a, b)))
        .and_then(|(a, b)| join(a, b));
    merged.map_err(|source| MergeError {
        source,
        first,
        second,
    })
}

fn join(first: Piece, second: Piece) -> Result<BSplineCurve, CurveError> {
    let order = first.order.max(second.order);
    let shift = first.end - second.start;
    let end = second.end + shift;

    let mut points = first.points;
    let coincident = match (points.last(), second.points.first()) {
        (Some(a), Some(b)) => (a.position - b.position).norm() <= COINCIDENCE_TOLERANCE,
        _ => false,
    };
    let skip = usize::from(coincident);
    points.extend_from_slice(&second.points[skip..]);

    let count = points.len() + order;
    let fixed = 2 * order + first.interior.len() + second.interior.len();
    let junction = count.checked_sub(fixed).filter(|m| (1..=order).contains(m));

    let curve = match junction {
        Some(multiplicity) => {
            let mut knots = Vec::with_capacity(count);
            knots.extend(std::iter::repeat(first.start).take(order));
            knots.extend_from_slice(&first.interior);
            knots.extend(std::iter::repeat(first.end).take(multiplicity));
            knots.extend(second.interior.iter().map(|u| u + shift));
            knots.extend(std::iter::repeat(end).take(order));
            let curve = BSplineCurve::with_color(order, points, knots, first.color);
            curve.check_structure()?;
            log::debug!(
                "merged curves at {} with junction multiplicity {}",
                first.end,
                multiplicity
            );
            curve
        }
        None => {
            let mut curve = BSplineCurve::with_color(order, points, Vec::new(), first.color);
            curve.make_uniform_knot_vector(first.start, end)?;
            curve.make_open_knot_vector_over(first.start, end)?;
            log::debug!("merged curves with a uniform open knot vector");
            curve
        }
    };
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::merge;
    use crate::bezier::BezierCurve;
    use crate::bspline::BSplineCurve;
    use crate::curve::Curve;
    use crate::error::CurveError;
    use crate::options::Color;
    use crate::point::ControlPoint;
    use approx::assert_relative_eq;

    fn bezier(points: &[(f64, f64)]) -> Curve {
        BezierCurve::new(points.iter().map(|&p| p.into()).collect()).into()
    }

    #[test]
    fn two_cubics() {
        let mut a = bezier(&[(0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)]);
        let mut b = bezier(&[(3.0, 0.0), (4.0, -1.0), (5.0, 3.0), (6.0, 1.0)]);
        let merged = merge(a.clone(), b.clone()).unwrap();
        assert_eq!(merged.control_points().len(), 7);
        assert_eq!(
            merged.knots().as_slice(),
            &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]
        );
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_relative_eq!(merged.evaluate(t).unwrap(), a.evaluate(t).unwrap(), epsilon = 1e-9);
            assert_relative_eq!(
                merged.evaluate(1.0 + t).unwrap(),
                b.evaluate(t).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn bezier_then_spline() {
        let a = bezier(&[(0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)]);
        let b: Curve = BSplineCurve::new(
            3,
            vec![
                ControlPoint::unweighted(5.0, 0.0),
                ControlPoint::unweighted(6.0, 1.0),
                ControlPoint::unweighted(7.0, 0.0),
                ControlPoint::unweighted(8.0, 1.0),
                ControlPoint::unweighted(9.0, 0.0),
            ],
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0],
        )
        .into();
        let merged = merge(a, b).unwrap();
        assert_eq!(merged.order(), 4);
        // Second curve shifted from [0, 3] to [1, 4], no shared point
        assert_eq!(
            merged.knots().as_slice(),
            &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0, 4.0]
        );
        assert_eq!(merged.domain().unwrap(), (0.0, 4.0));
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn fallback_to_uniform() {
        let a: Curve = BSplineCurve::new(
            1,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 0.0),
            ],
            vec![0.0, 0.5, 1.0],
        )
        .into();
        let b = bezier(&[(1.0, 0.0), (2.0, 1.0), (3.0, 0.0)]);
        let merged = merge(a, b).unwrap();
        assert_eq!(merged.order(), 3);
        assert_eq!(merged.control_points().len(), 4);
        assert!(merged.knots().is_open());
        assert_eq!(merged.domain().unwrap(), (0.0, 2.0));
        assert_eq!(merged.base().color(), Color::default());
    }

    #[test]
    fn failure_hands_inputs_back() {
        let a = bezier(&[(0.0, 0.0), (1.0, 1.0)]);
        let b: Curve = BSplineCurve::new(
            4,
            vec![ControlPoint::unweighted(5.0, 0.0)],
            vec![0.0, 1.0],
        )
        .into();
        let error = merge(a, b).unwrap_err();
        assert_eq!(
            error.source,
            CurveError::KnotCount {
                expected: 5,
                found: 2
            }
        );
        assert_eq!(error.first.control_points().len(), 2);
        assert_eq!(error.second.control_points().len(), 1);
    }
}
