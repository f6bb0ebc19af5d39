#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod base;
pub mod bezier;
pub mod bspline;
pub mod composite;
pub mod connect;
pub mod curve;
pub mod description;
pub mod error;
pub mod knots;
pub mod options;
pub mod point;

pub use crate::base::{CurveBase, RenderHandles, SegmentId};
pub use crate::bezier::BezierCurve;
pub use crate::bspline::{basis_functions, BSplineCurve};
pub use crate::composite::{merge, MergeError};
pub use crate::connect::{connect_pair, Continuity};
pub use crate::curve::Curve;
pub use crate::error::{CurveError, Result};
pub use crate::knots::KnotVector;
pub use crate::options::{BezierForm, Color, CurveOptions};
pub use crate::point::ControlPoint;

#[cfg(test)]
mod tests {
    use crate::{BSplineCurve, BezierCurve, Color, Continuity, ControlPoint, Curve, CurveError};
    use nalgebra::Vector2;

    fn arch() -> Vec<ControlPoint> {
        vec![
            ControlPoint::unweighted(0.0, 0.0),
            ControlPoint::unweighted(1.0, 2.0),
            ControlPoint::unweighted(2.0, 2.0),
            ControlPoint::unweighted(3.0, 0.0),
        ]
    }

    #[test]
    fn cubic_scenario() {
        let curve = BSplineCurve::new(4, arch(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(curve.evaluate(0.0).unwrap(), Vector2::new(0.0, 0.0));
        assert_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(3.0, 0.0));
    }

    #[test]
    fn bezier_interpolates_ends() {
        let mut curve = BezierCurve::new(vec![
            ControlPoint::new(50.0, 0.0, 2.0),
            ControlPoint::unweighted(200.0, 33.0),
            ControlPoint::unweighted(0.0, 66.0),
            ControlPoint::new(50.0, 100.0, 0.5),
        ]);
        assert_eq!(curve.evaluate(0.0).unwrap(), Vector2::new(50.0, 0.0));
        assert_eq!(curve.evaluate(1.0).unwrap(), Vector2::new(50.0, 100.0));
    }

    #[test]
    fn open_spline_interpolates_ends() {
        let mut points = arch();
        points.push(ControlPoint::new(4.0, 3.0, 3.0));
        points.push(ControlPoint::unweighted(6.0, 1.0));
        for order in 1..=6 {
            let curve = BSplineCurve::open_uniform(order, points.clone(), Color::default()).unwrap();
            let (start, end) = curve.domain().unwrap();
            assert_eq!(curve.evaluate(start).unwrap(), Vector2::new(0.0, 0.0));
            assert_eq!(curve.evaluate(end).unwrap(), Vector2::new(6.0, 1.0));
        }
    }

    #[test]
    fn c0_connection_is_exact() {
        let mut a: Curve = BezierCurve::new(arch()).into();
        let mut b: Curve = BSplineCurve::new(
            3,
            vec![
                ControlPoint::unweighted(5.0, 5.0),
                ControlPoint::new(6.0, 4.0, 2.0),
                ControlPoint::unweighted(7.0, 5.0),
                ControlPoint::unweighted(8.0, 6.0),
            ],
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
        )
        .into();
        a.connect(&mut b, Continuity::C0).unwrap();
        let start = b.domain_start().unwrap();
        assert_eq!(a.evaluate(1.0).unwrap(), b.evaluate(start).unwrap());

        let mut b_to_a = b.clone();
        b_to_a.connect(&mut a, Continuity::C0).unwrap();
        let end = b_to_a.domain_end().unwrap();
        assert_eq!(b_to_a.evaluate(end).unwrap(), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn span_boundaries() {
        let curve = BSplineCurve::new(
            3,
            vec![
                ControlPoint::unweighted(0.0, 0.0),
                ControlPoint::unweighted(1.0, 1.0),
                ControlPoint::unweighted(2.0, 0.0),
                ControlPoint::unweighted(3.0, 1.0),
            ],
            vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0],
        );
        // Interior knot belongs to the span on its right, the domain end to the last span
        assert_eq!(curve.find_knot_span(0.5).unwrap(), 3);
        assert_eq!(curve.find_knot_span(0.4999).unwrap(), 2);
        assert_eq!(curve.find_knot_span(1.0).unwrap(), 3);
        assert_eq!(
            curve.find_knot_span(1.5),
            Err(CurveError::Domain {
                t: 1.5,
                start: 0.0,
                end: 1.0
            })
        );
        assert!(matches!(
            curve.find_knot_span(f64::NAN),
            Err(CurveError::NonFinite(_))
        ));
    }
}
