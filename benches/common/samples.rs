use nspline::{BSplineCurve, BezierCurve, Color, ControlPoint, Curve};
use once_cell::sync::Lazy;

/// Points generated randomly
/// ```python
/// from random import random
/// for i in range(10):
///     print(f"({(random()-0.5)*i}, {(random()-0.5)*i}, {0.5 + random()}),")
/// ```
pub static POINTS: [(f64, f64, f64); 10] = [
    ( 0.0,      0.0,     1.0    ),
    (-0.29734,  0.44984, 1.21342),
    (-0.52560,  0.42885, 0.68321),
    ( 1.42777, -0.02652, 1.02291),
    ( 1.98032, -0.67824, 0.97510),
    ( 0.44863, -0.91328, 1.38872),
    (-2.51139, -0.79100, 0.55301),
    (-3.10479, -0.59318, 1.10034),
    (-1.16022, -2.95591, 0.81207),
    (-1.07946,  0.78888, 1.49963),
];

fn points(indices: &[usize]) -> Vec<ControlPoint> {
    indices
        .iter()
        .map(|&i| {
            let (x, y, w) = POINTS[i];
            ControlPoint::new(x, y, w)
        })
        .collect()
}

pub static CURVES: Lazy<Curves> = Lazy::new(Curves::new);
#[allow(non_snake_case)]
pub struct Curves {
    pub CUBIC: Vec<BezierCurve>,
    pub HIGHER: Vec<BezierCurve>,
    pub SPLINES: Vec<BSplineCurve>,
}
impl Curves {
    pub fn new() -> Curves {
        let spline = |indices: &[usize], order| {
            BSplineCurve::open_uniform(order, points(indices), Color::default())
                .expect("sample splines are valid")
        };
        Curves {
            CUBIC:   vec![
                BezierCurve::new(points(&[0, 1, 2, 3])),
                BezierCurve::new(points(&[2, 3, 4, 5])),
                BezierCurve::new(points(&[4, 5, 6, 7])),
                BezierCurve::new(points(&[6, 7, 8, 9])),
                BezierCurve::new(points(&[0, 4, 2, 6])),
            ],
            HIGHER:  vec![
                BezierCurve::new(points(&[0, 1, 2, 3, 4])),
                BezierCurve::new(points(&[4, 8, 6, 0, 2, 5, 7])),
                BezierCurve::new(points(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9])),
            ],
            SPLINES: vec![
                spline(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 4),
                spline(&[9, 7, 5, 3, 1, 0, 2, 4, 6, 8], 3),
                spline(&[0, 4, 2, 6, 8, 1, 3], 5),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Curve> + '_ {
        self.CUBIC
            .iter()
            .chain(self.HIGHER.iter())
            .cloned()
            .map(Curve::from)
            .chain(self.SPLINES.iter().cloned().map(Curve::from))
    }
}
