//! Text format for storing curves.
//!
//! A description holds any number of curves, each one being
//!
//! ```text
//! # comment
//! <order>
//! knots[<N>] = <k0> <k1> ...     (B-splines only, may continue on the following lines)
//! <x> <y> <w>                    (one control point per line, homogeneous)
//! ```
//!
//! A Bézier curve has `order` control points, a B-spline `N - order`. Coordinates on disk
//! are multiplied by their weight; [`parse`] divides them out again and [`write`] puts
//! them back. A point given as just `<x> <y>` has weight `1`.

use std::fmt::Write as _;

use crate::bezier::BezierCurve;
use crate::bspline::BSplineCurve;
use crate::curve::Curve;
use crate::error::{CurveError, Result};
use crate::knots::{parse_header, parse_values};
use crate::options::CurveOptions;
use crate::point::ControlPoint;

/// Non blank lines with comments stripped, paired with their 1-based line number
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.inner.by_ref() {
            self.last = index + 1;
            let content = match line.split_once('#') {
                Some((content, _)) => content,
                None => line,
            };
            let content = content.trim();
            if !content.is_empty() {
                return Some((index + 1, content));
            }
        }
        None
    }
}

/// Parses every curve in `text`.
///
/// New curves get their color (and Bézier curves their form) from `options`. Fails on the
/// first syntax error without returning any curve.
pub fn parse(text: &str, options: &CurveOptions) -> Result<Vec<Curve>> {
    let mut lines = Lines::new(text);
    let mut curves = Vec::new();

    while let Some((line_number, line)) = lines.next() {
        let order = line
            .parse::<usize>()
            .map_err(|e| CurveError::parse(line_number, format!("bad order `{}`: {}", line, e)))?;
        if order == 0 {
            return Err(CurveError::parse(line_number, "order must be at least 1"));
        }

        let (line_number, line) = lines
            .next()
            .ok_or_else(|| CurveError::parse(lines.last, "curve has no control points"))?;

        let curve = if line.starts_with("knots") {
            let knots = parse_knots(&mut lines, line_number, line)?;
            if knots.len() < order {
                return Err(CurveError::parse(
                    line_number,
                    format!("{} knots are too few for order {}", knots.len(), order),
                ));
            }
            let points = parse_points(&mut lines, knots.len() - order, Vec::new())?;
            let curve = BSplineCurve::with_color(order, points, knots, options.color);
            if let Err(e) = curve.validate() {
                log::warn!("curve described on line {} won't evaluate: {}", line_number, e);
            }
            Curve::BSpline(curve)
        } else {
            let first = parse_point_line(line_number, line, 0)?;
            let points = parse_points(&mut lines, order, first)?;
            Curve::Bezier(BezierCurve::with_order(
                order,
                points,
                options.color,
                options.bezier_form,
            ))
        };
        log::debug!(
            "parsed curve of order {} with {} control points",
            order,
            curve.control_points().len()
        );
        curves.push(curve);
    }

    Ok(curves)
}

/// Collects the knot values, following the list onto further lines until `N` are read.
fn parse_knots(lines: &mut Lines<'_>, line_number: usize, line: &str) -> Result<Vec<f64>> {
    let (count, rest) = parse_header(line, line_number)?;
    let mut knots = parse_values(rest, line_number)?;
    let mut last_line = line_number;
    while knots.len() < count {
        let (line_number, line) = lines.next().ok_or_else(|| {
            CurveError::parse(
                lines.last,
                format!("expected {} knots, found {}", count, knots.len()),
            )
        })?;
        knots.extend(parse_values(line, line_number)?);
        last_line = line_number;
    }
    if knots.len() > count {
        return Err(CurveError::parse(
            last_line,
            format!("expected {} knots, found {}", count, knots.len()),
        ));
    }
    Ok(knots)
}

/// Reads control point lines until `count` points are there.
fn parse_points(
    lines: &mut Lines<'_>,
    count: usize,
    mut points: Vec<ControlPoint>,
) -> Result<Vec<ControlPoint>> {
    while points.len() < count {
        let (line_number, line) = lines.next().ok_or_else(|| {
            CurveError::parse(
                lines.last,
                format!("expected {} control points, found {}", count, points.len()),
            )
        })?;
        points.extend(parse_point_line(line_number, line, points.len())?);
    }
    if points.len() > count {
        return Err(CurveError::parse(
            lines.last,
            format!("expected {} control points, found {}", count, points.len()),
        ));
    }
    Ok(points)
}

/// Parses `x y` or one or more `x y w` triples.
///
/// `first_index` is the index the first point will get in its curve, for error reporting.
fn parse_point_line(line_number: usize, line: &str, first_index: usize) -> Result<Vec<ControlPoint>> {
    let values = parse_values(line, line_number)?;
    match values.len() {
        2 => Ok(vec![ControlPoint::unweighted(values[0], values[1])]),
        n if n > 0 && n % 3 == 0 => values
            .chunks_exact(3)
            .enumerate()
            .map(|(i, v)| {
                if v[2] == 0.0 {
                    return Err(CurveError::DegenerateWeight {
                        index: first_index + i,
                    });
                }
                Ok(ControlPoint::new(v[0] / v[2], v[1] / v[2], v[2]))
            })
            .collect(),
        n => Err(CurveError::parse(
            line_number,
            format!("expected `x y w`, found {} numbers", n),
        )),
    }
}

/// Formats `curves` so that [`parse`] reads them back.
pub fn write(curves: &[Curve]) -> String {
    let mut out = String::new();
    for (i, curve) in curves.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String can't fail
        let _ = writeln!(out, "{}", curve.order());
        if let Curve::BSpline(spline) = curve {
            let _ = writeln!(out, "{}", spline.knots());
        }
        for point in curve.control_points() {
            let h = point.homogeneous();
            let _ = writeln!(out, "{} {} {}", h.x, h.y, h.z);
        }
    }
    out
}
