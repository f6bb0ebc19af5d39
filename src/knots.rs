//! Knot vectors and the knot edits that keep a B-spline's shape.
//!
//! [`KnotVector`] owns the raw knots together with the derived unique knots and their
//! multiplicities. Every mutating method recomputes the derived data before returning,
//! so they are never stale when a curve gets evaluated.
//!
//! Knot insertion and removal also rewrite the control points. They are implemented as
//! free functions over slices and return fresh vectors, so a failing edit leaves the
//! curve untouched.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::error::{CurveError, Result};
use crate::point::ControlPoint;

/// Deviation above which a knot removal is reported as changing the curve
pub const REMOVAL_TOLERANCE: f64 = 1e-9;

/// A non-decreasing sequence of knots
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotVector {
    knots: Vec<f64>,
    unique: Vec<f64>,
    multiplicity: Vec<usize>,
    uniform: bool,
    open: bool,
}

impl Deref for KnotVector {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.knots
    }
}

impl KnotVector {
    /// Wraps raw knots, repairing a single local ordering violation.
    pub fn new(knots: Vec<f64>) -> Self {
        let mut vector = KnotVector {
            knots,
            ..KnotVector::default()
        };
        vector.ensure_non_decreasing();
        vector.recompute_unique_and_multiplicity();
        vector
    }

    /// Creates `count` equally spaced knots from `start` to `end`
    pub fn uniform(count: usize, start: f64, end: f64) -> Result<Self> {
        let mut vector = KnotVector::default();
        vector.make_uniform(count, start, end)?;
        Ok(vector)
    }

    /// Raw knots
    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    /// Distinct knot values in increasing order
    pub fn unique_knots(&self) -> &[f64] {
        &self.unique
    }

    /// How often each of [`KnotVector::unique_knots`] appears
    pub fn multiplicities(&self) -> &[usize] {
        &self.multiplicity
    }

    /// Multiplicity of `value`, zero if it isn't a knot
    pub fn multiplicity_of(&self, value: f64) -> usize {
        self.unique
            .iter()
            .position(|&u| u == value)
            .map_or(0, |i| self.multiplicity[i])
    }

    /// Whether the knots were last generated by [`KnotVector::make_uniform`]
    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    /// Whether the ends were last clamped by [`KnotVector::make_open`]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether no knot is smaller than its predecessor
    pub fn is_non_decreasing(&self) -> bool {
        self.knots.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Regenerates `count` equally spaced knots spanning `[start, end]`.
    ///
    /// For a curve with `n` control points, `count = n + order` and knot `i` becomes
    /// `start + (end - start) · i / (n + degree)`.
    pub fn make_uniform(&mut self, count: usize, start: f64, end: f64) -> Result<()> {
        check_interval(start, end)?;
        if count < 2 {
            return Err(CurveError::Malformed("a knot vector needs at least two knots"));
        }
        let last = (count - 1) as f64;
        self.knots = (0..count)
            .map(|i| start + (end - start) * i as f64 / last)
            .collect();
        // Avoid rounding leaving the last knot just below `end`
        self.knots[count - 1] = end;
        self.uniform = true;
        self.open = false;
        self.recompute_unique_and_multiplicity();
        Ok(())
    }

    /// Clamps the first and last `order` knots to `start` and `end`.
    ///
    /// Interior knots stay as they are, unless they don't fit into `[start, end]`;
    /// then the whole vector is made uniform first.
    pub fn make_open(&mut self, order: usize, start: f64, end: f64) -> Result<()> {
        check_interval(start, end)?;
        if order == 0 || self.knots.len() < 2 * order {
            return Err(CurveError::Malformed(
                "an open knot vector needs at least `order` control points",
            ));
        }
        let len = self.knots.len();
        let interior = &self.knots[order..len - order];
        let fits = interior.iter().all(|&u| start <= u && u <= end);
        if !fits || !self.is_non_decreasing() {
            self.make_uniform(len, start, end)?;
        }
        let uniform = self.uniform;
        for knot in &mut self.knots[..order] {
            *knot = start;
        }
        for knot in &mut self.knots[len - order..] {
            *knot = end;
        }
        self.uniform = uniform;
        self.open = true;
        self.recompute_unique_and_multiplicity();
        Ok(())
    }

    /// Replaces knot `index` and repairs the ordering locally.
    pub fn update(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.knots.len() {
            return Err(CurveError::IndexRange {
                index,
                len: self.knots.len(),
            });
        }
        if !value.is_finite() {
            return Err(CurveError::NonFinite(value));
        }
        self.knots[index] = value;
        self.ensure_non_decreasing();
        self.uniform = false;
        self.open = false;
        self.recompute_unique_and_multiplicity();
        Ok(())
    }

    /// Single left to right pass swapping adjacent knots which are out of order.
    ///
    /// This only repairs a single local violation (e.g. one edited knot moved past its
    /// right neighbour). Returns whether anything was swapped.
    pub fn ensure_non_decreasing(&mut self) -> bool {
        let mut swapped = false;
        for i in 1..self.knots.len() {
            if self.knots[i - 1] > self.knots[i] {
                self.knots.swap(i - 1, i);
                swapped = true;
            }
        }
        if swapped {
            log::debug!("reordered knot vector {:?}", self.knots);
        }
        swapped
    }

    /// Groups consecutive equal knots into unique knots and multiplicities
    pub fn recompute_unique_and_multiplicity(&mut self) {
        self.unique.clear();
        self.multiplicity.clear();
        for &knot in &self.knots {
            match self.unique.last() {
                Some(&last) if last == knot => {
                    if let Some(count) = self.multiplicity.last_mut() {
                        *count += 1;
                    }
                }
                _ => {
                    self.unique.push(knot);
                    self.multiplicity.push(1);
                }
            }
        }
    }

    /// Installs knots computed by an insertion or removal, keeping the open flag.
    pub(crate) fn replace(&mut self, knots: Vec<f64>) {
        self.knots = knots;
        self.uniform = false;
        self.recompute_unique_and_multiplicity();
    }

    /// Clamps the last `order` knots to `end` (used before a C0 connection)
    pub(crate) fn clamp_end(&mut self, order: usize, end: f64) {
        let len = self.knots.len();
        for knot in &mut self.knots[len.saturating_sub(order)..] {
            *knot = end;
        }
        self.uniform = false;
        self.recompute_unique_and_multiplicity();
    }
}

fn check_interval(start: f64, end: f64) -> Result<()> {
    if start.is_finite() && end.is_finite() && start < end {
        Ok(())
    } else {
        Err(CurveError::InvalidInterval { start, end })
    }
}

impl fmt::Display for KnotVector {
    /// Formats as `knots[N] = k0 k1 ...`, the syntax of curve descriptions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "knots[{}] =", self.knots.len())?;
        for knot in &self.knots {
            write!(f, " {}", knot)?;
        }
        Ok(())
    }
}

impl FromStr for KnotVector {
    type Err = CurveError;

    /// Parses `knots[N] = k0 k1 ...`; the number of values must match `N`.
    fn from_str(s: &str) -> Result<Self> {
        let (count, values) = parse_header(s, 0)?;
        let knots = parse_values(values, 0)?;
        if knots.len() != count {
            return Err(CurveError::parse(
                0,
                format!("header announces {} knots, found {}", count, knots.len()),
            ));
        }
        Ok(KnotVector::new(knots))
    }
}

/// Splits `knots[N] = rest` into `N` and `rest`
pub(crate) fn parse_header(line: &str, line_number: usize) -> Result<(usize, &str)> {
    let line = line.trim();
    let rest = line
        .strip_prefix("knots")
        .ok_or_else(|| CurveError::parse(line_number, "expected `knots[N] = ...`"))?
        .trim_start();
    let rest = rest
        .strip_prefix('[')
        .ok_or_else(|| CurveError::parse(line_number, "missing `[` after `knots`"))?;
    let (count, rest) = rest
        .split_once(']')
        .ok_or_else(|| CurveError::parse(line_number, "missing `]` after knot count"))?;
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|e| CurveError::parse(line_number, format!("bad knot count: {}", e)))?;
    let rest = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| CurveError::parse(line_number, "missing `=` after knot count"))?;
    Ok((count, rest))
}

/// Parses whitespace separated finite numbers
pub(crate) fn parse_values(text: &str, line_number: usize) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|word| match word.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(value) => Err(CurveError::parse(line_number, format!("{} is not finite", value))),
            Err(e) => Err(CurveError::parse(line_number, format!("bad number `{}`: {}", word, e))),
        })
        .collect()
}

/// Boehm's knot insertion.
///
/// Inserts `value` into `knots` and computes the control points describing the same
/// curve over the refined knots. With `k` the span containing `value`, points outside
/// the window `[k - degree + 1, k]` are copied and the ones inside become
/// `(1 - αᵢ) · Pᵢ₋₁ + αᵢ · Pᵢ` with `αᵢ = (value - uᵢ) / (uᵢ₊degree - uᵢ)`,
/// blended in homogeneous coordinates.
///
/// `value` must lie in `[knots[degree], knots[points.len()])`.
pub(crate) fn insert(
    knots: &[f64],
    points: &[ControlPoint],
    degree: usize,
    value: f64,
) -> Result<(Vec<f64>, Vec<ControlPoint>)> {
    let span = knots.partition_point(|&u| u <= value) - 1;
    let homogeneous: Vec<Vector3<f64>> = points.iter().map(ControlPoint::homogeneous).collect();

    let mut new_points = Vec::with_capacity(points.len() + 1);
    for i in 0..=points.len() {
        let h = if i + degree <= span {
            homogeneous[i]
        } else if i > span {
            homogeneous[i - 1]
        } else {
            let alpha = (value - knots[i]) / (knots[i + degree] - knots[i]);
            homogeneous[i - 1] * (1.0 - alpha) + homogeneous[i] * alpha
        };
        let point =
            ControlPoint::from_homogeneous(h).ok_or(CurveError::DegenerateWeight { index: i })?;
        new_points.push(point);
    }

    let mut new_knots = Vec::with_capacity(knots.len() + 1);
    new_knots.extend_from_slice(&knots[..=span]);
    new_knots.push(value);
    new_knots.extend_from_slice(&knots[span + 1..]);

    Ok((new_knots, new_points))
}

/// Result of [`remove`]
pub(crate) struct Removal {
    pub knots: Vec<f64>,
    pub points: Vec<ControlPoint>,
    pub deviation: f64,
}

/// Removes one occurrence of the knot at `index` (Piegl & Tiller, algorithm A5.8).
///
/// The control points in the window `[r - degree, r - s]` (`r` being the last index of
/// the knot's value, `s` its multiplicity) are solved for from both ends of the window
/// by inverting the insertion blend. If the knot wasn't removable exactly, the two
/// solutions disagree; their midpoint is kept and the disagreement is returned as
/// `deviation`.
///
/// The caller guarantees that `knots[index]` lies strictly inside the curve's domain.
pub(crate) fn remove(
    knots: &[f64],
    points: &[ControlPoint],
    degree: usize,
    index: usize,
) -> Result<Removal> {
    let value = knots[index];
    let r = index + knots[index..].iter().take_while(|&&u| u == value).count() - 1;
    let s = knots[..=r].iter().rev().take_while(|&&u| u == value).count();
    let p = degree;
    let first = r - p;
    let last = r - s;
    let off = first - 1;

    let mut homogeneous: Vec<Vector3<f64>> = points.iter().map(ControlPoint::homogeneous).collect();
    let mut temp = vec![Vector3::zeros(); last + 2 - off];
    temp[0] = homogeneous[off];
    temp[last + 1 - off] = homogeneous[last + 1];

    let (mut i, mut j) = (first, last);
    let (mut ii, mut jj) = (1, last - off);
    while j > i {
        let alpha_i = (value - knots[i]) / (knots[i + p + 1] - knots[i]);
        let alpha_j = (value - knots[j]) / (knots[j + p + 1] - knots[j]);
        temp[ii] = (homogeneous[i] - temp[ii - 1] * (1.0 - alpha_i)) / alpha_i;
        temp[jj] = (homogeneous[j] - temp[jj + 1] * alpha_j) / (1.0 - alpha_j);
        i += 1;
        ii += 1;
        j -= 1;
        jj -= 1;
    }

    let deviation = if j < i {
        let deviation = (temp[ii - 1] - temp[jj + 1]).norm();
        let middle = (temp[ii - 1] + temp[jj + 1]) * 0.5;
        temp[ii - 1] = middle;
        temp[jj + 1] = middle;
        deviation
    } else {
        let alpha_i = (value - knots[i]) / (knots[i + p + 1] - knots[i]);
        let blended = temp[ii + 1] * alpha_i + temp[ii - 1] * (1.0 - alpha_i);
        (homogeneous[i] - blended).norm()
    };

    let (mut i, mut j) = (first, last);
    while j > i {
        homogeneous[i] = temp[i - off];
        homogeneous[j] = temp[j - off];
        i += 1;
        j -= 1;
    }
    let dropped = (2 * r - s - p) / 2;
    homogeneous.remove(dropped);

    let points = homogeneous
        .into_iter()
        .enumerate()
        .map(|(index, h)| {
            ControlPoint::from_homogeneous(h).ok_or(CurveError::DegenerateWeight { index })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut knots = knots.to_vec();
    knots.remove(r);

    Ok(Removal {
        knots,
        points,
        deviation,
    })
}
