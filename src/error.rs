//! Errors reported by the curve kernel.
//!
//! Every failure is structural: nothing here is worth retrying, and no
//! operation that returns an error has modified the curve it was called on.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Everything that can go wrong while evaluating or editing a curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// The evaluation parameter lies outside the curve's domain.
    #[error("parameter {t} is outside the domain [{start}, {end}]")]
    Domain {
        /// Requested parameter
        t: f64,
        /// First valid parameter
        start: f64,
        /// Last valid parameter
        end: f64,
    },

    /// A control point or knot index is out of bounds.
    #[error("index {index} is out of range (len {len})")]
    IndexRange {
        /// Offending index
        index: usize,
        /// Length of the indexed sequence
        len: usize,
    },

    /// The knot vector doesn't have `control points + order` entries.
    #[error("malformed curve: expected {expected} knots, found {found}")]
    KnotCount {
        /// `control points + order`
        expected: usize,
        /// Actual length of the knot vector
        found: usize,
    },

    /// Any other violation which makes the curve unusable until repaired.
    #[error("malformed curve: {0}")]
    Malformed(&'static str),

    /// A control point carries a zero weight.
    #[error("control point {index} has zero weight")]
    DegenerateWeight {
        /// Index of the control point
        index: usize,
    },

    /// Not enough geometry to perform a continuity connection.
    #[error("insufficient geometry: {0}")]
    InsufficientGeometry(&'static str),

    /// An interval with `start >= end` (or non finite bounds) was requested.
    #[error("invalid interval [{start}, {end}]")]
    InvalidInterval {
        /// Requested start
        start: f64,
        /// Requested end
        end: f64,
    },

    /// Inserting the knot would repeat it more often than the curve's order.
    #[error("knot {value} already appears {multiplicity} times (order {order})")]
    KnotMultiplicity {
        /// Knot value
        value: f64,
        /// Current multiplicity
        multiplicity: usize,
        /// Curve order
        order: usize,
    },

    /// A knot or coordinate is NaN or infinite.
    #[error("value {0} is not finite")]
    NonFinite(f64),

    /// Text could not be parsed as a curve or knot description.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number, `0` when parsing a single line
        line: usize,
        /// What went wrong
        message: String,
    },
}

impl CurveError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CurveError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether the curve must be repaired before it can be evaluated again.
    pub fn is_malformed(&self) -> bool {
        matches!(self, CurveError::KnotCount { .. } | CurveError::Malformed(_))
    }
}
