//! Kernel wide defaults.
//!
//! The GUI owns a single [`CurveOptions`] value and passes it whenever it creates curves
//! (interactively or through [`crate::description::parse`]).

/// Number of samples used to draw a curve
pub const DEFAULT_SAMPLE_STEPS: usize = 2000;

/// Order given to interactively created B-splines (cubic)
pub const DEFAULT_ORDER: usize = 4;

/// Color of newly created curves
pub const DEFAULT_COLOR: Color = Color([255, 0, 0]);

/// RGB display color of a curve.
///
/// The kernel never interprets it, it's stored so the renderer can draw every curve in its own color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Creates a color from its components
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color([red, green, blue])
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_COLOR
    }
}

/// How a Bézier curve treats its control points' weights
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BezierForm {
    /// Plain Bernstein polynomial, weights are ignored
    #[default]
    Polynomial,

    /// Weighted Bernstein polynomial divided by the weighted basis sum
    Rational,
}

/// Runtime configurable defaults
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CurveOptions {
    /// Number of points [`crate::Curve::sample_with`] produces
    pub sample_steps: usize,

    /// Order of B-splines created from bare control points
    pub default_order: usize,

    /// Color assigned to new curves
    pub color: Color,

    /// Evaluation form of new Bézier curves
    pub bezier_form: BezierForm,
}

impl Default for CurveOptions {
    fn default() -> Self {
        CurveOptions {
            sample_steps: DEFAULT_SAMPLE_STEPS,
            default_order: DEFAULT_ORDER,
            color: DEFAULT_COLOR,
            bezier_form: BezierForm::default(),
        }
    }
}

impl CurveOptions {
    /// Sets the number of samples, at least two are always taken
    pub fn with_sample_steps(mut self, steps: usize) -> Self {
        self.sample_steps = steps.max(2);
        self
    }

    /// Sets the default B-spline order, at least `1`
    pub fn with_default_order(mut self, order: usize) -> Self {
        self.default_order = order.max(1);
        self
    }

    /// Sets the color of new curves
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the evaluation form of new Bézier curves
    pub fn with_bezier_form(mut self, form: BezierForm) -> Self {
        self.bezier_form = form;
        self
    }
}
