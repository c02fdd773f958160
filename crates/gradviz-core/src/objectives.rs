//! Closed-form objectives used by the chart catalog.
//!
//! Every objective here carries an analytic gradient; the integration tests
//! check each one against finite differences.

use crate::{
    error::{GradvizError, Result},
    objective::Objective,
    types::{point, Point},
};

/// One-dimensional parabola J(θ) = (θ - center)² + offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    /// Location of the minimum
    pub center: f64,
    /// Value at the minimum
    pub offset: f64,
}

impl Parabola {
    /// J(θ) = θ², the workhorse of the one-dimensional figures.
    pub const fn unit() -> Self {
        Self {
            center: 0.0,
            offset: 0.0,
        }
    }

    /// Creates a shifted parabola.
    pub const fn new(center: f64, offset: f64) -> Self {
        Self { center, offset }
    }

    /// Derivative as a plain scalar function.
    pub fn slope(&self, theta: f64) -> f64 {
        2.0 * (theta - self.center)
    }

    /// Value as a plain scalar function.
    pub fn value(&self, theta: f64) -> f64 {
        (theta - self.center).powi(2) + self.offset
    }
}

impl Objective for Parabola {
    fn dimension(&self) -> usize {
        1
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        Ok(self.value(point[0]))
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        Ok(point(&[self.slope(p[0])]))
    }
}

/// One-dimensional polynomial Σ cₖ θᵏ, coefficients in increasing degree.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in increasing degree.
    pub fn new(coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(GradvizError::invalid_input(
                "a polynomial needs at least one coefficient",
            ));
        }
        Ok(Self { coefficients })
    }

    /// Non-convex quartic 0.1θ⁴ + 0.2θ³ - 1.5θ² - 1.8θ + 5.
    ///
    /// Global minimum near θ ≈ 2.40, local minimum near θ ≈ -3.34.
    pub fn non_convex_quartic() -> Self {
        Self {
            coefficients: vec![5.0, -1.8, -1.5, 0.2, 0.1],
        }
    }

    /// Coefficients in increasing degree.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Horner evaluation.
    pub fn value(&self, theta: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * theta + c)
    }

    /// Horner evaluation of the derivative.
    pub fn slope(&self, theta: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (k, c)| acc * theta + k as f64 * c)
    }
}

impl Objective for Polynomial {
    fn dimension(&self) -> usize {
        1
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        Ok(self.value(point[0]))
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        Ok(point(&[self.slope(p[0])]))
    }
}

/// f(x) = 0.1x² + cos x: an even function with two symmetric wells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CosineWell;

impl Objective for CosineWell {
    fn dimension(&self) -> usize {
        1
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        let x = point[0];
        Ok(0.1 * x * x + x.cos())
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        let x = p[0];
        Ok(point(&[0.2 * x - x.sin()]))
    }
}

/// Axis-aligned quadratic bowl Σ ½wᵢ(xᵢ - cᵢ)².
///
/// Unequal weights give the elongated contours used to show zig-zagging
/// descent.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisQuadratic {
    weights: Point,
    center: Point,
}

impl AxisQuadratic {
    /// Creates a bowl; weights must be positive and match the center.
    pub fn new(weights: Point, center: Point) -> Result<Self> {
        GradvizError::ensure_dimension(weights.len(), center.len())?;
        if let Some(w) = weights.iter().find(|w| !(**w > 0.0)) {
            return Err(GradvizError::invalid_configuration(
                "weights must be positive",
                "weights",
                w,
            ));
        }
        Ok(Self { weights, center })
    }

    /// 0.5x² + 2.5y², minimum at the origin.
    pub fn elongated() -> Self {
        Self {
            weights: point(&[1.0, 5.0]),
            center: point(&[0.0, 0.0]),
        }
    }

    /// 0.5(θ₁ - 2)² + 2.5(θ₂ - 1)², minimum at (2, 1).
    pub fn shifted() -> Self {
        Self {
            weights: point(&[1.0, 5.0]),
            center: point(&[2.0, 1.0]),
        }
    }

    /// Location of the minimum.
    pub fn minimizer(&self) -> &Point {
        &self.center
    }

    /// Largest learning rate for which descent still converges (2 / max wᵢ).
    pub fn stability_threshold(&self) -> f64 {
        2.0 / self.weights.max()
    }
}

impl Objective for AxisQuadratic {
    fn dimension(&self) -> usize {
        self.weights.len()
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        let offset = point - &self.center;
        Ok(0.5 * self.weights.dot(&offset.component_mul(&offset)))
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        self.check_point(point)?;
        Ok(self.weights.component_mul(&(point - &self.center)))
    }
}

/// Rosenbrock's banana function (a - x)² + b(y - x²)².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosenbrock {
    /// Location parameter; the minimum is at (a, a²)
    pub a: f64,
    /// Valley steepness
    pub b: f64,
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self { a: 1.0, b: 100.0 }
    }
}

impl Rosenbrock {
    /// Global minimum (a, a²).
    pub fn minimizer(&self) -> Point {
        point(&[self.a, self.a * self.a])
    }
}

impl Objective for Rosenbrock {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        let (x, y) = (point[0], point[1]);
        Ok((self.a - x).powi(2) + self.b * (y - x * x).powi(2))
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        let (x, y) = (p[0], p[1]);
        let valley = y - x * x;
        Ok(point(&[
            -2.0 * (self.a - x) - 4.0 * self.b * x * valley,
            2.0 * self.b * valley,
        ]))
    }
}

/// Σ xᵢ² + 2 sin(1.5 xᵢ): a bowl with a sinusoidal ripple along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RipplingBowl {
    dimension: usize,
}

impl RipplingBowl {
    /// Creates the bowl in `dimension` variables.
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Contribution of a single coordinate, w² + 2 sin(1.5w).
    pub fn axis_term(w: f64) -> f64 {
        w * w + 2.0 * (1.5 * w).sin()
    }
}

impl Default for RipplingBowl {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Objective for RipplingBowl {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        Ok(point.iter().copied().map(Self::axis_term).sum())
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        self.check_point(point)?;
        Ok(point.map(|w| 2.0 * w + 3.0 * (1.5 * w).cos()))
    }
}

/// Two-basin loss surface used by the optimizer comparison figure.
///
/// 0.5(w₁² + 0.5w₂² - 0.3w₁w₂) + 1.5 sin(1.5w₁) + 2 cos(1.2w₂) + 0.1w₁
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TwoBasinSurface;

impl Objective for TwoBasinSurface {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        let (w1, w2) = (point[0], point[1]);
        Ok(0.5 * (w1 * w1 + 0.5 * w2 * w2 - 0.3 * w1 * w2)
            + 1.5 * (1.5 * w1).sin()
            + 2.0 * (1.2 * w2).cos()
            + 0.1 * w1)
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        let (w1, w2) = (p[0], p[1]);
        Ok(point(&[
            w1 - 0.15 * w2 + 2.25 * (1.5 * w1).cos() + 0.1,
            0.5 * w2 - 0.15 * w1 - 2.4 * (1.2 * w2).sin(),
        ]))
    }
}

/// Two inverted Gaussians plus a small cosine ripple.
///
/// The deeper well sits at (0.5, 0.5), the shallower one at (-0.5, -0.5).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianWells;

impl GaussianWells {
    fn wells(x: f64, y: f64) -> (f64, f64) {
        let deep = -2.0 * (-((x - 0.5).powi(2) + (y - 0.5).powi(2)) / 0.3).exp();
        let shallow = -1.5 * (-((x + 0.5).powi(2) + (y + 0.5).powi(2)) / 0.5).exp();
        (deep, shallow)
    }
}

impl Objective for GaussianWells {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        let (x, y) = (point[0], point[1]);
        let (deep, shallow) = Self::wells(x, y);
        Ok(deep + shallow + 0.1 * (5.0 * x).cos() * (5.0 * y).sin())
    }

    fn gradient(&self, p: &Point) -> Result<Point> {
        self.check_point(p)?;
        let (x, y) = (p[0], p[1]);
        let (deep, shallow) = Self::wells(x, y);
        let dx = deep * (-2.0 * (x - 0.5) / 0.3) + shallow * (-2.0 * (x + 0.5) / 0.5)
            - 0.5 * (5.0 * x).sin() * (5.0 * y).sin();
        let dy = deep * (-2.0 * (y - 0.5) / 0.3)
            + shallow * (-2.0 * (y + 0.5) / 0.5)
            + 0.5 * (5.0 * x).cos() * (5.0 * y).cos();
        Ok(point(&[dx, dy]))
    }
}
