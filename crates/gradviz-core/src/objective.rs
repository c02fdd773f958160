//! Objective function interface.
//!
//! An objective pairs a scalar function on R^n with its gradient. Gradients
//! can be written analytically or left to the provided central finite
//! difference approximation. Keeping both halves behind one trait lets the
//! pairing be checked with [`DerivativeChecker`] independently of any chart.

use crate::{
    error::{GradvizError, Result},
    types::{constants, Point},
};
use std::cell::Cell;
use std::fmt::{self, Debug};

/// A differentiable scalar function to be minimized.
pub trait Objective: Debug {
    /// Dimension n of the points this objective accepts.
    fn dimension(&self) -> usize;

    /// Evaluates the objective at a point.
    fn evaluate(&self, point: &Point) -> Result<f64>;

    /// Computes the gradient at a point.
    ///
    /// # Default Implementation
    ///
    /// Uses central finite differences, see [`Objective::gradient_fd`].
    fn gradient(&self, point: &Point) -> Result<Point> {
        self.gradient_fd(point)
    }

    /// Evaluates the objective and its gradient in one call.
    fn evaluate_and_gradient(&self, point: &Point) -> Result<(f64, Point)> {
        Ok((self.evaluate(point)?, self.gradient(point)?))
    }

    /// Approximates the gradient with central differences.
    ///
    /// The step along each axis is scaled by the magnitude of the coordinate.
    fn gradient_fd(&self, point: &Point) -> Result<Point> {
        self.check_point(point)?;
        let mut gradient = Point::zeros(point.len());
        let mut shifted = point.clone();

        for i in 0..point.len() {
            let x_i = point[i];
            let h = constants::FINITE_DIFFERENCE_STEP * x_i.abs().max(1.0);

            shifted[i] = x_i + h;
            let f_plus = self.evaluate(&shifted)?;
            shifted[i] = x_i - h;
            let f_minus = self.evaluate(&shifted)?;
            shifted[i] = x_i;

            gradient[i] = (f_plus - f_minus) / (h + h);
        }

        Ok(gradient)
    }

    /// Fails with `DimensionMismatch` if `point` has the wrong length.
    fn check_point(&self, point: &Point) -> Result<()> {
        GradvizError::ensure_dimension(self.dimension(), point.len())
    }
}

impl<O: Objective + ?Sized> Objective for &O {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        (**self).evaluate(point)
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        (**self).gradient(point)
    }
}

impl<O: Objective + ?Sized> Objective for Box<O> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        (**self).evaluate(point)
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        (**self).gradient(point)
    }
}

/// Objective built from an explicit pair of closures.
///
/// ```
/// use gradviz_core::{objective::{FnObjective, Objective}, types::{point, Point}};
///
/// let parabola = FnObjective::new(1, |x: &Point| x[0] * x[0], |x: &Point| x * 2.0);
/// assert_eq!(parabola.evaluate(&point(&[3.0])).unwrap(), 9.0);
/// ```
pub struct FnObjective<F, G> {
    dimension: usize,
    value: F,
    gradient: G,
}

impl<F, G> FnObjective<F, G>
where
    F: Fn(&Point) -> f64,
    G: Fn(&Point) -> Point,
{
    /// Pairs a value closure with its analytic gradient.
    pub fn new(dimension: usize, value: F, gradient: G) -> Self {
        Self {
            dimension,
            value,
            gradient,
        }
    }
}

impl<F, G> Debug for FnObjective<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl<F, G> Objective for FnObjective<F, G>
where
    F: Fn(&Point) -> f64,
    G: Fn(&Point) -> Point,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        Ok((self.value)(point))
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        self.check_point(point)?;
        let gradient = (self.gradient)(point);
        GradvizError::ensure_dimension(self.dimension, gradient.len())?;
        Ok(gradient)
    }
}

/// Objective defined by its value alone; the gradient is approximated.
pub struct FnValueObjective<F> {
    dimension: usize,
    value: F,
}

impl<F> FnValueObjective<F>
where
    F: Fn(&Point) -> f64,
{
    /// Wraps a value closure.
    pub fn new(dimension: usize, value: F) -> Self {
        Self { dimension, value }
    }
}

impl<F> Debug for FnValueObjective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValueObjective")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl<F> Objective for FnValueObjective<F>
where
    F: Fn(&Point) -> f64,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.check_point(point)?;
        Ok((self.value)(point))
    }
}

/// Wrapper to count evaluations for testing and debugging.
#[derive(Debug)]
pub struct CountingObjective<O> {
    /// The underlying objective
    pub inner: O,
    evaluations: Cell<usize>,
    gradients: Cell<usize>,
}

impl<O: Objective> CountingObjective<O> {
    /// Creates a new counting wrapper around an objective.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            evaluations: Cell::new(0),
            gradients: Cell::new(0),
        }
    }

    /// Returns `(evaluations, gradients)` counted so far.
    pub fn counts(&self) -> (usize, usize) {
        (self.evaluations.get(), self.gradients.get())
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.evaluations.set(0);
        self.gradients.set(0);
    }
}

impl<O: Objective> Objective for CountingObjective<O> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn evaluate(&self, point: &Point) -> Result<f64> {
        self.evaluations.set(self.evaluations.get() + 1);
        self.inner.evaluate(point)
    }

    fn gradient(&self, point: &Point) -> Result<Point> {
        self.gradients.set(self.gradients.get() + 1);
        self.inner.gradient(point)
    }
}

/// Utilities for checking gradient implementations.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Compares the objective's gradient with finite differences.
    ///
    /// The error of each component is measured relative to
    /// `max(1, |analytic|)`, so steep functions such as Rosenbrock are not
    /// penalized for rounding in the difference quotient.
    ///
    /// # Returns
    ///
    /// A tuple of (passes, max_error).
    pub fn check_gradient<O: Objective + ?Sized>(
        objective: &O,
        point: &Point,
        tol: f64,
    ) -> Result<(bool, f64)> {
        let analytic = objective.gradient(point)?;
        let approximate = objective.gradient_fd(point)?;

        let max_error = analytic
            .iter()
            .zip(approximate.iter())
            .map(|(a, fd)| (a - fd).abs() / a.abs().max(1.0))
            .fold(0.0_f64, f64::max);

        Ok((max_error < tol, max_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::point;
    use approx::assert_relative_eq;

    fn bowl() -> impl Objective {
        FnObjective::new(
            2,
            |x: &Point| x[0] * x[0] + 2.0 * x[1] * x[1],
            |x: &Point| point(&[2.0 * x[0], 4.0 * x[1]]),
        )
    }

    #[test]
    fn test_fn_objective() {
        let f = bowl();
        let p = point(&[1.0, 2.0]);
        assert_relative_eq!(f.evaluate(&p).unwrap(), 9.0);
        assert_relative_eq!(f.gradient(&p).unwrap(), point(&[2.0, 8.0]));
    }

    #[test]
    fn test_dimension_is_checked() {
        let f = bowl();
        let err = f.evaluate(&point(&[1.0])).unwrap_err();
        assert!(matches!(err, GradvizError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_gradient_length_is_checked() {
        let f = FnObjective::new(2, |x: &Point| x.norm_squared(), |_: &Point| point(&[0.0]));
        assert!(f.gradient(&point(&[1.0, 1.0])).is_err());
    }

    #[test]
    fn test_finite_difference_gradient() {
        let f = FnValueObjective::new(2, |x: &Point| x[0] * x[0] + 2.0 * x[1] * x[1]);
        let grad = f.gradient(&point(&[1.0, 2.0])).unwrap();
        assert_relative_eq!(grad[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(grad[1], 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_counting_objective() {
        let f = CountingObjective::new(bowl());
        let p = point(&[1.0, 1.0]);
        assert_eq!(f.counts(), (0, 0));

        let _ = f.evaluate(&p).unwrap();
        let _ = f.gradient(&p).unwrap();
        let _ = f.evaluate_and_gradient(&p).unwrap();
        assert_eq!(f.counts(), (2, 2));

        f.reset_counts();
        assert_eq!(f.counts(), (0, 0));
    }

    #[test]
    fn test_derivative_checker_accepts_consistent_pair() {
        let (passes, error) =
            DerivativeChecker::check_gradient(&bowl(), &point(&[0.3, -1.7]), 1e-6).unwrap();
        assert!(passes, "max error {error}");
    }

    #[test]
    fn test_derivative_checker_rejects_wrong_pair() {
        // gradient off by a factor of two
        let wrong = FnObjective::new(1, |x: &Point| x[0] * x[0], |x: &Point| x * 4.0);
        let (passes, error) =
            DerivativeChecker::check_gradient(&wrong, &point(&[1.5]), 1e-6).unwrap();
        assert!(!passes);
        assert!(error > 0.4);
    }

    #[test]
    fn test_boxed_objective() {
        let boxed: Box<dyn Objective> = Box::new(bowl());
        assert_eq!(boxed.dimension(), 2);
        assert_relative_eq!(boxed.evaluate(&point(&[1.0, 0.0])).unwrap(), 1.0);
    }
}
