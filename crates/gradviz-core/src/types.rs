//! Type aliases and numerical constants.

use nalgebra::{DMatrix, DVector};

/// A point in R^n. The catalog only uses n = 1 and n = 2.
pub type Point = DVector<f64>;

/// Row-per-sample data matrix.
pub type Samples = DMatrix<f64>;

/// Builds a [`Point`] from a slice of coordinates.
pub fn point(coordinates: &[f64]) -> Point {
    Point::from_column_slice(coordinates)
}

/// Numerical constants shared by the crate.
pub mod constants {
    /// Relative step used by central finite differences (cube root of machine epsilon).
    pub const FINITE_DIFFERENCE_STEP: f64 = 6.055_454_452_393_343e-6;

    /// Default tolerance for [`crate::objective::DerivativeChecker`].
    pub const DERIVATIVE_TOLERANCE: f64 = 1e-5;

    /// Probabilities are kept this far away from 0 and 1 before a logarithm.
    pub const PROBABILITY_EPSILON: f64 = 1e-9;

    /// Absolute tolerance of the step law checks.
    pub const STEP_LAW_TOLERANCE: f64 = 1e-12;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_builder() {
        let p = point(&[1.0, -2.0]);
        assert_eq!(p.len(), 2);
        assert_eq!(p[1], -2.0);
    }

    #[test]
    fn test_finite_difference_step_is_cbrt_epsilon() {
        approx::assert_relative_eq!(
            constants::FINITE_DIFFERENCE_STEP,
            f64::EPSILON.cbrt(),
            max_relative = 1e-12
        );
    }
}
