//! Error types for objectives, simulations and teaching statistics.
//!
//! Divergence of a simulation is deliberately absent from this taxonomy: a
//! trajectory that grows without bound is a valid result, not a failure.

use thiserror::Error;

/// Errors that can occur while evaluating objectives or preparing chart data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradvizError {
    /// Two vectors that must agree in length do not.
    ///
    /// Raised when a point does not match an objective's dimension, or when a
    /// gradient closure returns a vector of the wrong length.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A parameter is outside its valid domain.
    ///
    /// For example a non-positive learning rate or standard deviation.
    #[error("Invalid configuration for `{parameter}` = {value}: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Input data cannot be used (empty samples, mismatched series, ...).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of why the input is invalid
        reason: String,
    },

    /// A computation hit a degenerate case.
    ///
    /// Zero variance columns or a covariance matrix that is not positive
    /// definite end up here.
    #[error("Numerical error: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl GradvizError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: std::fmt::Display,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an InvalidInput error with a custom reason.
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Fails with `DimensionMismatch` unless `actual == expected`.
    pub fn ensure_dimension(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::dimension_mismatch(expected, actual))
        }
    }
}

/// Result type alias for gradviz-core operations.
pub type Result<T> = std::result::Result<T, GradvizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GradvizError::dimension_mismatch(2, 3);
        assert!(matches!(err, GradvizError::DimensionMismatch { .. }));
        assert_eq!(err.to_string(), "Dimension mismatch: expected 2, got 3");

        let err = GradvizError::invalid_configuration("must be positive", "learning_rate", -0.1);
        assert!(matches!(err, GradvizError::InvalidConfiguration { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid configuration for `learning_rate` = -0.1: must be positive"
        );
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            GradvizError::dimension_mismatch("(2,)", "(3,)"),
            GradvizError::invalid_configuration("negative", "std_dev", "-1"),
            GradvizError::invalid_input("empty sample"),
            GradvizError::numerical_error("zero variance"),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_ensure_dimension() {
        assert!(GradvizError::ensure_dimension(2, 2).is_ok());
        assert_eq!(
            GradvizError::ensure_dimension(2, 1),
            Err(GradvizError::dimension_mismatch(2, 1))
        );
    }
}
