//! Eigenpairs of symmetric matrices, sample covariance and the variance of
//! projected data.

use crate::{
    error::{GradvizError, Result},
    types::Samples,
};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Largest asymmetry tolerated, relative to the largest entry.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// An eigenvalue and its unit eigenvector, S·w = λ·w.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    /// λ
    pub value: f64,
    /// w, unit length, largest-magnitude entry positive
    pub vector: DVector<f64>,
}

impl EigenPair {
    /// S·w for the matrix the pair came from.
    pub fn image(&self, matrix: &DMatrix<f64>) -> DVector<f64> {
        matrix * &self.vector
    }

    /// ‖S·w - λ·w‖
    pub fn residual(&self, matrix: &DMatrix<f64>) -> f64 {
        (self.image(matrix) - &self.vector * self.value).norm()
    }
}

/// Eigenpairs of a real symmetric matrix, largest eigenvalue first.
///
/// Eigenvectors are orthonormal and sign-normalized so the result is
/// reproducible.
pub fn symmetric_eigenpairs(matrix: &DMatrix<f64>) -> Result<Vec<EigenPair>> {
    GradvizError::ensure_dimension(matrix.nrows(), matrix.ncols())?;
    if matrix.is_empty() {
        return Err(GradvizError::invalid_input("an empty matrix has no eigenpairs"));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(GradvizError::numerical_error("matrix has non-finite entries"));
    }
    let asymmetry = (matrix - matrix.transpose()).amax();
    if asymmetry > SYMMETRY_TOLERANCE * matrix.amax().max(1.0) {
        return Err(GradvizError::invalid_input(format!(
            "matrix is not symmetric (largest difference {asymmetry:e})"
        )));
    }

    let eigen = SymmetricEigen::new(matrix.clone());
    let mut pairs: Vec<EigenPair> = eigen
        .eigenvalues
        .iter()
        .zip(eigen.eigenvectors.column_iter())
        .map(|(&value, column)| {
            let mut vector = column.into_owned();
            if vector[vector.iamax()] < 0.0 {
                vector.neg_mut();
            }
            EigenPair { value, vector }
        })
        .collect();
    pairs.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(pairs)
}

/// Unbiased sample covariance of row-per-sample data.
pub fn sample_covariance(data: &Samples) -> Result<DMatrix<f64>> {
    let n = data.nrows();
    if n < 2 {
        return Err(GradvizError::invalid_input(format!(
            "a covariance needs at least two samples, got {n}"
        )));
    }
    let centered = center(data, &data.row_mean().transpose());
    Ok(centered.transpose() * &centered / (n - 1) as f64)
}

/// Variance of data with covariance `covariance` projected onto
/// `direction`, the Rayleigh quotient wᵀSw / wᵀw.
pub fn projected_variance(covariance: &DMatrix<f64>, direction: &DVector<f64>) -> Result<f64> {
    GradvizError::ensure_dimension(covariance.ncols(), direction.len())?;
    let norm_squared = direction.norm_squared();
    if !(norm_squared.is_finite() && norm_squared > 0.0) {
        return Err(GradvizError::invalid_input(
            "a projection direction needs a finite, non-zero length",
        ));
    }
    Ok(direction.dot(&(covariance * direction)) / norm_squared)
}

/// Subtracts `mean` from every row.
pub fn center(data: &Samples, mean: &DVector<f64>) -> Samples {
    let mut centered = data.clone();
    for mut row in centered.row_iter_mut() {
        row -= mean.transpose();
    }
    centered
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_pairs_are_sorted_and_satisfy_the_definition() {
        let a = dmatrix![2.5, 0.5; 0.5, 1.5];
        let pairs = symmetric_eigenpairs(&a).unwrap();

        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].value > pairs[1].value);
        assert_relative_eq!(pairs[0].value, 2.0 + 0.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(pairs[1].value, 2.0 - 0.5f64.sqrt(), epsilon = 1e-12);
        for pair in &pairs {
            assert!(pair.residual(&a) < 1e-12);
            assert_relative_eq!(pair.vector.norm(), 1.0, epsilon = 1e-12);
            assert!(pair.vector[pair.vector.iamax()] > 0.0);
        }
        assert_relative_eq!(pairs[0].vector.dot(&pairs[1].vector), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_determinant_and_trace_from_eigenvalues() {
        // Positive definite, then indefinite.
        for (m, det) in [(dmatrix![2.0, -1.0; -1.0, 2.0], 3.0), (dmatrix![1.0, 2.0; 2.0, 1.0], -3.0)] {
            let pairs = symmetric_eigenpairs(&m).unwrap();
            let product: f64 = pairs.iter().map(|p| p.value).product();
            let sum: f64 = pairs.iter().map(|p| p.value).sum();
            assert_relative_eq!(product, det, epsilon = 1e-12);
            assert_relative_eq!(sum, m.trace(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_symmetric_and_non_finite() {
        assert!(matches!(
            symmetric_eigenpairs(&dmatrix![1.0, 2.0; 0.0, 1.0]),
            Err(GradvizError::InvalidInput { .. })
        ));
        assert!(matches!(
            symmetric_eigenpairs(&dmatrix![1.0, f64::NAN; f64::NAN, 1.0]),
            Err(GradvizError::NumericalError { .. })
        ));
        assert!(matches!(
            symmetric_eigenpairs(&DMatrix::zeros(2, 3)),
            Err(GradvizError::DimensionMismatch { .. })
        ));
        assert!(symmetric_eigenpairs(&DMatrix::zeros(0, 0)).is_err());
    }

    #[test]
    fn test_sample_covariance() {
        let data = Samples::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        let s = sample_covariance(&data).unwrap();
        assert_relative_eq!(s, dmatrix![1.0, 2.0; 2.0, 4.0], epsilon = 1e-12);
        assert!(sample_covariance(&Samples::from_row_slice(1, 2, &[1.0, 2.0])).is_err());
    }

    #[test]
    fn test_projected_variance_peaks_at_the_first_eigenvector() {
        let s = dmatrix![1.0, 0.9; 0.9, 1.0];
        let pairs = symmetric_eigenpairs(&s).unwrap();

        let best = projected_variance(&s, &pairs[0].vector).unwrap();
        assert_relative_eq!(best, 1.9, epsilon = 1e-12);
        assert_relative_eq!(projected_variance(&s, &pairs[1].vector).unwrap(), 0.1, epsilon = 1e-12);
        // Scaling the direction changes nothing.
        assert_relative_eq!(projected_variance(&s, &(&pairs[0].vector * 3.0)).unwrap(), best, epsilon = 1e-12);

        for k in 0..36 {
            let phi = f64::from(k) * std::f64::consts::PI / 36.0;
            let v = projected_variance(&s, &dvector![phi.cos(), phi.sin()]).unwrap();
            assert!(v <= best + 1e-12 && v >= 0.1 - 1e-12);
        }
        assert!(projected_variance(&s, &dvector![0.0, 0.0]).is_err());
        assert!(projected_variance(&s, &dvector![1.0]).is_err());
    }
}
