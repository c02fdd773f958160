//! Seeded synthetic data for the regression and PCA charts.
//!
//! Every generator takes an explicit seed and uses `StdRng`, so a figure
//! redrawn with the same seed shows the same sample.

use crate::{
    error::{GradvizError, Result},
    statistics::ensure_positive,
    types::Samples,
};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};

/// Draws `n` samples of N(mean, covariance), one per row.
///
/// # Errors
///
/// `NumericalError` if `covariance` is not positive definite,
/// `DimensionMismatch` if its shape does not match `mean`.
pub fn correlated_gaussian(
    n: usize,
    mean: &DVector<f64>,
    covariance: &DMatrix<f64>,
    seed: u64,
) -> Result<Samples> {
    let dim = mean.len();
    GradvizError::ensure_dimension(dim, covariance.nrows())?;
    GradvizError::ensure_dimension(dim, covariance.ncols())?;

    let factor = covariance
        .clone()
        .cholesky()
        .ok_or_else(|| GradvizError::numerical_error("covariance is not positive definite"))?
        .unpack();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Samples::zeros(n, dim);
    for mut row in samples.row_iter_mut() {
        let z = DVector::<f64>::from_fn(dim, |_, _| StandardNormal.sample(&mut rng));
        row.copy_from(&(mean + &factor * z).transpose());
    }
    Ok(samples)
}

/// `slope * x + intercept` plus N(0, noise_std²) noise for every `x`.
///
/// A zero `noise_std` returns the exact line.
pub fn noisy_line(
    xs: &[f64],
    slope: f64,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> Result<Vec<f64>> {
    if !(noise_std >= 0.0 && noise_std.is_finite()) {
        return Err(GradvizError::invalid_configuration(
            "must be non-negative and finite",
            "noise_std",
            noise_std,
        ));
    }
    let noise = Normal::new(0.0, noise_std).map_err(|e| {
        GradvizError::invalid_configuration(e.to_string(), "noise_std", noise_std)
    })?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(xs
        .iter()
        .map(|x| slope * x + intercept + noise.sample(&mut rng))
        .collect())
}

/// Draws `n` values of N(mean, std_dev²).
pub fn normal_sample(n: usize, mean: f64, std_dev: f64, seed: u64) -> Result<Vec<f64>> {
    ensure_positive("std_dev", std_dev)?;
    let normal = Normal::new(mean, std_dev).map_err(|e| {
        GradvizError::invalid_configuration(e.to_string(), "std_dev", std_dev)
    })?;
    let rng = StdRng::seed_from_u64(seed);
    Ok(normal.sample_iter(rng).take(n).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_correlated_gaussian_is_seeded() {
        let mean = dvector![0.0, 0.0];
        let cov = dmatrix![10.0, 8.0; 8.0, 10.0];
        let a = correlated_gaussian(50, &mean, &cov, 42).unwrap();
        let b = correlated_gaussian(50, &mean, &cov, 42).unwrap();
        let c = correlated_gaussian(50, &mean, &cov, 7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.shape(), (50, 2));
    }

    #[test]
    fn test_correlated_gaussian_moments() {
        let mean = dvector![1.0, -1.0];
        let cov = dmatrix![10.0, 8.0; 8.0, 10.0];
        let data = correlated_gaussian(20_000, &mean, &cov, 1).unwrap();

        let sample_mean = data.row_mean();
        assert_relative_eq!(sample_mean[0], 1.0, epsilon = 0.1);
        assert_relative_eq!(sample_mean[1], -1.0, epsilon = 0.1);

        let x = data.column(0).add_scalar(-sample_mean[0]);
        let y = data.column(1).add_scalar(-sample_mean[1]);
        let n = data.nrows() as f64;
        assert_relative_eq!(x.dot(&x) / n, 10.0, max_relative = 0.05);
        assert_relative_eq!(x.dot(&y) / n, 8.0, max_relative = 0.05);
    }

    #[test]
    fn test_rejects_indefinite_covariance() {
        let err = correlated_gaussian(5, &dvector![0.0, 0.0], &dmatrix![1.0, 2.0; 2.0, 1.0], 0)
            .unwrap_err();
        assert!(matches!(err, GradvizError::NumericalError { .. }));
        assert!(correlated_gaussian(5, &dvector![0.0], &dmatrix![1.0, 0.0; 0.0, 1.0], 0).is_err());
    }

    #[test]
    fn test_noisy_line() {
        let xs = [0.0, 1.0, 2.0];
        let exact = noisy_line(&xs, 2.0, 1.0, 0.0, 3).unwrap();
        assert_eq!(exact, vec![1.0, 3.0, 5.0]);

        let noisy = noisy_line(&xs, 2.0, 1.0, 2.5, 42).unwrap();
        assert_eq!(noisy, noisy_line(&xs, 2.0, 1.0, 2.5, 42).unwrap());
        assert!(noisy_line(&xs, 2.0, 1.0, -1.0, 42).is_err());
        assert!(noisy_line(&xs, 2.0, 1.0, f64::NAN, 42).is_err());
    }

    #[test]
    fn test_normal_sample() {
        let values = normal_sample(10_000, 10.0, 2.0, 42).unwrap();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert_relative_eq!(mean, 10.0, epsilon = 0.1);

        for bad in [-2.0, 0.0, f64::INFINITY] {
            let err = normal_sample(10, 10.0, bad, 42).unwrap_err();
            assert!(matches!(err, GradvizError::InvalidConfiguration { .. }), "{bad}");
        }
    }
}
