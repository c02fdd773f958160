//! Probability densities, losses and scaling used by the statistics charts.

use crate::{
    error::{GradvizError, Result},
    types::Samples,
};
use nalgebra::DVector;
use std::f64::consts::PI;

pub(crate) fn ensure_positive(parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GradvizError::invalid_configuration(
            "must be positive and finite",
            parameter,
            value,
        ))
    }
}

/// Density of N(mean, std_dev²) at `x`.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> Result<f64> {
    ensure_positive("std_dev", std_dev)?;
    let z = (x - mean) / std_dev;
    Ok((-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt()))
}

/// Probability of `k` successes in `n` Bernoulli(p) trials.
///
/// Computed in log space so large `n` does not overflow the binomial
/// coefficient.
pub fn binomial_pmf(k: u64, n: u64, p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GradvizError::invalid_configuration(
            "probability must lie in [0, 1]",
            "p",
            p,
        ));
    }
    if k > n {
        return Ok(0.0);
    }
    // Degenerate p would take ln(0) below.
    if p == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    if p == 1.0 {
        return Ok(if k == n { 1.0 } else { 0.0 });
    }

    let log_choose = ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k);
    let log_pmf = log_choose + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    Ok(log_pmf.exp())
}

fn ln_factorial(n: u64) -> f64 {
    (2..=n).map(|i| (i as f64).ln()).sum()
}

/// Binary cross-entropy -[y ln p + (1 - y) ln(1 - p)].
///
/// `p` is clamped into `[eps, 1 - eps]` first, so the loss stays finite at
/// the endpoints. `eps` must lie in `[0, 0.5)`.
pub fn binary_cross_entropy(p: f64, label: f64, eps: f64) -> Result<f64> {
    if !(0.0..0.5).contains(&eps) {
        return Err(GradvizError::invalid_configuration(
            "clamp epsilon must lie in [0, 0.5)",
            "eps",
            eps,
        ));
    }
    let p = p.clamp(eps, 1.0 - eps);
    Ok(-(label * p.ln() + (1.0 - label) * (1.0 - p).ln()))
}

/// Mean of the squared residuals.
pub fn mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    GradvizError::ensure_dimension(actual.len(), predicted.len())?;
    if actual.is_empty() {
        return Err(GradvizError::invalid_input(
            "mean squared error of an empty sample",
        ));
    }
    let total: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum();
    Ok(total / actual.len() as f64)
}

/// Z-score (x - mean) / std_dev.
pub fn standardize(x: f64, mean: f64, std_dev: f64) -> Result<f64> {
    ensure_positive("std_dev", std_dev)?;
    Ok((x - mean) / std_dev)
}

/// Per-column standardization to zero mean and unit variance.
///
/// Uses the population standard deviation (divides by n).
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: DVector<f64>,
    scales: DVector<f64>,
}

impl StandardScaler {
    /// Learns column means and standard deviations from row-per-sample data.
    pub fn fit(data: &Samples) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(GradvizError::invalid_input("cannot fit a scaler on zero samples"));
        }
        let n = data.nrows() as f64;
        let means = data.row_mean().transpose();
        let mut scales = DVector::zeros(data.ncols());

        for (j, column) in data.column_iter().enumerate() {
            let variance = column.iter().map(|x| (x - means[j]).powi(2)).sum::<f64>() / n;
            if variance <= f64::EPSILON {
                return Err(GradvizError::numerical_error(format!(
                    "column {j} has zero variance"
                )));
            }
            scales[j] = variance.sqrt();
        }

        Ok(Self { means, scales })
    }

    /// Column means.
    pub fn means(&self) -> &DVector<f64> {
        &self.means
    }

    /// Column standard deviations.
    pub fn scales(&self) -> &DVector<f64> {
        &self.scales
    }

    /// Standardizes `data` with the learned parameters.
    pub fn transform(&self, data: &Samples) -> Result<Samples> {
        GradvizError::ensure_dimension(self.means.len(), data.ncols())?;
        let mut scaled = data.clone();
        for (j, mut column) in scaled.column_iter_mut().enumerate() {
            column.apply(|x| *x = (*x - self.means[j]) / self.scales[j]);
        }
        Ok(scaled)
    }

    /// `fit` followed by `transform`.
    pub fn fit_transform(data: &Samples) -> Result<(Self, Samples)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::constants::PROBABILITY_EPSILON;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_pdf() {
        assert_relative_eq!(
            normal_pdf(0.0, 0.0, 1.0).unwrap(),
            1.0 / (2.0 * PI).sqrt(),
            epsilon = 1e-15
        );
        // Symmetric about the mean.
        assert_relative_eq!(
            normal_pdf(-3.0, -2.0, 1.0).unwrap(),
            normal_pdf(-1.0, -2.0, 1.0).unwrap()
        );
        assert!(normal_pdf(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_binomial_pmf() {
        assert_relative_eq!(binomial_pmf(2, 4, 0.5).unwrap(), 6.0 / 16.0, epsilon = 1e-12);
        assert_eq!(binomial_pmf(5, 4, 0.5).unwrap(), 0.0);
        assert_eq!(binomial_pmf(0, 4, 0.0).unwrap(), 1.0);
        assert_eq!(binomial_pmf(4, 4, 1.0).unwrap(), 1.0);
        assert!(binomial_pmf(1, 4, 1.5).is_err());

        let total: f64 = (0..=40).map(|k| binomial_pmf(k, 40, 0.5).unwrap()).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cross_entropy_is_finite_at_endpoints() {
        let at_zero = binary_cross_entropy(0.0, 1.0, PROBABILITY_EPSILON).unwrap();
        assert!(at_zero.is_finite());
        assert_relative_eq!(at_zero, -PROBABILITY_EPSILON.ln(), max_relative = 1e-9);

        assert!(binary_cross_entropy(1.0, 0.0, PROBABILITY_EPSILON).unwrap().is_finite());
        assert_relative_eq!(
            binary_cross_entropy(0.5, 1.0, PROBABILITY_EPSILON).unwrap(),
            2f64.ln()
        );
    }

    #[test]
    fn test_cross_entropy_rejects_bad_epsilon() {
        for eps in [0.5, 0.6, -1e-3, f64::NAN] {
            let err = binary_cross_entropy(0.3, 1.0, eps).unwrap_err();
            assert!(matches!(err, GradvizError::InvalidConfiguration { .. }), "{eps}");
        }
        // No clamping at all is allowed; p = 0.3 is inside the range anyway.
        assert_relative_eq!(binary_cross_entropy(0.3, 1.0, 0.0).unwrap(), -(0.3f64.ln()));
    }

    #[test]
    fn test_mean_squared_error() {
        assert_relative_eq!(
            mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 4.0, 0.0]).unwrap(),
            13.0 / 3.0
        );
        assert!(mean_squared_error(&[1.0], &[1.0, 2.0]).is_err());
        assert!(mean_squared_error(&[], &[]).is_err());
    }

    #[test]
    fn test_standard_scaler() {
        let data = Samples::from_row_slice(3, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let (scaler, scaled) = StandardScaler::fit_transform(&data).unwrap();

        assert_relative_eq!(scaler.means()[1], 20.0);
        assert_relative_eq!(scaler.scales()[0], (2.0f64 / 3.0).sqrt());
        for column in scaled.column_iter() {
            assert_relative_eq!(column.sum(), 0.0, epsilon = 1e-12);
            let variance = column.map(|x| x * x).sum() / 3.0;
            assert_relative_eq!(variance, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_standard_scaler_rejects_constant_column() {
        let data = Samples::from_row_slice(2, 2, &[1.0, 5.0, 2.0, 5.0]);
        let err = StandardScaler::fit(&data).unwrap_err();
        assert!(matches!(err, GradvizError::NumericalError { .. }));
    }
}
