//! Principal component analysis through the symmetric eigendecomposition of
//! the sample covariance matrix.

use crate::{
    eigen::{center, sample_covariance, symmetric_eigenpairs},
    error::{GradvizError, Result},
    types::Samples,
};
use nalgebra::{DMatrix, DVector};

/// A fitted principal component decomposition.
///
/// Components are stored as the columns of `components()`, ordered by
/// decreasing explained variance. Each component's largest-magnitude entry
/// is positive so the decomposition is reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Pca {
    mean: DVector<f64>,
    components: DMatrix<f64>,
    explained_variance: DVector<f64>,
}

impl Pca {
    /// Fits the decomposition to row-per-sample data.
    pub fn fit(data: &Samples) -> Result<Self> {
        let n = data.nrows();
        if n < 2 {
            return Err(GradvizError::invalid_input(format!(
                "PCA needs at least two samples, got {n}"
            )));
        }

        let mean = data.row_mean().transpose();
        let pairs = symmetric_eigenpairs(&sample_covariance(data)?)?;

        let dim = data.ncols();
        let mut components = DMatrix::zeros(dim, dim);
        let mut explained_variance = DVector::zeros(dim);
        for (i, pair) in pairs.iter().enumerate() {
            components.set_column(i, &pair.vector);
            // Round-off can leave tiny negative eigenvalues.
            explained_variance[i] = pair.value.max(0.0);
        }

        Ok(Self {
            mean,
            components,
            explained_variance,
        })
    }

    /// Column means of the training data.
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Principal axes as columns, largest variance first.
    pub fn components(&self) -> &DMatrix<f64> {
        &self.components
    }

    /// Variance along each principal axis.
    pub fn explained_variance(&self) -> &DVector<f64> {
        &self.explained_variance
    }

    /// Fraction of the total variance captured by each axis.
    pub fn explained_variance_ratio(&self) -> DVector<f64> {
        let total = self.explained_variance.sum();
        if total > 0.0 {
            &self.explained_variance / total
        } else {
            DVector::zeros(self.explained_variance.len())
        }
    }

    /// Projects `data` onto the first `k` components.
    pub fn transform(&self, data: &Samples, k: usize) -> Result<Samples> {
        self.check(data, k)?;
        Ok(center(data, &self.mean) * self.components.columns(0, k))
    }

    /// Projects onto the first `k` components and maps back to the original
    /// space.
    pub fn reconstruct(&self, data: &Samples, k: usize) -> Result<Samples> {
        let scores = self.transform(data, k)?;
        let mut restored = scores * self.components.columns(0, k).transpose();
        for mut row in restored.row_iter_mut() {
            row += self.mean.transpose();
        }
        Ok(restored)
    }

    fn check(&self, data: &Samples, k: usize) -> Result<()> {
        GradvizError::ensure_dimension(self.mean.len(), data.ncols())?;
        if k == 0 || k > self.mean.len() {
            return Err(GradvizError::invalid_configuration(
                format!("must be between 1 and {}", self.mean.len()),
                "k",
                k,
            ));
        }
        Ok(())
    }
}
