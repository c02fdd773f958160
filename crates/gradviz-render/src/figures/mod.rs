//! The figure catalog.
//!
//! Every figure is a [`Figure`] variant. Each figure module keeps its data
//! preparation (plain functions returning [`gradviz_core::Result`]) apart
//! from its drawing routine, so the numbers behind a chart are testable
//! without a drawing backend.

mod chart;
mod contour;
mod derivatives;
mod descent;
mod distributions;
mod linear_algebra;
mod preprocessing;
mod surface;

use crate::{
    error::{RenderError, Result},
    fonts,
    style::Theme,
    watermark,
};
use chart::DrawResult;
use gradviz_core::GradvizError;
use plotters::{coord::Shift, prelude::*};
use std::{error::Error, fmt, str::FromStr};

/// A chart in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Figure {
    /// Successive descent steps on J(θ) = θ²
    DescentSteps,
    /// A single update θ₁ = θ₀ - η∇J(θ₀) with the tangent at θ₀
    UpdateRule,
    /// The same start under four learning rates, one of them divergent
    LearningRates,
    /// ∇J and -∇J at a point of a parabola
    GradientDirection,
    /// Two starts on a non-convex quartic reaching different minima
    LocalMinima,
    /// Zig-zag descent over an elongated bowl, with gradient and step arrows
    DescentContour,
    /// Two descent paths over a shifted bowl, with a colorbar
    CostMinimization,
    /// Slow descent along Rosenbrock's valley, logarithmic bands
    Rosenbrock,
    /// Descent path lying on a three-dimensional rippling bowl
    LossSurface,
    /// Simulated descent next to illustrative SGD and Adam paths
    VariantComparison,
    /// Normal densities with different means and spreads
    NormalDistributions,
    /// Binomial mass functions with their means
    BinomialDistributions,
    /// Both branches of the binary cross-entropy
    CrossEntropy,
    /// Regression residuals and the squared-error cost
    MeanSquaredError,
    /// A normal variable mapped to its z-score
    Standardization,
    /// Principal axes and PC1 projection of a correlated cloud
    Pca,
    /// ∇f, -∇f and a unit direction v at a point, with θ and D_v f = ∇f·v
    DirectionalDerivative,
    /// Axis sections of x² + y² through a point and their tangents
    PartialDerivatives,
    /// A symmetric matrix stretching its eigenvectors, A·v = λv
    Eigenvectors,
    /// Eigenvectors of a sample covariance matrix, S·w₁ = λ₁w₁
    CovarianceEigenvectors,
    /// PC1 as the direction maximizing the projected variance wᵀSw
    VarianceMaximization,
}

impl Figure {
    /// Every figure, in catalog order.
    pub const ALL: [Self; 21] = [
        Self::DescentSteps,
        Self::UpdateRule,
        Self::LearningRates,
        Self::GradientDirection,
        Self::LocalMinima,
        Self::DescentContour,
        Self::CostMinimization,
        Self::Rosenbrock,
        Self::LossSurface,
        Self::VariantComparison,
        Self::NormalDistributions,
        Self::BinomialDistributions,
        Self::CrossEntropy,
        Self::MeanSquaredError,
        Self::Standardization,
        Self::Pca,
        Self::DirectionalDerivative,
        Self::PartialDerivatives,
        Self::Eigenvectors,
        Self::CovarianceEigenvectors,
        Self::VarianceMaximization,
    ];

    /// Stable command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DescentSteps => "descent-steps",
            Self::UpdateRule => "update-rule",
            Self::LearningRates => "learning-rates",
            Self::GradientDirection => "gradient-direction",
            Self::LocalMinima => "local-minima",
            Self::DescentContour => "descent-contour",
            Self::CostMinimization => "cost-minimization",
            Self::Rosenbrock => "rosenbrock",
            Self::LossSurface => "loss-surface",
            Self::VariantComparison => "variant-comparison",
            Self::NormalDistributions => "normal-distributions",
            Self::BinomialDistributions => "binomial-distributions",
            Self::CrossEntropy => "cross-entropy",
            Self::MeanSquaredError => "mean-squared-error",
            Self::Standardization => "standardization",
            Self::Pca => "pca",
            Self::DirectionalDerivative => "directional-derivative",
            Self::PartialDerivatives => "partial-derivatives",
            Self::Eigenvectors => "eigenvectors",
            Self::CovarianceEigenvectors => "covariance-eigenvectors",
            Self::VarianceMaximization => "variance-maximization",
        }
    }

    /// Output file name without extension.
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::DescentSteps => "gradient_descent_steps",
            Self::UpdateRule => "gradient_descent_rule",
            Self::LearningRates => "learning_rate_impact",
            Self::GradientDirection => "gradient_direction",
            Self::LocalMinima => "local_minima",
            Self::DescentContour => "gradient_descent_contour",
            Self::CostMinimization => "cost_function_minimization",
            Self::Rosenbrock => "rosenbrock_descent",
            Self::LossSurface => "loss_surface_3d",
            Self::VariantComparison => "optimizer_comparison",
            Self::NormalDistributions => "normal_distributions",
            Self::BinomialDistributions => "binomial_distributions",
            Self::CrossEntropy => "binary_cross_entropy",
            Self::MeanSquaredError => "mean_squared_error",
            Self::Standardization => "standardization",
            Self::Pca => "principal_components",
            Self::DirectionalDerivative => "directional_derivative",
            Self::PartialDerivatives => "partial_derivatives",
            Self::Eigenvectors => "eigenvectors",
            Self::CovarianceEigenvectors => "pca_eigenvectors",
            Self::VarianceMaximization => "pca_maximization_of_variance",
        }
    }

    /// One-line description for listings.
    pub const fn title(self) -> &'static str {
        match self {
            Self::DescentSteps => "Gradient descent steps on a parabola",
            Self::UpdateRule => "The gradient descent update rule",
            Self::LearningRates => "Impact of the learning rate",
            Self::GradientDirection => "Gradient and steepest descent direction",
            Self::LocalMinima => "Local and global minima of a non-convex loss",
            Self::DescentContour => "Descent over the contours of an elongated bowl",
            Self::CostMinimization => "Cost function minimization from two starts",
            Self::Rosenbrock => "Gradient descent on the Rosenbrock function",
            Self::LossSurface => "Descent path on a 3-D loss surface",
            Self::VariantComparison => "Gradient descent variants compared",
            Self::NormalDistributions => "Normal distributions",
            Self::BinomialDistributions => "Binomial distributions",
            Self::CrossEntropy => "Binary cross-entropy loss",
            Self::MeanSquaredError => "Mean squared error",
            Self::Standardization => "Standardization of a normal variable",
            Self::Pca => "Principal component analysis",
            Self::DirectionalDerivative => "Directional derivative at a point",
            Self::PartialDerivatives => "Partial derivatives as slopes of sections",
            Self::Eigenvectors => "Eigenvectors and eigenvalues of a linear map",
            Self::CovarianceEigenvectors => "Eigenvectors of a covariance matrix",
            Self::VarianceMaximization => "PCA as variance maximization",
        }
    }

    /// Looks a figure up by its command-line name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|figure| figure.name() == name)
            .ok_or_else(|| RenderError::UnknownFigure {
                name: name.to_string(),
            })
    }

    /// Draws the figure and its watermark on `area`.
    ///
    /// The style's font family is bound to the bundled font and the area is
    /// cleared to the theme's background first.
    pub fn render<DB>(self, area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        fonts::register(&theme.style().font_family)?;
        area.fill(&theme.background())
            .map_err(|e| RenderError::drawing(self.name(), &e))?;
        self.draw(area, theme)
            .and_then(|()| watermark::draw(area, theme))
            .map_err(|e| self.classify(e))
    }

    fn draw<DB>(self, area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match self {
            Self::DescentSteps => descent::draw_descent_steps(area, theme),
            Self::UpdateRule => descent::draw_update_rule(area, theme),
            Self::LearningRates => descent::draw_learning_rates(area, theme),
            Self::GradientDirection => descent::draw_gradient_direction(area, theme),
            Self::LocalMinima => descent::draw_local_minima(area, theme),
            Self::DescentContour => contour::draw_descent_contour(area, theme),
            Self::CostMinimization => contour::draw_cost_minimization(area, theme),
            Self::Rosenbrock => contour::draw_rosenbrock(area, theme),
            Self::LossSurface => surface::draw_loss_surface(area, theme),
            Self::VariantComparison => contour::draw_variant_comparison(area, theme),
            Self::NormalDistributions => distributions::draw_normal_distributions(area, theme),
            Self::BinomialDistributions => distributions::draw_binomial_distributions(area, theme),
            Self::CrossEntropy => distributions::draw_cross_entropy(area, theme),
            Self::MeanSquaredError => preprocessing::draw_mean_squared_error(area, theme),
            Self::Standardization => preprocessing::draw_standardization(area, theme),
            Self::Pca => preprocessing::draw_principal_components(area, theme),
            Self::DirectionalDerivative => derivatives::draw_directional_derivative(area, theme),
            Self::PartialDerivatives => derivatives::draw_partial_derivatives(area, theme),
            Self::Eigenvectors => linear_algebra::draw_eigenvectors(area, theme),
            Self::CovarianceEigenvectors => linear_algebra::draw_covariance_eigenvectors(area, theme),
            Self::VarianceMaximization => linear_algebra::draw_variance_maximization(area, theme),
        }
    }

    /// Data errors keep their type; anything else came from the backend.
    fn classify(self, error: Box<dyn Error>) -> RenderError {
        match error.downcast::<GradvizError>() {
            Ok(numeric) => RenderError::Numeric(*numeric),
            Err(other) => RenderError::drawing(self.name(), &other),
        }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Figure {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_and_stems_are_unique() {
        let names: HashSet<_> = Figure::ALL.iter().map(|f| f.name()).collect();
        let stems: HashSet<_> = Figure::ALL.iter().map(|f| f.file_stem()).collect();
        assert_eq!(names.len(), Figure::ALL.len());
        assert_eq!(stems.len(), Figure::ALL.len());
    }

    #[test]
    fn test_from_name() {
        for figure in Figure::ALL {
            assert_eq!(Figure::from_name(figure.name()).unwrap(), figure);
        }
        assert!(matches!(
            "contour".parse::<Figure>(),
            Err(RenderError::UnknownFigure { .. })
        ));
    }

    #[test]
    fn test_classify_keeps_numeric_errors() {
        let numeric: Box<dyn Error> = Box::new(GradvizError::numerical_error("overflow"));
        assert!(matches!(
            Figure::Rosenbrock.classify(numeric),
            RenderError::Numeric(GradvizError::NumericalError { .. })
        ));

        let backend: Box<dyn Error> = "font not found".into();
        match Figure::Pca.classify(backend) {
            RenderError::Drawing { figure, reason } => {
                assert_eq!(figure, "pca");
                assert_eq!(reason, "font not found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
