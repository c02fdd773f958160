//! Numerical core for gradient descent teaching charts.
//!
//! This crate holds everything behind the charts that is not drawing:
//! objective functions with analytic gradients, a fixed-step gradient descent
//! simulator, grid sampling, and the small amount of statistics the
//! probability and preprocessing charts need. It performs no I/O.
//!
//! # Key Concepts
//!
//! - **Objective**: a scalar function on R^n paired with its gradient
//! - **Learning rate**: fixed multiplier η applied to the negative gradient
//! - **Trajectory**: the `iterations + 1` points visited by the descent loop
//!
//! # Modules
//!
//! - [`error`]: Error types
//! - [`calculus`]: Partial and directional derivatives at a point
//! - [`objective`]: Objective trait, closure adapters and derivative checks
//! - [`objectives`]: Closed-form objectives drawn by the charts
//! - [`simulator`]: Fixed-step gradient descent and trajectories
//! - [`sampling`]: Evenly spaced curve and surface samples
//! - [`statistics`]: Densities, losses and standardization
//! - [`eigen`]: Symmetric eigenpairs, covariance and projected variance
//! - [`pca`]: Principal component analysis
//! - [`synthetic`]: Seeded synthetic data
//! - [`waypoints`]: Hand-authored illustrative paths
//! - [`types`]: Type aliases and numerical constants

pub mod calculus;
pub mod eigen;
pub mod error;
pub mod objective;
pub mod objectives;
pub mod pca;
pub mod sampling;
pub mod simulator;
pub mod statistics;
pub mod synthetic;
pub mod types;
pub mod waypoints;

// Re-export commonly used items at the crate root
pub use error::{GradvizError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use gradviz_core::prelude::*;
///
/// let descent = GradientDescent::new(0.3, 6).unwrap();
/// let trajectory = descent
///     .simulate(&AxisQuadratic::elongated(), point(&[-3.5, 1.8]))
///     .unwrap();
/// assert_eq!(trajectory.len(), 7);
/// ```
pub mod prelude {
    pub use crate::calculus::{axis_section, directional_derivative, AxisSection, DirectionalDerivative};
    pub use crate::eigen::{projected_variance, sample_covariance, symmetric_eigenpairs, EigenPair};
    pub use crate::error::{GradvizError, Result};
    pub use crate::objective::{
        CountingObjective, DerivativeChecker, FnObjective, FnValueObjective, Objective,
    };
    pub use crate::objectives::{
        AxisQuadratic, CosineWell, GaussianWells, Parabola, Polynomial, RipplingBowl, Rosenbrock,
        TwoBasinSurface,
    };
    pub use crate::sampling::{linspace, logspace, CurveSamples, SurfaceGrid};
    pub use crate::simulator::{
        GradientDescent, OptimizerState, SimulationStatus, Steps, Trajectory,
    };
    pub use crate::types::{constants, point, Point, Samples};
}
