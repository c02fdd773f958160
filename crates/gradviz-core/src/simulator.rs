//! Fixed-step gradient descent.
//!
//! The simulator repeatedly applies
//!
//! ```text
//! x[k+1] = x[k] - η ∇J(x[k]),   x[0] = start
//! ```
//!
//! for a fixed number of iterations and records every point it visits. There
//! is no convergence test, no clipping and no stabilization of any kind: a
//! learning rate above the stability threshold produces a diverging
//! trajectory, and that trajectory is returned as is. Identical inputs always
//! produce bit-identical trajectories.
//!
//! # Example
//!
//! ```
//! use gradviz_core::{simulator::GradientDescent, types::{point, Point}};
//!
//! let descent = GradientDescent::new(0.15, 5).unwrap();
//! let trajectory = descent.run(|x: &Point| x * 2.0, point(&[3.8])).unwrap();
//!
//! assert_eq!(trajectory.len(), 6);
//! assert!(trajectory.last()[0].abs() < 3.8);
//! ```

use crate::{
    error::{GradvizError, Result},
    objective::Objective,
    types::Point,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether the descent loop still has iterations left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    /// `step_index < iterations`
    Running,
    /// `step_index == iterations`
    Done,
}

/// Mutable state owned by the iteration loop.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerState {
    /// Current point
    pub position: Point,
    /// Number of updates applied so far
    pub step_index: usize,
}

impl OptimizerState {
    /// Initial state at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            position: start,
            step_index: 0,
        }
    }

    /// Status of the loop for a run of `iterations` updates.
    pub fn status(&self, iterations: usize) -> SimulationStatus {
        if self.step_index < iterations {
            SimulationStatus::Running
        } else {
            SimulationStatus::Done
        }
    }

    /// Applies one update with the given gradient.
    fn advance(&mut self, gradient: Point, learning_rate: f64) -> Result<()> {
        GradvizError::ensure_dimension(self.position.len(), gradient.len())?;
        self.position -= gradient * learning_rate;
        self.step_index += 1;
        Ok(())
    }
}

/// Ordered sequence of points visited by gradient descent.
///
/// Holds `iterations + 1` points, the first one being the start point.
/// When produced by [`GradientDescent::simulate`] the objective value at every
/// point is recorded as well.
///
/// Deserialization enforces the same shape: at least one point, all of one
/// dimension, and one value per point when values are present.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TrajectoryRecord"))]
pub struct Trajectory {
    learning_rate: f64,
    points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    values: Option<Vec<f64>>,
}

/// Unchecked wire form of a [`Trajectory`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TrajectoryRecord {
    learning_rate: f64,
    points: Vec<Point>,
    #[serde(default)]
    values: Option<Vec<f64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<TrajectoryRecord> for Trajectory {
    type Error = GradvizError;

    fn try_from(record: TrajectoryRecord) -> Result<Self> {
        GradientDescent::new(record.learning_rate, 0)?;
        let dimension = record
            .points
            .first()
            .map(Point::len)
            .ok_or_else(|| GradvizError::invalid_input("a trajectory needs its start point"))?;
        for p in &record.points {
            GradvizError::ensure_dimension(dimension, p.len())?;
        }
        if let Some(values) = &record.values {
            if values.len() != record.points.len() {
                return Err(GradvizError::invalid_input(format!(
                    "{} values recorded for {} points",
                    values.len(),
                    record.points.len()
                )));
            }
        }
        Ok(Self {
            learning_rate: record.learning_rate,
            points: record.points,
            values: record.values,
        })
    }
}

impl Trajectory {
    /// Learning rate that produced this trajectory.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of points, always `iterations + 1`.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a trajectory contains at least its start point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of the points.
    pub fn dimension(&self) -> usize {
        self.initial().len()
    }

    /// All points in visiting order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The start point.
    pub fn initial(&self) -> &Point {
        &self.points[0]
    }

    /// The point reached after the last iteration.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// Objective values at each point, if they were recorded.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    /// One coordinate of every point, in visiting order.
    pub fn coordinates(&self, axis: usize) -> Result<Vec<f64>> {
        if axis >= self.dimension() {
            return Err(GradvizError::invalid_input(format!(
                "axis {axis} out of range for a {}-dimensional trajectory",
                self.dimension()
            )));
        }
        Ok(self.points.iter().map(|p| p[axis]).collect())
    }

    /// Points of a two-dimensional trajectory as `(x, y)` pairs.
    pub fn pairs(&self) -> Result<Vec<(f64, f64)>> {
        GradvizError::ensure_dimension(2, self.dimension())?;
        Ok(self.points.iter().map(|p| (p[0], p[1])).collect())
    }

    /// Euclidean distance of every point to `target`.
    pub fn distance_to(&self, target: &Point) -> Result<Vec<f64>> {
        GradvizError::ensure_dimension(self.dimension(), target.len())?;
        Ok(self.points.iter().map(|p| (p - target).norm()).collect())
    }
}

/// Fixed-step gradient descent configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    learning_rate: f64,
    iterations: usize,
}

impl GradientDescent {
    /// Creates a simulator.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `learning_rate` is not a positive finite
    /// number.
    pub fn new(learning_rate: f64, iterations: usize) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(GradvizError::invalid_configuration(
                "learning rate must be a positive finite number",
                "learning_rate",
                learning_rate,
            ));
        }
        Ok(Self {
            learning_rate,
            iterations,
        })
    }

    /// Step size multiplier η.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of updates.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns a copy with a different number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Lazily yields the start point followed by each updated point.
    ///
    /// The iterator stops after `iterations` updates, or right after
    /// yielding an error.
    pub fn steps<G>(&self, gradient: G, start: Point) -> Steps<impl Fn(&Point) -> Result<Point>>
    where
        G: Fn(&Point) -> Point,
    {
        Steps::new(move |x: &Point| Ok(gradient(x)), start, *self)
    }

    /// Runs the descent with a bare gradient function.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the gradient returns a vector whose length
    /// differs from the start point.
    pub fn run<G>(&self, gradient: G, start: Point) -> Result<Trajectory>
    where
        G: Fn(&Point) -> Point,
    {
        let points = self.steps(gradient, start).collect::<Result<Vec<_>>>()?;
        Ok(Trajectory {
            learning_rate: self.learning_rate,
            points,
            values: None,
        })
    }

    /// Runs the descent on an objective and records its value at every point.
    pub fn simulate<O>(&self, objective: &O, start: Point) -> Result<Trajectory>
    where
        O: Objective + ?Sized,
    {
        objective.check_point(&start)?;
        let points = Steps::new(|x: &Point| objective.gradient(x), start, *self)
            .collect::<Result<Vec<_>>>()?;
        let values = points
            .iter()
            .map(|p| objective.evaluate(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Trajectory {
            learning_rate: self.learning_rate,
            points,
            values: Some(values),
        })
    }
}

/// Iterator over the points visited by gradient descent.
///
/// Created by [`GradientDescent::steps`].
#[derive(Debug)]
pub struct Steps<G> {
    gradient: G,
    descent: GradientDescent,
    state: OptimizerState,
    started: bool,
    failed: bool,
}

impl<G> Steps<G>
where
    G: Fn(&Point) -> Result<Point>,
{
    fn new(gradient: G, start: Point, descent: GradientDescent) -> Self {
        Self {
            gradient,
            descent,
            state: OptimizerState::new(start),
            started: false,
            failed: false,
        }
    }

    /// Current loop state.
    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    /// Status of the underlying loop.
    pub fn status(&self) -> SimulationStatus {
        self.state.status(self.descent.iterations)
    }

    fn step(&mut self) -> Result<Point> {
        let gradient = (self.gradient)(&self.state.position)?;
        self.state.advance(gradient, self.descent.learning_rate)?;
        Ok(self.state.position.clone())
    }
}

impl<G> Iterator for Steps<G>
where
    G: Fn(&Point) -> Result<Point>,
{
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Ok(self.state.position.clone()));
        }
        match self.status() {
            SimulationStatus::Done => None,
            SimulationStatus::Running => {
                let next = self.step();
                self.failed = next.is_err();
                Some(next)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.descent.iterations - self.state.step_index + usize::from(!self.started);
        (0, Some(remaining))
    }
}
