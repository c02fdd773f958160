//! Command-line arguments and the pieces of each command that do not touch
//! the terminal.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gradviz_core::{
    objective::Objective,
    objectives::{
        AxisQuadratic, CosineWell, GaussianWells, Parabola, Polynomial, RipplingBowl, Rosenbrock,
        TwoBasinSurface,
    },
    simulator::{GradientDescent, Trajectory},
    types::point,
};
use gradviz_render::{export::OutputFormat, figures::Figure};
use serde::Serialize;
use std::{fmt::Write as _, path::PathBuf};

/// Gradient descent simulator and teaching charts.
#[derive(Debug, Parser)]
#[command(name = "gradviz", version, about = "Gradient descent simulator and teaching charts")]
pub struct Cli {
    /// Configuration file (default: $GRADVIZ_CONFIG, then ./gradviz.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the figure catalog
    List,

    /// Render figures to image files
    Render {
        /// Figure names, as printed by `list`
        figures: Vec<Figure>,

        /// Render every figure
        #[arg(long, conflicts_with = "figures")]
        all: bool,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output formats (comma-separated: svg,png,pdf)
        #[arg(short, long, value_delimiter = ',')]
        formats: Vec<OutputFormat>,
    },

    /// Run gradient descent on a built-in objective and print the path
    Trajectory {
        /// Objective function
        #[arg(long, value_enum)]
        objective: ObjectiveName,

        /// Starting point (comma-separated coordinates)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        start: Vec<f64>,

        /// Learning rate η
        #[arg(short, long, default_value = "0.1")]
        learning_rate: f64,

        /// Number of updates
        #[arg(short = 'n', long, default_value = "20")]
        iterations: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Built-in objectives reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectiveName {
    /// θ²
    Parabola,
    /// 0.1θ⁴ + 0.2θ³ - 1.5θ² - 1.8θ + 5
    Quartic,
    /// 0.1x² + cos x
    CosineWell,
    /// 0.5x² + 2.5y²
    ElongatedBowl,
    /// (1 - x)² + 100(y - x²)²
    Rosenbrock,
    /// Σ wᵢ² + 2 sin 1.5wᵢ
    RipplingBowl,
    /// Two Gaussian basins of different depth
    TwoBasin,
    /// Two inverted Gaussian wells with a cosine ripple
    GaussianWells,
}

impl ObjectiveName {
    /// The objective itself.
    pub fn build(self) -> Box<dyn Objective> {
        match self {
            Self::Parabola => Box::new(Parabola::unit()),
            Self::Quartic => Box::new(Polynomial::non_convex_quartic()),
            Self::CosineWell => Box::new(CosineWell),
            Self::ElongatedBowl => Box::new(AxisQuadratic::elongated()),
            Self::Rosenbrock => Box::new(Rosenbrock::default()),
            Self::RipplingBowl => Box::new(RipplingBowl::default()),
            Self::TwoBasin => Box::new(TwoBasinSurface),
            Self::GaussianWells => Box::new(GaussianWells),
        }
    }

    /// Name as typed on the command line.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }
}

/// A trajectory as printed by `gradviz trajectory --json`.
#[derive(Debug, Serialize)]
pub struct TrajectoryReport {
    /// Objective name
    pub objective: String,
    /// Learning rate η
    pub learning_rate: f64,
    /// Number of updates applied
    pub iterations: usize,
    /// Every visited point, start first
    pub points: Vec<Vec<f64>>,
    /// Objective value at every point
    pub values: Vec<f64>,
}

/// Runs the simulator for the `trajectory` command.
pub fn simulate(
    objective: ObjectiveName,
    start: &[f64],
    learning_rate: f64,
    iterations: usize,
) -> gradviz_core::Result<TrajectoryReport> {
    let descent = GradientDescent::new(learning_rate, iterations)?;
    let trajectory = descent.simulate(objective.build().as_ref(), point(start))?;
    Ok(TrajectoryReport::new(objective, &trajectory))
}

impl TrajectoryReport {
    fn new(objective: ObjectiveName, trajectory: &Trajectory) -> Self {
        Self {
            objective: objective.name(),
            learning_rate: trajectory.learning_rate(),
            iterations: trajectory.len() - 1,
            points: trajectory
                .points()
                .iter()
                .map(|p| p.iter().copied().collect())
                .collect(),
            values: trajectory.values().map(<[f64]>::to_vec).unwrap_or_default(),
        }
    }

    /// Whether the final value is larger than the initial one.
    pub fn diverged(&self) -> bool {
        match (self.values.first(), self.values.last()) {
            (Some(first), Some(last)) => !last.is_finite() || last > first,
            _ => false,
        }
    }

    /// Fixed-width table: step, one column per coordinate, objective value.
    pub fn table(&self) -> String {
        let dimension = self.points.first().map_or(0, Vec::len);
        let mut out = String::new();
        let _ = write!(out, "{:>5}", "step");
        for axis in 0..dimension {
            let _ = write!(out, " {:>14}", format!("x{}", axis + 1));
        }
        let _ = writeln!(out, " {:>14}", "f(x)");

        for (step, (p, value)) in self.points.iter().zip(&self.values).enumerate() {
            let _ = write!(out, "{step:>5}");
            for coordinate in p {
                let _ = write!(out, " {coordinate:>14.6}");
            }
            let _ = writeln!(out, " {value:>14.6}");
        }
        out
    }
}
