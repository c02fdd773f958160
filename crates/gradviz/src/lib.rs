//! Gradient descent simulator and teaching charts.
//!
//! This crate bundles [`gradviz_core`] (objectives, the descent simulator,
//! statistics) and [`gradviz_render`] (the figure catalog and export) and
//! hosts the `gradviz` command line.
//!
//! # Example
//! ```
//! use gradviz::prelude::*;
//!
//! let trajectory = GradientDescent::new(0.1, 25)
//!     .unwrap()
//!     .simulate(&Parabola::unit(), point(&[3.0]))
//!     .unwrap();
//! assert!(trajectory.last()[0].abs() < 0.02);
//! assert_eq!(Figure::from_name("rosenbrock").unwrap(), Figure::Rosenbrock);
//! ```

pub mod cli;
pub mod config;

pub use gradviz_core;
pub use gradviz_render;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gradviz_core::prelude::*;
    pub use gradviz_render::prelude::{
        export_all, export_figure, ChartStyle, Colormap, ExportOutcome, ExportPlan, ExportReport,
        Figure, HexColor, LevelScale, OutputFormat, RenderError, Theme, Watermark,
        WatermarkAnchor,
    };
}
