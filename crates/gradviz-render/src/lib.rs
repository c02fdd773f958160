//! Teaching charts for gradient descent, drawn with plotters.
//!
//! Every chart is a [`Figure`]. A figure prepares its data with
//! `gradviz-core`, draws itself onto any plotters drawing area using a
//! [`Theme`], and is written to disk by [`export_figure`] in one or more
//! [`OutputFormat`]s.
//!
//! # Modules
//!
//! - [`style`]: Immutable chart style and its per-format pixel theme
//! - [`colormap`]: Perceptual colormaps and level scales for filled contours
//! - [`figures`]: The figure catalog
//! - [`watermark`]: Attribution text
//! - [`fonts`]: The bundled typeface
//! - [`export`]: SVG, PNG and PDF output
//! - [`error`]: Error types
//!
//! # Example
//! ```no_run
//! use gradviz_render::prelude::*;
//!
//! let plan = ExportPlan::new("charts", [OutputFormat::Svg]);
//! let report = export_figure(Figure::Rosenbrock, &ChartStyle::default(), &plan);
//! assert!(report.is_success());
//! ```

pub mod colormap;
pub mod error;
pub mod export;
pub mod figures;
pub mod fonts;
pub mod style;
pub mod watermark;

// Re-export commonly used items at the crate root
pub use error::{RenderError, Result};
pub use export::{export_all, export_figure, ExportOutcome, ExportPlan, ExportReport, OutputFormat};
pub use figures::Figure;
pub use style::{ChartStyle, Theme};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::colormap::{Colormap, LevelScale};
    pub use crate::error::{RenderError, Result};
    pub use crate::export::{
        export_all, export_figure, ExportOutcome, ExportPlan, ExportReport, OutputFormat,
    };
    pub use crate::figures::Figure;
    pub use crate::style::{ChartStyle, HexColor, Theme, Watermark, WatermarkAnchor};
}
