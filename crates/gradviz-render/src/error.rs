//! Error types for rendering and export.

use gradviz_core::GradvizError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while drawing or writing a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The charting backend failed while drawing a figure.
    #[error("Failed to draw `{figure}`: {reason}")]
    Drawing {
        /// Name of the figure being drawn
        figure: String,
        /// Backend error message
        reason: String,
    },

    /// A file or directory could not be created or written.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Preparing the figure's data failed.
    #[error(transparent)]
    Numeric(#[from] GradvizError),

    /// No figure has this name.
    #[error("Unknown figure `{name}`")]
    UnknownFigure {
        /// Requested name
        name: String,
    },

    /// The output format is not supported.
    #[error("Unsupported output format `{format}` (expected svg, png or pdf)")]
    UnsupportedFormat {
        /// Requested format
        format: String,
    },

    /// A style value cannot be used.
    #[error("Invalid style `{field}`: {reason}")]
    InvalidStyle {
        /// Offending field
        field: String,
        /// Description of the problem
        reason: String,
    },
}

impl RenderError {
    /// Create a Drawing error from any backend error.
    pub fn drawing<E: std::fmt::Display + ?Sized>(figure: &str, error: &E) -> Self {
        Self::Drawing {
            figure: figure.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an Io error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidStyle error.
    pub fn invalid_style(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStyle {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
