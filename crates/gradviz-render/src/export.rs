//! Writing figures to SVG, PNG and PDF files.
//!
//! Each requested format is rendered independently; a failure in one does
//! not stop the others. Every attempt ends up in the [`ExportReport`] so the
//! caller decides how to surface failures. A failed attempt never leaves a
//! truncated file behind.
//!
//! PDF output is the SVG rendering converted with `svg2pdf`.

use crate::{
    error::{RenderError, Result},
    figures::Figure,
    fonts,
    style::{ChartStyle, Theme},
};
use plotters::{coord::Shift, prelude::*};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};
use svg2pdf::{usvg, ConversionOptions, PageOptions};
use tracing::{debug, info, warn};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Scalable vector graphics
    Svg,
    /// Raster image at the style's PNG resolution
    Png,
    /// Vector page with the same physical size as the SVG
    Pdf,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Svg, Self::Png, Self::Pdf];

    /// Formats written when none are requested.
    pub const DEFAULT: [Self; 2] = [Self::Svg, Self::Png];

    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            _ => Err(RenderError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Where figures go and in which formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    /// Output directory, created when missing
    pub directory: PathBuf,
    /// Formats to write, without duplicates
    pub formats: Vec<OutputFormat>,
}

impl ExportPlan {
    /// Creates a plan; repeated formats are written once.
    pub fn new(directory: impl Into<PathBuf>, formats: impl IntoIterator<Item = OutputFormat>) -> Self {
        let mut unique = Vec::new();
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        Self {
            directory: directory.into(),
            formats: unique,
        }
    }

    /// `<directory>/<file_stem>.<extension>`
    pub fn path_for(&self, figure: Figure, format: OutputFormat) -> PathBuf {
        self.directory
            .join(format!("{}.{}", figure.file_stem(), format.extension()))
    }
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self::new(".", OutputFormat::DEFAULT)
    }
}

/// Result of writing one figure in one format.
#[derive(Debug)]
pub struct ExportOutcome {
    /// Format attempted
    pub format: OutputFormat,
    /// Target file
    pub path: PathBuf,
    /// Whether the file was written
    pub result: Result<()>,
}

/// Every outcome of exporting one figure.
#[derive(Debug)]
pub struct ExportReport {
    /// Figure exported
    pub figure: Figure,
    /// One outcome per planned format
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    /// Paths that were written.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.path.as_path())
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ExportOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// True when every format was written.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// The written paths, or the first failure.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        self.outcomes
            .into_iter()
            .map(|o| o.result.map(|()| o.path))
            .collect()
    }
}

/// Renders `figure` once per planned format.
///
/// Existing files are overwritten.
pub fn export_figure(figure: Figure, style: &ChartStyle, plan: &ExportPlan) -> ExportReport {
    debug!(
        figure = figure.name(),
        directory = %plan.directory.display(),
        formats = ?plan.formats,
        "exporting figure"
    );

    let outcomes = plan
        .formats
        .iter()
        .map(|&format| {
            let path = plan.path_for(figure, format);
            let result = write_file(figure, style, format, &plan.directory, &path);
            match &result {
                Ok(()) => info!(figure = figure.name(), path = %path.display(), "wrote figure"),
                Err(error) => warn!(
                    figure = figure.name(),
                    path = %path.display(),
                    %error,
                    "failed to write figure"
                ),
            }
            ExportOutcome {
                format,
                path,
                result,
            }
        })
        .collect();

    ExportReport { figure, outcomes }
}

/// Exports several figures after validating the style once.
pub fn export_all(
    figures: &[Figure],
    style: &ChartStyle,
    plan: &ExportPlan,
) -> Result<Vec<ExportReport>> {
    style.validate()?;
    Ok(figures
        .iter()
        .map(|&figure| export_figure(figure, style, plan))
        .collect())
}

fn write_file(
    figure: Figure,
    style: &ChartStyle,
    format: OutputFormat,
    directory: &Path,
    path: &Path,
) -> Result<()> {
    fs::create_dir_all(directory).map_err(|e| RenderError::io(directory, e))?;

    let theme = style.theme(format);
    let size = style.pixel_size(format);
    let result = match format {
        OutputFormat::Svg => draw_into(figure, SVGBackend::new(path, size).into_drawing_area(), &theme),
        OutputFormat::Png => draw_into(figure, BitMapBackend::new(path, size).into_drawing_area(), &theme),
        OutputFormat::Pdf => write_pdf(figure, &theme, size, style.dpi(format), path),
    };
    discard_on_error(result, path)
}

/// Draws and flushes; the backend is dropped before returning.
fn draw_into<DB>(figure: Figure, root: DrawingArea<DB, Shift>, theme: &Theme<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    figure.render(&root, theme)?;
    root.present().map_err(|e| RenderError::drawing(figure.name(), &e))
}

fn write_pdf(figure: Figure, theme: &Theme<'_>, size: (u32, u32), dpi: u32, path: &Path) -> Result<()> {
    let mut svg = String::new();
    draw_into(figure, SVGBackend::with_string(&mut svg, size).into_drawing_area(), theme)?;
    let pdf = svg_to_pdf(figure, &svg, dpi)?;
    fs::write(path, pdf).map_err(|e| RenderError::io(path, e))
}

/// Converts an SVG document to a one-page PDF sized at `dpi`.
fn svg_to_pdf(figure: Figure, svg: &str, dpi: u32) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb = fonts::database();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RenderError::drawing(figure.name(), &e))?;

    let mut page = PageOptions::default();
    page.dpi = dpi as f32;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), page)
        .map_err(|e| RenderError::drawing(figure.name(), &e))
}

/// Removes whatever a failed attempt left at `path`.
fn discard_on_error(result: Result<()>, path: &Path) -> Result<()> {
    if result.is_err() {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed partial output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
        }
    }
    result
}
