//! Immutable chart style.
//!
//! A [`ChartStyle`] describes every visual parameter shared by the figures:
//! canvas size, resolution, fonts, colors and the watermark. It is a plain
//! value passed by reference into each render call, never global state.
//! Sizes are given in typographic points and converted to pixels for the
//! output format by [`ChartStyle::theme`], so an SVG and a 300 DPI PNG of
//! the same figure have the same proportions.

use crate::{
    error::{RenderError, Result},
    export::OutputFormat,
};
use plotters::style::{
    text_anchor::{HPos, Pos, VPos},
    FontDesc, FontFamily, FontStyle, RGBColor, TextStyle,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Points per inch.
const POINTS_PER_INCH: f64 = 72.0;

/// An opaque RGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl HexColor {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as a plotters color.
    pub const fn rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RenderError::invalid_style("color", format!("`{s}` is not a #rrggbb color"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Corner of the canvas the watermark is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkAnchor {
    /// Right-aligned in the bottom-right corner
    #[default]
    BottomRight,
    /// Centered along the bottom edge
    BottomCenter,
}

/// Attribution text drawn on every figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watermark {
    /// Text to draw; empty disables the watermark
    pub text: String,
    /// Placement
    pub anchor: WatermarkAnchor,
    /// Font size in points
    pub size: f64,
    /// Text color
    pub color: HexColor,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            text: "© Alejandro Quintero Ruiz. Generated with Rust.".to_string(),
            anchor: WatermarkAnchor::BottomRight,
            size: 10.0,
            color: HexColor::new(0x80, 0x80, 0x80),
        }
    }
}

/// Visual parameters shared by every figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Canvas width in inches
    pub width_in: f64,
    /// Canvas height in inches
    pub height_in: f64,
    /// Raster resolution
    pub png_dpi: u32,
    /// Nominal resolution of vector output (pixels per inch in the SVG; the
    /// PDF page keeps the same physical size)
    pub svg_dpi: u32,
    /// Font family name, or one of `serif`, `sans-serif`, `monospace`
    pub font_family: String,
    /// Title size in points
    pub title_size: f64,
    /// Axis label size in points
    pub label_size: f64,
    /// Tick label size in points
    pub tick_size: f64,
    /// Legend and annotation size in points
    pub legend_size: f64,
    /// Default stroke width in points
    pub line_width: f64,
    /// Canvas background
    pub background: HexColor,
    /// Titles, labels and annotations
    pub text_color: HexColor,
    /// Grid lines
    pub grid_color: HexColor,
    /// Categorical colors for series, cycled
    pub palette: Vec<HexColor>,
    /// Attribution text
    pub watermark: Watermark,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::presentation()
    }
}

impl ChartStyle {
    /// 16:9 slide layout, 12 x 6.75 in, 300 DPI PNG.
    pub fn presentation() -> Self {
        Self {
            width_in: 12.0,
            height_in: 6.75,
            png_dpi: 300,
            svg_dpi: 100,
            font_family: "sans-serif".to_string(),
            title_size: 16.0,
            label_size: 14.0,
            tick_size: 12.0,
            legend_size: 12.0,
            line_width: 2.0,
            background: HexColor::new(0xff, 0xff, 0xff),
            text_color: HexColor::new(0x33, 0x33, 0x33),
            grid_color: HexColor::new(0xdd, 0xdd, 0xdd),
            palette: vec![
                HexColor::new(0x1f, 0x77, 0xb4),
                HexColor::new(0xff, 0x7f, 0x0e),
                HexColor::new(0x2c, 0xa0, 0x2c),
                HexColor::new(0xd6, 0x27, 0x28),
                HexColor::new(0x94, 0x67, 0xbd),
                HexColor::new(0x8c, 0x56, 0x4b),
                HexColor::new(0xe3, 0x77, 0xc2),
                HexColor::new(0x7f, 0x7f, 0x7f),
            ],
            watermark: Watermark::default(),
        }
    }

    /// Checks that sizes are positive and the palette is not empty.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width_in", self.width_in),
            ("height_in", self.height_in),
            ("title_size", self.title_size),
            ("label_size", self.label_size),
            ("tick_size", self.tick_size),
            ("legend_size", self.legend_size),
            ("line_width", self.line_width),
            ("watermark.size", self.watermark.size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RenderError::invalid_style(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        if self.png_dpi == 0 || self.svg_dpi == 0 {
            return Err(RenderError::invalid_style("dpi", "must be positive"));
        }
        if self.palette.is_empty() {
            return Err(RenderError::invalid_style("palette", "needs at least one color"));
        }
        Ok(())
    }

    /// Resolution used for a format.
    pub fn dpi(&self, format: OutputFormat) -> u32 {
        match format {
            OutputFormat::Svg | OutputFormat::Pdf => self.svg_dpi,
            OutputFormat::Png => self.png_dpi,
        }
    }

    /// Canvas size in pixels for a format.
    pub fn pixel_size(&self, format: OutputFormat) -> (u32, u32) {
        let dpi = f64::from(self.dpi(format));
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Converts a length in points to pixels for a format.
    pub fn scaled(&self, points: f64, format: OutputFormat) -> f64 {
        points * f64::from(self.dpi(format)) / POINTS_PER_INCH
    }

    /// Resolves the style to pixel units for a format.
    pub fn theme(&self, format: OutputFormat) -> Theme<'_> {
        Theme {
            style: self,
            scale: f64::from(self.dpi(format)) / POINTS_PER_INCH,
        }
    }
}

/// A [`ChartStyle`] resolved to pixels for one output resolution.
///
/// Figures draw with a `Theme` so they never deal with DPI themselves.
#[derive(Debug, Clone, Copy)]
pub struct Theme<'a> {
    style: &'a ChartStyle,
    scale: f64,
}

impl<'a> Theme<'a> {
    /// The underlying style.
    pub fn style(&self) -> &'a ChartStyle {
        self.style
    }

    /// Points to pixels.
    pub fn px(&self, points: f64) -> f64 {
        points * self.scale
    }

    /// Points to whole pixels, at least one.
    pub fn px_u32(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    /// Points to whole pixels as a signed offset.
    pub fn px_i32(&self, points: f64) -> i32 {
        self.px(points).round() as i32
    }

    /// Default stroke width in pixels, scaled by `factor`.
    pub fn stroke(&self, factor: f64) -> u32 {
        self.px_u32(self.style.line_width * factor)
    }

    /// Palette color `i`, cycling.
    pub fn color(&self, i: usize) -> RGBColor {
        let palette = &self.style.palette;
        palette
            .get(i % palette.len().max(1))
            .map_or(RGBColor(0, 0, 0), |c| c.rgb())
    }

    /// Background color.
    pub fn background(&self) -> RGBColor {
        self.style.background.rgb()
    }

    /// Text color.
    pub fn text_color(&self) -> RGBColor {
        self.style.text_color.rgb()
    }

    /// Grid color.
    pub fn grid_color(&self) -> RGBColor {
        self.style.grid_color.rgb()
    }

    /// A font of `points` size in the configured family.
    pub fn font(&self, points: f64) -> FontDesc<'a> {
        FontDesc::new(
            FontFamily::from(self.style.font_family.as_str()),
            self.px(points),
            FontStyle::Normal,
        )
    }

    /// Figure and panel titles.
    pub fn title(&self) -> TextStyle<'a> {
        FontDesc::new(
            FontFamily::from(self.style.font_family.as_str()),
            self.px(self.style.title_size),
            FontStyle::Bold,
        )
        .color(&self.text_color())
    }

    /// Axis descriptions.
    pub fn label(&self) -> TextStyle<'a> {
        self.font(self.style.label_size).color(&self.text_color())
    }

    /// Tick labels.
    pub fn tick(&self) -> TextStyle<'a> {
        self.font(self.style.tick_size).color(&self.text_color())
    }

    /// Legends and annotations.
    pub fn legend(&self) -> TextStyle<'a> {
        self.font(self.style.legend_size).color(&self.text_color())
    }

    /// Annotation text anchored at its center.
    pub fn annotation(&self) -> TextStyle<'a> {
        self.legend().pos(Pos::new(HPos::Center, VPos::Center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_color_parsing() {
        let color: HexColor = "#1f77B4".parse().unwrap();
        assert_eq!(color, HexColor::new(0x1f, 0x77, 0xb4));
        assert_eq!(color.to_string(), "#1f77b4");

        for bad in ["1f77b4", "#1f77b", "#1f77b4ff", "#gg0000", "#ééé"] {
            assert!(bad.parse::<HexColor>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_presentation_pixel_sizes() {
        let style = ChartStyle::presentation();
        assert_eq!(style.pixel_size(OutputFormat::Png), (3600, 2025));
        assert_eq!(style.pixel_size(OutputFormat::Svg), (1200, 675));
    }

    #[test]
    fn test_scaling_keeps_proportions() {
        let style = ChartStyle::presentation();
        let png = style.scaled(style.title_size, OutputFormat::Png);
        let svg = style.scaled(style.title_size, OutputFormat::Svg);
        assert_relative_eq!(png / svg, 3.0);
        assert_relative_eq!(svg, 16.0 * 100.0 / 72.0);

        let theme = style.theme(OutputFormat::Png);
        assert_relative_eq!(theme.px(72.0), 300.0);
        assert_eq!(theme.stroke(1.0), 8);
    }

    #[test]
    fn test_palette_cycles() {
        let style = ChartStyle::presentation();
        let theme = style.theme(OutputFormat::Svg);
        assert_eq!(theme.color(0), theme.color(style.palette.len()));
    }

    #[test]
    fn test_validate() {
        assert!(ChartStyle::presentation().validate().is_ok());

        let mut style = ChartStyle::presentation();
        style.width_in = 0.0;
        assert!(style.validate().is_err());

        let mut style = ChartStyle::presentation();
        style.palette.clear();
        assert!(style.validate().is_err());
    }
}
