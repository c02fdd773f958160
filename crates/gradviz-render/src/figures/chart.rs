//! Drawing helpers shared by the figures.

use crate::{colormap::{Colormap, LevelScale}, style::Theme};
use gradviz_core::sampling::SurfaceGrid;
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};
use plotters_backend::BackendCoord;
use std::{error::Error, ops::Range};

/// Result of a drawing routine; backend errors are boxed.
pub(crate) type DrawResult<T = ()> = std::result::Result<T, Box<dyn Error>>;

/// A two-dimensional chart with `f64` axes.
pub(crate) type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Chart margin, in points.
const MARGIN: f64 = 10.0;
/// Height reserved under the plot for x tick labels, in points.
const X_LABEL_AREA: f64 = 32.0;
/// Width reserved left of the plot for y tick labels, in points.
const Y_LABEL_AREA: f64 = 44.0;

/// Builds a chart with the theme's margins; an empty caption is omitted.
pub(crate) fn cartesian<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    theme: &Theme<'_>,
    caption: &str,
    x: Range<f64>,
    y: Range<f64>,
) -> DrawResult<Chart2d<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(theme.px_i32(MARGIN))
        .x_label_area_size(theme.px_i32(X_LABEL_AREA))
        .y_label_area_size(theme.px_i32(Y_LABEL_AREA));
    if !caption.is_empty() {
        builder.caption(caption, theme.title());
    }
    Ok(builder.build_cartesian_2d(x, y)?)
}

/// Grid, tick labels and axis descriptions.
pub(crate) fn mesh<DB>(
    chart: &mut Chart2d<'_, DB>,
    theme: &Theme<'_>,
    x_desc: &str,
    y_desc: &str,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(theme.label())
        .label_style(theme.tick())
        .bold_line_style(theme.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()?;
    Ok(())
}

/// Series legend in a translucent box.
pub(crate) fn legend<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    theme: &Theme<'_>,
    position: SeriesLabelPosition,
) -> DrawResult
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    CT: CoordTranslate,
{
    chart
        .configure_series_labels()
        .position(position)
        .label_font(theme.legend())
        .background_style(WHITE.mix(0.85))
        .border_style(theme.grid_color())
        .draw()?;
    Ok(())
}

/// Draws a labelled line; `dash` is `(dash, gap)` in points, `None` for a
/// solid stroke.
pub(crate) fn labelled_line<DB>(
    chart: &mut Chart2d<'_, DB>,
    theme: &Theme<'_>,
    points: Vec<(f64, f64)>,
    dash: Option<(f64, f64)>,
    color: RGBColor,
    width: u32,
    label: &str,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = color.stroke_width(width);
    let series = match dash {
        None => chart.draw_series(LineSeries::new(points, style))?,
        Some((on, off)) => chart.draw_series(DashedLineSeries::new(
            points,
            theme.px_i32(on).max(1),
            theme.px_i32(off).max(1),
            style,
        ))?,
    };
    if !label.is_empty() {
        series.label(label).legend(line_swatch(color, width));
    }
    Ok(())
}

/// Legend marker for a line series.
pub(crate) fn line_swatch(
    color: RGBColor,
    width: u32,
) -> impl Fn(BackendCoord) -> PathElement<BackendCoord> {
    move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
}

/// Legend marker for a scatter series.
pub(crate) fn dot_swatch(color: RGBColor, radius: i32) -> impl Fn(BackendCoord) -> Circle<BackendCoord, i32> {
    move |(x, y)| Circle::new((x + 10, y), radius, color.filled())
}

/// Draws an arrow from `from` to `to` in data coordinates.
pub(crate) fn arrow<DB, CT>(
    area: &DrawingArea<DB, CT>,
    from: (f64, f64),
    to: (f64, f64),
    style: ShapeStyle,
    head: f64,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    pixel_arrow(
        &area.strip_coord_spec(),
        area.map_coordinate(&from),
        area.map_coordinate(&to),
        style,
        head,
    )
}

/// Draws an arrow between two backend pixels on `canvas`.
///
/// The head is built in pixel space so it keeps its shape whatever the axis
/// scales.
pub(crate) fn pixel_arrow<DB>(
    canvas: &DrawingArea<DB, Shift>,
    from: BackendCoord,
    to: BackendCoord,
    style: ShapeStyle,
    head: f64,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (base_x, base_y) = canvas.get_base_pixel();
    let to_local = |(x, y): BackendCoord| (f64::from(x - base_x), f64::from(y - base_y));
    let start = to_local(from);
    let end = to_local(to);

    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = dx.hypot(dy);
    if length < 1.0 {
        return Ok(());
    }
    let (ux, uy) = (dx / length, dy / length);
    let head = head.min(length * 0.6);
    let back = (end.0 - ux * head, end.1 - uy * head);
    let pixel = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);

    canvas.draw(&PathElement::new(vec![pixel(start), pixel(back)], style))?;
    canvas.draw(&Polygon::new(
        vec![
            pixel(end),
            pixel((back.0 - uy * head * 0.45, back.1 + ux * head * 0.45)),
            pixel((back.0 + uy * head * 0.45, back.1 - ux * head * 0.45)),
        ],
        ShapeStyle {
            color: style.color,
            filled: true,
            stroke_width: 1,
        },
    ))?;
    Ok(())
}

/// Offsets of a five-pointed star's vertices around its center.
pub(crate) fn star_vertices(radius: i32) -> Vec<BackendCoord> {
    let outer = f64::from(radius);
    let inner = outer * 0.45;
    (0..10_i32)
        .map(|k| {
            let angle = std::f64::consts::PI * (f64::from(k) / 5.0 - 0.5);
            let r = if k % 2 == 0 { outer } else { inner };
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

/// Offsets of a diamond's vertices around its center.
pub(crate) fn diamond_vertices(radius: i32) -> Vec<BackendCoord> {
    vec![(0, -radius), (radius, 0), (0, radius), (-radius, 0)]
}

/// Fills the polygon `vertices`, given as pixel offsets, centered on a
/// data point.
pub(crate) fn marker<DB, CT>(
    area: &DrawingArea<DB, CT>,
    at: (f64, f64),
    vertices: &[BackendCoord],
    color: RGBColor,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let canvas = area.strip_coord_spec();
    let (base_x, base_y) = canvas.get_base_pixel();
    let (x, y) = area.map_coordinate(&at);
    let (cx, cy) = (x - base_x, y - base_y);
    canvas.draw(&Polygon::new(
        vertices.iter().map(|&(dx, dy)| (cx + dx, cy + dy)).collect::<Vec<_>>(),
        color.filled(),
    ))?;
    Ok(())
}

/// Legend marker for a polygon marker.
pub(crate) fn shape_swatch(
    vertices: Vec<BackendCoord>,
    color: RGBColor,
) -> impl Fn(BackendCoord) -> Polygon<BackendCoord> {
    move |(x, y)| {
        Polygon::new(
            vertices.iter().map(|&(dx, dy)| (x + 10 + dx, y + dy)).collect::<Vec<_>>(),
            color.filled(),
        )
    }
}

/// Text centered on a data point.
pub(crate) fn note<DB>(
    chart: &mut Chart2d<'_, DB>,
    theme: &Theme<'_>,
    text: &str,
    at: (f64, f64),
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(std::iter::once(Text::new(
        text.to_string(),
        at,
        theme.annotation(),
    )))?;
    Ok(())
}

/// Fills every grid cell with the colormap color of its level band.
pub(crate) fn filled_bands<DB>(
    chart: &mut Chart2d<'_, DB>,
    grid: &SurfaceGrid,
    scale: &LevelScale,
    colormap: Colormap,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(grid.cells().map(|cell| {
        let color = colormap.color(scale.fraction(cell.value));
        Rectangle::new([cell.lower, cell.upper], color.filled())
    }))?;
    Ok(())
}

/// Vertical colorbar with one block per band, labelled with level values.
pub(crate) fn colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    theme: &Theme<'_>,
    scale: &LevelScale,
    colormap: Colormap,
    caption: &str,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bands = scale.bands();
    let levels = scale.levels().to_vec();
    let mut chart = ChartBuilder::on(area)
        .margin_top(theme.px_i32(40.0))
        .margin_bottom(theme.px_i32(40.0))
        .margin_right(theme.px_i32(8.0))
        .y_label_area_size(theme.px_i32(40.0))
        .build_cartesian_2d(0.0..1.0, 0.0..bands as f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(caption)
        .axis_desc_style(theme.label())
        .label_style(theme.tick())
        .y_labels(bands.min(6) + 1)
        .y_label_formatter(&|y| {
            let i = (y.round().max(0.0) as usize).min(levels.len() - 1);
            format_level(levels[i])
        })
        .draw()?;

    chart.draw_series((0..bands).map(|band| {
        let t = band as f64 / (bands.max(2) - 1) as f64;
        Rectangle::new(
            [(0.0, band as f64), (1.0, band as f64 + 1.0)],
            colormap.color(t).filled(),
        )
    }))?;
    Ok(())
}

/// Compact level label: integers plainly, small or large values in
/// scientific notation.
pub(crate) fn format_level(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(0.01..10_000.0).contains(&magnitude) {
        format!("{value:.1e}")
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Splits off a colorbar strip on the right of `area`.
pub(crate) fn with_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>)
where
    DB: DrawingBackend,
{
    let width = area.dim_in_pixel().0;
    area.split_horizontally((f64::from(width) * 0.87) as i32)
}

/// Splits `area` so that an uncaptioned [`cartesian`] chart on the left part
/// gets a square plotting region; the remainder is a side panel.
pub(crate) fn square_split<DB>(
    area: &DrawingArea<DB, Shift>,
    theme: &Theme<'_>,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>)
where
    DB: DrawingBackend,
{
    let height = area.dim_in_pixel().1 as i32;
    area.split_horizontally(height - theme.px_i32(X_LABEL_AREA) + theme.px_i32(Y_LABEL_AREA))
}

/// Draws `lines` top-down from the pixel `at` of `area`.
pub(crate) fn text_lines<DB, S>(
    area: &DrawingArea<DB, Shift>,
    theme: &Theme<'_>,
    lines: &[S],
    at: BackendCoord,
    style: &TextStyle<'_>,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    S: AsRef<str>,
{
    let line_height = theme.px(theme.style().legend_size) * 1.5;
    for (i, line) in lines.iter().enumerate() {
        let offset = (line_height * i as f64).round() as i32;
        area.draw(&Text::new(line.as_ref(), (at.0, at.1 + offset), style.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(0.0), "0");
        assert_eq!(format_level(25.0), "25");
        assert_eq!(format_level(2.5), "2.50");
        assert_eq!(format_level(3162.28), "3162.28");
        assert_eq!(format_level(31_622.8), "3.2e4");
        assert_eq!(format_level(0.001), "1.0e-3");
    }

    #[test]
    fn test_star_vertices() {
        let star = star_vertices(10);
        assert_eq!(star.len(), 10);
        // First tip points straight up.
        assert_eq!(star[0], (0, -10));
        assert!(star.iter().all(|&(x, y)| x * x + y * y <= 101));
    }
}
