//! Descent paths drawn over filled level bands of two-parameter surfaces.

use super::chart::{
    arrow, cartesian, colorbar, diamond_vertices, dot_swatch, filled_bands, legend, line_swatch,
    marker, mesh, note, shape_swatch, star_vertices, with_colorbar, DrawResult,
};
use crate::{
    colormap::{Colormap, LevelScale},
    style::Theme,
};
use gradviz_core::{
    objective::Objective,
    objectives::{AxisQuadratic, Rosenbrock, TwoBasinSurface},
    sampling::SurfaceGrid,
    simulator::GradientDescent,
    types::point,
    waypoints::{comparison_paths, IllustrativePath, COMPARISON_START},
    Result,
};
use plotters::{coord::Shift, prelude::*};

/// Samples per axis for the filled bands.
const GRID_RESOLUTION: usize = 160;

pub(crate) struct DescentContour {
    pub grid: SurfaceGrid,
    pub scale: LevelScale,
    pub path: Vec<(f64, f64)>,
    /// Point where the gradient and the step are drawn
    pub annotated: (f64, f64),
    /// Tip of the gradient arrow, normalized to a fixed length
    pub gradient_tip: (f64, f64),
    /// Tip of the descent step -η∇J
    pub step_tip: (f64, f64),
}

/// 0.5x² + 2.5y² from (-3.5, 1.8) with η = 0.3 for six iterations.
pub(crate) fn descent_contour() -> Result<DescentContour> {
    const GRADIENT_ARROW: f64 = 1.2;
    let cost = AxisQuadratic::elongated();
    let descent = GradientDescent::new(0.3, 6)?;
    let path = descent.simulate(&cost, point(&[-3.5, 1.8]))?.pairs()?;

    let annotated = path[1];
    let gradient = cost.gradient(&point(&[annotated.0, annotated.1]))?;
    let unit = &gradient / gradient.norm();
    let step = &gradient * -descent.learning_rate();

    Ok(DescentContour {
        grid: SurfaceGrid::sample(&cost, -4.0..=4.0, -2.0..=2.0, GRID_RESOLUTION, GRID_RESOLUTION)?,
        scale: LevelScale::logarithmic(0.0, 2.0, 14),
        path,
        annotated,
        gradient_tip: (
            annotated.0 + unit[0] * GRADIENT_ARROW,
            annotated.1 + unit[1] * GRADIENT_ARROW,
        ),
        step_tip: (annotated.0 + step[0], annotated.1 + step[1]),
    })
}

pub(crate) fn draw_descent_contour<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = descent_contour()?;
    let mut chart = cartesian(
        area,
        theme,
        "Gradient descent on the cost surface J(θ₀, θ₁)",
        -4.0..4.0,
        -2.0..2.0,
    )?;
    filled_bands(&mut chart, &data.grid, &data.scale, Colormap::ViridisReversed)?;
    mesh(&mut chart, theme, "Model parameter θ₀", "Model parameter θ₁")?;

    let path_color = RGBColor(0xc4, 0x21, 0x21);
    let gradient_color = RGBColor(0x34, 0x82, 0x34);
    let width = theme.stroke(1.0);
    chart
        .draw_series(LineSeries::new(data.path.iter().copied(), path_color.stroke_width(width)))?
        .label("Optimization path (gradient descent)")
        .legend(line_swatch(path_color, width));
    let radius = theme.px_i32(4.0);
    chart.draw_series(
        data.path
            .iter()
            .map(|&p| Circle::new(p, radius, path_color.filled())),
    )?;

    let start_color = RGBColor(0x0d, 0x3b, 0x66);
    let diamond = diamond_vertices(theme.px_i32(6.0));
    marker(chart.plotting_area(), data.path[0], &diamond, start_color)?;
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
        .label("Start")
        .legend(shape_swatch(diamond, start_color));

    let minimum_color = RGBColor(0xf9, 0xa6, 0x02);
    let star = star_vertices(theme.px_i32(9.0));
    marker(chart.plotting_area(), (0.0, 0.0), &star, minimum_color)?;
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
        .label("Global minimum of J(θ)")
        .legend(shape_swatch(star, minimum_color));

    let head = theme.px(9.0);
    arrow(
        chart.plotting_area(),
        data.annotated,
        data.gradient_tip,
        gradient_color.stroke_width(width),
        head,
    )?;
    arrow(
        chart.plotting_area(),
        data.annotated,
        data.step_tip,
        path_color.stroke_width(width),
        head,
    )?;
    note(
        &mut chart,
        theme,
        "Gradient ∇J(θ) (steepest ascent)",
        (data.gradient_tip.0 + 1.3, data.gradient_tip.1),
    )?;
    note(
        &mut chart,
        theme,
        "Descent step −η∇J(θ)",
        (data.step_tip.0 - 0.9, data.step_tip.1 - 0.4),
    )?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

pub(crate) struct CostMinimization {
    pub grid: SurfaceGrid,
    pub scale: LevelScale,
    pub paths: Vec<Vec<(f64, f64)>>,
    pub minimum: (f64, f64),
}

/// 0.5(θ₁ - 2)² + 2.5(θ₂ - 1)² from two starts, η = 0.15, 25 iterations.
pub(crate) fn cost_minimization() -> Result<CostMinimization> {
    let cost = AxisQuadratic::shifted();
    let descent = GradientDescent::new(0.15, 25)?;
    let paths = [[-2.0, 3.5], [5.5, 4.0]]
        .iter()
        .map(|start| -> Result<Vec<(f64, f64)>> { descent.simulate(&cost, point(start))?.pairs() })
        .collect::<Result<Vec<_>>>()?;
    let grid = SurfaceGrid::sample(&cost, -3.0..=7.0, -1.0..=5.0, GRID_RESOLUTION, GRID_RESOLUTION)?;
    let minimizer = cost.minimizer();

    Ok(CostMinimization {
        scale: LevelScale::linear(grid.min(), grid.max(), 50),
        grid,
        paths,
        minimum: (minimizer[0], minimizer[1]),
    })
}

pub(crate) fn draw_cost_minimization<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = cost_minimization()?;
    let (plot, bar) = with_colorbar(area);
    let mut chart = cartesian(
        &plot,
        theme,
        "Cost function minimization with gradient descent",
        -3.0..7.0,
        -1.0..5.0,
    )?;
    filled_bands(&mut chart, &data.grid, &data.scale, Colormap::Magma)?;
    mesh(&mut chart, theme, "Parameter θ₁ (weight 1)", "Parameter θ₂ (weight 2)")?;

    let (path_color, start_color) = (CYAN, RGBColor(0x32, 0xcd, 0x32));
    let width = theme.stroke(0.75);
    let radius = theme.px_i32(2.5);
    for (i, path) in data.paths.iter().enumerate() {
        let series = chart.draw_series(LineSeries::new(path.iter().copied(), path_color.stroke_width(width)))?;
        if i == 0 {
            series
                .label("Optimization path")
                .legend(line_swatch(path_color, width));
        }
        chart.draw_series(path.iter().map(|&p| Circle::new(p, radius, path_color.filled())))?;
        if let Some(&start) = path.first() {
            let series = chart.draw_series(std::iter::once(Circle::new(
                start,
                theme.px_i32(5.0),
                start_color.filled(),
            )))?;
            if i == 0 {
                series
                    .label("Starting points")
                    .legend(dot_swatch(start_color, theme.px_i32(5.0)));
            }
        }
    }

    let star = star_vertices(theme.px_i32(10.0));
    marker(chart.plotting_area(), data.minimum, &star, RED)?;
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
        .label("Global minimum (∇J(θ) = 0)")
        .legend(shape_swatch(star, RED));

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)?;
    colorbar(&bar, theme, &data.scale, Colormap::Magma, "Cost J(θ)")
}

pub(crate) struct RosenbrockDescent {
    pub grid: SurfaceGrid,
    pub scale: LevelScale,
    pub path: Vec<(f64, f64)>,
    pub minimum: (f64, f64),
}

/// Rosenbrock (a = 1, b = 100) from (-1.5, 2.5), η = 0.0012, 1500 iterations.
pub(crate) fn rosenbrock() -> Result<RosenbrockDescent> {
    let surface = Rosenbrock::default();
    let path = GradientDescent::new(0.0012, 1500)?
        .simulate(&surface, point(&[-1.5, 2.5]))?
        .pairs()?;
    let minimizer = surface.minimizer();
    Ok(RosenbrockDescent {
        grid: SurfaceGrid::sample(&surface, -2.0..=2.0, -1.0..=3.0, GRID_RESOLUTION, GRID_RESOLUTION)?,
        scale: LevelScale::logarithmic(0.0, 3.5, 19),
        path,
        minimum: (minimizer[0], minimizer[1]),
    })
}

/// Start, then every 200th iterate from the 100th, excluding the last.
pub(crate) fn sparse_markers(path: &[(f64, f64)]) -> Vec<(f64, f64)> {
    path.iter()
        .enumerate()
        .filter(|&(i, _)| i == 0 || (i >= 100 && i + 1 < path.len() && (i - 100) % 200 == 0))
        .map(|(_, &p)| p)
        .collect()
}

pub(crate) fn draw_rosenbrock<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = rosenbrock()?;
    let (plot, bar) = with_colorbar(area);
    let mut chart = cartesian(
        &plot,
        theme,
        "Gradient descent on the Rosenbrock function",
        -2.0..2.0,
        -1.0..3.0,
    )?;
    filled_bands(&mut chart, &data.grid, &data.scale, Colormap::Viridis)?;
    mesh(&mut chart, theme, "x", "y")?;

    let width = theme.stroke(0.75);
    chart
        .draw_series(LineSeries::new(data.path.iter().copied(), RED.stroke_width(width)))?
        .label("Gradient descent path")
        .legend(line_swatch(RED, width));
    let radius = theme.px_i32(2.5);
    chart.draw_series(
        sparse_markers(&data.path)
            .into_iter()
            .map(|p| Circle::new(p, radius, RED.filled())),
    )?;

    let start_color = RGBColor(0x00, 0x80, 0x00);
    let start_radius = theme.px_i32(5.0);
    chart
        .draw_series(std::iter::once(Circle::new(
            data.path[0],
            start_radius,
            start_color.filled(),
        )))?
        .label("Start")
        .legend(dot_swatch(start_color, start_radius));

    let star = star_vertices(theme.px_i32(10.0));
    marker(chart.plotting_area(), data.minimum, &star, MAGENTA)?;
    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
        .label(format!("Global minimum ({}, {})", data.minimum.0, data.minimum.1))
        .legend(shape_swatch(star, MAGENTA));

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)?;
    colorbar(&bar, theme, &data.scale, Colormap::Viridis, "f(x, y), log scale")
}

pub(crate) struct VariantComparison {
    pub grid: SurfaceGrid,
    pub scale: LevelScale,
    pub descent: Vec<(f64, f64)>,
    pub illustrative: [IllustrativePath; 2],
}

/// Plain descent simulated on the two-basin surface, next to the
/// hand-authored SGD and Adam waypoints.
pub(crate) fn variant_comparison() -> Result<VariantComparison> {
    let surface = TwoBasinSurface;
    let descent = GradientDescent::new(0.1, 60)?
        .simulate(&surface, point(&[COMPARISON_START.0, COMPARISON_START.1]))?
        .pairs()?;
    let grid = SurfaceGrid::sample(&surface, -5.0..=5.0, -7.0..=7.0, GRID_RESOLUTION, GRID_RESOLUTION)?;
    Ok(VariantComparison {
        scale: LevelScale::linear(grid.min(), grid.max(), 20),
        grid,
        descent,
        illustrative: comparison_paths(),
    })
}

pub(crate) fn draw_variant_comparison<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = variant_comparison()?;
    let mut chart = cartesian(
        area,
        theme,
        "Comparison of gradient descent variants",
        -5.0..5.0,
        -7.0..7.0,
    )?;
    filled_bands(&mut chart, &data.grid, &data.scale, Colormap::ViridisReversed)?;
    mesh(&mut chart, theme, "Parameter 1 (w₁)", "Parameter 2 (w₂)")?;

    let width = theme.stroke(1.25);
    let radius = theme.px_i32(3.0);
    let paths = [
        ("GD (simulated, η = 0.1)", &data.descent, RGBColor(0x37, 0x7e, 0xb8)),
        (
            data.illustrative[0].label,
            &data.illustrative[0].points,
            RGBColor(0xff, 0x7f, 0x00),
        ),
        (
            data.illustrative[1].label,
            &data.illustrative[1].points,
            RGBColor(0x4d, 0xaf, 0x4a),
        ),
    ];
    for (label, points, color) in paths {
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            WHITE.stroke_width(theme.stroke(2.0)),
        ))?;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(width)))?
            .label(label)
            .legend(line_swatch(color, width));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, radius, color.filled())))?;
    }

    let cross = theme.px_i32(7.0);
    chart
        .draw_series(std::iter::once(Cross::new(
            COMPARISON_START,
            cross,
            RED.stroke_width(theme.stroke(1.0)),
        )))?
        .label("Start")
        .legend(move |(x, y)| Cross::new((x + 10, y), cross, RED.stroke_width(2)));

    if let Some(&end) = data.descent.last() {
        let star = star_vertices(theme.px_i32(9.0));
        marker(chart.plotting_area(), end, &star, WHITE)?;
        note(&mut chart, theme, "Global minimum", (end.0, end.1 - 0.8))?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_descent_contour_annotation() {
        let data = descent_contour().unwrap();
        assert_eq!(data.path.len(), 7);
        // First step: (-3.5, 1.8) - 0.3 * (-3.5, 9.0).
        assert_relative_eq!(data.annotated.0, -2.45, epsilon = 1e-12);
        assert_relative_eq!(data.annotated.1, -0.9, epsilon = 1e-12);
        let length = (data.gradient_tip.0 - data.annotated.0).hypot(data.gradient_tip.1 - data.annotated.1);
        assert_relative_eq!(length, 1.2, epsilon = 1e-12);
        assert_eq!(data.step_tip, data.path[2]);
    }

    #[test]
    fn test_cost_minimization_paths_converge() {
        let data = cost_minimization().unwrap();
        assert_eq!(data.paths.len(), 2);
        for path in &data.paths {
            assert_eq!(path.len(), 26);
            let end = path[25];
            assert!((end.0 - 2.0).abs() < 0.1 && (end.1 - 1.0).abs() < 1e-6);
        }
        assert_relative_eq!(data.grid.min(), 0.0, epsilon = 1e-3);
        assert_eq!(data.scale.bands(), 50);
    }

    #[test]
    fn test_rosenbrock_path_and_markers() {
        let data = rosenbrock().unwrap();
        assert_eq!(data.path.len(), 1501);
        let end = data.path[1500];
        // Still crawling along the valley floor towards (1, 1).
        assert!((end.0 - 0.532).abs() < 0.01 && (end.1 - 0.281).abs() < 0.01);
        assert_eq!(data.scale.levels().len(), 20);

        let markers = sparse_markers(&data.path);
        assert_eq!(markers.len(), 8);
        assert_eq!(markers[0], (-1.5, 2.5));
        assert_eq!(markers[1], data.path[100]);
    }

    #[test]
    fn test_variant_comparison_descent_reaches_lower_basin() {
        let data = variant_comparison().unwrap();
        let end = *data.descent.last().unwrap();
        assert!((end.0 + 0.907).abs() < 0.01);
        assert!((end.1 + 2.262).abs() < 0.01);
        assert_eq!(data.descent[0], COMPARISON_START);
        assert!(data.illustrative.iter().all(|p| p.start() == Some(COMPARISON_START)));
    }
}
