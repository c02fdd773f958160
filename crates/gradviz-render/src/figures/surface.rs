//! Three-dimensional loss surface with the descent path lying on it.

use super::chart::{dot_swatch, legend, line_swatch, DrawResult};
use crate::{colormap::Colormap, style::Theme};
use gradviz_core::{
    objectives::RipplingBowl, sampling::linspace, simulator::GradientDescent, types::point,
    Result,
};
use plotters::{coord::Shift, prelude::*};

/// Visible loss range; the surface dips slightly below zero near its minimum.
const LOSS_RANGE: (f64, f64) = (-3.0, 40.0);

pub(crate) struct LossSurface {
    /// Sample positions along both parameter axes
    pub axis: Vec<f64>,
    /// Lowest and highest sampled loss, for coloring
    pub bounds: (f64, f64),
    /// `(w₁, loss, w₂)` for every iterate, in chart order
    pub path: Vec<(f64, f64, f64)>,
}

/// Rippling bowl from (-3.8, 3.5) with η = 0.1 for 25 iterations.
pub(crate) fn loss_surface() -> Result<LossSurface> {
    let bowl = RipplingBowl::default();
    let trajectory = GradientDescent::new(0.1, 25)?.simulate(&bowl, point(&[-3.8, 3.5]))?;
    let values = trajectory.values().unwrap_or_default();
    let path = trajectory
        .points()
        .iter()
        .zip(values)
        .map(|(p, &loss)| (p[0], loss, p[1]))
        .collect();

    let axis = linspace(-4.0, 4.0, 50);
    let terms: Vec<f64> = axis.iter().copied().map(RipplingBowl::axis_term).collect();
    let lowest = terms.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(LossSurface {
        axis,
        bounds: (2.0 * lowest, 2.0 * highest),
        path,
    })
}

pub(crate) fn draw_loss_surface<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = loss_surface()?;
    let mut chart = ChartBuilder::on(area)
        .caption(
            "Minimizing a loss function with gradient descent",
            theme.title(),
        )
        .margin(theme.px_i32(10.0))
        .build_cartesian_3d(-4.0..4.0, LOSS_RANGE.0..LOSS_RANGE.1, -4.0..4.0)?;
    chart.with_projection(|mut pb| {
        pb.pitch = 0.5;
        pb.yaw = 0.85;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .label_style(theme.tick())
        .light_grid_style(theme.grid_color().mix(0.6))
        .max_light_lines(3)
        .draw()?;

    let (lo, hi) = data.bounds;
    let span = (hi - lo).max(f64::EPSILON);
    chart.draw_series(
        SurfaceSeries::xoz(
            data.axis.iter().copied(),
            data.axis.iter().copied(),
            |w1, w2| RipplingBowl::axis_term(w1) + RipplingBowl::axis_term(w2),
        )
        .style_func(&|&loss| Colormap::Viridis.color((loss - lo) / span).mix(0.6).filled()),
    )?;

    let path_color = RGBColor(0xe6, 0x39, 0x46);
    let width = theme.stroke(1.0);
    chart
        .draw_series(LineSeries::new(data.path.iter().copied(), path_color.stroke_width(width)))?
        .label("Gradient descent path")
        .legend(line_swatch(path_color, width));
    let radius = theme.px_i32(3.0);
    chart.draw_series(
        data.path
            .iter()
            .map(|&p| Circle::new(p, radius, path_color.filled())),
    )?;

    let endpoints = [
        (data.path.first(), RGBColor(0x00, 0x3f, 0x5c), "Starting point"),
        (data.path.last(), RGBColor(0xff, 0xa6, 0x00), "Minimum found"),
    ];
    let big = theme.px_i32(6.0);
    for (at, color, label) in endpoints {
        if let Some(&at) = at {
            chart
                .draw_series(std::iter::once(Circle::new(at, big, color.filled())))?
                .label(label)
                .legend(dot_swatch(color, big));
        }
    }

    let axis_label = theme.label();
    let names = [
        ("Parameter w₁", (4.8, LOSS_RANGE.0, -4.0)),
        ("Parameter w₂", (-4.0, LOSS_RANGE.0, 4.8)),
        ("Loss (error)", (-4.0, LOSS_RANGE.1 + 3.0, -4.0)),
    ];
    chart.draw_series(
        names
            .iter()
            .map(|&(name, at)| Text::new(name.to_string(), at, axis_label.clone())),
    )?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_descends_into_the_bowl() {
        let data = loss_surface().unwrap();
        assert_eq!(data.path.len(), 26);

        let start = data.path[0];
        assert_eq!((start.0, start.2), (-3.8, 3.5));
        assert!((start.1 - 26.07).abs() < 0.01);

        let end = data.path[25];
        assert!((end.0 + 0.716).abs() < 0.01 && (end.2 + 0.715).abs() < 0.01);
        assert!(end.1 < -2.4);
    }

    #[test]
    fn test_bounds_cover_the_path() {
        let data = loss_surface().unwrap();
        let (lo, hi) = data.bounds;
        assert!(lo < 0.0 && hi < LOSS_RANGE.1);
        // Coarse sampling can miss the exact bottom, but not by much.
        assert!(data.path.iter().all(|p| p.1 >= lo - 0.1 && p.1 <= hi));
    }
}
