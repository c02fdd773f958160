//! Directional and partial derivatives of two-variable bowls.

use super::chart::{
    arrow, cartesian, dot_swatch, filled_bands, labelled_line, legend, line_swatch, mesh,
    square_split, text_lines, DrawResult,
};
use crate::{
    colormap::{Colormap, LevelScale},
    style::Theme,
};
use gradviz_core::{
    calculus::{axis_section, directional_derivative, AxisSection, DirectionalDerivative},
    objective::Objective,
    objectives::AxisQuadratic,
    sampling::{linspace, SurfaceGrid},
    types::{point, Point},
    Result,
};
use nalgebra::dvector;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// Length of the drawn direction arrows.
const ARROW_LENGTH: f64 = 1.0;
/// Radius of the arc marking θ.
const ANGLE_RADIUS: f64 = 0.5;

pub(crate) struct DirectionalView {
    pub grid: SurfaceGrid,
    pub scale: LevelScale,
    pub derivative: DirectionalDerivative,
    /// Arc from ∇f(P) to v, empty at a stationary point
    pub arc: Vec<(f64, f64)>,
}

/// (x - 1)² + 2(y - 1)² at P = (2.5, 2) along v = (-2, 1.5).
pub(crate) fn directional_view() -> Result<DirectionalView> {
    let bowl = AxisQuadratic::new(dvector![2.0, 4.0], point(&[1.0, 1.0]))?;
    let derivative = directional_derivative(&bowl, &point(&[2.5, 2.0]), &point(&[-2.0, 1.5]))?;
    let grid = SurfaceGrid::sample(&bowl, -1.5..=4.5, -1.5..=4.5, 120, 120)?;
    let scale = LevelScale::linear(0.0, grid.max(), 10);
    let arc = derivative
        .ascent()
        .map(|ascent| {
            angle_arc(
                pair(&derivative.at),
                pair(&ascent),
                pair(&derivative.direction),
                ANGLE_RADIUS,
            )
        })
        .unwrap_or_default();

    Ok(DirectionalView {
        grid,
        scale,
        derivative,
        arc,
    })
}

fn pair(p: &Point) -> (f64, f64) {
    (p[0], p[1])
}

/// Points of the circle of `radius` about `center`, turning from the
/// direction of `from` to that of `to` the short way round.
fn angle_arc(center: (f64, f64), from: (f64, f64), to: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    let start = from.1.atan2(from.0);
    let sweep = (from.0 * to.1 - from.1 * to.0).atan2(from.0 * to.0 + from.1 * to.1);
    linspace(0.0, 1.0, 40)
        .into_iter()
        .map(|t| {
            let angle = start + sweep * t;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

pub(crate) fn draw_directional_derivative<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = directional_view()?;
    let d = &data.derivative;
    let body = area.titled("Visualizing the directional derivative", theme.title())?;
    let (plot, side) = square_split(&body, theme);

    let mut chart = cartesian(&plot, theme, "", -1.5..4.5, -1.5..4.5)?;
    filled_bands(&mut chart, &data.grid, &data.scale, Colormap::ViridisReversed)?;
    mesh(&mut chart, theme, "x", "y")?;

    let at = pair(&d.at);
    let head = theme.px(10.0);
    let width = theme.stroke(1.75);
    let label = |color: RGBColor, h: HPos, v: VPos| TextStyle {
        color: color.to_backend_color(),
        pos: Pos::new(h, v),
        ..theme.annotation()
    };
    let offset = |dir: (f64, f64), scale: f64| (at.0 + dir.0 * scale, at.1 + dir.1 * scale);

    let mut arrows = Vec::new();
    if let Some(ascent) = d.ascent() {
        let up = pair(&ascent);
        let down = (-up.0, -up.1);
        arrows.push((up, RGBColor(0xd6, 0x27, 0x28), "∇f(P): steepest ascent", "∇f(P)", HPos::Left, VPos::Bottom));
        arrows.push((down, RGBColor(0x1f, 0x77, 0xb4), "−∇f(P): steepest descent", "−∇f(P)", HPos::Right, VPos::Top));
    }
    arrows.push((
        pair(&d.direction),
        RGBColor(0x2c, 0xa0, 0x2c),
        "v: arbitrary unit direction",
        "v",
        HPos::Right,
        VPos::Bottom,
    ));
    for (dir, color, legend_text, tag, h, v) in arrows {
        arrow(
            chart.plotting_area(),
            at,
            offset(dir, ARROW_LENGTH),
            color.stroke_width(width),
            head,
        )?;
        chart
            .draw_series(std::iter::once(Text::new(tag, offset(dir, ARROW_LENGTH * 1.1), label(color, h, v))))?
            .label(legend_text)
            .legend(line_swatch(color, width));
    }

    let arc_color = RGBColor(0x80, 0x00, 0x80);
    if let Some(&middle) = data.arc.get(data.arc.len() / 2) {
        labelled_line(&mut chart, theme, data.arc.clone(), Some((3.0, 2.0)), arc_color, theme.stroke(1.0), "")?;
        let outside = (at.0 + (middle.0 - at.0) * 1.5, at.1 + (middle.1 - at.1) * 1.5);
        chart.draw_series(std::iter::once(Text::new(
            "θ",
            outside,
            label(arc_color, HPos::Center, VPos::Center),
        )))?;
    }

    let radius = theme.px_i32(5.0);
    chart
        .draw_series(std::iter::once(Circle::new(at, radius, BLACK.filled())))?
        .label("P: point of evaluation")
        .legend(dot_swatch(BLACK, radius));
    chart.draw_series(std::iter::once(Text::new(
        "P",
        (at.0 + 0.1, at.1 - 0.15),
        label(BLACK, HPos::Left, VPos::Top),
    )))?;
    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)?;

    let angle = d
        .angle
        .map_or_else(|| "undefined (∇f(P) = 0)".to_string(), |a| format!("{:.1}°", a.to_degrees()));
    let lines = [
        format!("At P = ({:.1}, {:.1}):", at.0, at.1),
        format!("∇f(P) = ({:.2}, {:.2})", d.gradient[0], d.gradient[1]),
        format!("v = ({:.2}, {:.2}), ‖v‖ = 1", d.direction[0], d.direction[1]),
        format!("θ = {angle}"),
        String::new(),
        "D_v f(P) = ∇f(P)·v = ‖∇f(P)‖ cos θ".to_string(),
        format!("D_v f(P) = {:.2}", d.value),
        String::new(),
        format!("Largest rate of change: ‖∇f(P)‖ = {:.2}", d.steepest()),
    ];
    let style = theme.legend().pos(Pos::new(HPos::Left, VPos::Top));
    text_lines(&side, theme, &lines, (theme.px_i32(12.0), theme.px_i32(40.0)), &style)
}

pub(crate) struct PartialView {
    pub bowl: AxisQuadratic,
    /// Surface samples along both axes
    pub axis: Vec<f64>,
    /// Sections along x (y fixed) and along y (x fixed)
    pub sections: [AxisSection; 2],
}

/// x² + y² with both sections through (1, 1).
pub(crate) fn partial_view() -> Result<PartialView> {
    let bowl = AxisQuadratic::new(dvector![2.0, 2.0], point(&[0.0, 0.0]))?;
    let at = point(&[1.0, 1.0]);
    let sections = [
        axis_section(&bowl, &at, 0, -2.0..=2.0, 100)?,
        axis_section(&bowl, &at, 1, -2.0..=2.0, 100)?,
    ];
    Ok(PartialView {
        bowl,
        axis: linspace(-2.0, 2.0, 40),
        sections,
    })
}

impl PartialView {
    /// `(x, f, y)` chart coordinates of a section.
    pub fn curve(&self, i: usize) -> Vec<(f64, f64, f64)> {
        let section = &self.sections[i];
        section
            .points
            .iter()
            .zip(&section.values)
            .map(|(p, &z)| (p[0], z, p[1]))
            .collect()
    }

    /// Tangent segment of a section, one unit either side of the point.
    pub fn tangent(&self, i: usize) -> Vec<(f64, f64, f64)> {
        let section = &self.sections[i];
        let center = section.at[section.axis];
        [center - 1.0, center + 1.0]
            .into_iter()
            .map(|t| {
                let mut p = section.at.clone();
                p[section.axis] = t;
                (p[0], section.tangent(t), p[1])
            })
            .collect()
    }
}

pub(crate) fn draw_partial_derivatives<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const HEIGHT: (f64, f64) = (0.0, 8.0);
    let data = partial_view()?;
    let at = &data.sections[0].at;
    let height = data.sections[0].value;

    let mut chart = ChartBuilder::on(area)
        .caption("Partial derivatives: measuring local change", theme.title())
        .margin(theme.px_i32(10.0))
        .build_cartesian_3d(-2.0..2.0, HEIGHT.0..HEIGHT.1, -2.0..2.0)?;
    chart.with_projection(|mut pb| {
        pb.pitch = 0.45;
        pb.yaw = 0.6;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .label_style(theme.tick())
        .light_grid_style(theme.grid_color().mix(0.6))
        .max_light_lines(3)
        .draw()?;

    let bowl = &data.bowl;
    chart.draw_series(
        SurfaceSeries::xoz(data.axis.iter().copied(), data.axis.iter().copied(), |x, y| {
            bowl.evaluate(&point(&[x, y])).unwrap_or(f64::NAN)
        })
        .style_func(&|&z| Colormap::Viridis.color(z / HEIGHT.1).mix(0.5).filled()),
    )?;

    let width = theme.stroke(1.75);
    let names = ["x", "y"];
    let fixed = ["y", "x"];
    let colors = [
        (RGBColor(0x1f, 0x4e, 0xc8), RGBColor(0x0b, 0x26, 0x6e)),
        (RGBColor(0x2c, 0xa0, 0x2c), RGBColor(0x13, 0x5c, 0x13)),
    ];
    for (i, (curve_color, tangent_color)) in colors.into_iter().enumerate() {
        let section = &data.sections[i];
        chart
            .draw_series(LineSeries::new(data.curve(i), curve_color.stroke_width(width)))?
            .label(format!(
                "Section with {} = {} held constant",
                fixed[i],
                at[1 - section.axis]
            ))
            .legend(line_swatch(curve_color, width));
        chart
            .draw_series(LineSeries::new(data.tangent(i), tangent_color.stroke_width(width)))?
            .label(format!("Tangent: ∂f/∂{} = {:.2}", names[i], section.slope))
            .legend(line_swatch(tangent_color, width));
    }

    let point_color = RGBColor(0xd6, 0x27, 0x28);
    let radius = theme.px_i32(6.0);
    chart
        .draw_series(std::iter::once(Circle::new((at[0], height, at[1]), radius, point_color.filled())))?
        .label(format!("Point of interest ({}, {}, {})", at[0], at[1], height))
        .legend(dot_swatch(point_color, radius));

    let axis_label = theme.label();
    let captions = [
        ("Variable x", (2.4, HEIGHT.0, -2.0)),
        ("Variable y", (-2.0, HEIGHT.0, 2.4)),
        ("f(x, y) = x² + y²", (-2.0, HEIGHT.1 + 0.6, -2.0)),
    ];
    chart.draw_series(
        captions
            .iter()
            .map(|&(name, at)| Text::new(name.to_string(), at, axis_label.clone())),
    )?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)
}
