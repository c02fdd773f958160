//! One-dimensional gradient descent figures.

use super::chart::{arrow, cartesian, dot_swatch, legend, line_swatch, mesh, note, DrawResult};
use crate::style::Theme;
use gradviz_core::{
    objective::Objective,
    objectives::{Parabola, Polynomial},
    sampling::CurveSamples,
    simulator::{GradientDescent, Trajectory},
    types::point,
    Result,
};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// `(θ, J(θ))` for every point of a one-dimensional trajectory.
fn curve_points(trajectory: &Trajectory) -> Vec<(f64, f64)> {
    let thetas = trajectory.points().iter().map(|p| p[0]);
    match trajectory.values() {
        Some(values) => thetas.zip(values.iter().copied()).collect(),
        None => thetas.map(|t| (t, f64::NAN)).collect(),
    }
}

pub(crate) struct DescentSteps {
    pub curve: CurveSamples,
    pub steps: Vec<(f64, f64)>,
}

/// J(θ) = θ² from θ₀ = 3.8 with η = 0.15 for five iterations.
pub(crate) fn descent_steps() -> Result<DescentSteps> {
    let cost = Parabola::unit();
    let trajectory = GradientDescent::new(0.15, 5)?.simulate(&cost, point(&[3.8]))?;
    Ok(DescentSteps {
        curve: CurveSamples::sample(&cost, -4.5..=4.5, 400)?,
        steps: curve_points(&trajectory),
    })
}

pub(crate) fn draw_descent_steps<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = descent_steps()?;
    let mut chart = cartesian(
        area,
        theme,
        "Gradient descent on J(θ) = θ²",
        -4.5..4.5,
        -1.0..18.0,
    )?;
    mesh(&mut chart, theme, "Parameter θ", "Cost J(θ)")?;

    let (curve_color, step_color) = (theme.color(0), theme.color(1));
    let width = theme.stroke(1.25);
    chart
        .draw_series(LineSeries::new(data.curve.points(), curve_color.stroke_width(width)))?
        .label("Cost function J(θ) = θ²")
        .legend(line_swatch(curve_color, width));

    for pair in data.steps.windows(2) {
        arrow(
            chart.plotting_area(),
            pair[0],
            pair[1],
            step_color.stroke_width(theme.stroke(1.0)),
            theme.px(9.0),
        )?;
    }
    let radius = theme.px_i32(4.0);
    chart
        .draw_series(
            data.steps
                .iter()
                .map(|&p| Circle::new(p, radius, step_color.filled())),
        )?
        .label("Iterations")
        .legend(dot_swatch(step_color, radius));

    let start = data.steps[0];
    note(&mut chart, theme, "Start (θ₀)", (start.0 - 0.2, start.1 + 1.6))?;
    note(&mut chart, theme, "Global minimum", (0.0, 2.2))?;
    arrow(
        chart.plotting_area(),
        (0.0, 1.6),
        (0.0, 0.15),
        theme.text_color().stroke_width(theme.stroke(0.5)),
        theme.px(6.0),
    )?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

pub(crate) struct UpdateRule {
    pub curve: CurveSamples,
    pub start: (f64, f64),
    pub updated: (f64, f64),
    pub tangent: Vec<(f64, f64)>,
}

/// One update of J(θ) = θ² from θ₀ = -3.5 with η = 0.3.
pub(crate) fn update_rule() -> Result<UpdateRule> {
    let cost = Parabola::unit();
    let trajectory = GradientDescent::new(0.3, 1)?.simulate(&cost, point(&[-3.5]))?;
    let points = curve_points(&trajectory);
    let (start, updated) = (points[0], points[1]);

    let slope = cost.slope(start.0);
    let tangent = CurveSamples::from_fn(|t| start.1 + slope * (t - start.0), start.0 - 1.0..=start.0 + 1.0, 10)
        .points()
        .collect();

    Ok(UpdateRule {
        curve: CurveSamples::sample(&cost, -4.5..=4.5, 400)?,
        start,
        updated,
        tangent,
    })
}

pub(crate) fn draw_update_rule<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = update_rule()?;
    let mut chart = cartesian(
        area,
        theme,
        "The update rule θ₁ = θ₀ − η∇J(θ₀)",
        -4.5..4.5,
        -5.0..20.0,
    )?;
    mesh(&mut chart, theme, "Parameter θ", "Loss J(θ)")?;

    let width = theme.stroke(1.25);
    let (curve, tangent, start, updated) = (
        theme.color(0),
        theme.color(3),
        theme.color(1),
        theme.color(4),
    );
    chart
        .draw_series(LineSeries::new(data.curve.points(), curve.stroke_width(width)))?
        .label("Loss J(θ)")
        .legend(line_swatch(curve, width));
    chart
        .draw_series(DashedLineSeries::new(
            data.tangent.iter().copied(),
            theme.px_i32(6.0),
            theme.px_i32(4.0),
            tangent.stroke_width(theme.stroke(1.0)),
        ))?
        .label("Gradient at θ₀ (∇J(θ₀))")
        .legend(line_swatch(tangent, theme.stroke(1.0)));

    arrow(
        chart.plotting_area(),
        data.start,
        data.updated,
        theme.text_color().stroke_width(theme.stroke(1.0)),
        theme.px(10.0),
    )?;

    let radius = theme.px_i32(6.0);
    chart
        .draw_series(std::iter::once(Circle::new(data.start, radius, start.filled())))?
        .label("Initial parameter (θ₀)")
        .legend(dot_swatch(start, radius));
    chart
        .draw_series(std::iter::once(Circle::new(data.updated, radius, updated.filled())))?
        .label("Updated parameter (θ₁)")
        .legend(dot_swatch(updated, radius));

    let middle = (
        (data.start.0 + data.updated.0) / 2.0,
        (data.start.1 + data.updated.1) / 2.0 + 2.5,
    );
    note(&mut chart, theme, "−η∇J(θ₀)", middle)?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

pub(crate) struct RateRun {
    pub learning_rate: f64,
    pub label: &'static str,
    pub visible: Vec<(f64, f64)>,
    pub diverged: bool,
}

pub(crate) const LEARNING_RATES: [(f64, &str); 4] = [
    (0.05, "Small"),
    (0.2, "Suitable"),
    (0.6, "Large"),
    (1.05, "Too large"),
];

const RATE_VIEW: (f64, f64) = (4.5, 18.0);

/// J(θ) = θ² from θ₀ = 3 for 20 iterations at each learning rate.
///
/// Only the leading points inside the view are kept, so a diverging run
/// stops where it leaves the chart.
pub(crate) fn learning_rates() -> Result<(CurveSamples, Vec<RateRun>)> {
    let cost = Parabola::unit();
    let runs = LEARNING_RATES
        .iter()
        .map(|&(learning_rate, label)| -> Result<RateRun> {
            let trajectory = GradientDescent::new(learning_rate, 20)?.simulate(&cost, point(&[3.0]))?;
            let points = curve_points(&trajectory);
            let diverged = trajectory.last()[0].abs() > trajectory.initial()[0].abs();
            let visible = points
                .into_iter()
                .take_while(|&(x, y)| x.abs() <= RATE_VIEW.0 && y <= RATE_VIEW.1)
                .collect();
            Ok(RateRun {
                learning_rate,
                label,
                visible,
                diverged,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((CurveSamples::sample(&cost, -4.0..=4.0, 400)?, runs))
}

pub(crate) fn draw_learning_rates<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (curve, runs) = learning_rates()?;
    let mut chart = cartesian(
        area,
        theme,
        "Impact of the learning rate η on gradient descent",
        -RATE_VIEW.0..RATE_VIEW.0,
        -0.5..RATE_VIEW.1,
    )?;
    mesh(&mut chart, theme, "Parameter x", "Cost f(x)")?;

    let gray = theme.style().palette.last().map_or(BLACK, |c| c.rgb());
    chart
        .draw_series(DashedLineSeries::new(
            curve.points(),
            theme.px_i32(6.0),
            theme.px_i32(4.0),
            gray.stroke_width(theme.stroke(0.75)),
        ))?
        .label("Cost function f(x) = x²")
        .legend(line_swatch(gray, theme.stroke(0.75)));

    let radius = theme.px_i32(3.5);
    for (i, run) in runs.iter().enumerate() {
        let color = theme.color(i);
        let width = theme.stroke(1.0);
        let suffix = if run.diverged { ", diverges" } else { "" };
        chart
            .draw_series(LineSeries::new(run.visible.iter().copied(), color.stroke_width(width)))?
            .label(format!("{} (η = {}{suffix})", run.label, run.learning_rate))
            .legend(line_swatch(color, width));
        chart.draw_series(
            run.visible
                .iter()
                .map(|&p| Circle::new(p, radius, color.filled())),
        )?;
        for pair in run.visible.windows(2).take(4) {
            arrow(
                chart.plotting_area(),
                pair[0],
                pair[1],
                color.stroke_width(width),
                theme.px(7.0),
            )?;
        }
    }

    let marker = theme.color(3);
    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, 0.0),
            theme.px_i32(5.0),
            marker.filled(),
        )))?
        .label("Global minimum")
        .legend(dot_swatch(marker, theme.px_i32(5.0)));

    let left = theme.legend().pos(Pos::new(HPos::Left, VPos::Center));
    let notes = [
        "Small η: slow convergence, many iterations.",
        "Suitable η: efficient convergence to the minimum.",
        "Large η: oscillation around the minimum or divergence.",
    ];
    for (i, text) in notes.iter().enumerate() {
        chart.draw_series(std::iter::once(Text::new(
            (*text).to_string(),
            (-4.3, 17.0 - 1.2 * i as f64),
            left.clone(),
        )))?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

pub(crate) struct GradientDirection {
    pub curve: CurveSamples,
    pub at: (f64, f64),
    pub ascent: (f64, f64),
    pub descent: (f64, f64),
    pub minimum: (f64, f64),
}

/// J(θ) = (θ - 2)² + 1 at θ = 4 with unit arrows along ±∇J.
pub(crate) fn gradient_direction() -> Result<GradientDirection> {
    const ARROW_LENGTH: f64 = 0.8;
    let cost = Parabola::new(2.0, 1.0);
    let theta = 4.0;
    let value = cost.evaluate(&point(&[theta]))?;
    let slope = cost.gradient(&point(&[theta]))?[0];

    Ok(GradientDirection {
        curve: CurveSamples::sample(&cost, -1.0..=5.0, 400)?,
        at: (theta, value),
        ascent: (theta + ARROW_LENGTH, value + slope * ARROW_LENGTH),
        descent: (theta - ARROW_LENGTH, value - slope * ARROW_LENGTH),
        minimum: (cost.center, cost.offset),
    })
}

pub(crate) fn draw_gradient_direction<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = gradient_direction()?;
    let mut chart = cartesian(
        area,
        theme,
        "The steepest descent direction −∇J(θ) guides the minimization",
        -1.0..5.0,
        0.0..11.0,
    )?;
    mesh(&mut chart, theme, "θ (model parameters)", "J(θ) (cost function)")?;

    let width = theme.stroke(1.25);
    let (curve, ascent, descent, point_color) = (
        theme.color(0),
        theme.color(1),
        theme.color(2),
        theme.color(3),
    );
    chart
        .draw_series(LineSeries::new(data.curve.points(), curve.stroke_width(width)))?
        .label("Cost function J(θ)")
        .legend(line_swatch(curve, width));

    arrow(chart.plotting_area(), data.at, data.ascent, ascent.stroke_width(width), theme.px(10.0))?;
    arrow(chart.plotting_area(), data.at, data.descent, descent.stroke_width(width), theme.px(10.0))?;
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label("Gradient ∇J(θ): steepest ascent")
        .legend(line_swatch(ascent, width));
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label("−∇J(θ): steepest descent")
        .legend(line_swatch(descent, width));

    let radius = theme.px_i32(6.0);
    chart
        .draw_series(std::iter::once(Circle::new(data.at, radius, point_color.filled())))?
        .label("Evaluation point")
        .legend(dot_swatch(point_color, radius));

    note(&mut chart, theme, "∇J(θ)", (data.ascent.0 + 0.25, data.ascent.1))?;
    note(&mut chart, theme, "−∇J(θ)", (data.descent.0 - 0.35, data.descent.1))?;
    note(
        &mut chart,
        theme,
        "Minimum",
        (data.minimum.0, data.minimum.1 - 0.5),
    )?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)
}

pub(crate) struct LocalMinima {
    pub curve: CurveSamples,
    pub to_local: Vec<(f64, f64)>,
    pub to_global: Vec<(f64, f64)>,
}

/// Descent on the non-convex quartic from both sides of its central hump.
pub(crate) fn local_minima() -> Result<LocalMinima> {
    let loss = Polynomial::non_convex_quartic();
    let descent = GradientDescent::new(0.05, 60)?;
    Ok(LocalMinima {
        curve: CurveSamples::sample(&loss, -4.5..=3.5, 400)?,
        to_local: curve_points(&descent.simulate(&loss, point(&[-4.2]))?),
        to_global: curve_points(&descent.simulate(&loss, point(&[0.5]))?),
    })
}

pub(crate) fn draw_local_minima<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = local_minima()?;
    let mut chart = cartesian(
        area,
        theme,
        "Optimization as loss minimization: local and global minima",
        -4.5..3.5,
        -2.5..7.0,
    )?;
    mesh(&mut chart, theme, "Model parameter θ", "Loss J(θ)")?;

    let width = theme.stroke(1.25);
    let curve = theme.color(0);
    chart
        .draw_series(LineSeries::new(data.curve.points(), curve.stroke_width(width)))?
        .label("Loss J(θ)")
        .legend(line_swatch(curve, width));

    let radius = theme.px_i32(3.0);
    let paths = [
        (&data.to_local, theme.color(1), "Descent from θ₀ = -4.2"),
        (&data.to_global, theme.color(2), "Descent from θ₀ = 0.5"),
    ];
    for (path, color, label) in paths {
        chart
            .draw_series(path.iter().map(|&p| Circle::new(p, radius, color.filled())))?
            .label(label)
            .legend(dot_swatch(color, radius));
        if let (Some(&first), Some(&second)) = (path.first(), path.get(1)) {
            arrow(chart.plotting_area(), first, second, color.stroke_width(width), theme.px(8.0))?;
        }
    }

    if let (Some(&local), Some(&global)) = (data.to_local.last(), data.to_global.last()) {
        note(&mut chart, theme, "Local minimum", (local.0, local.1 - 0.8))?;
        note(
            &mut chart,
            theme,
            "Global minimum (optimization target)",
            (global.0 - 0.6, global.1 - 0.5),
        )?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_descent_steps_shrink_cost() {
        let data = descent_steps().unwrap();
        assert_eq!(data.steps.len(), 6);
        assert_relative_eq!(data.steps[0].0, 3.8);
        assert_relative_eq!(data.steps[0].1, 14.44, epsilon = 1e-12);
        assert!(data.steps.windows(2).all(|w| w[1].1 < w[0].1));
    }

    #[test]
    fn test_update_rule_single_step() {
        let data = update_rule().unwrap();
        assert_relative_eq!(data.updated.0, -1.4, epsilon = 1e-12);
        assert_relative_eq!(data.updated.1, 1.96, epsilon = 1e-12);
        // The tangent passes through the start point with slope -7.
        assert_eq!(data.tangent.len(), 10);
        let (t0, t1) = (data.tangent[0], data.tangent[9]);
        assert_relative_eq!((t1.1 - t0.1) / (t1.0 - t0.0), -7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_learning_rate_runs() {
        let (_, runs) = learning_rates().unwrap();
        let diverged: Vec<bool> = runs.iter().map(|r| r.diverged).collect();
        assert_eq!(diverged, vec![false, false, false, true]);

        // Large η overshoots to the other side.
        assert!(runs[2].visible[1].0 < 0.0);
        // Converging runs stay in view, the diverging one leaves it.
        assert_eq!(runs[0].visible.len(), 21);
        assert!(runs[3].visible.len() < 21);
    }

    #[test]
    fn test_gradient_direction_arrows() {
        let data = gradient_direction().unwrap();
        assert_eq!(data.at, (4.0, 5.0));
        assert_relative_eq!(data.ascent.1, 8.2, epsilon = 1e-12);
        assert_relative_eq!(data.descent.1, 1.8, epsilon = 1e-12);
        assert_eq!(data.minimum, (2.0, 1.0));
    }

    #[test]
    fn test_local_minima_paths() {
        let data = local_minima().unwrap();
        let local = data.to_local.last().unwrap();
        let global = data.to_global.last().unwrap();
        assert!((local.0 + 3.34).abs() < 0.01);
        assert!((global.0 - 2.40).abs() < 0.01);
        assert!(global.1 < local.1);
    }
}
