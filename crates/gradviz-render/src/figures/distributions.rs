//! Probability densities, mass functions and the cross-entropy loss.

use super::chart::{
    arrow, cartesian, dot_swatch, labelled_line, legend, mesh, note, DrawResult,
};
use crate::style::Theme;
use gradviz_core::{
    sampling::{linspace, CurveSamples},
    statistics::{binary_cross_entropy, binomial_pmf, normal_pdf},
    types::constants::PROBABILITY_EPSILON,
    Result,
};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::ops::RangeInclusive;

/// A normal density to draw, with its dash pattern.
pub(crate) struct Density {
    pub label: &'static str,
    pub dash: Option<(f64, f64)>,
    pub curve: CurveSamples,
}

const DENSITIES: [(f64, f64, &str, Option<(f64, f64)>); 4] = [
    (0.0, 1.0, "Standard: N(0, 1)", None),
    (0.0, 2.0, "Wider spread: N(0, 4)", Some((8.0, 5.0))),
    (0.0, 0.5, "Narrower spread: N(0, 0.25)", Some((2.0, 3.0))),
    (-2.0, 1.0, "Shifted mean: N(-2, 1)", Some((12.0, 4.0))),
];

/// Density of N(mean, std_dev²) at 1000 points of `range`.
pub(crate) fn density_curve(mean: f64, std_dev: f64, range: RangeInclusive<f64>) -> Result<CurveSamples> {
    let xs = linspace(*range.start(), *range.end(), 1000);
    let ys = xs
        .iter()
        .map(|&x| normal_pdf(x, mean, std_dev))
        .collect::<Result<Vec<_>>>()?;
    Ok(CurveSamples { xs, ys })
}

/// Densities sampled over [-8, 8].
pub(crate) fn normal_distributions() -> Result<Vec<Density>> {
    DENSITIES
        .iter()
        .map(|&(mean, std_dev, label, dash)| -> Result<Density> {
            Ok(Density {
                label,
                dash,
                curve: density_curve(mean, std_dev, -8.0..=8.0)?,
            })
        })
        .collect()
}

pub(crate) fn draw_normal_distributions<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let densities = normal_distributions()?;
    let peak = densities
        .iter()
        .flat_map(|d| d.curve.ys.iter().copied())
        .fold(0.0, f64::max);
    let mut chart = cartesian(
        area,
        theme,
        "The normal (Gaussian) distribution",
        -8.0..8.0,
        0.0..peak * 1.08,
    )?;
    mesh(&mut chart, theme, "Value (x)", "Probability density f(x)")?;

    let colors = [
        RGBColor(0x00, 0x72, 0xb2),
        RGBColor(0xd5, 0x5e, 0x00),
        RGBColor(0x00, 0x9e, 0x73),
        RGBColor(0xcc, 0x79, 0xa7),
    ];
    for (density, color) in densities.iter().zip(colors) {
        labelled_line(
            &mut chart,
            theme,
            density.curve.points().collect(),
            density.dash,
            color,
            theme.stroke(1.25),
            density.label,
        )?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

/// One binomial mass function over k = 0..=max_n.
pub(crate) struct MassFunction {
    pub n: u64,
    pub p: f64,
    pub label: &'static str,
    pub pmf: Vec<(f64, f64)>,
}

impl MassFunction {
    /// Expected number of successes, n·p.
    pub fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }
}

const BINOMIALS: [(u64, f64, &str); 3] = [
    (20, 0.5, "n = 20, p = 0.5 (symmetric)"),
    (20, 0.2, "n = 20, p = 0.2 (skewed)"),
    (40, 0.5, "n = 40, p = 0.5 (wider spread)"),
];

/// Mass functions evaluated on a shared support up to the largest n.
pub(crate) fn binomial_distributions() -> Result<Vec<MassFunction>> {
    let max_n = BINOMIALS.iter().map(|b| b.0).max().unwrap_or_default();
    BINOMIALS
        .iter()
        .map(|&(n, p, label)| -> Result<MassFunction> {
            let pmf = (0..=max_n)
                .map(|k| -> Result<(f64, f64)> { Ok((k as f64, binomial_pmf(k, n, p)?)) })
                .collect::<Result<Vec<_>>>()?;
            Ok(MassFunction { n, p, label, pmf })
        })
        .collect()
}

pub(crate) fn draw_binomial_distributions<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let masses = binomial_distributions()?;
    let max_k = masses.iter().map(|m| m.n).max().unwrap_or_default() as f64;
    let peak = masses
        .iter()
        .flat_map(|m| m.pmf.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max);
    let mut chart = cartesian(
        area,
        theme,
        "The binomial distribution for different parameters",
        -1.0..max_k + 1.0,
        0.0..peak * 1.1,
    )?;
    mesh(&mut chart, theme, "Number of successes (k)", "Probability P(X = k)")?;

    // Three evenly spaced viridis samples.
    let colors = [
        RGBColor(0x44, 0x01, 0x54),
        RGBColor(0x21, 0x91, 0x8c),
        RGBColor(0x5e, 0xc9, 0x62),
    ];
    let radius = theme.px_i32(3.0);
    let label_style = theme
        .legend()
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    for (mass, color) in masses.iter().zip(colors) {
        labelled_line(
            &mut chart,
            theme,
            mass.pmf.clone(),
            None,
            color,
            theme.stroke(0.75),
            "",
        )?;
        chart
            .draw_series(mass.pmf.iter().map(|&p| Circle::new(p, radius, color.filled())))?
            .label(mass.label)
            .legend(dot_swatch(color, radius));

        let mean = mass.mean();
        labelled_line(
            &mut chart,
            theme,
            vec![(mean, 0.0), (mean, peak * 1.1)],
            Some((6.0, 4.0)),
            color,
            theme.stroke(0.75),
            "",
        )?;
        chart.draw_series(std::iter::once(Text::new(
            format!("E[X] = {mean:.1}"),
            (mean + 0.3, peak * 0.02),
            label_style.color(&color),
        )))?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::UpperRight)
}

pub(crate) struct CrossEntropy {
    /// Loss when the true label is 1
    pub positive: CurveSamples,
    /// Loss when the true label is 0
    pub negative: CurveSamples,
}

/// Both branches of the binary cross-entropy over p ∈ [ε, 1 - ε].
pub(crate) fn cross_entropy() -> Result<CrossEntropy> {
    let eps = PROBABILITY_EPSILON;
    let range = eps..=1.0 - eps;
    Ok(CrossEntropy {
        positive: CurveSamples::try_from_fn(|p| binary_cross_entropy(p, 1.0, eps), range.clone(), 500)?,
        negative: CurveSamples::try_from_fn(|p| binary_cross_entropy(p, 0.0, eps), range, 500)?,
    })
}

pub(crate) fn draw_cross_entropy<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const COST_CEILING: f64 = 6.0;
    let data = cross_entropy()?;
    let mut chart = cartesian(
        area,
        theme,
        "Binary cross-entropy as a function of the predicted probability",
        0.0..1.0,
        0.0..COST_CEILING,
    )?;
    mesh(&mut chart, theme, "Predicted probability (p)", "Cost (loss)")?;

    let width = theme.stroke(1.25);
    let curves = [
        (&data.positive, RGBColor(0x00, 0x72, 0xb2), "Cost when the true label is 1"),
        (&data.negative, RGBColor(0xd5, 0x5e, 0x00), "Cost when the true label is 0"),
    ];
    for (curve, color, label) in curves {
        labelled_line(
            &mut chart,
            theme,
            curve.clipped(0.0, COST_CEILING),
            None,
            color,
            width,
            label,
        )?;
    }

    let pointer = theme.text_color().stroke_width(theme.stroke(0.5));
    let head = theme.px(7.0);
    arrow(chart.plotting_area(), (0.7, 0.75), (0.94, 0.12), pointer, head)?;
    note(&mut chart, theme, "Correct prediction: minimal cost", (0.7, 0.55))?;
    arrow(chart.plotting_area(), (0.3, 3.3), (0.06, 2.95), pointer, head)?;
    note(&mut chart, theme, "Wrong prediction: maximal cost", (0.3, 3.5))?;

    legend(&mut chart, theme, SeriesLabelPosition::UpperMiddle)
}
