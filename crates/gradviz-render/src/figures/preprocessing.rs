//! Regression error, standardization and principal components.

use super::{
    chart::{
        arrow, cartesian, dot_swatch, labelled_line, legend, line_swatch, mesh, note, pixel_arrow,
        DrawResult,
    },
    distributions::density_curve,
};
use crate::style::Theme;
use gradviz_core::{
    pca::Pca,
    sampling::{linspace, CurveSamples},
    statistics::{mean_squared_error, normal_pdf, standardize, StandardScaler},
    synthetic::{correlated_gaussian, noisy_line},
    types::Samples,
    Result,
};
use nalgebra::{dmatrix, dvector};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// Seed shared by the synthetic samples.
const SEED: u64 = 42;

pub(crate) struct Regression {
    pub xs: Vec<f64>,
    pub observed: Vec<f64>,
    pub predicted: Vec<f64>,
    /// `predicted - observed` for each sample
    pub errors: Vec<f64>,
    pub mse: f64,
    /// Squared error over a range slightly wider than the largest error
    pub cost: CurveSamples,
    /// Index of the largest absolute error
    pub worst: usize,
}

/// Fifteen noisy samples of 2x + 1 against the model 2.1x + 0.5.
pub(crate) fn regression() -> Result<Regression> {
    const MODEL: (f64, f64) = (2.1, 0.5);
    let xs = linspace(0.0, 10.0, 15);
    let observed = noisy_line(&xs, 2.0, 1.0, 2.5, SEED)?;
    let predicted: Vec<f64> = xs.iter().map(|x| MODEL.0 * x + MODEL.1).collect();
    let errors: Vec<f64> = predicted.iter().zip(&observed).map(|(p, o)| p - o).collect();
    let mse = mean_squared_error(&predicted, &observed)?;

    let worst = errors
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map_or(0, |(i, _)| i);
    let reach = errors[worst].abs() * 1.1;

    Ok(Regression {
        cost: CurveSamples::from_fn(|e| e * e, -reach..=reach, 400),
        xs,
        observed,
        predicted,
        errors,
        mse,
        worst,
    })
}

/// Smallest and largest value of a sample.
fn extent(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

pub(crate) fn draw_mean_squared_error<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = regression()?;
    let body = area.titled("Visualizing the mean squared error (MSE)", theme.title())?;
    let (left, right) = body.split_horizontally((body.dim_in_pixel().0 / 2) as i32);

    let (data_color, model_color, error_color) = (
        RGBColor(0x00, 0x72, 0xb2),
        RGBColor(0xd5, 0x5e, 0x00),
        RGBColor(0x00, 0x9e, 0x73),
    );
    let width = theme.stroke(1.5);

    let (lo, hi) = extent(data.observed.iter().chain(&data.predicted).copied());
    let mut context = cartesian(&left, theme, "A. Errors of a regression model", -0.5..10.5, lo - 2.0..hi + 2.0)?;
    mesh(&mut context, theme, "Input variable (xᵢ)", "Output variable (y)")?;
    for (i, ((&x, &p), &o)) in data.xs.iter().zip(&data.predicted).zip(&data.observed).enumerate() {
        let label = if i == 0 { "Error (prediction − actual)" } else { "" };
        labelled_line(
            &mut context,
            theme,
            vec![(x, p), (x, o)],
            Some((5.0, 3.0)),
            error_color,
            theme.stroke(0.6),
            label,
        )?;
    }
    let radius = theme.px_i32(5.0);
    context
        .draw_series(
            data.xs
                .iter()
                .zip(&data.observed)
                .map(|(&x, &y)| Circle::new((x, y), radius, data_color.mix(0.8).filled())),
        )?
        .label("Observed data (yᵢ)")
        .legend(dot_swatch(data_color, radius));
    labelled_line(
        &mut context,
        theme,
        data.xs.iter().copied().zip(data.predicted.iter().copied()).collect(),
        None,
        model_color,
        width,
        "Model prediction f(xᵢ, φ)",
    )?;
    legend(&mut context, theme, SeriesLabelPosition::UpperLeft)?;

    let reach = data.cost.xs.last().copied().unwrap_or(1.0);
    let ceiling = reach * reach * 1.1;
    let mut cost = cartesian(
        &right,
        theme,
        &format!("B. Squared error cost (MSE = {:.2})", data.mse),
        -reach..reach,
        0.0..ceiling,
    )?;
    mesh(&mut cost, theme, "Error (prediction − actual)", "Cost (error²)")?;
    labelled_line(&mut cost, theme, data.cost.points().collect(), None, model_color, width, "Cost = error²")?;
    cost.draw_series(
        data.errors
            .iter()
            .map(|&e| Circle::new((e, e * e), radius, error_color.filled())),
    )?
    .label("Cost of each error")
    .legend(dot_swatch(error_color, radius));

    let worst = data.errors[data.worst];
    let tip = (worst, worst * worst);
    let text = (worst * 0.45, tip.1 * 0.8);
    arrow(
        cost.plotting_area(),
        (text.0, text.1 - ceiling * 0.04),
        tip,
        theme.text_color().stroke_width(theme.stroke(0.5)),
        theme.px(7.0),
    )?;
    note(&mut cost, theme, "Large errors are heavily penalized", text)?;
    legend(&mut cost, theme, SeriesLabelPosition::UpperMiddle)
}

/// A reference point of the standardization, on both scales.
pub(crate) struct Landmark {
    pub label: &'static str,
    pub x: f64,
    pub z: f64,
}

pub(crate) struct Standardization {
    pub mean: f64,
    pub std_dev: f64,
    pub original: CurveSamples,
    pub standard: CurveSamples,
    pub landmarks: Vec<Landmark>,
}

/// X ~ N(10, 2²) and its standardized counterpart Z ~ N(0, 1).
pub(crate) fn standardization() -> Result<Standardization> {
    const MEAN: f64 = 10.0;
    const STD_DEV: f64 = 2.0;
    let landmarks = [("μ − 2σ", -2.0), ("μ − σ", -1.0), ("μ", 0.0), ("μ + σ", 1.0), ("μ + 2σ", 2.0)]
        .into_iter()
        .map(|(label, k)| -> Result<Landmark> {
            let x = MEAN + k * STD_DEV;
            Ok(Landmark {
                label,
                x,
                z: standardize(x, MEAN, STD_DEV)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Standardization {
        mean: MEAN,
        std_dev: STD_DEV,
        original: density_curve(MEAN, STD_DEV, MEAN - 4.0 * STD_DEV..=MEAN + 4.0 * STD_DEV)?,
        standard: density_curve(0.0, 1.0, -4.0..=4.0)?,
        landmarks,
    })
}

pub(crate) fn draw_standardization<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = standardization()?;
    let body = area.titled("Visualizing standardization", theme.title())?;
    let (upper, lower) = body.split_vertically((body.dim_in_pixel().1 / 2) as i32);

    let panels = [
        (
            &upper,
            &data.original,
            RGBColor(0x00, 0x72, 0xb2),
            format!("X ~ N(μ = {}, σ² = {})", data.mean, data.std_dev * data.std_dev),
        ),
        (
            &lower,
            &data.standard,
            RGBColor(0xd5, 0x5e, 0x00),
            "Z ~ N(μ = 0, σ² = 1)".to_string(),
        ),
    ];
    let annotation = RGBColor(0x55, 0x55, 0x55);
    let tick = theme.legend().color(&annotation);
    let mut axis_points = Vec::with_capacity(2);

    for (index, (panel, curve, color, label)) in panels.into_iter().enumerate() {
        let (lo, hi) = (curve.xs[0], curve.xs[curve.xs.len() - 1]);
        let top = curve.ys.iter().copied().fold(0.0, f64::max) * 1.15;
        let mut chart = cartesian(panel, theme, "", lo..hi, 0.0..top)?;
        let x_desc = if index == 1 { "Value of the random variable" } else { "" };
        mesh(&mut chart, theme, x_desc, "Probability density")?;

        chart
            .draw_series(
                AreaSeries::new(curve.points(), 0.0, color.mix(0.15).filled())
                    .border_style(color.stroke_width(theme.stroke(1.25))),
            )?
            .label(label)
            .legend(line_swatch(color, theme.stroke(1.25)));

        let mut anchors = Vec::with_capacity(data.landmarks.len());
        for landmark in &data.landmarks {
            let at = if index == 0 { landmark.x } else { landmark.z };
            let height = if index == 0 {
                normal_pdf(at, data.mean, data.std_dev)?
            } else {
                normal_pdf(at, 0.0, 1.0)?
            };
            labelled_line(
                &mut chart,
                theme,
                vec![(at, 0.0), (at, height)],
                Some((4.0, 3.0)),
                color,
                theme.stroke(0.5),
                "",
            )?;
            let text = if index == 0 {
                landmark.label.to_string()
            } else {
                format!("{}", landmark.z)
            };
            chart.draw_series(std::iter::once(Text::new(
                text,
                (at, top * 0.04),
                tick.pos(Pos::new(HPos::Center, VPos::Bottom)),
            )))?;
            anchors.push(chart.plotting_area().map_coordinate(&(at, 0.0)));
        }
        axis_points.push(anchors);
        legend(&mut chart, theme, SeriesLabelPosition::UpperRight)?;
    }

    if let [upper_axis, lower_axis] = axis_points.as_slice() {
        let connector = RGBColor(0x80, 0x80, 0x80).stroke_width(theme.stroke(0.6));
        for (&from, &to) in upper_axis.iter().zip(lower_axis) {
            pixel_arrow(area, from, to, connector, theme.px(8.0))?;
        }
    }

    let formula = "Z = (X − μ) / σ";
    let style = theme.font(22.0).color(&theme.text_color());
    let (width, height) = area.estimate_text_size(formula, &style)?;
    let (w, h) = area.dim_in_pixel();
    let (cx, cy) = (w as i32 / 2, h as i32 / 2);
    let pad = theme.px_i32(8.0);
    let (half_w, half_h) = (width as i32 / 2 + pad, height as i32 / 2 + pad);
    area.draw(&Rectangle::new(
        [(cx - half_w, cy - half_h), (cx + half_w, cy + half_h)],
        WHITE.mix(0.9).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(cx - half_w, cy - half_h), (cx + half_w, cy + half_h)],
        RGBColor(0x80, 0x80, 0x80).stroke_width(1),
    ))?;
    area.draw(&Text::new(
        formula,
        (cx, cy),
        style.pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    Ok(())
}

pub(crate) struct PrincipalComponents {
    /// Standardized samples, one per row
    pub scaled: Samples,
    pub pca: Pca,
    /// Samples projected onto PC1 and mapped back
    pub reconstructed: Samples,
}

/// 200 correlated Gaussian samples, standardized, then decomposed.
pub(crate) fn principal_components() -> Result<PrincipalComponents> {
    let raw = correlated_gaussian(200, &dvector![0.0, 0.0], &dmatrix![10.0, 8.0; 8.0, 10.0], SEED)?;
    let (_, scaled) = StandardScaler::fit_transform(&raw)?;
    let pca = Pca::fit(&scaled)?;
    let reconstructed = pca.reconstruct(&scaled, 1)?;
    Ok(PrincipalComponents {
        scaled,
        pca,
        reconstructed,
    })
}

pub(crate) fn draw_principal_components<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = principal_components()?;
    let (x_lo, x_hi) = extent(data.scaled.column(0).iter().copied());
    let (y_lo, y_hi) = extent(data.scaled.column(1).iter().copied());
    let mut chart = cartesian(
        area,
        theme,
        "Principal component analysis: dimensionality reduction",
        x_lo - 1.0..x_hi + 1.0,
        y_lo - 1.0..y_hi + 1.0,
    )?;
    mesh(&mut chart, theme, "Feature 1 (scaled)", "Feature 2 (scaled)")?;

    let components = data.pca.components();
    let first = (components[(0, 0)], components[(1, 0)]);
    if first.0.abs() > f64::EPSILON {
        let slope = first.1 / first.0;
        let line_color = RGBColor(0x21, 0x91, 0x8c);
        labelled_line(
            &mut chart,
            theme,
            vec![(x_lo - 1.0, slope * (x_lo - 1.0)), (x_hi + 1.0, slope * (x_hi + 1.0))],
            Some((6.0, 4.0)),
            line_color,
            theme.stroke(0.75),
            "First principal component line",
        )?;
    }

    let data_color = RGBColor(0x44, 0x01, 0x54);
    let radius = theme.px_i32(3.5);
    chart
        .draw_series(
            data.scaled
                .row_iter()
                .map(|row| Circle::new((row[0], row[1]), radius, data_color.mix(0.6).filled())),
        )?
        .label("Original data (scaled)")
        .legend(dot_swatch(data_color, radius));

    let projected = RGBColor(0xff, 0xa5, 0x00);
    let small = theme.px_i32(2.5);
    chart
        .draw_series(
            data.reconstructed
                .row_iter()
                .map(|row| Circle::new((row[0], row[1]), small, projected.mix(0.7).filled())),
        )?
        .label("Data projected onto PC1")
        .legend(dot_swatch(projected, small));

    let cross = theme.px_i32(7.0);
    chart
        .draw_series(std::iter::once(Cross::new((0.0, 0.0), cross, RED.stroke_width(theme.stroke(1.0)))))?
        .label("Data center")
        .legend(move |(x, y)| Cross::new((x + 10, y), cross, RED.stroke_width(2)));

    let arrow_colors = [RGBColor(0x29, 0x78, 0x8e), RGBColor(0x22, 0xa8, 0x84)];
    for (i, color) in arrow_colors.into_iter().enumerate() {
        let variance = data.pca.explained_variance()[i];
        let reach = 3.0 * variance.sqrt();
        let tip = (components[(0, i)] * reach, components[(1, i)] * reach);
        arrow(
            chart.plotting_area(),
            (0.0, 0.0),
            tip,
            color.stroke_width(theme.stroke(1.5)),
            theme.px(12.0),
        )?;
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(format!("Principal component {} (explained variance {variance:.2})", i + 1))
            .legend(line_swatch(color, theme.stroke(1.5)));
        note(&mut chart, theme, &format!("PC{}", i + 1), (tip.0 * 1.1, tip.1 * 1.1))?;
    }

    let caption = theme.legend().pos(Pos::new(HPos::Left, VPos::Top));
    let lines = [
        "PCA reduces dimensionality by projecting the data",
        "onto a lower-dimensional subspace (e.g. PC1).",
    ];
    let line_height = theme.px(theme.style().legend_size) * 1.3;
    let (x, y) = chart.plotting_area().map_coordinate(&(x_lo - 0.8, y_hi + 0.8));
    let (base_x, base_y) = area.get_base_pixel();
    for (i, line) in lines.iter().enumerate() {
        let offset = (line_height * i as f64).round() as i32;
        area.draw(&Text::new(*line, (x - base_x, y - base_y + offset), caption.clone()))?;
    }

    legend(&mut chart, theme, SeriesLabelPosition::LowerRight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regression_errors() {
        let data = regression().unwrap();
        assert_eq!(data.errors.len(), 15);
        let mean_square = data.errors.iter().map(|e| e * e).sum::<f64>() / 15.0;
        assert_relative_eq!(data.mse, mean_square, max_relative = 1e-12);
        assert!(data.errors.iter().all(|e| e.abs() <= data.errors[data.worst].abs()));
        assert_relative_eq!(data.predicted[14], 21.5, epsilon = 1e-12);
        // Same seed, same sample.
        assert_eq!(regression().unwrap().observed, data.observed);
    }

    #[test]
    fn test_standardization_landmarks() {
        let data = standardization().unwrap();
        let zs: Vec<f64> = data.landmarks.iter().map(|l| l.z).collect();
        assert_eq!(zs, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(data.landmarks[4].x, 14.0);
        // Standardizing divides the density by σ.
        let x_peak = data.original.ys.iter().copied().fold(0.0, f64::max);
        let z_peak = data.standard.ys.iter().copied().fold(0.0, f64::max);
        assert_relative_eq!(z_peak / x_peak, 2.0, max_relative = 1e-3);
    }

    #[test]
    fn test_principal_components() {
        let data = principal_components().unwrap();
        assert_eq!(data.scaled.nrows(), 200);

        // Standardized features with correlation near 0.8 split the variance
        // roughly 1.8 : 0.2 along the diagonals.
        let ratio = data.pca.explained_variance_ratio();
        assert!(ratio[0] > 0.8 && ratio[0] < 0.97);
        let pc1 = data.pca.components().column(0);
        assert_relative_eq!(pc1[0].abs(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
        assert!(pc1[0] * pc1[1] > 0.0);

        // Reconstructed points lie on the PC1 line through the origin.
        for row in data.reconstructed.row_iter() {
            assert!((row[1] * pc1[0] - row[0] * pc1[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extent() {
        assert_eq!(extent([3.0, -1.0, 2.0]), (-1.0, 3.0));
    }
}
