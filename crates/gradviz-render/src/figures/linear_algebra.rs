//! Eigenvectors of a linear map and of sample covariance matrices, and the
//! variance-maximizing view of principal components.

use super::chart::{
    arrow, cartesian, dot_swatch, labelled_line, legend, line_swatch, mesh, square_split,
    text_lines, DrawResult,
};
use crate::style::Theme;
use gradviz_core::{
    eigen::{center, projected_variance, sample_covariance, symmetric_eigenpairs, EigenPair},
    sampling::{linspace, CurveSamples},
    synthetic::correlated_gaussian,
    types::Samples,
    GradvizError, Result,
};
use nalgebra::{dmatrix, dvector, DMatrix, DVector};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// Seed shared by the synthetic clouds.
const SEED: u64 = 42;

/// Colors of the first and second eigenvector.
const FIRST: RGBColor = RGBColor(0x00, 0x72, 0xb2);
const SECOND: RGBColor = RGBColor(0xd5, 0x5e, 0x00);

fn pair(v: &DVector<f64>) -> (f64, f64) {
    (v[0], v[1])
}

fn scaled(v: &DVector<f64>, by: f64) -> (f64, f64) {
    (v[0] * by, v[1] * by)
}

/// The two eigenpairs of a 2 x 2 symmetric matrix.
fn two_pairs(matrix: &DMatrix<f64>) -> Result<[EigenPair; 2]> {
    let pairs = symmetric_eigenpairs(matrix)?;
    let count = pairs.len();
    <[EigenPair; 2]>::try_from(pairs).map_err(|_| GradvizError::dimension_mismatch(2, count))
}

pub(crate) struct Transformation {
    pub matrix: DMatrix<f64>,
    pub pairs: [EigenPair; 2],
    /// The unit circle
    pub circle: Vec<(f64, f64)>,
    /// Its image under the matrix
    pub ellipse: Vec<(f64, f64)>,
}

/// A = [[2.5, 0.5], [0.5, 1.5]] acting on the unit circle.
pub(crate) fn transformation() -> Result<Transformation> {
    let matrix = dmatrix![2.5, 0.5; 0.5, 1.5];
    let pairs = two_pairs(&matrix)?;
    let circle: Vec<(f64, f64)> = linspace(0.0, std::f64::consts::TAU, 100)
        .into_iter()
        .map(|t| (t.cos(), t.sin()))
        .collect();
    let ellipse = circle
        .iter()
        .map(|&(x, y)| pair(&(&matrix * dvector![x, y])))
        .collect();
    Ok(Transformation {
        matrix,
        pairs,
        circle,
        ellipse,
    })
}

pub(crate) fn draw_eigenvectors<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let data = transformation()?;
    let body = area.titled("Visualizing eigenvectors and eigenvalues", theme.title())?;
    let (left, right) = body.split_horizontally((body.dim_in_pixel().0 / 2) as i32);

    let outline = RGBColor(0x80, 0x80, 0x80);
    let width = theme.stroke(1.75);
    let head = theme.px(10.0);

    let mut before = cartesian(&left, theme, "Original space", -3.0..3.0, -3.0..3.0)?;
    mesh(&mut before, theme, "x", "y")?;
    labelled_line(&mut before, theme, data.circle.clone(), None, outline, theme.stroke(0.75), "Unit circle")?;
    for (i, (pair_i, color)) in data.pairs.iter().zip([FIRST, SECOND]).enumerate() {
        arrow(before.plotting_area(), (0.0, 0.0), pair(&pair_i.vector), color.stroke_width(width), head)?;
        before
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(format!("Eigenvector v{}", subscript(i + 1)))
            .legend(line_swatch(color, width));
    }
    legend(&mut before, theme, SeriesLabelPosition::UpperRight)?;

    let mut after = cartesian(&right, theme, "Space transformed by the matrix A", -3.0..3.0, -3.0..3.0)?;
    mesh(&mut after, theme, "x", "y")?;
    labelled_line(&mut after, theme, data.ellipse.clone(), None, outline, theme.stroke(0.75), "Image of the unit circle")?;
    for (i, (pair_i, color)) in data.pairs.iter().zip([FIRST, SECOND]).enumerate() {
        let span = scaled(&pair_i.vector, 4.0);
        labelled_line(
            &mut after,
            theme,
            vec![(-span.0, -span.1), span],
            Some((6.0, 4.0)),
            color,
            theme.stroke(0.75),
            "",
        )?;
        let image = pair(&pair_i.image(&data.matrix));
        arrow(after.plotting_area(), (0.0, 0.0), image, color.stroke_width(width), head)?;
        let n = subscript(i + 1);
        let style = TextStyle {
            color: color.to_backend_color(),
            pos: Pos::new(HPos::Left, VPos::Center),
            ..theme.annotation()
        };
        let captions = [format!("Av{n} = λ{n}v{n}"), format!("λ{n} ≈ {:.2}", pair_i.value)];
        after.draw_series(
            captions
                .into_iter()
                .zip([0.0, -0.35])
                .map(|(text, dy)| Text::new(text, (image.0 + 0.2, image.1 + dy), style.clone())),
        )?;
    }

    let det = data.matrix.determinant();
    let product = data.pairs[0].value * data.pairs[1].value;
    after.draw_series(std::iter::once(Text::new(
        format!("det(A) = {det:.2} = λ₁·λ₂ = {product:.2}"),
        (-2.8, -2.6),
        theme.annotation().pos(Pos::new(HPos::Left, VPos::Bottom)),
    )))?;
    Ok(())
}

fn subscript(n: usize) -> char {
    match n {
        1 => '₁',
        2 => '₂',
        _ => 'ₙ',
    }
}

pub(crate) struct CovarianceEigenvectors {
    pub samples: Samples,
    pub covariance: DMatrix<f64>,
    pub pairs: [EigenPair; 2],
}

/// 300 draws of N(0, [[1, 0.8], [0.8, 1]]) and their sample covariance.
pub(crate) fn covariance_eigenvectors() -> Result<CovarianceEigenvectors> {
    let samples = correlated_gaussian(300, &dvector![0.0, 0.0], &dmatrix![1.0, 0.8; 0.8, 1.0], SEED)?;
    let covariance = sample_covariance(&samples)?;
    let pairs = two_pairs(&covariance)?;
    Ok(CovarianceEigenvectors {
        samples,
        covariance,
        pairs,
    })
}

/// Largest absolute coordinate of the samples, padded by 10 %.
fn reach(samples: &Samples) -> f64 {
    samples.amax() * 1.1
}

pub(crate) fn draw_covariance_eigenvectors<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const VISUAL_SCALE: f64 = 2.0;
    let data = covariance_eigenvectors()?;
    let body = area.titled("Eigenvectors and eigenvalues of the covariance matrix", theme.title())?;
    let (plot, side) = square_split(&body, theme);

    let lim = reach(&data.samples);
    let mut chart = cartesian(&plot, theme, "", -lim..lim, -lim..lim)?;
    mesh(&mut chart, theme, "Variable 1", "Variable 2")?;

    let cloud = RGBColor(0xa9, 0xa9, 0xa9);
    let radius = theme.px_i32(3.0);
    chart
        .draw_series(
            data.samples
                .row_iter()
                .map(|row| Circle::new((row[0], row[1]), radius, cloud.mix(0.6).filled())),
        )?
        .label("Synthetic data")
        .legend(dot_swatch(cloud, radius));

    let width = theme.stroke(1.75);
    let head = theme.px(10.0);
    let image = pair(&data.pairs[0].image(&data.covariance));
    let arrows = [
        (scaled(&data.pairs[0].vector, data.pairs[0].value.sqrt() * VISUAL_SCALE), RGBColor(0xe6, 0x7e, 0x22), "w₁ (first eigenvector)"),
        (scaled(&data.pairs[1].vector, data.pairs[1].value.max(0.0).sqrt() * VISUAL_SCALE), RGBColor(0x27, 0xae, 0x60), "w₂ (second eigenvector)"),
        (image, RGBColor(0xc0, 0x39, 0x2b), "S·w₁ = λ₁w₁ (transformed vector)"),
    ];
    for (tip, color, label) in arrows {
        arrow(chart.plotting_area(), (0.0, 0.0), tip, color.stroke_width(width), head)?;
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(label)
            .legend(line_swatch(color, width));
    }
    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)?;

    let s = &data.covariance;
    let [first, second] = &data.pairs;
    let lines = [
        "Sample covariance S:".to_string(),
        format!("  [{:6.3}  {:6.3}]", s[(0, 0)], s[(0, 1)]),
        format!("  [{:6.3}  {:6.3}]", s[(1, 0)], s[(1, 1)]),
        String::new(),
        format!("λ₁ = {:.3}, w₁ = ({:.3}, {:.3})", first.value, first.vector[0], first.vector[1]),
        format!("λ₂ = {:.3}, w₂ = ({:.3}, {:.3})", second.value, second.vector[0], second.vector[1]),
        String::new(),
        format!("S·w₁ = ({:.3}, {:.3})", image.0, image.1),
        format!("λ₁w₁ = ({:.3}, {:.3})", first.vector[0] * first.value, first.vector[1] * first.value),
        String::new(),
        "S only stretches w₁, by λ₁:".to_string(),
        "the direction of greatest variance.".to_string(),
    ];
    let style = theme.legend().pos(Pos::new(HPos::Left, VPos::Top));
    text_lines(&side, theme, &lines, (theme.px_i32(12.0), theme.px_i32(40.0)), &style)
}

pub(crate) struct VarianceMaximization {
    /// Centered samples, one per row
    pub centered: Samples,
    pub pairs: [EigenPair; 2],
    /// Samples projected onto each principal axis
    pub projections: [Vec<(f64, f64)>; 2],
    /// Variance of the projection onto the unit vector at each angle, in
    /// degrees over [0, 180]
    pub profile: CurveSamples,
}

/// 200 draws of N(0, [[1, 0.9], [0.9, 1]]), centered.
pub(crate) fn variance_maximization() -> Result<VarianceMaximization> {
    let raw = correlated_gaussian(200, &dvector![0.0, 0.0], &dmatrix![1.0, 0.9; 0.9, 1.0], SEED)?;
    let centered = center(&raw, &raw.row_mean().transpose());
    let covariance = sample_covariance(&centered)?;
    let pairs = two_pairs(&covariance)?;

    let project = |w: &DVector<f64>| -> Vec<(f64, f64)> {
        (&centered * w)
            .iter()
            .map(|&score| scaled(w, score))
            .collect()
    };
    let projections = [project(&pairs[0].vector), project(&pairs[1].vector)];

    let profile = CurveSamples::try_from_fn(
        |degrees| {
            let phi = degrees.to_radians();
            projected_variance(&covariance, &dvector![phi.cos(), phi.sin()])
        },
        0.0..=180.0,
        361,
    )?;

    Ok(VarianceMaximization {
        centered,
        pairs,
        projections,
        profile,
    })
}

/// Orientation of the line spanned by `v`, in degrees within [0, 180).
fn line_angle(v: &DVector<f64>) -> f64 {
    v[1].atan2(v[0]).to_degrees().rem_euclid(180.0)
}

pub(crate) fn draw_variance_maximization<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const ARROW_SCALE: f64 = 3.0;
    let data = variance_maximization()?;
    let body = area.titled("The mathematical basis of PCA: maximizing variance", theme.title())?;
    let (left, right) = body.split_horizontally((body.dim_in_pixel().0 / 2) as i32);

    let lim = reach(&data.centered).max(ARROW_SCALE * data.pairs[0].value.sqrt() * 1.1);
    let mut chart = cartesian(&left, theme, "PC1 maximizes the projected variance wᵀSw", -lim..lim, -lim..lim)?;
    mesh(&mut chart, theme, "Variable 1", "Variable 2")?;

    let data_color = RGBColor(0x4c, 0x72, 0xb0);
    let radius = theme.px_i32(3.0);
    chart
        .draw_series(
            data.centered
                .row_iter()
                .map(|row| Circle::new((row[0], row[1]), radius, data_color.mix(0.6).filled())),
        )?
        .label("Original data (X)")
        .legend(dot_swatch(data_color, radius));

    let colors = [RGBColor(0xdd, 0x84, 0x52), RGBColor(0x55, 0xa8, 0x68)];
    let names = ["PC1 (largest variance", "PC2 (smallest variance"];
    let width = theme.stroke(1.75);
    let small = theme.px_i32(4.0);
    for ((pair_i, projected), (color, name)) in data
        .pairs
        .iter()
        .zip(&data.projections)
        .zip(colors.into_iter().zip(names))
    {
        chart.draw_series(
            projected
                .iter()
                .map(|&p| Circle::new(p, small, color.mix(0.25).filled())),
        )?;
        let tip = scaled(&pair_i.vector, ARROW_SCALE * pair_i.value.max(0.0).sqrt());
        arrow(chart.plotting_area(), (0.0, 0.0), tip, color.stroke_width(width), theme.px(12.0))?;
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(format!("{name}: {:.2})", pair_i.value))
            .legend(line_swatch(color, width));
    }
    legend(&mut chart, theme, SeriesLabelPosition::UpperLeft)?;

    let top = data.profile.ys.iter().copied().fold(0.0, f64::max) * 1.15;
    let mut profile = cartesian(&right, theme, "Projected variance by direction", 0.0..180.0, 0.0..top)?;
    mesh(&mut profile, theme, "Angle of the unit vector w (degrees)", "Variance wᵀSw")?;
    labelled_line(
        &mut profile,
        theme,
        data.profile.points().collect(),
        None,
        data_color,
        theme.stroke(1.25),
        "Variance of the projection onto w",
    )?;
    let big = theme.px_i32(6.0);
    for ((pair_i, color), name) in data.pairs.iter().zip(colors).zip(["PC1", "PC2"]) {
        let at = (line_angle(&pair_i.vector), pair_i.value);
        profile
            .draw_series(std::iter::once(Circle::new(at, big, color.filled())))?
            .label(format!("{name}: λ = {:.2} at {:.1}°", at.1, at.0))
            .legend(dot_swatch(color, big));
        labelled_line(&mut profile, theme, vec![(at.0, 0.0), at], Some((4.0, 3.0)), color, theme.stroke(0.75), "")?;
    }
    legend(&mut profile, theme, SeriesLabelPosition::UpperRight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_stretches_eigenvectors() {
        let data = transformation().unwrap();
        assert_eq!(data.circle.len(), 100);
        for pair in &data.pairs {
            let image = pair.image(&data.matrix);
            assert_relative_eq!(image, &pair.vector * pair.value, epsilon = 1e-12);
        }
        assert_relative_eq!(data.pairs[0].value, 2.0 + 0.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            data.matrix.determinant(),
            data.pairs[0].value * data.pairs[1].value,
            epsilon = 1e-12
        );
        // (1, 0) maps to the first column of A.
        assert_relative_eq!(data.ellipse[0].0, 2.5, epsilon = 1e-12);
        assert_relative_eq!(data.ellipse[0].1, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_eigenvectors() {
        let data = covariance_eigenvectors().unwrap();
        assert_eq!(data.samples.nrows(), 300);
        let [first, second] = &data.pairs;
        assert!(first.value > second.value && second.value > 0.0);
        assert!(first.residual(&data.covariance) < 1e-12);
        // The cloud was drawn along the diagonal.
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(first.vector[0], s, epsilon = 0.08);
        assert_relative_eq!(first.vector[1], s, epsilon = 0.08);
        assert!((first.value - 1.8).abs() < 0.3);
    }

    #[test]
    fn test_variance_profile_peaks_at_pc1() {
        let data = variance_maximization().unwrap();
        let column_means = data.centered.row_mean();
        assert!(column_means.amax() < 1e-12);

        let (peak_angle, peak) = data
            .profile
            .points()
            .fold((0.0, f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best });
        assert_relative_eq!(peak, data.pairs[0].value, max_relative = 1e-3);
        assert!((peak_angle - line_angle(&data.pairs[0].vector)).abs() <= 0.5);

        let low = data.profile.ys.iter().copied().fold(f64::INFINITY, f64::min);
        assert_relative_eq!(low, data.pairs[1].value, max_relative = 1e-2);
    }

    #[test]
    fn test_projections_lie_on_their_axes() {
        let data = variance_maximization().unwrap();
        for (pair, projected) in data.pairs.iter().zip(&data.projections) {
            assert_eq!(projected.len(), 200);
            for &(x, y) in projected {
                assert!((x * pair.vector[1] - y * pair.vector[0]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_line_angle() {
        assert_relative_eq!(line_angle(&dvector![1.0, 1.0]), 45.0, epsilon = 1e-12);
        assert_relative_eq!(line_angle(&dvector![-1.0, -1.0]), 45.0, epsilon = 1e-12);
        assert_relative_eq!(line_angle(&dvector![1.0, -1.0]), 135.0, epsilon = 1e-12);
    }
}
