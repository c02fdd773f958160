//! Evenly spaced samples of objectives for curve, contour and surface charts.

use crate::{
    error::{GradvizError, Result},
    objective::Objective,
    types::point,
};
use nalgebra::DMatrix;
use std::ops::RangeInclusive;

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `n` values evenly spaced on a log scale from `10^lo_exp` to `10^hi_exp`.
pub fn logspace(lo_exp: f64, hi_exp: f64, n: usize) -> Vec<f64> {
    linspace(lo_exp, hi_exp, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// A one-dimensional objective sampled along an interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSamples {
    /// Abscissae
    pub xs: Vec<f64>,
    /// Objective values at `xs`
    pub ys: Vec<f64>,
}

impl CurveSamples {
    /// Samples `objective` at `n` evenly spaced points of `range`.
    pub fn sample<O>(objective: &O, range: RangeInclusive<f64>, n: usize) -> Result<Self>
    where
        O: Objective + ?Sized,
    {
        GradvizError::ensure_dimension(1, objective.dimension())?;
        let xs = linspace(*range.start(), *range.end(), n);
        let ys = xs
            .iter()
            .map(|&x| objective.evaluate(&point(&[x])))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { xs, ys })
    }

    /// Samples a plain function.
    pub fn from_fn(f: impl Fn(f64) -> f64, range: RangeInclusive<f64>, n: usize) -> Self {
        let xs = linspace(*range.start(), *range.end(), n);
        let ys = xs.iter().map(|&x| f(x)).collect();
        Self { xs, ys }
    }

    /// Samples a fallible function; the first error is returned.
    pub fn try_from_fn(
        f: impl Fn(f64) -> Result<f64>,
        range: RangeInclusive<f64>,
        n: usize,
    ) -> Result<Self> {
        let xs = linspace(*range.start(), *range.end(), n);
        let ys = xs.iter().map(|&x| f(x)).collect::<Result<Vec<_>>>()?;
        Ok(Self { xs, ys })
    }

    /// `(x, y)` pairs, ready for a line series.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Pairs whose `y` lies within `[lo, hi]`.
    pub fn clipped(&self, lo: f64, hi: f64) -> Vec<(f64, f64)> {
        self.points().filter(|(_, y)| (lo..=hi).contains(y)).collect()
    }
}

/// A two-dimensional objective sampled on a regular grid.
///
/// `values[(i, j)]` holds `f(xs[i], ys[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: DMatrix<f64>,
}

/// One rectangle of a [`SurfaceGrid`], centered on a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Lower-left corner
    pub lower: (f64, f64),
    /// Upper-right corner
    pub upper: (f64, f64),
    /// Objective value at the cell's sample
    pub value: f64,
}

impl SurfaceGrid {
    /// Samples `objective` on an `nx` by `ny` grid.
    pub fn sample<O>(
        objective: &O,
        x_range: RangeInclusive<f64>,
        y_range: RangeInclusive<f64>,
        nx: usize,
        ny: usize,
    ) -> Result<Self>
    where
        O: Objective + ?Sized,
    {
        GradvizError::ensure_dimension(2, objective.dimension())?;
        if nx < 2 || ny < 2 {
            return Err(GradvizError::invalid_input(format!(
                "a surface grid needs at least 2x2 samples, got {nx}x{ny}"
            )));
        }

        let xs = linspace(*x_range.start(), *x_range.end(), nx);
        let ys = linspace(*y_range.start(), *y_range.end(), ny);
        let mut values = DMatrix::zeros(nx, ny);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                values[(i, j)] = objective.evaluate(&point(&[x, y]))?;
            }
        }

        Ok(Self { xs, ys, values })
    }

    /// Sample abscissae.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Sample ordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Value at `(xs[i], ys[j])`.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Smallest sampled value.
    pub fn min(&self) -> f64 {
        self.values.min()
    }

    /// Largest sampled value.
    pub fn max(&self) -> f64 {
        self.values.max()
    }

    /// Every sample as a rectangle spanning half a step on each side.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let half_x = (self.xs[1] - self.xs[0]) / 2.0;
        let half_y = (self.ys[1] - self.ys[0]) / 2.0;
        self.xs.iter().enumerate().flat_map(move |(i, &x)| {
            self.ys.iter().enumerate().map(move |(j, &y)| GridCell {
                lower: (x - half_x, y - half_y),
                upper: (x + half_x, y + half_y),
                value: self.values[(i, j)],
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objectives::{AxisQuadratic, Parabola};
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());

        let xs = linspace(-4.0, 4.0, 400);
        assert_eq!(xs.len(), 400);
        assert_eq!(xs[399], 4.0);
    }

    #[test]
    fn test_logspace() {
        let levels = logspace(0.0, 3.5, 20);
        assert_eq!(levels.len(), 20);
        assert_relative_eq!(levels[0], 1.0);
        assert_relative_eq!(levels[19], 10f64.powf(3.5), max_relative = 1e-12);
    }

    #[test]
    fn test_curve_samples() {
        let curve = CurveSamples::sample(&Parabola::unit(), -2.0..=2.0, 5).unwrap();
        assert_eq!(curve.ys, vec![4.0, 1.0, 0.0, 1.0, 4.0]);
        assert_eq!(curve.clipped(0.0, 1.0), vec![(-1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
        assert!(CurveSamples::sample(&AxisQuadratic::elongated(), -1.0..=1.0, 5).is_err());
    }

    #[test]
    fn test_try_from_fn_stops_at_first_error() {
        let curve = CurveSamples::try_from_fn(|x| Ok(2.0 * x), 0.0..=1.0, 3).unwrap();
        assert_eq!(curve.ys, vec![0.0, 1.0, 2.0]);

        let failing = CurveSamples::try_from_fn(
            |x| {
                if x > 0.5 {
                    Err(GradvizError::numerical_error("past the edge"))
                } else {
                    Ok(x)
                }
            },
            0.0..=1.0,
            3,
        );
        assert!(matches!(failing, Err(GradvizError::NumericalError { .. })));
    }

    #[test]
    fn test_surface_grid() {
        let bowl = AxisQuadratic::elongated();
        let grid = SurfaceGrid::sample(&bowl, -1.0..=1.0, -2.0..=2.0, 3, 5).unwrap();

        assert_eq!(grid.xs(), &[-1.0, 0.0, 1.0]);
        assert_relative_eq!(grid.value(1, 2), 0.0);
        assert_relative_eq!(grid.value(2, 4), 0.5 + 2.5 * 4.0);
        assert_relative_eq!(grid.min(), 0.0);
        assert_relative_eq!(grid.max(), 10.5);

        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 15);
        assert_eq!(cells[0].lower, (-1.5, -2.5));
        assert_eq!(cells[0].upper, (-0.5, -1.5));
    }

    #[test]
    fn test_surface_grid_rejects_one_dimensional() {
        assert!(SurfaceGrid::sample(&Parabola::unit(), -1.0..=1.0, -1.0..=1.0, 3, 3).is_err());
        assert!(SurfaceGrid::sample(&AxisQuadratic::elongated(), -1.0..=1.0, -1.0..=1.0, 1, 3).is_err());
    }
}
