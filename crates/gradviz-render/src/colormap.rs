//! Sequential colormaps and level quantization for filled contour charts.

use plotters::style::RGBColor;

const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (72, 40, 120),
    (62, 73, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (110, 206, 88),
    (253, 231, 37),
];

const MAGMA: [(u8, u8, u8); 9] = [
    (0, 0, 4),
    (28, 16, 68),
    (79, 18, 123),
    (129, 37, 129),
    (181, 54, 122),
    (229, 80, 100),
    (251, 135, 97),
    (254, 194, 135),
    (252, 253, 191),
];

/// Perceptually ordered colormap, sampled by linear interpolation between
/// evenly spaced anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Dark purple to yellow
    Viridis,
    /// Yellow to dark purple
    ViridisReversed,
    /// Black to pale yellow
    Magma,
}

impl Colormap {
    /// Color at `t`, clamped to `[0, 1]`. NaN maps to the low end.
    pub fn color(self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (anchors, t) = match self {
            Self::Viridis => (&VIRIDIS, t),
            Self::ViridisReversed => (&VIRIDIS, 1.0 - t),
            Self::Magma => (&MAGMA, t),
        };

        let scaled = t * (anchors.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(anchors.len() - 2);
        let frac = scaled - i as f64;
        let (a, b) = (anchors[i], anchors[i + 1]);
        let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }
}

/// Boundaries splitting a value range into filled bands.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelScale {
    levels: Vec<f64>,
}

impl LevelScale {
    /// `bands` equal-width bands between `min` and `max`.
    pub fn linear(min: f64, max: f64, bands: usize) -> Self {
        Self {
            levels: gradviz_core::sampling::linspace(min, max, bands.max(1) + 1),
        }
    }

    /// Bands evenly spaced in log10 between `10^lo_exp` and `10^hi_exp`.
    pub fn logarithmic(lo_exp: f64, hi_exp: f64, bands: usize) -> Self {
        Self {
            levels: gradviz_core::sampling::logspace(lo_exp, hi_exp, bands.max(1) + 1),
        }
    }

    /// Level boundaries in increasing order.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Number of bands.
    pub fn bands(&self) -> usize {
        self.levels.len() - 1
    }

    /// Index of the band containing `value`, or `None` outside the range.
    pub fn band(&self, value: f64) -> Option<usize> {
        let (lo, hi) = (self.levels[0], self.levels[self.levels.len() - 1]);
        if !(lo..=hi).contains(&value) {
            return None;
        }
        let upper = self.levels.partition_point(|&level| level <= value);
        Some(upper.saturating_sub(1).min(self.bands() - 1))
    }

    /// Position of `value`'s band in `[0, 1]`, for colormap lookup.
    ///
    /// Values below the range map to 0, above it to 1.
    pub fn fraction(&self, value: f64) -> f64 {
        let last = self.bands().saturating_sub(1).max(1) as f64;
        match self.band(value) {
            Some(band) => band as f64 / last,
            None if value < self.levels[0] => 0.0,
            None => 1.0,
        }
    }
}
