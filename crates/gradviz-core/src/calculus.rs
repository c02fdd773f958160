//! Partial and directional derivatives of an objective at a point.

use crate::{
    error::{GradvizError, Result},
    objective::Objective,
    sampling::linspace,
    types::Point,
};
use std::ops::RangeInclusive;

/// Rate of change of an objective along a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalDerivative {
    /// Point of evaluation P
    pub at: Point,
    /// ∇f(P)
    pub gradient: Point,
    /// The requested direction scaled to unit length
    pub direction: Point,
    /// Angle θ between ∇f(P) and the direction in radians, `None` at a
    /// stationary point
    pub angle: Option<f64>,
    /// D_v f(P) = ∇f(P)·v
    pub value: f64,
}

impl DirectionalDerivative {
    /// ‖∇f(P)‖, the largest rate of change at P, reached along ∇f(P).
    pub fn steepest(&self) -> f64 {
        self.gradient.norm()
    }

    /// ∇f(P) scaled to unit length, or `None` at a stationary point.
    pub fn ascent(&self) -> Option<Point> {
        let norm = self.steepest();
        (norm > 0.0).then(|| &self.gradient / norm)
    }
}

/// Derivative of `objective` at `at` along `direction`.
///
/// `direction` need not be normalized; only its orientation matters.
///
/// # Errors
///
/// `InvalidInput` for a zero or non-finite direction, `DimensionMismatch`
/// when either vector does not match the objective.
pub fn directional_derivative<O>(objective: &O, at: &Point, direction: &Point) -> Result<DirectionalDerivative>
where
    O: Objective + ?Sized,
{
    GradvizError::ensure_dimension(objective.dimension(), direction.len())?;
    let length = direction.norm();
    if !(length.is_finite() && length > 0.0) {
        return Err(GradvizError::invalid_input(
            "a direction needs a finite, non-zero length",
        ));
    }

    let gradient = objective.gradient(at)?;
    let unit = direction / length;
    let value = gradient.dot(&unit);
    let steepest = gradient.norm();
    let angle = (steepest > 0.0).then(|| (value / steepest).clamp(-1.0, 1.0).acos());

    Ok(DirectionalDerivative {
        at: at.clone(),
        gradient,
        direction: unit,
        angle,
        value,
    })
}

/// The objective along one coordinate axis through a point, all other
/// coordinates held fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSection {
    /// Index of the varying coordinate
    pub axis: usize,
    /// The point the section passes through
    pub at: Point,
    /// Points visited along the section
    pub points: Vec<Point>,
    /// Objective values at `points`
    pub values: Vec<f64>,
    /// f(at)
    pub value: f64,
    /// ∂f/∂x_axis at `at`, the slope of the section there
    pub slope: f64,
}

impl AxisSection {
    /// Height of the tangent line at coordinate `x` along the axis.
    pub fn tangent(&self, x: f64) -> f64 {
        self.value + self.slope * (x - self.at[self.axis])
    }
}

/// Samples `objective` at `n` values of coordinate `axis` over `range`,
/// keeping the other coordinates of `at`.
pub fn axis_section<O>(
    objective: &O,
    at: &Point,
    axis: usize,
    range: RangeInclusive<f64>,
    n: usize,
) -> Result<AxisSection>
where
    O: Objective + ?Sized,
{
    if axis >= objective.dimension() {
        return Err(GradvizError::invalid_configuration(
            format!("must be below the dimension {}", objective.dimension()),
            "axis",
            axis,
        ));
    }
    let (value, gradient) = objective.evaluate_and_gradient(at)?;

    let points: Vec<Point> = linspace(*range.start(), *range.end(), n)
        .into_iter()
        .map(|x| {
            let mut p = at.clone();
            p[axis] = x;
            p
        })
        .collect();
    let values = points
        .iter()
        .map(|p| objective.evaluate(p))
        .collect::<Result<Vec<_>>>()?;

    Ok(AxisSection {
        axis,
        at: at.clone(),
        points,
        values,
        value,
        slope: gradient[axis],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{objectives::AxisQuadratic, types::point};
    use approx::assert_relative_eq;
    use nalgebra::dvector;
    use std::f64::consts::FRAC_PI_2;

    /// (x - 1)² + 2(y - 1)²
    fn ellipse_bowl() -> AxisQuadratic {
        AxisQuadratic::new(dvector![2.0, 4.0], point(&[1.0, 1.0])).unwrap()
    }

    #[test]
    fn test_directional_derivative_is_gradient_dot_unit() {
        let d = directional_derivative(&ellipse_bowl(), &point(&[2.5, 2.0]), &point(&[-2.0, 1.5])).unwrap();

        assert_eq!(d.gradient, point(&[3.0, 4.0]));
        assert_relative_eq!(d.direction.norm(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(d.direction, point(&[-0.8, 0.6]), epsilon = 1e-15);
        assert_relative_eq!(d.value, 3.0 * -0.8 + 4.0 * 0.6, epsilon = 1e-12);
        // The direction is orthogonal to the gradient here.
        assert_relative_eq!(d.angle.unwrap(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(d.value, d.steepest() * d.angle.unwrap().cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_is_the_steepest_direction() {
        let bowl = ellipse_bowl();
        let at = point(&[2.5, 2.0]);
        let along = directional_derivative(&bowl, &at, &point(&[3.0, 4.0])).unwrap();
        let against = directional_derivative(&bowl, &at, &point(&[-3.0, -4.0])).unwrap();

        assert_relative_eq!(along.value, 5.0, epsilon = 1e-12);
        assert_relative_eq!(along.angle.unwrap(), 0.0, epsilon = 1e-7);
        assert_relative_eq!(against.value, -5.0, epsilon = 1e-12);
        assert_relative_eq!(along.ascent().unwrap(), point(&[0.6, 0.8]), epsilon = 1e-15);

        for k in 0..16 {
            let phi = f64::from(k) * std::f64::consts::PI / 8.0;
            let d = directional_derivative(&bowl, &at, &point(&[phi.cos(), phi.sin()])).unwrap();
            assert!(d.value.abs() <= along.value + 1e-12);
        }
    }

    #[test]
    fn test_stationary_point_has_no_angle() {
        let d = directional_derivative(&ellipse_bowl(), &point(&[1.0, 1.0]), &point(&[1.0, 0.0])).unwrap();
        assert_eq!(d.value, 0.0);
        assert!(d.angle.is_none());
        assert!(d.ascent().is_none());
    }

    #[test]
    fn test_directional_derivative_rejects_bad_directions() {
        let bowl = ellipse_bowl();
        let at = point(&[2.5, 2.0]);
        assert!(matches!(
            directional_derivative(&bowl, &at, &point(&[0.0, 0.0])),
            Err(GradvizError::InvalidInput { .. })
        ));
        assert!(directional_derivative(&bowl, &at, &point(&[f64::NAN, 1.0])).is_err());
        assert!(matches!(
            directional_derivative(&bowl, &at, &point(&[1.0])),
            Err(GradvizError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_axis_sections_of_the_unit_bowl() {
        // x² + y²
        let bowl = AxisQuadratic::new(dvector![2.0, 2.0], point(&[0.0, 0.0])).unwrap();
        let at = point(&[2.0, 3.0]);

        let along_x = axis_section(&bowl, &at, 0, -4.0..=4.0, 9).unwrap();
        assert_eq!(along_x.value, 13.0);
        assert_eq!(along_x.slope, 4.0);
        assert_eq!(along_x.points[0], point(&[-4.0, 3.0]));
        assert_eq!(along_x.values[0], 25.0);
        assert_eq!(along_x.tangent(3.0), 17.0);

        let along_y = axis_section(&bowl, &at, 1, -4.0..=4.0, 9).unwrap();
        assert_eq!(along_y.slope, 6.0);
        assert!(along_y.points.iter().all(|p| p[0] == 2.0));

        assert!(axis_section(&bowl, &at, 2, -1.0..=1.0, 3).is_err());
    }
}
