//! Hand-authored paths for the optimizer comparison chart.
//!
//! The comparison figure contrasts the shape of plain, stochastic and
//! adaptive descent on the two-basin surface. Only the plain descent path is
//! simulated; the stochastic and adaptive paths are fixed waypoints chosen
//! to look like their namesakes. Nothing here runs SGD or Adam. The paths
//! are typed separately from [`Trajectory`](crate::simulator::Trajectory)
//! so they cannot be passed off as optimizer output.

/// Fixed waypoints drawn to illustrate an optimizer's typical path.
#[derive(Debug, Clone, PartialEq)]
pub struct IllustrativePath {
    /// Legend label
    pub label: &'static str,
    /// Waypoints in drawing order
    pub points: Vec<(f64, f64)>,
}

impl IllustrativePath {
    /// First waypoint.
    pub fn start(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    /// Last waypoint.
    pub fn end(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }
}

/// Where the comparison paths begin.
pub const COMPARISON_START: (f64, f64) = (-4.5, -6.0);

/// Where both illustrative paths end, in the upper basin.
pub const ILLUSTRATIVE_END: (f64, f64) = (-1.15, 3.9);

/// Illustrative paths for stochastic descent (noisy) and Adam (smooth).
pub fn comparison_paths() -> [IllustrativePath; 2] {
    [
        IllustrativePath {
            label: "SGD (illustrative)",
            points: vec![
                COMPARISON_START,
                (-4.0, -4.0),
                (-2.5, -5.0),
                (-3.5, -3.0),
                (-1.5, -3.5),
                (-2.0, -1.5),
                (0.0, -1.0),
                (-1.0, 1.0),
                (-0.5, 3.0),
                (-1.5, 3.5),
                ILLUSTRATIVE_END,
            ],
        },
        IllustrativePath {
            label: "Adam (illustrative)",
            points: vec![
                COMPARISON_START,
                (-3.0, -3.5),
                (-1.5, -1.0),
                (-1.0, 2.0),
                (-1.2, 3.5),
                ILLUSTRATIVE_END,
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_a_start() {
        for path in comparison_paths() {
            assert_eq!(path.start(), Some(COMPARISON_START), "{}", path.label);
        }
    }

    #[test]
    fn test_paths_share_an_end() {
        let [sgd, adam] = comparison_paths();
        assert_eq!(sgd.end(), Some(ILLUSTRATIVE_END));
        assert_eq!(adam.end(), Some(ILLUSTRATIVE_END));
        assert!(sgd.points.len() > adam.points.len());
    }
}
