use crate::grid::Position;
use serde::{Deserialize, Serialize};

/// Distance estimate from a position to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// `|gx - x| + |gy - y|`
    #[default]
    Manhattan,
    Euclidean,
    /// Admissible for 8-connected moves costing 1 and sqrt(2)
    Octile,
    Chebyshev,
    /// Turns A* into uniform-cost search
    Zero,
    #[serde(skip)]
    Custom(fn(Position, Position) -> f64),
}

impl Heuristic {
    pub fn estimate(&self, from: Position, goal: Position) -> f64 {
        let dx = (goal.x - from.x).abs() as f64;
        let dy = (goal.y - from.y).abs() as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Octile => {
                let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
                hi - lo + lo * std::f64::consts::SQRT_2
            }
            Heuristic::Chebyshev => dx.max(dy),
            Heuristic::Zero => 0.0,
            Heuristic::Custom(f) => f(from, goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_is_default() {
        let h = Heuristic::default();
        assert_eq!(h.estimate(Position::new(1, 1), Position::new(6, 6)), 10.0);
    }

    #[test]
    fn test_octile_and_chebyshev() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 1);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b), 3.0);
        let octile = Heuristic::Octile.estimate(a, b);
        assert!((octile - (2.0 + std::f64::consts::SQRT_2)).abs() < 1e-9);
    }

    #[test]
    fn test_custom_heuristic() {
        fn double_manhattan(a: Position, b: Position) -> f64 {
            2.0 * ((a.x - b.x).abs() + (a.y - b.y).abs()) as f64
        }
        let h = Heuristic::Custom(double_manhattan);
        assert_eq!(h.estimate(Position::new(0, 0), Position::new(1, 2)), 6.0);
    }
}
