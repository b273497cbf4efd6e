//! Simulated annealing acceptance rule and cooling schedules.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the temperature falls after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingSchedule {
    /// `T <- T * alpha`
    Geometric { alpha: f64 },
    /// `T <- T - decrement`, floored at zero
    Linear { decrement: f64 },
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.9 }
    }
}

impl CoolingSchedule {
    pub fn next(&self, temperature: f64) -> f64 {
        match self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::Linear { decrement } => (temperature - decrement).max(0.0),
            CoolingSchedule::Custom(f) => f(temperature),
        }
    }
}

/// Outcome of one acceptance test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub probability: f64,
    pub accepted: bool,
}

/// `1` for non-worsening moves, `exp(-delta / T)` otherwise
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temperature <= 0.0 {
        0.0
    } else {
        (-delta / temperature).exp()
    }
}

/// Decide whether to take a move whose cost changes by `delta`.
///
/// Improving and sideways moves are always taken without drawing from `rng`.
pub fn decide<R: Rng + ?Sized>(delta: f64, temperature: f64, rng: &mut R) -> Decision {
    let probability = acceptance_probability(delta, temperature);
    let accepted = delta <= 0.0 || rng.gen::<f64>() < probability;
    Decision { probability, accepted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_improving_moves_always_accepted() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for delta in [-3.0, -0.5, 0.0] {
            let d = decide(delta, 0.01, &mut rng);
            assert!(d.accepted);
            assert_eq!(d.probability, 1.0);
        }
    }

    #[test]
    fn test_probability_shrinks_with_temperature() {
        let hot = acceptance_probability(1.0, 5.0);
        let cold = acceptance_probability(1.0, 0.5);
        assert!(hot > cold);
        assert!((hot - (-0.2f64).exp()).abs() < 1e-12);
        assert_eq!(acceptance_probability(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_cooling_schedules() {
        assert!((CoolingSchedule::Geometric { alpha: 0.9 }.next(5.0) - 4.5).abs() < 1e-12);
        assert_eq!(CoolingSchedule::Linear { decrement: 0.5 }.next(5.0), 4.5);
        assert_eq!(CoolingSchedule::Linear { decrement: 0.5 }.next(0.2), 0.0);
        fn halve(t: f64) -> f64 {
            t / 2.0
        }
        assert_eq!(CoolingSchedule::Custom(halve).next(5.0), 2.5);
    }
}
