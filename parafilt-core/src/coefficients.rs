//! Seeded coefficient generation.
//!
//! One generator is created per run and threaded through every call, so the
//! same seed always reproduces the same coefficient vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ParafiltError, Result};

/// Quantised uniform coefficients: `low + k * step`, `k` in `0..=levels`.
#[derive(Debug, Clone)]
pub struct CoefficientGenerator {
    rng: StdRng,
    seed: u64,
}

impl CoefficientGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw `count` values on the grid `low, low + step, …, high`.
    ///
    /// # Errors
    /// `InvalidCoefficients` if `step` is not positive or `high < low`.
    pub fn generate(&mut self, low: f32, high: f32, step: f32, count: usize) -> Result<Vec<f32>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ParafiltError::InvalidCoefficients(format!(
                "step must be positive, got {step}"
            )));
        }
        if low.is_nan() || high.is_nan() || high < low {
            return Err(ParafiltError::InvalidCoefficients(format!(
                "invalid range {low}..={high}"
            )));
        }

        // Rounded so that e.g. (1.0 - 0.1) / 0.1 = 8.9999 still yields 9 levels.
        let levels = ((high - low) / step).round() as u32;
        Ok((0..count)
            .map(|_| low + self.rng.gen_range(0..=levels) as f32 * step)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_coefficients() {
        let mut a = CoefficientGenerator::from_seed(42);
        let mut b = CoefficientGenerator::from_seed(42);
        assert_eq!(
            a.generate(0.1, 10.0, 0.1, 100).unwrap(),
            b.generate(0.1, 10.0, 0.1, 100).unwrap()
        );
        assert_eq!(
            a.generate(-1.0, 1.0, 0.1, 50).unwrap(),
            b.generate(-1.0, 1.0, 0.1, 50).unwrap()
        );
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = CoefficientGenerator::from_seed(1);
        let mut b = CoefficientGenerator::from_seed(2);
        assert_ne!(
            a.generate(0.1, 10.0, 0.1, 100).unwrap(),
            b.generate(0.1, 10.0, 0.1, 100).unwrap()
        );
    }

    #[test]
    fn successive_draws_advance_the_stream() {
        let mut g = CoefficientGenerator::from_seed(7);
        let first = g.generate(0.1, 1.0, 0.1, 32).unwrap();
        let second = g.generate(0.1, 1.0, 0.1, 32).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn values_stay_on_grid_and_in_range() {
        let mut g = CoefficientGenerator::from_seed(9);
        for v in g.generate(-1.0, 1.0, 0.1, 500).unwrap() {
            assert!((-1.0 - 1e-5..=1.0 + 1e-5).contains(&v), "{v}");
            let k = (v + 1.0) / 0.1;
            assert!((k - k.round()).abs() < 1e-3, "{v} off grid");
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut g = CoefficientGenerator::from_seed(0);
        assert_eq!(g.generate(0.5, 0.5, 0.1, 3).unwrap(), vec![0.5; 3]);
    }

    #[test]
    fn bad_ranges_are_rejected() {
        let mut g = CoefficientGenerator::from_seed(0);
        assert!(g.generate(0.0, 1.0, 0.0, 3).is_err());
        assert!(g.generate(0.0, 1.0, -0.1, 3).is_err());
        assert!(g.generate(1.0, 0.0, 0.1, 3).is_err());
        assert!(g.generate(0.0, 1.0, f32::NAN, 3).is_err());
    }

    #[test]
    fn zero_count_is_empty() {
        let mut g = CoefficientGenerator::from_seed(0);
        assert!(g.generate(0.1, 1.0, 0.1, 0).unwrap().is_empty());
    }
}
