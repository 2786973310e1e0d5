use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the small random addend used to diversify tied rankings
///
/// Implementations return a value in `[0, max]`; random sources stay
/// below `max`. A `max` of zero or less must yield `0.0`.
pub trait JitterSource {
    fn sample(&mut self, max: f64) -> f64;
}

/// Uniform jitter drawn from a seedable generator
#[derive(Debug, Clone)]
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same sequence of jitter values
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl JitterSource for RandomJitter {
    fn sample(&mut self, max: f64) -> f64 {
        if max <= 0.0 || !max.is_finite() {
            return 0.0;
        }
        self.rng.gen_range(0.0..max)
    }
}

/// Constant jitter clamped to `[0, max]`, for tests and deterministic rankings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    pub fn none() -> Self {
        Self(0.0)
    }
}

impl JitterSource for FixedJitter {
    fn sample(&mut self, max: f64) -> f64 {
        if max <= 0.0 || max.is_nan() || !self.0.is_finite() {
            return 0.0;
        }
        self.0.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_jitter_in_range() {
        let mut jitter = RandomJitter::from_entropy();
        for _ in 0..1000 {
            let value = jitter.sample(10.0);
            assert!((0.0..10.0).contains(&value), "jitter {} out of range", value);
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut a = RandomJitter::seeded(42);
        let mut b = RandomJitter::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.sample(10.0), b.sample(10.0));
        }
    }

    #[test]
    fn test_zero_max_yields_zero() {
        assert_eq!(RandomJitter::seeded(1).sample(0.0), 0.0);
        assert_eq!(FixedJitter(5.0).sample(0.0), 0.0);
    }

    #[test]
    fn test_fixed_jitter() {
        assert_eq!(FixedJitter::none().sample(10.0), 0.0);
        assert_eq!(FixedJitter(4.0).sample(10.0), 4.0);
        assert_eq!(FixedJitter(-3.0).sample(10.0), 0.0);
    }
}
