use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{ParamGen, Result};

/// A parameter generator that follows a certain probabilistic distribution.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: R,
    distribution: D,
    remaining: usize,
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    /// Creates a new `RandParamGen`.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: R, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: R, limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Creates a new `RandParamGen` scaled for `k` latent factors, that is N(0, 1/sqrt(k)).
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `k` - The latent dimension of the model.
    pub fn latent(rng: R, limit: usize, k: usize) -> Result<Self> {
        let std_dev = (1. / k.max(1) as f32).sqrt();
        Self::normal(rng, limit, 0., std_dev)
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        let n = n.min(self.remaining);
        self.remaining -= n;

        let sample = (0..n)
            .map(|_| self.distribution.sample(&mut self.rng))
            .collect();

        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn partial() {
        let rng = StdRng::seed_from_u64(42);
        let mut param_gen = RandParamGen::normal(rng, 10, 0., 1.).unwrap();

        assert_eq!(param_gen.sample(7).unwrap().len(), 7);
        assert_eq!(param_gen.sample(7).unwrap().len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn same_seed_same_params() {
        let a = RandParamGen::latent(StdRng::seed_from_u64(7), 32, 4)
            .unwrap()
            .collect(32);
        let b = RandParamGen::latent(StdRng::seed_from_u64(7), 32, 4)
            .unwrap()
            .collect(32);

        assert_eq!(a, b);
        assert!(a.iter().any(|&p| p != 0.));
    }

    #[test]
    fn rejects_invalid_std_dev() {
        let rng = StdRng::seed_from_u64(0);
        assert!(RandParamGen::normal(rng, 1, 0., f32::NAN).is_err());
    }
}
