use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::DRVError;
use crate::drv::{DRV, DRVKind};
use crate::rand_var::RandVar;

/// A seeded generator, for reproducible draws.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Weighted categorical draws over a mass table.
struct TableSampler {
    outcomes: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl TableSampler {
    fn new(rv: &DRV) -> Result<Self, DRVError> {
        let total = rv.total_mass();
        if !total.is_finite() {
            return Err(DRVError::InvalidDistribution(format!("total mass {} is not finite", total)));
        }
        let (outcomes, weights): (Vec<f64>, Vec<f64>) = rv.outcomes().unzip();
        let index = WeightedIndex::new(&weights).map_err(|err| match err {
            WeightedError::NoItem | WeightedError::AllWeightsZero => DRVError::EmptyDistribution,
            other => DRVError::InvalidDistribution(other.to_string()),
        })?;
        Ok(Self { outcomes, index })
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.outcomes[self.index.sample(rng)]
    }
}

enum Sampler {
    Table(TableSampler),
    Uniform { min: f64, max: f64 },
    Normal(Normal<f64>),
}

impl Sampler {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Table(table) => table.draw(rng),
            Sampler::Uniform { min, max } => rng.gen_range(*min..*max),
            Sampler::Normal(normal) => normal.sample(rng),
        }
    }
}

impl DRV {
    fn sampler(&self) -> Result<Sampler, DRVError> {
        match self.kind() {
            DRVKind::Explicit => Ok(Sampler::Table(TableSampler::new(self)?)),
            DRVKind::Uniform { min, max, .. } => Ok(Sampler::Uniform { min, max }),
            DRVKind::Normal { mean, stdev, .. } => Normal::new(mean, stdev)
                .map(Sampler::Normal)
                .map_err(|err| DRVError::InvalidParameters(err.to_string())),
        }
    }

    /// Draws one value.
    ///
    /// Explicit random variables (including everything produced by combining)
    /// draw from their mass table. Uniform and normal ones draw from the
    /// continuous distribution they were built from, so their draws are not
    /// restricted to the bin positions: a uniform draw lies anywhere in
    /// `[min, max)`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<f64, DRVError> {
        Ok(self.sampler()?.draw(rng))
    }

    /// Draws `n` values the way [`DRV::sample`] does.
    pub fn sample_n<R: Rng>(&self, rng: &mut R, n: usize) -> Result<Vec<f64>, DRVError> {
        let sampler = self.sampler()?;
        Ok((0..n).map(|_| sampler.draw(rng)).collect())
    }

    /// Draws one value from the mass table, whatever kind of random variable this is.
    pub fn sample_table<R: Rng>(&self, rng: &mut R) -> Result<f64, DRVError> {
        Ok(TableSampler::new(self)?.draw(rng))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::DRVError;
    use crate::drv::DRV;
    use crate::drv::sampling::create_rng;
    use crate::rand_var::RandVar;

    #[test]
    fn test_uniform_bounds() {
        let rv = DRV::new_uniform(2.0, 5.0, 3).unwrap();
        let mut rng = create_rng(7);
        let draws = rv.sample_n(&mut rng, 10_000).unwrap();
        assert!(draws.iter().all(|x| (2.0..5.0).contains(x)));
        // continuous, so most draws are off the bin positions 2, 3 and 4
        let off_bins = draws.iter().filter(|x| rv.pdf(**x) == 0.0).count();
        assert!(off_bins > 9_000);
        for _ in 0..1_000 {
            let x = rv.sample(&mut rng).unwrap();
            assert!((2.0..5.0).contains(&x));
        }
    }

    #[test]
    fn test_table_draws() {
        let rv = DRV::from_pairs([(1.0, 0.2), (2.0, 0.5), (10.0, 0.3)]).unwrap();
        let mut rng = create_rng(42);
        let n = 20_000;
        let draws = rv.sample_n(&mut rng, n).unwrap();
        assert!(draws.iter().all(|x| rv.pdf(*x) > 0.0));
        for (k, p) in rv.outcomes() {
            let freq = draws.iter().filter(|x| **x == k).count() as f64 / n as f64;
            assert_abs_diff_eq!(p, freq, epsilon = 0.02);
        }
    }

    #[test]
    fn test_massless_outcome_never_drawn() {
        let rv = DRV::from_pairs([(0.0, 0.0), (1.0, 1.0)]).unwrap();
        let mut rng = create_rng(1);
        for _ in 0..100 {
            assert_eq!(1.0, rv.sample(&mut rng).unwrap());
        }
    }

    #[test]
    fn test_normal_draws() {
        let rv = DRV::new_normal(10.0, 2.0, 30).unwrap();
        let mut rng = create_rng(3);
        let n = 20_000;
        let draws = rv.sample_n(&mut rng, n).unwrap();
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert_abs_diff_eq!(10.0, mean, epsilon = 0.1);
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert_abs_diff_eq!(2.0, var.sqrt(), epsilon = 0.1);
    }

    #[test]
    fn test_sample_table_uses_bins() {
        let rv = DRV::new_uniform(2.0, 5.0, 3).unwrap();
        let mut rng = create_rng(11);
        for _ in 0..200 {
            let x = rv.sample_table(&mut rng).unwrap();
            assert!(x == 2.0 || x == 3.0 || x == 4.0);
        }
        let derived = rv.add_const(1.0).unwrap();
        for x in derived.sample_n(&mut rng, 200).unwrap() {
            assert!(x == 3.0 || x == 4.0 || x == 5.0);
        }
    }

    #[test]
    fn test_seeded_repeatable() {
        let rv = DRV::new_normal(0.0, 1.0, 10).unwrap();
        let a = rv.sample_n(&mut create_rng(99), 50).unwrap();
        let b = rv.sample_n(&mut create_rng(99), 50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_overflowing_total() {
        let mut rng = create_rng(8);
        let heavy = DRV::from_pairs([(1.0, f64::MAX), (2.0, f64::MAX)]).unwrap();
        assert!(matches!(heavy.sample(&mut rng), Err(DRVError::InvalidDistribution(_))));
        assert!(matches!(heavy.sample_table(&mut rng), Err(DRVError::InvalidDistribution(_))));
        assert!(matches!(heavy.sample_n(&mut rng, 5), Err(DRVError::InvalidDistribution(_))));
    }

    #[test]
    fn test_empty() {
        let mut rng = create_rng(0);
        let empty = DRV::from_pairs(Vec::<(f64, f64)>::new()).unwrap();
        assert_eq!(Err(DRVError::EmptyDistribution), empty.sample(&mut rng));
        let massless = DRV::from_pairs([(1.0, 0.0)]).unwrap();
        assert_eq!(Err(DRVError::EmptyDistribution), massless.sample_table(&mut rng));
        assert_eq!(Err(DRVError::EmptyDistribution), massless.sample_n(&mut rng, 3));
    }
}
