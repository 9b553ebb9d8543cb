use std::collections::BTreeMap;

use crate::DRVError;
use crate::rand_var::outcome::Outcome;

pub mod bin_op;
pub mod outcome;

// how far the total mass may stray from one and still count as a distribution
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Read access and statistics shared by everything backed by a probability mass table.
pub trait RandVar {
    fn backing_map(&self) -> &BTreeMap<Outcome, f64>;

    fn len(&self) -> usize {
        self.backing_map().len()
    }

    fn is_empty(&self) -> bool {
        self.backing_map().is_empty()
    }

    fn lower_bound(&self) -> Option<f64> {
        self.backing_map().first_key_value().map(|(k, _)| k.value())
    }

    fn upper_bound(&self) -> Option<f64> {
        self.backing_map().last_key_value().map(|(k, _)| k.value())
    }

    /// `(outcome, mass)` pairs in ascending outcome order.
    fn outcomes(&self) -> Box<dyn Iterator<Item = (f64, f64)> + '_> {
        Box::new(self.backing_map().iter().map(|(k, p)| (k.value(), *p)))
    }

    fn pdf(&self, x: f64) -> f64 {
        match Outcome::new(x) {
            Ok(k) => self.backing_map().get(&k).copied().unwrap_or(0.0),
            Err(_) => 0.0,
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        self.outcomes().take_while(|(k, _)| *k <= x).map(|(_, p)| p).sum()
    }

    fn cdf_exclusive(&self, x: f64) -> f64 {
        self.outcomes().take_while(|(k, _)| *k < x).map(|(_, p)| p).sum()
    }

    /// Running totals of the mass, one entry per outcome.
    fn cumulative(&self) -> Vec<(f64, f64)> {
        let mut total = 0.0;
        self.outcomes().map(|(k, p)| {
            total += p;
            (k, total)
        }).collect()
    }

    fn total_mass(&self) -> f64 {
        self.backing_map().values().sum()
    }

    fn is_normalized(&self) -> bool {
        (self.total_mass() - 1.0).abs() <= MASS_TOLERANCE
    }

    fn general_expected_value<F>(&self, f: F) -> Result<f64, DRVError>
    where
        F: Fn(f64) -> f64,
    {
        if self.is_empty() {
            return Err(DRVError::EmptyDistribution);
        }
        Ok(self.outcomes().map(|(k, p)| p * f(k)).sum())
    }

    fn expected_value(&self) -> Result<f64, DRVError> {
        self.general_expected_value(|k| k)
    }

    /// Population variance; the masses already carry the weighting.
    fn variance(&self) -> Result<f64, DRVError> {
        let ev = self.expected_value()?;
        self.general_expected_value(|k| (k - ev).powi(2))
    }

    fn std_dev(&self) -> Result<f64, DRVError> {
        Ok(self.variance()?.sqrt())
    }
}
