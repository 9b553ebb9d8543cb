use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::DRVError;

/// A finite real number usable as a key of a probability mass table.
///
/// Ordering is total, and `-0.0` is folded into `0.0` so both land on the same key.
#[derive(Debug, Clone, Copy)]
pub struct Outcome(f64);

impl Outcome {
    pub fn new(x: f64) -> Result<Self, DRVError> {
        if !x.is_finite() {
            return Err(DRVError::InvalidDistribution(format!("outcome {} is not finite", x)));
        }
        if x == 0.0 {
            Ok(Outcome(0.0))
        } else {
            Ok(Outcome(x))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outcome {}

impl PartialOrd for Outcome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Outcome {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Outcome {
    type Error = DRVError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Outcome::new(value)
    }
}

impl From<Outcome> for f64 {
    fn from(value: Outcome) -> Self {
        value.0
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
