use std::collections::BTreeMap;
use std::f64::consts::PI;

use itertools::iproduct;
use tracing::debug;

use crate::DRVError;
use crate::rand_var::bin_op::BinOp;
use crate::rand_var::outcome::Outcome;
use crate::rand_var::RandVar;

pub mod sampling;

/// How a [`DRV`] was produced. Parametric kinds keep their parameters so that
/// sampling can draw from the continuous distribution instead of the bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DRVKind {
    Explicit,
    Uniform {
        min: f64,
        max: f64,
        bins: usize,
    },
    Normal {
        mean: f64,
        stdev: f64,
        bins: usize,
    },
}

/// A discrete random variable with real outcomes, stored as an explicit probability mass table.
#[derive(Debug, Clone, PartialEq)]
pub struct DRV {
    kind: DRVKind,
    pdf_map: BTreeMap<Outcome, f64>,
}

/// Adds `p` to the mass already at `k`, inserting it if `k` is new.
pub fn accumulate(pdf_map: &mut BTreeMap<Outcome, f64>, k: Outcome, p: f64) {
    pdf_map.entry(k)
        .and_modify(|old_p| *old_p += p)
        .or_insert(p);
}

fn check_mass(k: f64, p: f64) -> Result<(), DRVError> {
    if !p.is_finite() {
        return Err(DRVError::InvalidDistribution(format!("mass at {} is not finite", k)));
    }
    if p < 0.0 {
        return Err(DRVError::InvalidDistribution(format!("mass at {} is negative: {}", k, p)));
    }
    Ok(())
}

fn gaussian_pdf(x: f64, mean: f64, stdev: f64) -> f64 {
    (-0.5 * ((x - mean) / stdev).powi(2)).exp() / (stdev * (2.0 * PI).sqrt())
}

impl DRV {
    fn explicit(pdf_map: BTreeMap<Outcome, f64>) -> Self {
        Self {
            kind: DRVKind::Explicit,
            pdf_map,
        }
    }

    /// Builds an explicit random variable from an owned mass table.
    pub fn from_map(m: BTreeMap<Outcome, f64>) -> Result<Self, DRVError> {
        for (k, p) in m.iter() {
            check_mass(k.value(), *p)?;
        }
        Ok(Self::explicit(m))
    }

    /// Builds an explicit random variable from `(outcome, mass)` pairs.
    /// Repeated outcomes have their masses summed.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, DRVError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut pdf_map = BTreeMap::new();
        for (k, p) in pairs {
            check_mass(k, p)?;
            accumulate(&mut pdf_map, Outcome::new(k)?, p);
        }
        Ok(Self::explicit(pdf_map))
    }

    pub fn new_constant(value: f64) -> Result<Self, DRVError> {
        Self::from_pairs([(value, 1.0)])
    }

    /// `bins` equally likely outcomes `min, min + step, ..., max - step` with `step = (max - min) / bins`.
    /// `max` itself is never an outcome.
    pub fn new_uniform(min: f64, max: f64, bins: usize) -> Result<Self, DRVError> {
        if bins == 0 {
            return Err(DRVError::InvalidParameters(String::from("bins must be positive")));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(DRVError::InvalidParameters(format!("range [{}, {}) must be finite", min, max)));
        }
        if max <= min {
            return Err(DRVError::InvalidParameters(format!("max ({}) must be greater than min ({})", max, min)));
        }
        let width = max - min;
        if !width.is_finite() {
            return Err(DRVError::InvalidParameters(format!("range [{}, {}) is too wide", min, max)));
        }
        let step = width / bins as f64;
        let p = 1.0 / bins as f64;
        let mut pdf_map = BTreeMap::new();
        for i in 0..bins {
            accumulate(&mut pdf_map, Outcome::new(min + i as f64 * step)?, p);
        }
        debug!(min, max, bins, "built uniform distribution");
        Ok(Self {
            kind: DRVKind::Uniform { min, max, bins },
            pdf_map,
        })
    }

    /// Discretizes a normal distribution onto `bins` evenly spaced points covering
    /// `[mean - 3 * stdev, mean + 3 * stdev]`. The tails beyond three standard
    /// deviations are dropped and the remaining mass is rescaled to one.
    pub fn new_normal(mean: f64, stdev: f64, bins: usize) -> Result<Self, DRVError> {
        if bins < 2 {
            return Err(DRVError::InvalidParameters(String::from("bins must be at least 2")));
        }
        if !mean.is_finite() || !stdev.is_finite() {
            return Err(DRVError::InvalidParameters(format!("mean ({}) and stdev ({}) must be finite", mean, stdev)));
        }
        if stdev <= 0.0 {
            return Err(DRVError::InvalidParameters(format!("stdev must be positive: {}", stdev)));
        }
        let half_width = 3.0 * stdev;
        let lb = mean - half_width;
        let ub = mean + half_width;
        if !lb.is_finite() || !ub.is_finite() {
            return Err(DRVError::InvalidParameters(format!("mean ({}) +/- 3 * stdev ({}) is not finite", mean, stdev)));
        }
        let spacing = (ub - lb) / (bins - 1) as f64;
        if !(spacing > 0.0) {
            return Err(DRVError::InvalidParameters(format!("stdev ({}) is too small to spread around mean ({})", stdev, mean)));
        }
        let points: Vec<f64> = (0..bins)
            .map(|i| if i == bins - 1 { ub } else { lb + i as f64 * spacing })
            .collect();
        let densities: Vec<f64> = points.iter().map(|x| gaussian_pdf(*x, mean, stdev)).collect();

        // densities / (total * spacing) has a Riemann sum of one; times spacing gives the mass
        let total: f64 = densities.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(DRVError::InvalidParameters(format!("stdev ({}) gives no usable density", stdev)));
        }
        let mut pdf_map = BTreeMap::new();
        for (x, d) in points.into_iter().zip(densities) {
            let p = d / total;
            check_mass(x, p)?;
            accumulate(&mut pdf_map, Outcome::new(x)?, p);
        }
        debug!(mean, stdev, bins, "built normal distribution");
        Ok(Self {
            kind: DRVKind::Normal { mean, stdev, bins },
            pdf_map,
        })
    }

    pub fn kind(&self) -> DRVKind {
        self.kind
    }

    /// Every pair of outcomes `(x, y)` from `self` and `other` contributes
    /// `p(x) * p(y)` to the outcome `op(x, y)`.
    ///
    /// Pairs where either side has zero mass are skipped before `op` is applied.
    /// The mass at an outcome reached by several pairs may differ in the last
    /// bits depending on the order the pairs are summed in.
    pub fn combine(&self, other: &DRV, op: BinOp) -> Result<DRV, DRVError> {
        let mut pdf_map = BTreeMap::new();
        for ((x, px), (y, py)) in iproduct!(self.pdf_map.iter(), other.pdf_map.iter()) {
            if *px == 0.0 || *py == 0.0 {
                continue;
            }
            let k = op.eval(x.value(), y.value())?;
            accumulate(&mut pdf_map, k, px * py);
        }
        debug!(%op, lhs = self.len(), rhs = other.len(), result = pdf_map.len(), "combined random variables");
        Ok(Self::explicit(pdf_map))
    }

    /// Every outcome `x` contributes its mass to `op(x, c)`.
    pub fn combine_scalar(&self, c: f64, op: BinOp) -> Result<DRV, DRVError> {
        if !c.is_finite() {
            return Err(DRVError::InvalidParameters(format!("scalar {} is not finite", c)));
        }
        let mut pdf_map = BTreeMap::new();
        for (x, px) in self.pdf_map.iter() {
            if *px == 0.0 {
                continue;
            }
            accumulate(&mut pdf_map, op.eval(x.value(), c)?, *px);
        }
        debug!(%op, c, lhs = self.len(), result = pdf_map.len(), "combined random variable with scalar");
        Ok(Self::explicit(pdf_map))
    }

    pub fn add_rv(&self, other: &DRV) -> Result<DRV, DRVError> {
        self.combine(other, BinOp::Add)
    }

    pub fn minus_rv(&self, other: &DRV) -> Result<DRV, DRVError> {
        self.combine(other, BinOp::Sub)
    }

    pub fn mul_rv(&self, other: &DRV) -> Result<DRV, DRVError> {
        self.combine(other, BinOp::Mul)
    }

    pub fn div_rv(&self, other: &DRV) -> Result<DRV, DRVError> {
        self.combine(other, BinOp::Div)
    }

    pub fn pow_rv(&self, other: &DRV) -> Result<DRV, DRVError> {
        self.combine(other, BinOp::Pow)
    }

    pub fn add_const(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::Add)
    }

    /// `X - c`
    pub fn minus_const(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::Sub)
    }

    /// `c - X`
    pub fn const_minus(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::SubReversed)
    }

    pub fn mul_const(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::Mul)
    }

    /// `X / c`
    pub fn div_const(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::Div)
    }

    /// `c / X`
    pub fn const_div(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::DivReversed)
    }

    /// `X ^ c`
    pub fn pow_const(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::Pow)
    }

    /// `c ^ X`
    pub fn const_pow(&self, c: f64) -> Result<DRV, DRVError> {
        self.combine_scalar(c, BinOp::PowReversed)
    }

    /// Left-folds `rvs` with `op`. An empty iterator yields `identity` as a constant.
    pub fn fold<'a, I>(rvs: I, op: BinOp, identity: f64) -> Result<DRV, DRVError>
    where
        I: IntoIterator<Item = &'a DRV>,
    {
        let mut iter = rvs.into_iter();
        let mut result = match iter.next() {
            Some(first) => first.clone(),
            None => return DRV::new_constant(identity),
        };
        for rv in iter {
            result = result.combine(rv, op)?;
        }
        Ok(result)
    }

    /// `A * B * C * ...`, associated to the left.
    pub fn product<'a, I>(rvs: I) -> Result<DRV, DRVError>
    where
        I: IntoIterator<Item = &'a DRV>,
    {
        DRV::fold(rvs, BinOp::Mul, 1.0)
    }

    /// `A + B + C + ...`, associated to the left.
    pub fn sum<'a, I>(rvs: I) -> Result<DRV, DRVError>
    where
        I: IntoIterator<Item = &'a DRV>,
    {
        DRV::fold(rvs, BinOp::Add, 0.0)
    }
}

impl RandVar for DRV {
    fn backing_map(&self) -> &BTreeMap<Outcome, f64> {
        &self.pdf_map
    }
}

impl From<DRV> for BTreeMap<Outcome, f64> {
    fn from(value: DRV) -> Self {
        value.pdf_map
    }
}
