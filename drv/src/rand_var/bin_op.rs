use std::fmt::{Display, Formatter};

use num::{Float, Zero};

use crate::DRVError;
use crate::rand_var::outcome::Outcome;

/// The binary operators two random variables (or a random variable and a scalar) can be combined with.
///
/// `lhs` is always the outcome of the random variable being combined from; the
/// `*Reversed` variants put the other operand on the left, so `SubReversed`
/// applied to `(x, c)` computes `c - x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    SubReversed,
    Mul,
    Div,
    DivReversed,
    Pow,
    PowReversed,
}

impl BinOp {
    pub fn apply<F: Float>(self, lhs: F, rhs: F) -> F {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::SubReversed => rhs - lhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::DivReversed => rhs / lhs,
            BinOp::Pow => lhs.powf(rhs),
            BinOp::PowReversed => rhs.powf(lhs),
        }
    }

    /// The operand that ends up in the denominator, if this is a division.
    pub fn divisor<F: Float>(self, lhs: F, rhs: F) -> Option<F> {
        match self {
            BinOp::Div => Some(rhs),
            BinOp::DivReversed => Some(lhs),
            _ => None,
        }
    }

    /// Applies the operator and checks that the result is a valid outcome.
    pub fn eval(self, lhs: f64, rhs: f64) -> Result<Outcome, DRVError> {
        if let Some(d) = self.divisor(lhs, rhs) {
            if d.is_zero() {
                return Err(DRVError::DivisionByZero);
            }
        }
        let value = self.apply(lhs, rhs);
        if !value.is_finite() {
            return Err(DRVError::NonFiniteOutcome { lhs, rhs, op: self });
        }
        Outcome::new(value)
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::SubReversed => "-r",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::DivReversed => "/r",
            BinOp::Pow => "^",
            BinOp::PowReversed => "^r",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
