use thiserror::Error;

pub mod rand_var;
pub mod drv;

pub use crate::drv::{DRV, DRVKind};
pub use crate::drv::sampling::create_rng;
pub use crate::rand_var::RandVar;
pub use crate::rand_var::bin_op::BinOp;
pub use crate::rand_var::outcome::Outcome;

/// Errors produced while building, combining or querying a [`DRV`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DRVError {
    /// A generator was called with parameters that describe no distribution.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// An explicit table holds a negative or non-finite mass, or a non-finite outcome.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    /// A zero divisor outcome carrying nonzero mass was met while combining.
    #[error("division by zero")]
    DivisionByZero,
    /// Applying the operator to a pair of outcomes left the finite reals.
    #[error("{lhs} {op} {rhs} is not a finite outcome")]
    NonFiniteOutcome {
        lhs: f64,
        rhs: f64,
        op: BinOp,
    },
    /// Statistics or samples were requested from a distribution with no mass.
    #[error("distribution has no outcomes")]
    EmptyDistribution,
}
