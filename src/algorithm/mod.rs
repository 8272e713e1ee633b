//! # Algorithms
//!
//! The simplex algorithm and the basis representation it pivots on.
use std::error::Error;
use std::fmt;

use crate::data::linear_program::elements::ModelStatus;

pub mod basis;
pub mod primal;

/// How a solve ended when it did not fail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolveOutcome {
    /// A terminal model status was determined.
    Finished(ModelStatus),
    /// Dual feasible with residual primal infeasibilities after removing bound shifts; the
    /// caller should clean up with the dual simplex method.
    Cleanup,
    /// The iteration limit was reached; the basis is consistent and the solve can be resumed.
    IterationLimit,
    /// The time limit was reached; the basis is consistent and the solve can be resumed.
    TimeLimit,
}

/// An unrecoverable failure of a solve.
#[derive(Debug)]
pub enum SolveError {
    /// The engine was invoked on data it cannot start from.
    Input(String),
    /// A numerical invariant was violated beyond repair: a singular basis after refactorising,
    /// or a pivot cross-check error past the hard threshold.
    Numeric(String),
    /// An internal invariant did not hold.
    Logic(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(description) => write!(f, "InputError: {}", description),
            Self::Numeric(description) => write!(f, "NumericError: {}", description),
            Self::Logic(description) => write!(f, "LogicError: {}", description),
        }
    }
}

impl Error for SolveError {
}
