//! # Building blocks to describe a simplex solve
//!
//! Phases, termination statuses and the reasons for breaking the inner iteration loop.
use std::fmt;

/// The status a solve assigns to the model when it terminates regularly.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModelStatus {
    Optimal,
    PrimalInfeasible,
    PrimalUnbounded,
    /// Primal unbounded on a model previously determined primal infeasible.
    PrimalDualInfeasible,
    DualInfeasible,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::Optimal => "optimal",
            Self::PrimalInfeasible => "primal infeasible",
            Self::PrimalUnbounded => "primal unbounded",
            Self::PrimalDualInfeasible => "primal and dual infeasible",
            Self::DualInfeasible => "dual infeasible",
        };
        f.write_str(text)
    }
}

/// Where the two-phase state machine currently is.
///
/// `Phase1` and `Phase2` are the working states; the others are terminal for the major solving
/// loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Minimising the sum of primal infeasibilities under synthetic costs.
    Phase1,
    /// Minimising the true objective from a primal feasible basis.
    Phase2,
    /// The phase needs to be redetermined from the primal infeasibility count.
    Unknown,
    /// Terminal: an optimal basis was verified.
    Optimal,
    /// Terminal: the model status has been set.
    Exit,
    /// Terminal: dual feasible with primal infeasibilities after removing bound shifts; the
    /// caller should continue with the dual simplex method.
    Cleanup,
    /// Terminal: an unrecoverable numerical or logical failure.
    Error,
}

/// Why the inner iteration loop is broken off for a rebuild.
///
/// These are not errors: all of them are handled by looping back to `rebuild`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RebuildReason {
    /// Pricing found no attractive candidate.
    PossiblyOptimal,
    /// The ratio test found no blocking row and no bound flip was available.
    PossiblyPrimalUnbounded,
    /// The pivot cross-check between column and row values disagreed.
    PossiblySingularBasis,
    /// A basic value left its bounds in phase 2.
    PrimalInfeasibleInPrimalSimplex,
    /// The factorization accumulated the maximum number of updates.
    UpdateLimitReached,
    /// The factorization reports that refactorising is now cheaper than updating.
    SyntheticClockSaysInvert,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::PossiblyOptimal => "possibly optimal",
            Self::PossiblyPrimalUnbounded => "possibly primal unbounded",
            Self::PossiblySingularBasis => "possibly singular basis",
            Self::PrimalInfeasibleInPrimalSimplex => "primal infeasible in primal simplex",
            Self::UpdateLimitReached => "update limit reached",
            Self::SyntheticClockSaysInvert => "synthetic clock says invert",
        };
        f.write_str(text)
    }
}
