//! # Solver options
//!
//! Tolerances and limits, owned by the engine for the duration of a solve.
use std::time::Duration;

/// Configuration of a primal simplex solve.
#[derive(Clone, Debug)]
pub struct Options {
    /// A basic value may exceed its bound by this much before it counts as infeasible.
    pub primal_feasibility_tolerance: f64,
    /// A reduced cost must exceed this for its column to be an entering candidate.
    pub dual_feasibility_tolerance: f64,
    /// Number of factorization updates after which a rebuild is forced.
    pub update_limit: usize,
    /// Whether an infeasible entering value may be absorbed by shifting the violated bound.
    pub allow_bound_perturbation: bool,
    /// Whether the rebuild-time primal correction may shift bounds of infeasible basic values.
    /// When `false` the check is diagnostic only.
    pub use_primal_correction: bool,
    /// Give up with a warning after this many simplex iterations.
    pub iteration_limit: Option<u64>,
    /// Give up with a warning after this much wall time.
    pub time_limit: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            primal_feasibility_tolerance: 1e-7,
            dual_feasibility_tolerance: 1e-7,
            update_limit: 5000,
            allow_bound_perturbation: true,
            use_primal_correction: false,
            iteration_limit: None,
            time_limit: None,
        }
    }
}
