//! # Bound shifting
//!
//! Perturbing a single bound so that an infeasible entering value becomes feasible, with a
//! randomised margin so that the shifted bound is not degenerate. The cumulative shift per
//! bound is recorded so that `cleanup` can verify that everything was undone.
use log::debug;

/// Shift one bound outwards to admit `value`.
///
/// The bound moves past `value` by `(1 + random_value) * tolerance`, so that the admitted value
/// is strictly feasible afterwards.
///
/// # Arguments
///
/// * `lower`: Whether the bound being shifted is the lower one.
/// * `variable`: Only used for reporting.
/// * `value`: The value to admit; must be outside the bound by more than `tolerance`.
/// * `random_value`: Deterministic per-variable offset in `[0, 1)`.
/// * `tolerance`: The primal feasibility tolerance.
/// * `bound`: The bound to shift.
/// * `sum_shift`: Cumulative shift recorded for this bound.
pub(super) fn shift_bound(
    lower: bool,
    variable: usize,
    value: f64,
    random_value: f64,
    tolerance: f64,
    bound: &mut f64,
    sum_shift: &mut f64,
) {
    let feasibility = (1.0 + random_value) * tolerance;
    let old_bound = *bound;
    let infeasibility;
    let shift;
    let new_infeasibility;
    if lower {
        debug_assert!(value < *bound - tolerance);
        infeasibility = *bound - value;
        debug_assert!(infeasibility > 0.0);
        // Move the bound past the value so that the value is not degenerate.
        shift = infeasibility + feasibility;
        *bound -= shift;
        *sum_shift += shift;
        new_infeasibility = *bound - value;
        debug_assert!(new_infeasibility < 0.0);
    } else {
        debug_assert!(value > *bound + tolerance);
        infeasibility = value - *bound;
        debug_assert!(infeasibility > 0.0);
        shift = infeasibility + feasibility;
        *bound += shift;
        *sum_shift += shift;
        new_infeasibility = value - *bound;
        debug_assert!(new_infeasibility < 0.0);
    }
    let error = (-new_infeasibility - feasibility).abs();
    debug!(
        "value({}) = {} exceeds {} bound {} by {}, shifted by {} to {} with error {}",
        variable, value, if lower { "lower" } else { "upper" }, old_bound, infeasibility,
        shift, *bound, error,
    );
    debug_assert!(error < 1e-12);
}
