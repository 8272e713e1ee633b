//! # Pricing
//!
//! Selection of the entering variable: the nonbasic variable maximising the ratio of its dual
//! infeasibility to its Devex weight.
//!
//! Two modes are used. Full pricing scans every nonbasic variable. Hyper-sparse pricing keeps a
//! bounded heap of the best candidates from the last full scan and, between iterations, only
//! inspects the variables whose duals actually changed. The incremental pick is accepted when
//! it provably beats every variable outside the heap; otherwise the heap is rebuilt by a full
//! scan.
use crate::algorithm::basis::factorization::Factorization;
use crate::algorithm::primal::PrimalSimplex;
use crate::data::heap::DecreasingHeap;
use crate::data::linear_program::elements::Phase;

/// Number of candidates kept by the hyper-sparse pricing heap.
const MAX_NUM_HYPER_CHUZC_CANDIDATES: usize = 10;

/// State of the hyper-sparse candidate list.
#[derive(Debug)]
pub(super) struct HyperPricing {
    /// The best candidates of the last full scan, by decreasing measure.
    pub heap: DecreasingHeap,
    /// Whether hyper-sparse pricing is active; disabled in phase 1.
    pub use_hyper_chuzc: bool,
    /// Whether the heap must be rebuilt by a full scan before it can be used.
    pub initialise: bool,
    /// Whether the pick for the next iteration has already been made.
    pub done_next_chuzc: bool,
    /// Upper bound on the measure of every variable outside the heap.
    pub max_non_candidate_measure: f64,
    /// Best measure seen among the variables whose duals changed since the last pick.
    pub max_changed_measure_value: f64,
    /// The variable holding `max_changed_measure_value`.
    pub max_changed_measure_column: Option<usize>,
}

impl HyperPricing {
    pub fn new() -> Self {
        Self {
            heap: DecreasingHeap::new(MAX_NUM_HYPER_CHUZC_CANDIDATES),
            use_hyper_chuzc: false,
            initialise: false,
            done_next_chuzc: false,
            max_non_candidate_measure: -1.0,
            max_changed_measure_value: 0.0,
            max_changed_measure_column: None,
        }
    }
}

impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// CHUZC: select the entering variable into `self.variable_in`.
    pub(super) fn chuzc(&mut self) {
        if self.hyper.done_next_chuzc {
            debug_assert!(self.hyper.use_hyper_chuzc);
        }
        if self.hyper.use_hyper_chuzc {
            if !self.hyper.done_next_chuzc {
                self.choose_column(true);
            }
            if cfg!(debug_assertions) {
                // Check the hyper-sparse result against a full scan.
                let hyper_sparse_variable_in = self.variable_in;
                self.choose_column(false);
                let hyper_sparse_measure = hyper_sparse_variable_in.map_or(0.0, |variable| {
                    self.work_dual[variable].abs() / self.devex.weight[variable]
                });
                let measure = self.variable_in.map_or(0.0, |variable| {
                    self.work_dual[variable].abs() / self.devex.weight[variable]
                });
                debug_assert_eq!(
                    hyper_sparse_measure, measure,
                    "hyper-sparse CHUZC measure differs from full CHUZC measure \
                     ({:?} versus {:?})",
                    hyper_sparse_variable_in, self.variable_in,
                );
                self.variable_in = hyper_sparse_variable_in;
            }
        } else {
            self.choose_column(false);
        }
    }

    /// Select the entering variable, either from the candidate heap or by a full scan.
    fn choose_column(&mut self, hyper_sparse: bool) {
        debug_assert!(!hyper_sparse || !self.hyper.done_next_chuzc);
        let dual_feasibility_tolerance = self.options.dual_feasibility_tolerance;
        self.variable_in = None;
        let mut best_measure = 0.0;

        if hyper_sparse {
            if !self.hyper.initialise {
                self.hyper_choose_column();
            }
            if self.hyper.initialise {
                // Rebuild the heap by a full scan, free columns first.
                self.hyper.heap.clear();
                for &variable in self.nonbasic_free_col_set.entries() {
                    let dual_infeasibility = self.work_dual[variable].abs();
                    if dual_infeasibility > dual_feasibility_tolerance {
                        let measure = dual_infeasibility / self.devex.weight[variable];
                        self.hyper.heap.push(measure, variable);
                    }
                }
                for variable in 0..self.num_tot {
                    let dual_infeasibility =
                        -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
                    if dual_infeasibility > dual_feasibility_tolerance {
                        let measure = dual_infeasibility / self.devex.weight[variable];
                        self.hyper.heap.push(measure, variable);
                    }
                }
                self.hyper.heap.sort_decreasing();
                self.hyper.initialise = false;

                if !self.hyper.heap.is_empty() {
                    let (_, variable) = self.hyper.heap.entry(1);
                    self.variable_in = Some(variable);
                    self.hyper.max_non_candidate_measure =
                        self.hyper.heap.entry(self.hyper.heap.len()).0;
                }
            }
        } else {
            // Full scan: any attractive nonbasic free column first.
            for &variable in self.nonbasic_free_col_set.entries() {
                let dual_infeasibility = self.work_dual[variable].abs();
                if dual_infeasibility > dual_feasibility_tolerance
                    && dual_infeasibility > best_measure * self.devex.weight[variable]
                {
                    self.variable_in = Some(variable);
                    best_measure = dual_infeasibility / self.devex.weight[variable];
                }
            }
            for variable in 0..self.num_tot {
                let dual_infeasibility =
                    -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
                if dual_infeasibility > dual_feasibility_tolerance
                    && dual_infeasibility > best_measure * self.devex.weight[variable]
                {
                    self.variable_in = Some(variable);
                    best_measure = dual_infeasibility / self.devex.weight[variable];
                }
            }
        }
    }

    /// The incremental hyper-sparse pick: compare the best changed measure and the surviving
    /// heap candidates against the bound on everything else.
    pub(super) fn hyper_choose_column(&mut self) {
        if !self.hyper.use_hyper_chuzc || self.hyper.initialise {
            return;
        }
        let dual_feasibility_tolerance = self.options.dual_feasibility_tolerance;
        let mut best_measure = self.hyper.max_changed_measure_value;
        self.variable_in = self.hyper.max_changed_measure_column;
        let consider_nonbasic_free_column = self.nonbasic_free_col_set.count() > 0;

        for slot in 1..=self.hyper.heap.len() {
            let (_, variable) = self.hyper.heap.entry(slot);
            if self.basis.nonbasic_flag[variable] == 0 {
                debug_assert_eq!(self.basis.nonbasic_move[variable], 0);
                continue;
            }
            let mut dual_infeasibility =
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
            if consider_nonbasic_free_column && self.nonbasic_free_col_set.contains(variable) {
                dual_infeasibility = self.work_dual[variable].abs();
            }
            if dual_infeasibility > dual_feasibility_tolerance
                && dual_infeasibility > best_measure * self.devex.weight[variable]
            {
                best_measure = dual_infeasibility / self.devex.weight[variable];
                self.variable_in = Some(variable);
            }
        }

        if self.variable_in != self.hyper.max_changed_measure_column {
            self.hyper.max_non_candidate_measure = self
                .hyper
                .max_changed_measure_value
                .max(self.hyper.max_non_candidate_measure);
        }
        if best_measure >= self.hyper.max_non_candidate_measure {
            // The pick is at least as good as any variable outside the heap, so accept it.
            self.hyper.done_next_chuzc = true;
        } else {
            // A variable outside the heap may be better: rebuild by a full scan.
            debug_assert!(!self.hyper.done_next_chuzc);
            self.hyper.done_next_chuzc = false;
            self.hyper.initialise = true;
        }
    }

    /// Start collecting changed measures for the pick after the coming update.
    pub(super) fn hyper_choose_column_start(&mut self) {
        self.hyper.max_changed_measure_value = 0.0;
        self.hyper.max_changed_measure_column = None;
        self.hyper.done_next_chuzc = false;
    }

    /// Invalidate the candidate list; the next hyper-sparse pick starts with a full scan.
    pub(super) fn hyper_choose_column_clear(&mut self) {
        self.hyper.initialise = self.hyper.use_hyper_chuzc;
        self.hyper.max_non_candidate_measure = -1.0;
        self.hyper.done_next_chuzc = false;
    }

    /// Fold the changed dual infeasibility of one variable into the incremental pick.
    fn hyper_choose_column_changed_infeasibility(&mut self, infeasibility: f64, variable: usize) {
        if infeasibility > self.hyper.max_changed_measure_value * self.devex.weight[variable] {
            self.hyper.max_non_candidate_measure = self
                .hyper
                .max_changed_measure_value
                .max(self.hyper.max_non_candidate_measure);
            self.hyper.max_changed_measure_value = infeasibility / self.devex.weight[variable];
            self.hyper.max_changed_measure_column = Some(variable);
        } else if infeasibility
            > self.hyper.max_non_candidate_measure * self.devex.weight[variable]
        {
            self.hyper.max_non_candidate_measure = infeasibility / self.devex.weight[variable];
        }
    }

    /// Inspect the duals changed by a phase 1 feasibility change.
    pub(super) fn hyper_choose_column_basic_feasibility_change(&mut self) {
        if !self.hyper.use_hyper_chuzc {
            return;
        }
        let tolerance = self.options.dual_feasibility_tolerance;

        let use_row_indices = self.row_feasibility_change_density.use_indices(
            self.row_basic_feasibility_change.count,
            self.num_col,
        );
        let row_entries = if use_row_indices {
            self.row_basic_feasibility_change.count
        } else {
            self.num_col
        };
        for entry in 0..row_entries {
            let variable = if use_row_indices {
                self.row_basic_feasibility_change.index[entry]
            } else {
                entry
            };
            let dual_infeasibility =
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
            if dual_infeasibility > tolerance {
                self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
            }
        }

        let use_col_indices = self.col_feasibility_change_density.use_indices(
            self.col_basic_feasibility_change.count,
            self.num_row,
        );
        let col_entries = if use_col_indices {
            self.col_basic_feasibility_change.count
        } else {
            self.num_row
        };
        for entry in 0..col_entries {
            let row = if use_col_indices {
                self.col_basic_feasibility_change.index[entry]
            } else {
                entry
            };
            let variable = self.num_col + row;
            let dual_infeasibility =
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
            if dual_infeasibility > tolerance {
                self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
            }
        }

        // Free columns are handled by the dual-change inspection when pivoting, so only look
        // at them here when flipping.
        if self.row_out.is_none() && self.nonbasic_free_col_set.count() > 0 {
            for position in 0..self.nonbasic_free_col_set.count() {
                let variable = self.nonbasic_free_col_set.entries()[position];
                let dual_infeasibility = self.work_dual[variable].abs();
                if dual_infeasibility > tolerance {
                    self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
                }
            }
        }
    }

    /// Inspect the duals changed by the pivotal row, plus the free columns and the leaving
    /// variable.
    pub(super) fn hyper_choose_column_dual_change(&mut self, variable_out: usize) {
        if !self.hyper.use_hyper_chuzc {
            return;
        }
        let tolerance = self.options.dual_feasibility_tolerance;

        let use_row_indices = self.row_ap_density.use_indices(self.row_ap.count, self.num_col);
        let row_entries = if use_row_indices { self.row_ap.count } else { self.num_col };
        for entry in 0..row_entries {
            let variable = if use_row_indices { self.row_ap.index[entry] } else { entry };
            let dual_infeasibility =
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
            if dual_infeasibility > tolerance {
                self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
            }
        }

        let use_col_indices = self.row_ep_density.use_indices(self.row_ep.count, self.num_row);
        let col_entries = if use_col_indices { self.row_ep.count } else { self.num_row };
        for entry in 0..col_entries {
            let row = if use_col_indices { self.row_ep.index[entry] } else { entry };
            let variable = self.num_col + row;
            let dual_infeasibility =
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable];
            if dual_infeasibility > tolerance {
                self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
            }
        }

        for position in 0..self.nonbasic_free_col_set.count() {
            let variable = self.nonbasic_free_col_set.entries()[position];
            let dual_infeasibility = self.work_dual[variable].abs();
            if dual_infeasibility > tolerance {
                self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable);
            }
        }

        // The leaving variable should be dual feasible after the update.
        let dual_infeasibility =
            -f64::from(self.basis.nonbasic_move[variable_out]) * self.work_dual[variable_out];
        if dual_infeasibility > tolerance {
            log::warn!(
                "dual infeasibility {} for the leaving variable {}",
                dual_infeasibility, variable_out,
            );
            self.hyper_choose_column_changed_infeasibility(dual_infeasibility, variable_out);
        }
    }

    /// Whether hyper-sparse pricing is used in the current phase.
    pub(super) fn set_use_hyper_chuzc(&mut self, phase: Phase) {
        self.hyper.use_hyper_chuzc = phase == Phase::Phase2;
    }
}
