//! # Update engine
//!
//! Everything that changes between two iterations once the pivot (or bound swap) has been
//! decided. The order is load-bearing: primal values before the phase 1 dual refresh, dual
//! values before the Devex weights, and the factorization update last.
use log::{trace, warn};

use crate::algorithm::basis::factorization::{Factorization, UpdateSignal};
use crate::algorithm::primal::{price_into, PrimalSimplex};
use crate::algorithm::primal::bound_shift::shift_bound;
use crate::algorithm::SolveError;
use crate::data::linear_program::elements::{Phase, RebuildReason};

impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// Apply the effects of the decided iteration: primal values, duals, costs, weights, and
    /// finally the basis itself.
    pub(super) fn update(&mut self, variable_in: usize) -> Result<(), SolveError> {
        debug_assert!(self.rebuild_reason.is_none());

        let flipped = self.row_out.is_none();
        if flipped {
            self.variable_out = Some(variable_in);
            self.alpha_col = 0.0;
            self.numerical_trouble = 0.0;
            self.work_value[variable_in] = self.value_in;
            debug_assert_eq!(self.basis.nonbasic_move[variable_in], self.move_in);
            self.basis.nonbasic_move[variable_in] = -self.move_in;
        }

        // Hyper-sparse pricing starts collecting the dual changes made below.
        self.hyper_choose_column_start();

        if self.solve_phase == Phase::Phase1 {
            self.phase1_update_primal();
            self.basic_feasibility_change_update_dual();
            self.hyper_choose_column_basic_feasibility_change();
        } else {
            self.phase2_update_primal(variable_in);
        }
        debug_assert!(matches!(
            self.rebuild_reason,
            None | Some(RebuildReason::PrimalInfeasibleInPrimalSimplex),
        ));

        if flipped {
            self.primal_bound_swap += 1;
            self.num_flip_since_rebuild += 1;
            self.has_fresh_rebuild = false;
            trace!(
                "iteration {}: bound swap of variable {} to {}",
                self.iteration_count, variable_in, self.value_in,
            );
            return Ok(());
        }

        let row_out = self.row_out.ok_or_else(|| {
            SolveError::Logic("pivot row lost before the basis update".to_string())
        })?;

        // The entering value takes the leaving row's basic slot.
        self.base_value[row_out] = self.value_in;
        // The entering value may be infeasible; phase 1 prices it, phase 2 shifts the violated
        // bound or forces a rebuild.
        self.consider_infeasible_value_in(variable_in);

        let variable_out = self.variable_out.ok_or_else(|| {
            SolveError::Logic("leaving variable lost before the basis update".to_string())
        })?;
        self.theta_dual = self.work_dual[variable_in];
        self.update_dual(variable_in, variable_out);

        self.update_devex(variable_in, row_out);

        // An entering nonbasic free column leaves the free set.
        self.remove_nonbasic_free_column(variable_in);

        self.hyper_choose_column_dual_change(variable_out);

        // The pivot proper: symbolic basis change, then the factorization.
        self.update_pivots(variable_in, row_out);
        let signal = self.factor.update(&self.col_aq, row_out);
        self.update_count += 1;
        if signal == UpdateSignal::PreferRefactor {
            self.rebuild_reason = Some(RebuildReason::SyntheticClockSaysInvert);
        }
        if self.update_count >= self.options.update_limit {
            self.rebuild_reason = Some(RebuildReason::UpdateLimitReached);
        }

        self.iteration_count += 1;
        self.has_fresh_rebuild = false;

        if self.devex_wants_reset() {
            self.reset_devex();
        }

        trace!(
            "iteration {}: variable {} enters at row {}, variable {} leaves with step {}",
            self.iteration_count, variable_in, row_out, variable_out, self.theta_primal,
        );

        // Make the hyper-sparse pick for the next iteration from the changes just collected.
        self.hyper_choose_column();
        Ok(())
    }

    /// Update the basic primal values and the synthetic costs they imply, collecting the cost
    /// deltas for the dual refresh.
    ///
    /// The leaving row's value is deliberately not finalised here, so that the dual refresh
    /// sees the feasibility change of its old occupant.
    fn phase1_update_primal(&mut self) {
        let tolerance = self.options.primal_feasibility_tolerance;
        self.col_basic_feasibility_change.clear();

        for position in 0..self.col_aq.count {
            let row = self.col_aq.index[position];
            self.base_value[row] -= self.theta_primal * self.col_aq.array[row];
            let variable = self.basis.basic_index[row];
            let was_cost = self.work_cost[variable];
            let cost = if self.base_value[row] < self.base_lower[row] - tolerance {
                -1.0
            } else if self.base_value[row] > self.base_upper[row] + tolerance {
                1.0
            } else {
                0.0
            };
            self.work_cost[variable] = cost;
            if was_cost != 0.0 {
                if cost == 0.0 {
                    self.num_primal_infeasibilities -= 1;
                }
            } else if cost != 0.0 {
                self.num_primal_infeasibilities += 1;
            }
            let delta_cost = cost - was_cost;
            if delta_cost != 0.0 {
                self.col_basic_feasibility_change.insert(row, delta_cost);
                // Basic logicals see no component in the priced row, so feed the basic cost
                // change into their dual directly; the BTRAN result subtracts it back out.
                if variable >= self.num_col {
                    self.work_dual[variable] += delta_cost;
                }
            }
        }
    }

    /// Incremental refresh of the phase 1 reduced costs after the synthetic costs changed.
    fn basic_feasibility_change_update_dual(&mut self) {
        // BTRAN of the basic cost changes, then PRICE them across the nonbasic columns.
        self.factor.btran(&mut self.col_basic_feasibility_change);
        self.col_feasibility_change_density
            .observe(self.col_basic_feasibility_change.count, self.num_row);
        price_into(
            self.program,
            &self.basis.nonbasic_flag,
            &self.col_basic_feasibility_change,
            &mut self.row_basic_feasibility_change,
        );
        self.row_feasibility_change_density
            .observe(self.row_basic_feasibility_change.count, self.num_col);

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
            self.work_dual[variable] -= self.row_basic_feasibility_change.array[variable];
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
            self.work_dual[variable] -= self.col_basic_feasibility_change.array[row];
        }
    }

    /// Update the basic primal values; any value leaving its bounds forces a rebuild.
    fn phase2_update_primal(&mut self, variable_in: usize) {
        let tolerance = self.options.primal_feasibility_tolerance;
        let mut primal_infeasible = false;

        for position in 0..self.col_aq.count {
            let row = self.col_aq.index[position];
            self.base_value[row] -= self.theta_primal * self.col_aq.array[row];
            let value = self.base_value[row];
            let primal_infeasibility = if value < self.base_lower[row] - tolerance {
                self.base_lower[row] - value
            } else if value > self.base_upper[row] + tolerance {
                value - self.base_upper[row]
            } else {
                0.0
            };
            if primal_infeasibility > tolerance {
                self.num_primal_infeasibilities += 1;
                primal_infeasible = true;
            }
        }
        if primal_infeasible {
            self.rebuild_reason = Some(RebuildReason::PrimalInfeasibleInPrimalSimplex);
        }

        self.updated_primal_objective_value +=
            self.work_dual[variable_in] * self.theta_primal;
    }

    /// Handle an entering value that lies outside its own bounds.
    fn consider_infeasible_value_in(&mut self, variable_in: usize) {
        let tolerance = self.options.primal_feasibility_tolerance;
        let lower = self.work_lower[variable_in];
        let upper = self.work_upper[variable_in];
        let cost = if self.value_in < lower - tolerance {
            -1.0
        } else if self.value_in > upper + tolerance {
            1.0
        } else {
            0.0
        };
        if cost == 0.0 {
            return;
        }

        if self.solve_phase == Phase::Phase1 {
            self.num_primal_infeasibilities += 1;
            self.work_cost[variable_in] = cost;
            self.work_dual[variable_in] += cost;
        } else if self.allow_bound_perturbation {
            if cost > 0.0 {
                shift_bound(
                    false,
                    variable_in,
                    self.value_in,
                    self.random_value[variable_in],
                    tolerance,
                    &mut self.work_upper[variable_in],
                    &mut self.work_upper_shift[variable_in],
                );
            } else {
                shift_bound(
                    true,
                    variable_in,
                    self.value_in,
                    self.random_value[variable_in],
                    tolerance,
                    &mut self.work_lower[variable_in],
                    &mut self.work_lower_shift[variable_in],
                );
            }
            self.bounds_perturbed = true;
            self.num_bound_shift += 1;
        } else {
            self.num_primal_infeasibilities += 1;
            warn!(
                "entering variable {} has value {} outside [{}, {}]",
                variable_in, self.value_in, lower, upper,
            );
            self.rebuild_reason = Some(RebuildReason::PrimalInfeasibleInPrimalSimplex);
        }
    }

    /// Update the reduced costs for the pivot.
    fn update_dual(&mut self, variable_in: usize, variable_out: usize) {
        debug_assert!(self.alpha_col != 0.0);

        self.theta_dual = self.work_dual[variable_in] / self.alpha_col;
        for position in 0..self.row_ap.count {
            let column = self.row_ap.index[position];
            self.work_dual[column] -= self.theta_dual * self.row_ap.array[column];
        }
        for position in 0..self.row_ep.count {
            let row = self.row_ep.index[position];
            let column = self.num_col + row;
            self.work_dual[column] -= self.theta_dual * self.row_ep.array[row];
        }
        // The duals of the pivot pair.
        self.work_dual[variable_in] = 0.0;
        self.work_dual[variable_out] = -self.theta_dual;
    }

    /// Drop the entering variable from the nonbasic free column set if it was free.
    fn remove_nonbasic_free_column(&mut self, variable_in: usize) {
        if self.basis.nonbasic_move[variable_in] == 0 {
            let removed = self.nonbasic_free_col_set.remove(variable_in);
            if !removed {
                log::error!("failed to remove nonbasic free column {}", variable_in);
                debug_assert!(removed);
            }
        }
    }

    /// The symbolic basis change: flags, moves, the basic index, and the bounds of the
    /// pivotal row.
    fn update_pivots(&mut self, variable_in: usize, row_out: usize) {
        let variable_out = self.basis.basic_index[row_out];
        self.basis.basic_index[row_out] = variable_in;
        self.basis.nonbasic_flag[variable_in] = 0;
        self.basis.nonbasic_move[variable_in] = 0;

        self.basis.nonbasic_flag[variable_out] = 1;
        if self.work_lower[variable_out] == self.work_upper[variable_out] {
            self.work_value[variable_out] = self.work_lower[variable_out];
            self.basis.nonbasic_move[variable_out] = 0;
        } else if self.move_out == -1 {
            self.work_value[variable_out] = self.work_lower[variable_out];
            self.basis.nonbasic_move[variable_out] = 1;
        } else {
            self.work_value[variable_out] = self.work_upper[variable_out];
            self.basis.nonbasic_move[variable_out] = -1;
        }

        self.base_lower[row_out] = self.work_lower[variable_in];
        self.base_upper[row_out] = self.work_upper[variable_in];
    }
}
