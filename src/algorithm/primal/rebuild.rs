//! # Rebuild and cleanup
//!
//! Rebuild refactorises the basis when updates have accumulated and recomputes every derived
//! quantity, primal values, reduced costs and the objective, from scratch. It is also where the
//! two phases hand over to each other: finding primal infeasibilities in phase 2 drops back to
//! phase 1, running out of them in phase 1 moves on to phase 2.
//!
//! Cleanup runs when phase 2 has nothing left to do: it removes all bound shifts, forbids
//! further perturbation and recomputes the true feasibility state.
use itertools::izip;
use log::{debug, warn};

use crate::algorithm::basis::factorization::Factorization;
use crate::algorithm::primal::{price_into, PrimalSimplex};
use crate::algorithm::primal::bound_shift::shift_bound;
use crate::algorithm::SolveError;
use crate::data::linear_algebra::vector::Scattered;
use crate::data::linear_program::elements::Phase;

/// Running `num / max / sum` account of measured infeasibilities.
struct InfeasibilityAccount {
    tolerance: f64,
    num: usize,
    max: f64,
    sum: f64,
}

impl InfeasibilityAccount {
    fn new(tolerance: f64) -> Self {
        Self { tolerance, num: 0, max: 0.0, sum: 0.0 }
    }

    fn measure(&mut self, value: f64, lower: f64, upper: f64) {
        let infeasibility = (lower - value).max(value - upper);
        if infeasibility > 0.0 {
            if infeasibility > self.tolerance {
                self.num += 1;
            }
            self.max = self.max.max(infeasibility);
            self.sum += infeasibility;
        }
    }
}

impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// Refactorise if needed and recompute the working state from scratch, switching phase when
    /// the primal infeasibility count says so.
    pub(super) fn rebuild(&mut self) -> Result<(), SolveError> {
        // Whether the updated objective value can be corrected rather than reset.
        let check_updated_objective_value = self.has_primal_objective_value;
        let previous_primal_objective_value = self.updated_primal_objective_value;

        let reason_for_rebuild = self.rebuild_reason.take();

        if self.update_count > 0 {
            let rank_deficiency = self.factor.compute(self.program, &self.basis.basic_index);
            if rank_deficiency > 0 {
                log::error!("refactorisation found a singular basis matrix");
                self.solve_phase = Phase::Error;
                return Err(SolveError::Numeric(format!(
                    "refactorisation found a basis matrix with rank deficiency {}",
                    rank_deficiency,
                )));
            }
            self.update_count = 0;
        }

        self.compute_primal();
        if self.solve_phase == Phase::Phase2 {
            self.phase2_correct_primal();
        }
        self.basic_primal_infeasibility();
        if self.num_primal_infeasibilities > 0 {
            // Primal infeasibilities, so the solve should be in phase 1.
            if self.solve_phase == Phase::Phase2 {
                warn!("rebuild switching back to phase 1 from phase 2");
                self.solve_phase = Phase::Phase1;
            }
            self.phase1_compute_dual();
        } else {
            // No primal infeasibilities, so in phase 2. Reset the costs if the solve was in
            // phase 1 until now.
            if self.solve_phase == Phase::Phase1 {
                self.initialise_cost();
                self.solve_phase = Phase::Phase2;
            }
            self.compute_dual();
        }
        self.compute_dual_infeasibility();
        self.compute_primal_objective_value();
        if check_updated_objective_value {
            let correction = self.primal_objective_value - previous_primal_objective_value;
            self.updated_primal_objective_value += correction;
        }
        self.updated_primal_objective_value = self.primal_objective_value;

        debug!(
            "rebuild ({}): objective {:.12e}, {} primal and {} dual infeasibilities",
            reason_for_rebuild.map_or_else(|| "start".to_string(), |reason| reason.to_string()),
            self.primal_objective_value,
            self.num_primal_infeasibilities,
            self.num_dual_infeasibilities,
        );

        self.set_use_hyper_chuzc(self.solve_phase);
        self.hyper_choose_column_clear();

        self.num_flip_since_rebuild = 0;
        self.has_fresh_rebuild = true;
        debug_assert!(matches!(self.solve_phase, Phase::Phase1 | Phase::Phase2));
        Ok(())
    }

    /// Remove all bound shifts, forbid further perturbation and recompute the true state.
    pub(super) fn cleanup(&mut self) {
        debug!("primal-cleanup-shift");
        self.initialise_bound();
        self.initialise_nonbasic_work_value();
        self.allow_bound_perturbation = false;
        self.bounds_perturbed = false;

        self.compute_primal();
        self.compute_primal_infeasibility();
        self.compute_primal_objective_value();
        self.updated_primal_objective_value = self.primal_objective_value;
        self.compute_dual_infeasibility();

        debug!(
            "cleanup: objective {:.12e}, {} primal and {} dual infeasibilities",
            self.primal_objective_value,
            self.num_primal_infeasibilities,
            self.num_dual_infeasibilities,
        );
    }

    /// Recompute the basic values from scratch: solve `B x_B = -N x_N`, and refresh the basic
    /// bounds alongside.
    pub(super) fn compute_primal(&mut self) {
        let mut buffer = Scattered::setup(self.num_row);
        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 1 && self.work_value[variable] != 0.0 {
                let value = self.work_value[variable];
                let column = self.program.column(variable);
                column.for_each(|row, coefficient| buffer.add(row, -value * coefficient));
            }
        }
        self.factor.ftran(&mut buffer);

        for row in 0..self.num_row {
            let variable = self.basis.basic_index[row];
            self.base_value[row] = buffer.array[row];
            self.base_lower[row] = self.work_lower[variable];
            self.base_upper[row] = self.work_upper[variable];
        }
    }

    /// Recompute the phase 2 reduced costs from scratch: `d = c - A^T B^{-T} c_B` at nonbasic
    /// positions, zero at basic ones.
    pub(super) fn compute_dual(&mut self) {
        let mut buffer = Scattered::setup(self.num_row);
        for row in 0..self.num_row {
            let cost = self.work_cost[self.basis.basic_index[row]];
            if cost != 0.0 {
                buffer.insert(row, cost);
            }
        }
        self.factor.btran(&mut buffer);

        let mut priced = Scattered::setup(self.num_col);
        price_into(self.program, &self.basis.nonbasic_flag, &buffer, &mut priced);

        for column in 0..self.num_col {
            self.work_dual[column] = if self.basis.nonbasic_flag[column] == 1 {
                self.work_cost[column] - priced.array[column]
            } else {
                0.0
            };
        }
        for row in 0..self.num_row {
            let variable = self.num_col + row;
            self.work_dual[variable] = if self.basis.nonbasic_flag[variable] == 1 {
                self.work_cost[variable] - buffer.array[row]
            } else {
                0.0
            };
        }
    }

    /// Recompute the phase 1 reduced costs from the synthetic costs of the infeasible basic
    /// variables, through a full BTRAN and PRICE.
    pub(super) fn phase1_compute_dual(&mut self) {
        let tolerance = self.options.dual_feasibility_tolerance;
        self.work_cost.iter_mut().for_each(|cost| *cost = 0.0);

        let mut buffer = Scattered::setup(self.num_row);
        for row in 0..self.num_row {
            let cost = if self.base_value[row] < self.base_lower[row] - tolerance {
                -1.0
            } else if self.base_value[row] > self.base_upper[row] + tolerance {
                1.0
            } else {
                0.0
            };
            if cost != 0.0 {
                buffer.insert(row, cost);
            }
            self.work_cost[self.basis.basic_index[row]] = cost;
        }

        self.factor.btran(&mut buffer);

        let mut priced = Scattered::setup(self.num_col);
        price_into(self.program, &self.basis.nonbasic_flag, &buffer, &mut priced);

        for column in 0..self.num_col {
            self.work_dual[column] =
                -f64::from(self.basis.nonbasic_flag[column]) * priced.array[column];
        }
        for row in 0..self.num_row {
            let variable = self.num_col + row;
            self.work_dual[variable] =
                -f64::from(self.basis.nonbasic_flag[variable]) * buffer.array[row];
        }
    }

    /// Count the primal infeasibilities over every variable, basic and nonbasic.
    pub(super) fn compute_primal_infeasibility(&mut self) {
        let tolerance = self.options.primal_feasibility_tolerance;
        let mut account = InfeasibilityAccount::new(tolerance);

        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 0 {
                continue;
            }
            let value = self.work_value[variable];
            account.measure(value, self.work_lower[variable], self.work_upper[variable]);
        }
        for (&value, &lower, &upper) in
            izip!(&self.base_value, &self.base_lower, &self.base_upper)
        {
            account.measure(value, lower, upper);
        }

        self.num_primal_infeasibilities = account.num;
        self.max_primal_infeasibility = account.max;
        self.sum_primal_infeasibilities = account.sum;
    }

    /// Count the basic primal infeasibilities, cross-checking the count maintained by the
    /// updates.
    fn basic_primal_infeasibility(&mut self) {
        let tolerance = self.options.primal_feasibility_tolerance;
        let updated_num_primal_infeasibilities = self.num_primal_infeasibilities;
        let mut account = InfeasibilityAccount::new(tolerance);

        for (&value, &lower, &upper) in
            izip!(&self.base_value, &self.base_lower, &self.base_upper)
        {
            account.measure(value, lower, upper);
        }

        self.num_primal_infeasibilities = account.num;
        self.max_primal_infeasibility = account.max;
        self.sum_primal_infeasibilities = account.sum;

        if self.num_primal_infeasibilities != updated_num_primal_infeasibilities {
            warn!(
                "recomputed {} primal infeasibilities, but the updated count said {}",
                self.num_primal_infeasibilities, updated_num_primal_infeasibilities,
            );
        }
    }

    /// Inspect the basic values for infeasibilities at rebuild time; with the correction option
    /// on, absorb them by shifting the violated bounds.
    fn phase2_correct_primal(&mut self) {
        debug_assert_eq!(self.solve_phase, Phase::Phase2);
        let tolerance = self.options.primal_feasibility_tolerance;
        let mut num_infeasibility = 0;
        let mut max_infeasibility: f64 = 0.0;
        let mut sum_infeasibility = 0.0;

        for row in 0..self.num_row {
            let value = self.base_value[row];
            let (infeasibility, correction) = if value < self.base_lower[row] - tolerance {
                (self.base_lower[row] - value, -1)
            } else if value > self.base_upper[row] + tolerance {
                (value - self.base_upper[row], 1)
            } else {
                (0.0, 0)
            };
            if infeasibility > 0.0 {
                if infeasibility > tolerance {
                    num_infeasibility += 1;
                }
                max_infeasibility = max_infeasibility.max(infeasibility);
                sum_infeasibility += infeasibility;
            }
            if self.options.use_primal_correction && correction != 0 {
                let variable = self.basis.basic_index[row];
                self.bounds_perturbed = true;
                self.num_bound_shift += 1;
                if correction > 0 {
                    shift_bound(
                        false,
                        variable,
                        value,
                        self.random_value[variable],
                        tolerance,
                        &mut self.work_upper[variable],
                        &mut self.work_upper_shift[variable],
                    );
                    self.base_upper[row] = self.work_upper[variable];
                } else {
                    shift_bound(
                        true,
                        variable,
                        value,
                        self.random_value[variable],
                        tolerance,
                        &mut self.work_lower[variable],
                        &mut self.work_lower_shift[variable],
                    );
                    self.base_lower[row] = self.work_lower[variable];
                }
            }
        }
        if num_infeasibility > 0 {
            debug!(
                "correct primal: {} infeasibilities, max {}, sum {}",
                num_infeasibility, max_infeasibility, sum_infeasibility,
            );
        }
    }

    /// The objective value of the current solution under the working costs.
    pub(super) fn compute_primal_objective_value(&mut self) {
        let mut value = 0.0;
        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 1 {
                value += self.work_cost[variable] * self.work_value[variable];
            }
        }
        for row in 0..self.num_row {
            value += self.work_cost[self.basis.basic_index[row]] * self.base_value[row];
        }
        self.primal_objective_value = value;
        self.has_primal_objective_value = true;
    }

    /// Count the dual infeasibilities over the nonbasic variables.
    pub(super) fn compute_dual_infeasibility(&mut self) {
        let tolerance = self.options.dual_feasibility_tolerance;
        self.num_dual_infeasibilities = 0;
        self.sum_dual_infeasibilities = 0.0;

        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 0 {
                continue;
            }
            let free = self.work_lower[variable] == f64::NEG_INFINITY
                && self.work_upper[variable] == f64::INFINITY;
            let infeasibility = if free {
                self.work_dual[variable].abs()
            } else {
                -f64::from(self.basis.nonbasic_move[variable]) * self.work_dual[variable]
            };
            if infeasibility > 0.0 {
                if infeasibility > tolerance {
                    self.num_dual_infeasibilities += 1;
                }
                self.sum_dual_infeasibilities += infeasibility;
            }
        }
    }
}
