//! # The primal simplex method
//!
//! A two-phase revised primal simplex iteration engine. Given a linear program and a basic
//! starting point, it drives the basis through a sequence of pivots until the program is
//! recognised as optimal, primal infeasible or primal unbounded, a limit is reached, or a
//! numerical failure forces it to give up.
//!
//! Phase 1 minimises the sum of primal infeasibilities under synthetic unit costs; phase 2
//! minimises the true objective. The engine moves between the phases through `rebuild`, which
//! refactorises the basis and recomputes all derived quantities from scratch.
use std::time::Instant;

use log::{debug, error};
use noisy_float::types::R64;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::algorithm::basis::{Basis, factorization::{Factorization, LuFactor}};
use crate::algorithm::{SolveError, SolveOutcome};
use crate::data::index_set::IndexSet;
use crate::data::linear_algebra::vector::{DensityTracker, DROP_TOLERANCE, Scattered};
use crate::data::linear_program::elements::{ModelStatus, Phase, RebuildReason};
use crate::data::linear_program::LinearProgram;
use crate::data::linear_program::options::Options;

mod bound_shift;
mod devex;
mod pricing;
mod rebuild;
mod update;

use devex::Devex;
use pricing::HyperPricing;

/// Seed of the per-variable random tie-break offsets used when shifting bounds.
const RANDOM_VALUE_SEED: u64 = 0x5370_1091;

/// The primal simplex iteration engine.
///
/// Owns the basis, its factorization and all working arrays for the duration of a solve; the
/// linear program itself is only read.
pub struct PrimalSimplex<'a, F = LuFactor> {
    program: &'a LinearProgram,
    options: Options,

    num_col: usize,
    num_row: usize,
    num_tot: usize,

    basis: Basis,
    factor: F,

    // Working bounds, values, costs and reduced costs per variable.
    work_lower: Vec<f64>,
    work_upper: Vec<f64>,
    work_lower_shift: Vec<f64>,
    work_upper_shift: Vec<f64>,
    work_value: Vec<f64>,
    work_cost: Vec<f64>,
    work_dual: Vec<f64>,
    // Bounds and values of the basic variables, by row.
    base_lower: Vec<f64>,
    base_upper: Vec<f64>,
    base_value: Vec<f64>,
    // Tie-break offsets for bound shifting, fixed per variable.
    random_value: Vec<f64>,

    num_primal_infeasibilities: usize,
    max_primal_infeasibility: f64,
    sum_primal_infeasibilities: f64,
    num_dual_infeasibilities: usize,
    sum_dual_infeasibilities: f64,

    iteration_count: u64,
    update_count: usize,
    primal_bound_swap: u64,
    num_flip_since_rebuild: u64,
    num_bound_shift: u64,

    primal_objective_value: f64,
    updated_primal_objective_value: f64,
    has_primal_objective_value: bool,

    allow_bound_perturbation: bool,
    bounds_perturbed: bool,
    has_fresh_rebuild: bool,

    solve_phase: Phase,
    rebuild_reason: Option<RebuildReason>,
    model_status: Option<ModelStatus>,
    bailout: Option<SolveOutcome>,
    started_at: Instant,

    // Iteration scratch vectors.
    col_aq: Scattered,
    row_ep: Scattered,
    row_ap: Scattered,
    col_basic_feasibility_change: Scattered,
    row_basic_feasibility_change: Scattered,
    ph1_sorter_relaxed: Vec<(R64, isize)>,
    ph1_sorter_tight: Vec<(R64, isize)>,

    col_aq_density: DensityTracker,
    row_ep_density: DensityTracker,
    row_ap_density: DensityTracker,
    col_feasibility_change_density: DensityTracker,
    row_feasibility_change_density: DensityTracker,

    // Pivot of the current iteration.
    variable_in: Option<usize>,
    variable_out: Option<usize>,
    row_out: Option<usize>,
    move_in: i8,
    move_out: i8,
    theta_dual: f64,
    theta_primal: f64,
    alpha_col: f64,
    alpha_row: f64,
    value_in: f64,
    numerical_trouble: f64,

    devex: Devex,
    num_free_col: usize,
    nonbasic_free_col_set: IndexSet,
    hyper: HyperPricing,
}

impl<'a> PrimalSimplex<'a, LuFactor> {
    /// Start from the slack basis.
    pub fn new(program: &'a LinearProgram, options: Options) -> Result<Self, SolveError> {
        let basis = Basis::slack(program);
        Self::with_basis(program, options, basis)
    }

    /// Start from a given basis, whose matrix is factorized immediately.
    ///
    /// # Errors
    ///
    /// An `Input` error when the basis does not match the program dimensions or its matrix is
    /// singular.
    pub fn with_basis(
        program: &'a LinearProgram,
        options: Options,
        basis: Basis,
    ) -> Result<Self, SolveError> {
        let factor = LuFactor::new(program.nr_rows());
        Self::with_basis_and_factor(program, options, basis, factor)
    }
}

impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// Start from a given basis and factorization implementation.
    pub fn with_basis_and_factor(
        program: &'a LinearProgram,
        options: Options,
        basis: Basis,
        factor: F,
    ) -> Result<Self, SolveError> {
        let num_col = program.nr_columns();
        let num_row = program.nr_rows();
        let num_tot = num_col + num_row;

        if basis.nr_variables() != num_tot || basis.basic_index.len() != num_row {
            return Err(SolveError::Input(format!(
                "basis over {} variables and {} rows does not match a program with {} variables \
                 and {} rows",
                basis.nr_variables(), basis.basic_index.len(), num_tot, num_row,
            )));
        }

        let mut random = SmallRng::seed_from_u64(RANDOM_VALUE_SEED);
        let random_value = (0..num_tot).map(|_| random.gen::<f64>()).collect();

        let allow_bound_perturbation = options.allow_bound_perturbation;
        let mut engine = Self {
            program,
            options,

            num_col,
            num_row,
            num_tot,

            basis,
            factor,

            work_lower: vec![0.0; num_tot],
            work_upper: vec![0.0; num_tot],
            work_lower_shift: vec![0.0; num_tot],
            work_upper_shift: vec![0.0; num_tot],
            work_value: vec![0.0; num_tot],
            work_cost: vec![0.0; num_tot],
            work_dual: vec![0.0; num_tot],
            base_lower: vec![0.0; num_row],
            base_upper: vec![0.0; num_row],
            base_value: vec![0.0; num_row],
            random_value,

            num_primal_infeasibilities: 0,
            max_primal_infeasibility: 0.0,
            sum_primal_infeasibilities: 0.0,
            num_dual_infeasibilities: 0,
            sum_dual_infeasibilities: 0.0,

            iteration_count: 0,
            update_count: 0,
            primal_bound_swap: 0,
            num_flip_since_rebuild: 0,
            num_bound_shift: 0,

            primal_objective_value: 0.0,
            updated_primal_objective_value: 0.0,
            has_primal_objective_value: false,

            allow_bound_perturbation,
            bounds_perturbed: false,
            has_fresh_rebuild: false,

            solve_phase: Phase::Unknown,
            rebuild_reason: None,
            model_status: None,
            bailout: None,
            started_at: Instant::now(),

            col_aq: Scattered::setup(num_row),
            row_ep: Scattered::setup(num_row),
            row_ap: Scattered::setup(num_col),
            col_basic_feasibility_change: Scattered::setup(num_row),
            row_basic_feasibility_change: Scattered::setup(num_col),
            ph1_sorter_relaxed: Vec::with_capacity(num_row),
            ph1_sorter_tight: Vec::with_capacity(num_row),

            col_aq_density: DensityTracker::new(),
            row_ep_density: DensityTracker::new(),
            row_ap_density: DensityTracker::new(),
            col_feasibility_change_density: DensityTracker::new(),
            row_feasibility_change_density: DensityTracker::new(),

            variable_in: None,
            variable_out: None,
            row_out: None,
            move_in: 0,
            move_out: 0,
            theta_dual: 0.0,
            theta_primal: 0.0,
            alpha_col: 0.0,
            alpha_row: 0.0,
            value_in: 0.0,
            numerical_trouble: 0.0,

            devex: Devex::new(num_tot),
            num_free_col: 0,
            nonbasic_free_col_set: IndexSet::setup(0, num_tot),
            hyper: HyperPricing::new(),
        };

        engine.initialise_bound();
        engine.initialise_cost();
        engine.initialise_value_and_nonbasic_move();
        engine.reset_devex();

        engine.num_free_col = (0..num_tot)
            .filter(|&variable| {
                engine.work_lower[variable] == f64::NEG_INFINITY
                    && engine.work_upper[variable] == f64::INFINITY
            })
            .count();
        if engine.num_free_col > 0 {
            debug!("program has {} free columns", engine.num_free_col);
            engine.nonbasic_free_col_set = IndexSet::setup(engine.num_free_col, num_tot);
        }

        let rank_deficiency = engine.factor.compute(program, &engine.basis.basic_index);
        if rank_deficiency > 0 {
            return Err(SolveError::Input(format!(
                "initial basis matrix is singular with rank deficiency {}",
                rank_deficiency,
            )));
        }

        Ok(engine)
    }

    /// Drive the basis to a terminal state.
    ///
    /// # Return value
    ///
    /// A terminal model status, a cleanup hand-off, or a limit warning. In the limit case the
    /// working state is consistent and `solve` may be called again to resume.
    ///
    /// # Errors
    ///
    /// A `Numeric` error when the basis matrix turns singular beyond repair or a pivot
    /// cross-check fails its hard threshold; a `Logic` error when an internal invariant breaks.
    pub fn solve(&mut self) -> Result<SolveOutcome, SolveError> {
        self.started_at = Instant::now();
        self.bailout = None;
        self.model_status = None;
        self.has_primal_objective_value = false;
        if self.bailout_on_limits() {
            return Ok(self.bailout.unwrap_or(SolveOutcome::IterationLimit));
        }

        self.get_nonbasic_free_column_set();

        // Entry: compute the primal values from scratch and choose the phase.
        self.compute_primal();
        self.compute_primal_infeasibility();
        self.solve_phase = if self.num_primal_infeasibilities > 0 {
            Phase::Phase1
        } else {
            Phase::Phase2
        };

        loop {
            self.has_primal_objective_value = false;
            if self.solve_phase == Phase::Unknown {
                // Reset the bounds so that the true infeasibility count determines the phase.
                self.initialise_bound();
                self.initialise_nonbasic_work_value();
                self.compute_primal();
                self.compute_primal_infeasibility();
                self.solve_phase = if self.num_primal_infeasibilities > 0 {
                    Phase::Phase1
                } else {
                    Phase::Phase2
                };
            }
            match self.solve_phase {
                Phase::Phase1 => self.solve_phase_1()?,
                Phase::Phase2 => self.solve_phase_2()?,
                _ => {
                    return Err(SolveError::Logic(format!(
                        "major solving loop entered in phase {:?}",
                        self.solve_phase,
                    )));
                },
            }
            if let Some(outcome) = self.bailout {
                return Ok(outcome);
            }
            match self.solve_phase {
                Phase::Exit | Phase::Cleanup | Phase::Optimal => break,
                Phase::Phase1 if self.model_status == Some(ModelStatus::DualInfeasible) => break,
                _ => {},
            }
        }

        match self.solve_phase {
            Phase::Optimal => Ok(SolveOutcome::Finished(ModelStatus::Optimal)),
            Phase::Cleanup => Ok(SolveOutcome::Cleanup),
            Phase::Exit | Phase::Phase1 => {
                let status = self.model_status.ok_or_else(|| {
                    SolveError::Logic("terminated without a model status".to_string())
                })?;
                Ok(SolveOutcome::Finished(status))
            },
            _ => Err(SolveError::Logic(format!(
                "major solving loop left in phase {:?}",
                self.solve_phase,
            ))),
        }
    }

    /// Phase 1: drive the infeasibility sum to zero.
    fn solve_phase_1(&mut self) -> Result<(), SolveError> {
        self.has_primal_objective_value = false;
        if self.bailout_on_limits() {
            return Ok(());
        }
        debug!("primal-phase1-start");
        loop {
            self.rebuild()?;
            if self.bailout_on_limits() {
                return Ok(());
            }
            debug_assert!(matches!(self.solve_phase, Phase::Phase1 | Phase::Phase2));
            // No primal infeasibilities were found in rebuild: return for phase 2.
            if self.solve_phase == Phase::Phase2 {
                break;
            }

            loop {
                self.iterate()?;
                if self.bailout_on_limits() {
                    return Ok(());
                }
                debug_assert_eq!(self.solve_phase, Phase::Phase1);
                if self.rebuild_reason.is_some() {
                    break;
                }
            }
            if self.has_fresh_rebuild && self.num_flip_since_rebuild == 0 {
                break;
            }
        }
        if self.solve_phase == Phase::Phase1 && self.variable_in.is_none() {
            // Optimal in phase 1 with a positive infeasibility sum.
            debug_assert!(self.num_primal_infeasibilities > 0);
            self.model_status = Some(ModelStatus::PrimalInfeasible);
            self.solve_phase = Phase::Exit;
        }
        Ok(())
    }

    /// Phase 2: drive the objective to its minimum over the feasible basis.
    fn solve_phase_2(&mut self) -> Result<(), SolveError> {
        self.has_primal_objective_value = false;
        if self.bailout_on_limits() {
            return Ok(());
        }
        debug!("primal-phase2-start");
        loop {
            self.rebuild()?;
            if self.bailout_on_limits() {
                return Ok(());
            }
            debug_assert!(matches!(self.solve_phase, Phase::Phase1 | Phase::Phase2));
            // Primal infeasibilities were found in rebuild: return for phase 1.
            if self.solve_phase == Phase::Phase1 {
                break;
            }

            loop {
                self.iterate()?;
                if self.bailout_on_limits() {
                    return Ok(());
                }
                debug_assert_eq!(self.solve_phase, Phase::Phase2);
                if self.rebuild_reason.is_some() {
                    break;
                }
            }
            if self.has_fresh_rebuild && self.num_flip_since_rebuild == 0 {
                break;
            }
        }

        if self.solve_phase == Phase::Phase1 {
            debug!("primal-return-phase1");
        } else if self.variable_in.is_none() {
            // No candidate in CHUZC, even after a rebuild: probably optimal. Remove any bound
            // perturbations and see whether the basis is still primal feasible.
            debug!("primal-phase2-optimal");
            self.cleanup();
            if self.num_primal_infeasibilities > 0 {
                self.solve_phase = Phase::Cleanup;
            } else {
                debug!("problem-optimal");
                self.solve_phase = Phase::Optimal;
                self.model_status = Some(ModelStatus::Optimal);
            }
        } else {
            debug_assert!(self.row_out.is_none());
            // No candidate in CHUZR: probably primal unbounded.
            debug!("primal-phase2-unbounded");
            if self.bounds_perturbed {
                // The perturbed bounds may be responsible: clean up and reassess.
                self.cleanup();
                self.solve_phase = Phase::Unknown;
            } else {
                self.solve_phase = Phase::Exit;
                if self.model_status == Some(ModelStatus::PrimalInfeasible) {
                    // Keep the more specific determination.
                    debug!("problem-primal-dual-infeasible");
                    self.model_status = Some(ModelStatus::PrimalDualInfeasible);
                } else {
                    debug!("problem-primal-unbounded");
                    self.model_status = Some(ModelStatus::PrimalUnbounded);
                }
            }
        }
        Ok(())
    }

    /// One simplex iteration: price, ratio test, and update.
    fn iterate(&mut self) -> Result<(), SolveError> {
        self.chuzc();
        let variable_in = match self.variable_in {
            Some(variable) => variable,
            None => {
                self.rebuild_reason = Some(RebuildReason::PossiblyOptimal);
                return Ok(());
            },
        };

        // FTRAN, with a cross-check of the updated dual value.
        self.assess_variable_in(variable_in)?;

        if self.solve_phase == Phase::Phase1 {
            self.phase1_choose_row();
            if self.row_out.is_none() {
                error!("phase 1 ratio test found no leaving row");
                return Err(SolveError::Numeric(
                    "phase 1 ratio test found no leaving row".to_string(),
                ));
            }
        } else {
            self.choose_row();
        }
        debug_assert!(self.rebuild_reason.is_none());

        // A bound swap may be shorter than the pivoting step. In phase 2 it may also turn out
        // that there is neither, in which case the program is possibly unbounded.
        self.consider_bound_swap(variable_in);
        if self.rebuild_reason == Some(RebuildReason::PossiblyPrimalUnbounded) {
            return Ok(());
        }
        debug_assert!(self.rebuild_reason.is_none());

        if let Some(row_out) = self.row_out {
            // Unit BTRAN and PRICE for the pivotal row, and the numerical cross-check of the
            // pivot value.
            self.assess_pivot(variable_in, row_out)?;
            if self.rebuild_reason.is_some() {
                debug_assert_eq!(
                    self.rebuild_reason,
                    Some(RebuildReason::PossiblySingularBasis),
                );
                return Ok(());
            }
        }

        self.update(variable_in)?;
        // Force a rebuild once phase 1 runs out of infeasibilities.
        if self.num_primal_infeasibilities == 0 && self.solve_phase == Phase::Phase1 {
            self.rebuild_reason = Some(RebuildReason::UpdateLimitReached);
        }

        debug_assert!(matches!(
            self.rebuild_reason,
            None
                | Some(RebuildReason::PrimalInfeasibleInPrimalSimplex)
                | Some(RebuildReason::SyntheticClockSaysInvert)
                | Some(RebuildReason::UpdateLimitReached),
        ));
        Ok(())
    }

    /// Compute the pivot column and verify the sign of the updated dual value against one
    /// computed from the column.
    fn assess_variable_in(&mut self, variable_in: usize) -> Result<(), SolveError> {
        self.theta_dual = self.work_dual[variable_in];
        // The move direction cannot be read from `nonbasic_move` because of free columns.
        self.move_in = if self.theta_dual > 0.0 { -1 } else { 1 };
        if self.basis.nonbasic_move[variable_in] != 0 {
            debug_assert_eq!(self.basis.nonbasic_move[variable_in], self.move_in);
        }

        self.pivot_column_ftran(variable_in);

        let mut computed_theta_dual = self.work_cost[variable_in];
        for &row in self.col_aq.indices() {
            computed_theta_dual -=
                self.col_aq.array[row] * self.work_cost[self.basis.basic_index[row]];
        }
        let sign_ok = computed_theta_dual * self.theta_dual > 0.0
            || computed_theta_dual.abs() <= self.options.dual_feasibility_tolerance;
        if !sign_ok {
            error!(
                "computed / updated dual of entering variable are {} / {}: sign error",
                computed_theta_dual, self.theta_dual,
            );
            return Err(SolveError::Numeric(format!(
                "computed / updated dual of entering variable are {} / {}: sign error",
                computed_theta_dual, self.theta_dual,
            )));
        }
        Ok(())
    }

    /// Check the iteration and time limits; on the first hit, record the warning outcome.
    fn bailout_on_limits(&mut self) -> bool {
        if self.bailout.is_some() {
            return true;
        }
        if let Some(limit) = self.options.iteration_limit {
            if self.iteration_count >= limit {
                self.bailout = Some(SolveOutcome::IterationLimit);
                return true;
            }
        }
        if let Some(limit) = self.options.time_limit {
            if self.started_at.elapsed() >= limit {
                self.bailout = Some(SolveOutcome::TimeLimit);
                return true;
            }
        }
        false
    }

    /// Reset the working bounds to the program bounds, removing any shifts.
    fn initialise_bound(&mut self) {
        for variable in 0..self.num_tot {
            self.work_lower[variable] = self.program.lower(variable);
            self.work_upper[variable] = self.program.upper(variable);
            self.work_lower_shift[variable] = 0.0;
            self.work_upper_shift[variable] = 0.0;
        }
    }

    /// Reset the working costs to the phase 2 objective.
    fn initialise_cost(&mut self) {
        for variable in 0..self.num_tot {
            self.work_cost[variable] = self.program.objective(variable);
        }
    }

    /// Give every nonbasic variable a value consistent with its move, and set the moves from
    /// the bounds where they are missing.
    fn initialise_value_and_nonbasic_move(&mut self) {
        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 0 {
                continue;
            }
            let lower = self.work_lower[variable];
            let upper = self.work_upper[variable];
            let (value, nonbasic_move) = if lower == upper {
                (lower, 0)
            } else if lower.is_finite() {
                if upper.is_finite() && upper.abs() < lower.abs() {
                    (upper, -1)
                } else {
                    (lower, 1)
                }
            } else if upper.is_finite() {
                (upper, -1)
            } else {
                (0.0, 0)
            };
            self.work_value[variable] = value;
            self.basis.nonbasic_move[variable] = nonbasic_move;
        }
    }

    /// Snap every nonbasic value back onto the bound its move points at.
    fn initialise_nonbasic_work_value(&mut self) {
        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 0 {
                continue;
            }
            self.work_value[variable] = match self.basis.nonbasic_move[variable] {
                1 => self.work_lower[variable],
                -1 => self.work_upper[variable],
                _ => {
                    if self.work_lower[variable] == self.work_upper[variable] {
                        self.work_lower[variable]
                    } else {
                        0.0
                    }
                },
            };
        }
    }

    /// Collect the nonbasic free columns into their membership set.
    fn get_nonbasic_free_column_set(&mut self) {
        if self.num_free_col == 0 {
            return;
        }
        self.nonbasic_free_col_set.clear();
        for variable in 0..self.num_tot {
            if self.basis.nonbasic_flag[variable] == 1
                && self.work_lower[variable] == f64::NEG_INFINITY
                && self.work_upper[variable] == f64::INFINITY
            {
                self.nonbasic_free_col_set.add(variable);
            }
        }
    }

    /// FTRAN the matrix column of the entering variable into `col_aq`.
    fn pivot_column_ftran(&mut self, variable: usize) {
        let program = self.program;
        self.col_aq.clear();
        let col_aq = &mut self.col_aq;
        program.column(variable).for_each(|row, value| col_aq.insert(row, value));
        self.factor.ftran(&mut self.col_aq);
        self.col_aq_density.observe(self.col_aq.count, self.num_row);
    }

    /// BTRAN the unit vector of a basic row into `row_ep`: row `row` of the basis inverse.
    fn unit_btran(&mut self, row: usize) {
        self.row_ep.clear();
        self.row_ep.insert(row, 1.0);
        self.factor.btran(&mut self.row_ep);
        self.row_ep_density.observe(self.row_ep.count, self.num_row);
    }

    /// PRICE `row_ep` against the nonbasic structural columns into `row_ap`.
    fn tableau_row_price(&mut self) {
        price_into(
            self.program,
            &self.basis.nonbasic_flag,
            &self.row_ep,
            &mut self.row_ap,
        );
        self.row_ap_density.observe(self.row_ap.count, self.num_col);
    }
}

/// Price a row-space vector against the nonbasic structural columns.
///
/// Components of basic structural columns are left at zero, matching the column-wise PRICE of
/// the dual update which only needs nonbasic components.
fn price_into(
    program: &LinearProgram,
    nonbasic_flag: &[i8],
    source: &Scattered,
    result: &mut Scattered,
) {
    result.clear();
    for column in 0..program.nr_columns() {
        if nonbasic_flag[column] == 0 {
            continue;
        }
        let mut value = 0.0;
        for &(row, coefficient) in program.matrix().column(column) {
            value += coefficient * source.array[row];
        }
        if value.abs() > DROP_TOLERANCE {
            result.insert(column, value);
        }
    }
}

// Read access to the results of a solve.
impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// The solver configuration, adjustable between solves.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The number of pivots performed. Bound swaps are not counted.
    pub fn iterations(&self) -> u64 {
        self.iteration_count
    }

    /// The number of bound swaps performed.
    pub fn primal_bound_swaps(&self) -> u64 {
        self.primal_bound_swap
    }

    /// The number of bound shifts applied to admit infeasible entering values.
    pub fn bound_shifts(&self) -> u64 {
        self.num_bound_shift
    }

    /// Whether any working bound currently differs from its program bound.
    pub fn bounds_perturbed(&self) -> bool {
        self.bounds_perturbed
    }

    /// The cumulative shift recorded per variable, `(lower, upper)`.
    pub fn bound_shift_sums(&self) -> (&[f64], &[f64]) {
        (&self.work_lower_shift, &self.work_upper_shift)
    }

    /// The number of basic primal infeasibilities at the latest recomputation.
    pub fn primal_infeasibility_count(&self) -> usize {
        self.num_primal_infeasibilities
    }

    /// The largest and summed primal infeasibility at the latest recomputation.
    pub fn primal_infeasibility_measures(&self) -> (f64, f64) {
        (self.max_primal_infeasibility, self.sum_primal_infeasibilities)
    }

    /// The number and sum of dual infeasibilities at the latest recomputation.
    pub fn dual_infeasibility_measures(&self) -> (usize, f64) {
        (self.num_dual_infeasibilities, self.sum_dual_infeasibilities)
    }

    /// The current basis.
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// The current reduced costs, per variable.
    pub fn reduced_costs(&self) -> &[f64] {
        &self.work_dual
    }

    /// The current value of every variable, structural and logical.
    pub fn values(&self) -> Vec<f64> {
        let mut values = self.work_value.clone();
        for row in 0..self.num_row {
            values[self.basis.basic_index[row]] = self.base_value[row];
        }
        values
    }

    /// The current values of the structural columns.
    pub fn column_values(&self) -> Vec<f64> {
        let mut values = self.values();
        values.truncate(self.num_col);
        values
    }

    /// The current row activities.
    pub fn row_activities(&self) -> Vec<f64> {
        let values = self.values();
        (0..self.num_row).map(|row| -values[self.num_col + row]).collect()
    }

    /// The objective value of the current solution, under the true costs.
    pub fn objective_value(&self) -> f64 {
        self.values()
            .iter()
            .enumerate()
            .map(|(variable, value)| self.program.objective(variable) * value)
            .sum()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::primal::PrimalSimplex;
    use crate::data::linear_algebra::matrix::ColumnMajor;
    use crate::data::linear_program::LinearProgram;
    use crate::data::linear_program::options::Options;

    fn program() -> LinearProgram {
        LinearProgram::new(
            vec![1.0, 1.0],
            vec![0.0, 0.0],
            vec![f64::INFINITY; 2],
            vec![1.0],
            vec![f64::INFINITY],
            ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
        ).unwrap()
    }

    #[test]
    fn starts_from_the_slack_basis() {
        let program = program();
        let engine = PrimalSimplex::new(&program, Options::default()).unwrap();

        assert_eq!(engine.basis().basic_index, vec![2]);
        assert_eq!(engine.iterations(), 0);
        // Both structurals start at their lower bound.
        assert_eq!(engine.column_values(), vec![0.0, 0.0]);
    }

    #[test]
    fn rejects_mismatched_basis() {
        use crate::algorithm::basis::Basis;

        let program = program();
        let other = LinearProgram::new(
            vec![1.0],
            vec![0.0],
            vec![1.0],
            vec![0.0],
            vec![1.0],
            ColumnMajor::from_rows(&[vec![1.0]], 1),
        ).unwrap();
        let basis = Basis::slack(&other);

        let result = PrimalSimplex::with_basis(&program, Options::default(), basis);
        assert!(result.is_err());
    }
}
