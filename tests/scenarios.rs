//! # End-to-end scenarios
//!
//! Small literal programs exercising each terminal path of the solver: optimality through both
//! phases, infeasibility, unboundedness, bound swaps, degeneracy and bound perturbation with
//! cleanup.
use approx::assert_abs_diff_eq;

use repris::algorithm::basis::Basis;
use repris::algorithm::primal::PrimalSimplex;
use repris::algorithm::SolveOutcome;
use repris::data::linear_algebra::matrix::ColumnMajor;
use repris::data::linear_program::elements::ModelStatus;
use repris::data::linear_program::LinearProgram;
use repris::data::linear_program::options::Options;

const INF: f64 = f64::INFINITY;

#[test]
fn trivial_optimal() {
    // min x1 + x2 subject to x1 + x2 >= 1, x >= 0.
    let program = LinearProgram::new(
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![INF, INF],
        vec![1.0],
        vec![INF],
        ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
    ).unwrap();

    let mut engine = PrimalSimplex::new(&program, Options::default()).unwrap();
    let outcome = engine.solve().unwrap();

    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::Optimal));
    assert_abs_diff_eq!(engine.objective_value(), 1.0, epsilon = 1e-9);

    // Exactly one of the two structurals is basic.
    let basic_structurals = engine.basis().basic_index.iter().filter(|&&v| v < 2).count();
    assert_eq!(basic_structurals, 1);

    let values = engine.column_values();
    assert_abs_diff_eq!(values[0] + values[1], 1.0, epsilon = 1e-9);
    assert!(values.iter().all(|&v| v >= -1e-9));
}

#[test]
fn infeasible_in_phase_1() {
    // min 0 subject to x <= -1, x >= 0: primal infeasible.
    let program = LinearProgram::new(
        vec![0.0],
        vec![0.0],
        vec![INF],
        vec![-INF],
        vec![-1.0],
        ColumnMajor::from_rows(&[vec![1.0]], 1),
    ).unwrap();

    let mut engine = PrimalSimplex::new(&program, Options::default()).unwrap();
    let outcome = engine.solve().unwrap();

    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::PrimalInfeasible));
    assert!(engine.primal_infeasibility_count() > 0);
}

#[test]
fn unbounded_in_phase_2() {
    // min -x subject to x >= 0: primal unbounded, found with no bound ever perturbed.
    let program = LinearProgram::new(
        vec![-1.0],
        vec![0.0],
        vec![INF],
        vec![0.0],
        vec![INF],
        ColumnMajor::from_rows(&[vec![1.0]], 1),
    ).unwrap();

    let mut engine = PrimalSimplex::new(&program, Options::default()).unwrap();
    let outcome = engine.solve().unwrap();

    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::PrimalUnbounded));
    assert!(!engine.bounds_perturbed());
}

#[test]
fn bound_swap_dominates_pivot() {
    // min x subject to x + y = 3 with 0 <= x <= 5, 0 <= y <= 2, starting with x basic at 3.
    // The step to y's opposite bound is shorter than the pivoting step, so y flips and the
    // optimum is reached without a single pivot.
    let program = LinearProgram::new(
        vec![1.0, 0.0],
        vec![0.0, 0.0],
        vec![5.0, 2.0],
        vec![3.0],
        vec![3.0],
        ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
    ).unwrap();

    let basis = Basis::from_basic_variables(&program, vec![0]);
    let mut engine =
        PrimalSimplex::with_basis(&program, Options::default(), basis).unwrap();
    let outcome = engine.solve().unwrap();

    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::Optimal));
    assert!(engine.primal_bound_swaps() >= 1);
    assert_eq!(engine.iterations(), 0);
    assert_abs_diff_eq!(engine.objective_value(), 1.0, epsilon = 1e-9);
}

#[test]
fn degenerate_harris() {
    // min x + y subject to x + y >= 2, 0 <= x <= 1, 0 <= y <= 1, starting at (0, 0). Both
    // structurals have to enter; the ratio test must not cycle on the degenerate vertices.
    let program = LinearProgram::new(
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![2.0],
        vec![INF],
        ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
    ).unwrap();

    let options = Options {
        iteration_limit: Some(1000),
        ..Options::default()
    };
    let mut engine = PrimalSimplex::new(&program, options).unwrap();
    let outcome = engine.solve().unwrap();

    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::Optimal));
    assert!(engine.iterations() + engine.primal_bound_swaps() >= 2);
    assert_abs_diff_eq!(engine.objective_value(), 2.0, epsilon = 1e-8);
}

#[test]
fn perturbation_is_cleaned_up() {
    // A degenerate step: z sits just inside the feasibility tolerance below its lower bound,
    // and the entering x pivots with a small coefficient, so the (negative) step takes x beyond
    // its own lower bound by more than the tolerance. The violated bound is shifted to admit
    // the value; cleanup must undo every shift before the solve reports.
    let program = LinearProgram::new(
        vec![-1.0, 0.0],
        vec![0.0, 1.0 + 5e-8],
        vec![10.0, 2.0],
        vec![1.0],
        vec![1.0],
        ColumnMajor::from_rows(&[vec![0.01, 1.0]], 2),
    ).unwrap();

    let basis = Basis::from_basic_variables(&program, vec![1]);
    let mut engine =
        PrimalSimplex::with_basis(&program, Options::default(), basis).unwrap();
    let outcome = engine.solve().unwrap();

    assert!(engine.bound_shifts() >= 1, "the scenario should have shifted a bound");
    assert!(matches!(
        outcome,
        SolveOutcome::Finished(ModelStatus::Optimal) | SolveOutcome::Cleanup,
    ));
    assert!(!engine.bounds_perturbed());
    let (lower_shifts, upper_shifts) = engine.bound_shift_sums();
    assert!(lower_shifts.iter().all(|&shift| shift == 0.0));
    assert!(upper_shifts.iter().all(|&shift| shift == 0.0));
}

#[test]
fn resumes_after_iteration_limit() {
    // The limit is a warning, not a failure: the engine leaves consistent state behind and
    // finishes the solve when called again with room to iterate.
    let program = LinearProgram::new(
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![INF, INF],
        vec![1.0],
        vec![INF],
        ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
    ).unwrap();

    let options = Options {
        iteration_limit: Some(0),
        ..Options::default()
    };
    let mut engine = PrimalSimplex::new(&program, options).unwrap();
    assert_eq!(engine.solve().unwrap(), SolveOutcome::IterationLimit);

    engine.options_mut().iteration_limit = None;
    let outcome = engine.solve().unwrap();
    assert_eq!(outcome, SolveOutcome::Finished(ModelStatus::Optimal));
    assert_abs_diff_eq!(engine.objective_value(), 1.0, epsilon = 1e-9);
}
