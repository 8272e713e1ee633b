//! # Randomised solves
//!
//! Random small programs are solved and the terminal state is checked against the invariants
//! that must hold whatever the outcome: consistency of the basis, feasibility and sign-correct
//! reduced costs at an optimum, no residual bound shifts, and termination within the iteration
//! limit.
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use repris::algorithm::primal::PrimalSimplex;
use repris::algorithm::SolveOutcome;
use repris::data::linear_algebra::matrix::ColumnMajor;
use repris::data::linear_program::elements::ModelStatus;
use repris::data::linear_program::LinearProgram;
use repris::data::linear_program::options::Options;

const INF: f64 = f64::INFINITY;
const FEASIBILITY_EPSILON: f64 = 1e-6;

fn random_program(rng: &mut SmallRng) -> LinearProgram {
    let nr_columns = rng.gen_range(2..7);
    let nr_rows = rng.gen_range(1..6);

    let mut rows = Vec::with_capacity(nr_rows);
    for _ in 0..nr_rows {
        let row = (0..nr_columns)
            .map(|_| {
                if rng.gen_bool(0.7) {
                    f64::from(rng.gen_range(-6..7)) / 2.0
                } else {
                    0.0
                }
            })
            .collect::<Vec<_>>();
        rows.push(row);
    }

    let cost = (0..nr_columns)
        .map(|_| f64::from(rng.gen_range(-10..11)) / 2.0)
        .collect();
    let column_lower = vec![0.0; nr_columns];
    let column_upper = (0..nr_columns)
        .map(|_| if rng.gen_bool(0.5) { INF } else { f64::from(rng.gen_range(1..11)) })
        .collect();

    let mut row_lower = Vec::with_capacity(nr_rows);
    let mut row_upper = Vec::with_capacity(nr_rows);
    for _ in 0..nr_rows {
        let bound = f64::from(rng.gen_range(-5..11));
        match rng.gen_range(0..3) {
            0 => {
                row_lower.push(-INF);
                row_upper.push(bound);
            },
            1 => {
                row_lower.push(bound);
                row_upper.push(INF);
            },
            _ => {
                row_lower.push(bound);
                row_upper.push(bound + f64::from(rng.gen_range(0..5)));
            },
        }
    }

    LinearProgram::new(
        cost,
        column_lower,
        column_upper,
        row_lower,
        row_upper,
        ColumnMajor::from_rows(&rows, nr_columns),
    ).unwrap()
}

/// The residual of the extended system `A x + s = 0`, per row.
fn max_residual(program: &LinearProgram, engine: &PrimalSimplex) -> f64 {
    let values = engine.values();
    let mut residual: f64 = 0.0;
    for row in 0..program.nr_rows() {
        let mut activity = values[program.nr_columns() + row];
        for column in 0..program.nr_columns() {
            for &(i, coefficient) in program.matrix().column(column) {
                if i == row {
                    activity += coefficient * values[column];
                }
            }
        }
        residual = residual.max(activity.abs());
    }
    residual
}

fn check_basis_bijection(program: &LinearProgram, engine: &PrimalSimplex) {
    let basis = engine.basis();
    let nr_variables = program.nr_columns() + program.nr_rows();
    let mut seen = vec![false; nr_variables];
    for &variable in &basis.basic_index {
        assert!(!seen[variable], "variable {} occupies two basic rows", variable);
        seen[variable] = true;
        assert_eq!(basis.nonbasic_flag[variable], 0);
    }
    let nr_nonbasic = (0..nr_variables)
        .filter(|&variable| basis.nonbasic_flag[variable] == 1)
        .count();
    assert_eq!(nr_nonbasic, nr_variables - program.nr_rows());
}

fn check_optimal(program: &LinearProgram, engine: &PrimalSimplex) {
    let values = engine.values();
    // Primal feasibility of every variable against the program bounds.
    for variable in 0..values.len() {
        assert!(
            values[variable] >= program.lower(variable) - FEASIBILITY_EPSILON
                && values[variable] <= program.upper(variable) + FEASIBILITY_EPSILON,
            "variable {} with value {} violates [{}, {}]",
            variable, values[variable], program.lower(variable), program.upper(variable),
        );
    }
    assert!(max_residual(program, engine) < FEASIBILITY_EPSILON);

    // Dual feasibility: no nonbasic variable is attractive.
    let basis = engine.basis();
    let duals = engine.reduced_costs();
    for variable in 0..values.len() {
        if basis.nonbasic_flag[variable] == 0 {
            continue;
        }
        let free = program.lower(variable) == -INF && program.upper(variable) == INF;
        let infeasibility = if free {
            duals[variable].abs()
        } else {
            -f64::from(basis.nonbasic_move[variable]) * duals[variable]
        };
        assert!(
            infeasibility <= 1e-5,
            "variable {} has dual infeasibility {} at the optimum",
            variable, infeasibility,
        );
    }
}

#[test]
fn random_programs_terminate_consistently() {
    let mut rng = SmallRng::seed_from_u64(0x1d2c_3b4a);
    for round in 0..60 {
        let program = random_program(&mut rng);
        let options = Options {
            iteration_limit: Some(10_000),
            ..Options::default()
        };
        let mut engine = PrimalSimplex::new(&program, options).unwrap();
        let outcome = engine
            .solve()
            .unwrap_or_else(|error| panic!("round {}: solve failed: {}", round, error));

        assert_ne!(
            outcome,
            SolveOutcome::IterationLimit,
            "round {}: did not terminate within the iteration limit",
            round,
        );

        check_basis_bijection(&program, &engine);

        // Whatever the outcome, all bound shifts must have been removed by a terminal solve.
        if matches!(
            outcome,
            SolveOutcome::Finished(ModelStatus::Optimal) | SolveOutcome::Cleanup,
        ) {
            assert!(!engine.bounds_perturbed());
            let (lower_shifts, upper_shifts) = engine.bound_shift_sums();
            assert!(lower_shifts.iter().all(|&shift| shift == 0.0));
            assert!(upper_shifts.iter().all(|&shift| shift == 0.0));
        }

        if outcome == SolveOutcome::Finished(ModelStatus::Optimal) {
            check_optimal(&program, &engine);
        }
    }
}

#[test]
fn rejects_programs_known_infeasible() {
    // Row demanding more than the column bounds can deliver.
    let program = LinearProgram::new(
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![3.0],
        vec![INF],
        ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
    ).unwrap();

    let mut engine = PrimalSimplex::new(&program, Options::default()).unwrap();
    assert_eq!(
        engine.solve().unwrap(),
        SolveOutcome::Finished(ModelStatus::PrimalInfeasible),
    );
}
