//! # Basis state
//!
//! The symbolic description of the current basis: which variables are basic, which bound each
//! nonbasic variable sits at, and which variable occupies each basic row.
use crate::data::linear_program::LinearProgram;

pub mod factorization;

/// Nonbasic variable at its lower bound, free to move up.
pub const MOVE_UP: i8 = 1;
/// Nonbasic variable at its upper bound, free to move down.
pub const MOVE_DOWN: i8 = -1;
/// Nonbasic free or fixed variable, or a basic variable.
pub const MOVE_NONE: i8 = 0;

/// The symbolic basis state.
///
/// `basic_index` is a bijection between rows and basic variables; `nonbasic_flag` is `1`
/// exactly for the variables not in `basic_index`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Basis {
    /// `1` if the variable is nonbasic, `0` if basic.
    pub nonbasic_flag: Vec<i8>,
    /// Which bound the nonbasic variable is at: `MOVE_UP` at lower, `MOVE_DOWN` at upper,
    /// `MOVE_NONE` for free or fixed variables.
    pub nonbasic_move: Vec<i8>,
    /// The variable occupying each basic row.
    pub basic_index: Vec<usize>,
}

impl Basis {
    /// The slack basis: all logicals basic, all structurals nonbasic.
    pub fn slack(program: &LinearProgram) -> Self {
        let nr_columns = program.nr_columns();
        let nr_rows = program.nr_rows();
        let nr_variables = nr_columns + nr_rows;

        let mut nonbasic_flag = vec![0; nr_variables];
        let mut nonbasic_move = vec![MOVE_NONE; nr_variables];
        for variable in 0..nr_columns {
            nonbasic_flag[variable] = 1;
            nonbasic_move[variable] = preferred_bound(
                program.lower(variable),
                program.upper(variable),
            );
        }
        let basic_index = (nr_columns..nr_variables).collect();

        Self { nonbasic_flag, nonbasic_move, basic_index }
    }

    /// A basis from the set of basic variables, rows assigned in the order given.
    ///
    /// The caller is responsible for the selection being nonsingular; the factorization will
    /// report a rank deficiency otherwise.
    pub fn from_basic_variables(program: &LinearProgram, basic_index: Vec<usize>) -> Self {
        let nr_variables = program.nr_columns() + program.nr_rows();
        debug_assert_eq!(basic_index.len(), program.nr_rows());
        debug_assert!(basic_index.iter().all(|&variable| variable < nr_variables));

        let mut nonbasic_flag = vec![1; nr_variables];
        for &variable in &basic_index {
            nonbasic_flag[variable] = 0;
        }
        let mut nonbasic_move = vec![MOVE_NONE; nr_variables];
        for variable in 0..nr_variables {
            if nonbasic_flag[variable] == 1 {
                nonbasic_move[variable] = preferred_bound(
                    program.lower(variable),
                    program.upper(variable),
                );
            }
        }

        Self { nonbasic_flag, nonbasic_move, basic_index }
    }

    /// The number of variables, structural and logical.
    pub fn nr_variables(&self) -> usize {
        self.nonbasic_flag.len()
    }
}

/// Which bound a nonbasic variable should initially sit at.
///
/// The finite bound of smallest magnitude; `MOVE_NONE` for free variables.
fn preferred_bound(lower: f64, upper: f64) -> i8 {
    if lower == upper {
        MOVE_NONE
    } else if lower.is_finite() {
        if upper.is_finite() && upper.abs() < lower.abs() {
            MOVE_DOWN
        } else {
            MOVE_UP
        }
    } else if upper.is_finite() {
        MOVE_DOWN
    } else {
        MOVE_NONE
    }
}
