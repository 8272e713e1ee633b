//! # Linear program representation
//!
//! The problem data the simplex algorithm consumes: costs and bounds per structural column, a
//! column-major constraint matrix and two-sided row bounds.
use std::error::Error;
use std::fmt;

use crate::data::linear_algebra::matrix::ColumnMajor;
use crate::data::linear_algebra::SparseTuple;

pub mod elements;
pub mod options;

/// A linear program in computational form.
///
/// Minimise `c^T x` subject to `L <= A x <= U` and `l <= x <= u`. Each row `i` is given a
/// logical variable with working bounds `[-U_i, -L_i]` and unit matrix column `e_i`, so that the
/// basis equations read `B x_B = -N x_N`. Maximisation is done by the caller negating the costs.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    cost: Vec<f64>,
    column_lower: Vec<f64>,
    column_upper: Vec<f64>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
    matrix: ColumnMajor,
}

impl LinearProgram {
    /// Create a program, validating its dimensions and bounds.
    ///
    /// # Errors
    ///
    /// An `Inconsistency` when there are no rows, array lengths disagree with the matrix
    /// dimensions, a cost is not finite, or a lower bound exceeds its upper bound.
    pub fn new(
        cost: Vec<f64>,
        column_lower: Vec<f64>,
        column_upper: Vec<f64>,
        row_lower: Vec<f64>,
        row_upper: Vec<f64>,
        matrix: ColumnMajor,
    ) -> Result<Self, Inconsistency> {
        let nr_rows = matrix.nr_rows();
        let nr_columns = matrix.nr_columns();

        if nr_rows == 0 {
            return Err(Inconsistency::new("program has no constraint rows"));
        }
        if nr_columns == 0 {
            return Err(Inconsistency::new("program has no structural columns"));
        }
        if cost.len() != nr_columns
            || column_lower.len() != nr_columns
            || column_upper.len() != nr_columns
        {
            return Err(Inconsistency::new(format!(
                "column data lengths {} / {} / {} do not match the {} matrix columns",
                cost.len(), column_lower.len(), column_upper.len(), nr_columns,
            )));
        }
        if row_lower.len() != nr_rows || row_upper.len() != nr_rows {
            return Err(Inconsistency::new(format!(
                "row bound lengths {} / {} do not match the {} matrix rows",
                row_lower.len(), row_upper.len(), nr_rows,
            )));
        }
        if let Some(j) = cost.iter().position(|c| !c.is_finite()) {
            return Err(Inconsistency::new(format!("cost of column {} is not finite", j)));
        }
        if let Some(j) = (0..nr_columns).find(|&j| column_lower[j] > column_upper[j]) {
            return Err(Inconsistency::new(format!(
                "column {} has lower bound {} above upper bound {}",
                j, column_lower[j], column_upper[j],
            )));
        }
        if let Some(i) = (0..nr_rows).find(|&i| row_lower[i] > row_upper[i]) {
            return Err(Inconsistency::new(format!(
                "row {} has lower bound {} above upper bound {}",
                i, row_lower[i], row_upper[i],
            )));
        }

        Ok(Self { cost, column_lower, column_upper, row_lower, row_upper, matrix })
    }

    /// The number of structural columns.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns()
    }

    /// The number of constraint rows.
    pub fn nr_rows(&self) -> usize {
        self.matrix.nr_rows()
    }

    /// The constraint matrix.
    pub fn matrix(&self) -> &ColumnMajor {
        &self.matrix
    }

    /// Objective coefficient of a variable; zero for logicals.
    pub fn objective(&self, variable: usize) -> f64 {
        debug_assert!(variable < self.nr_columns() + self.nr_rows());

        if variable < self.nr_columns() {
            self.cost[variable]
        } else {
            0.0
        }
    }

    /// Working lower bound of a variable.
    ///
    /// Structural columns keep their model bounds; the logical of row `i` has bounds
    /// `[-U_i, -L_i]`.
    pub fn lower(&self, variable: usize) -> f64 {
        debug_assert!(variable < self.nr_columns() + self.nr_rows());

        if variable < self.nr_columns() {
            self.column_lower[variable]
        } else {
            -self.row_upper[variable - self.nr_columns()]
        }
    }

    /// Working upper bound of a variable. See `lower`.
    pub fn upper(&self, variable: usize) -> f64 {
        debug_assert!(variable < self.nr_columns() + self.nr_rows());

        if variable < self.nr_columns() {
            self.column_upper[variable]
        } else {
            -self.row_lower[variable - self.nr_columns()]
        }
    }

    /// The matrix column of a variable: a stored column for structurals, the implicit unit
    /// column for logicals.
    pub fn column(&self, variable: usize) -> VariableColumn {
        debug_assert!(variable < self.nr_columns() + self.nr_rows());

        if variable < self.nr_columns() {
            VariableColumn::Structural(self.matrix.column(variable))
        } else {
            VariableColumn::Logical(variable - self.nr_columns())
        }
    }
}

/// A column of the extended matrix `[A I]`.
#[derive(Clone, Copy, Debug)]
pub enum VariableColumn<'a> {
    /// A stored structural column.
    Structural(&'a [SparseTuple]),
    /// The unit column of the given row.
    Logical(usize),
}

impl<'a> VariableColumn<'a> {
    /// Visit the nonzeros of the column.
    pub fn for_each(&self, mut f: impl FnMut(usize, f64)) {
        match self {
            Self::Structural(column) => {
                for &(i, value) in *column {
                    f(i, value);
                }
            },
            Self::Logical(row) => f(*row, 1.0),
        }
    }
}

/// A logical inconsistency in the description of a linear program.
///
/// Created during validation only; an infeasible or unbounded program is not inconsistent.
#[derive(Debug, Eq, PartialEq)]
pub struct Inconsistency {
    description: String,
}

impl Inconsistency {
    /// Wrap a description of what is wrong.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InconsistentProgram: {}", self.description)
    }
}

impl Error for Inconsistency {
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::ColumnMajor;
    use crate::data::linear_program::LinearProgram;

    fn small_program() -> LinearProgram {
        LinearProgram::new(
            vec![1.0, 2.0],
            vec![0.0, 0.0],
            vec![f64::INFINITY, 4.0],
            vec![1.0],
            vec![f64::INFINITY],
            ColumnMajor::from_rows(&[vec![1.0, 1.0]], 2),
        ).unwrap()
    }

    #[test]
    fn logical_bounds_are_negated_row_bounds() {
        let program = small_program();
        assert_eq!(program.lower(2), f64::NEG_INFINITY);
        assert_eq!(program.upper(2), -1.0);
        assert_eq!(program.objective(2), 0.0);
    }

    #[test]
    fn rejects_crossing_bounds() {
        let result = LinearProgram::new(
            vec![0.0],
            vec![1.0],
            vec![0.0],
            vec![0.0],
            vec![0.0],
            ColumnMajor::from_rows(&[vec![1.0]], 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_rows() {
        let result = LinearProgram::new(
            vec![0.0],
            vec![0.0],
            vec![1.0],
            vec![],
            vec![],
            ColumnMajor::from_rows(&[], 1),
        );
        assert!(result.is_err());
    }
}
