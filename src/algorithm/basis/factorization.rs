//! # Basis factorization
//!
//! Maintains a factorized representation of the basis matrix `B` that can solve `B x = b`
//! (FTRAN) and `B^T x = b` (BTRAN), and that absorbs a pivot without refactorising through a
//! product-form eta file.
//!
//! The `LuFactor` implementation decomposes `B` densely with partial pivoting. It is the
//! reference implementation of the `Factorization` contract; the iteration engine only ever
//! talks to the trait.
use crate::data::linear_algebra::vector::Scattered;
use crate::data::linear_program::LinearProgram;

/// Entries smaller than this are treated as zero pivots during decomposition.
const SINGULARITY_TOLERANCE: f64 = 1e-11;

/// What the factorization reports after absorbing a pivot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UpdateSignal {
    /// The update was absorbed and further updates are fine.
    Absorbed,
    /// The update was absorbed, but the accumulated eta file now makes refactorising cheaper
    /// than further updating.
    PreferRefactor,
}

/// A factorized basis matrix.
pub trait Factorization {
    /// Factorize the basis matrix selected by `basic_index`.
    ///
    /// # Return value
    ///
    /// The rank deficiency: `0` for a successful factorization. A deficient factorization must
    /// not be used for solves.
    fn compute(&mut self, program: &LinearProgram, basic_index: &[usize]) -> usize;

    /// Solve `B x = b` in place. On entry `rhs` holds `b` indexed by matrix row; on exit it
    /// holds `x` indexed by basic row.
    fn ftran(&self, rhs: &mut Scattered);

    /// Solve `B^T x = b` in place. On entry `rhs` holds `b` indexed by basic row; on exit it
    /// holds `x` indexed by matrix row.
    fn btran(&self, rhs: &mut Scattered);

    /// Absorb a pivot: the variable entering the basis has transformed column `pivot_column`
    /// and replaces the variable in basic row `pivot_row`.
    fn update(&mut self, pivot_column: &Scattered, pivot_row: usize) -> UpdateSignal;
}

/// A dense LU decomposition with partial pivoting and a product-form eta file.
#[derive(Clone, Debug)]
pub struct LuFactor {
    dimension: usize,
    /// Combined `L \ U` in row-major order; `L` has an implicit unit diagonal.
    lu: Vec<f64>,
    /// Pivot order: physical row of the `k`-th pivot.
    permutation: Vec<usize>,
    /// Nonzeros in the decomposition, for the update-versus-refactorise trade-off.
    lu_size: usize,
    etas: Vec<Eta>,
    eta_size: usize,
}

/// One product-form update: the normalised pivot column and the basic row it replaced.
#[derive(Clone, Debug)]
struct Eta {
    pivot_row: usize,
    column: Vec<(usize, f64)>,
}

impl LuFactor {
    /// An empty factorization for a basis of the given dimension. Unusable until `compute`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            lu: vec![0.0; dimension * dimension],
            permutation: (0..dimension).collect(),
            lu_size: 0,
            etas: Vec::new(),
            eta_size: 0,
        }
    }

    fn entry(&self, row: usize, column: usize) -> f64 {
        self.lu[self.permutation[row] * self.dimension + column]
    }
}

impl Factorization for LuFactor {
    fn compute(&mut self, program: &LinearProgram, basic_index: &[usize]) -> usize {
        let n = self.dimension;
        debug_assert_eq!(basic_index.len(), n);
        debug_assert_eq!(program.nr_rows(), n);

        self.etas.clear();
        self.eta_size = 0;
        self.lu.iter_mut().for_each(|value| *value = 0.0);
        for (position, &variable) in basic_index.iter().enumerate() {
            program.column(variable).for_each(|row, value| {
                self.lu[row * n + position] = value;
            });
        }

        for (k, slot) in self.permutation.iter_mut().enumerate() {
            *slot = k;
        }
        let mut rank_deficiency = 0;
        for k in 0..n {
            // Partial pivoting: the largest remaining entry of column k.
            let mut best = k;
            let mut best_value = self.lu[self.permutation[k] * n + k].abs();
            for i in k + 1..n {
                let value = self.lu[self.permutation[i] * n + k].abs();
                if value > best_value {
                    best = i;
                    best_value = value;
                }
            }
            if best_value <= SINGULARITY_TOLERANCE {
                rank_deficiency += 1;
                self.lu[self.permutation[k] * n + k] = 1.0;
                continue;
            }
            self.permutation.swap(k, best);

            let pivot_row = self.permutation[k];
            let pivot = self.lu[pivot_row * n + k];
            for i in k + 1..n {
                let row = self.permutation[i];
                let multiplier = self.lu[row * n + k] / pivot;
                if multiplier != 0.0 {
                    self.lu[row * n + k] = multiplier;
                    for j in k + 1..n {
                        let elimination = multiplier * self.lu[pivot_row * n + j];
                        self.lu[row * n + j] -= elimination;
                    }
                }
            }
        }

        self.lu_size = self.lu.iter().filter(|value| value.abs() > SINGULARITY_TOLERANCE).count();
        rank_deficiency
    }

    fn ftran(&self, rhs: &mut Scattered) {
        let n = self.dimension;
        debug_assert_eq!(rhs.len(), n);

        let mut work = vec![0.0; n];
        for k in 0..n {
            work[k] = rhs.array[self.permutation[k]];
        }
        // Forward solve through the unit lower triangle.
        for k in 0..n {
            let value = work[k];
            if value != 0.0 {
                for i in k + 1..n {
                    work[i] -= self.entry(i, k) * value;
                }
            }
        }
        // Backward solve through the upper triangle.
        for k in (0..n).rev() {
            let value = work[k] / self.entry(k, k);
            work[k] = value;
            if value != 0.0 {
                for i in 0..k {
                    work[i] -= self.entry(i, k) * value;
                }
            }
        }
        rhs.array.copy_from_slice(&work);

        for eta in &self.etas {
            let coefficient = rhs.array[eta.pivot_row];
            if coefficient != 0.0 {
                for &(row, value) in &eta.column {
                    rhs.array[row] -= coefficient * value;
                }
            }
        }
        rhs.rebuild_index();
    }

    fn btran(&self, rhs: &mut Scattered) {
        let n = self.dimension;
        debug_assert_eq!(rhs.len(), n);

        for eta in self.etas.iter().rev() {
            let mut coefficient = 0.0;
            for &(row, value) in &eta.column {
                coefficient += value * rhs.array[row];
            }
            rhs.array[eta.pivot_row] -= coefficient;
        }

        let mut work = rhs.array.clone();
        // Forward solve through the transposed upper triangle.
        for k in 0..n {
            let mut value = work[k];
            for j in 0..k {
                value -= self.entry(j, k) * work[j];
            }
            work[k] = value / self.entry(k, k);
        }
        // Backward solve through the transposed unit lower triangle.
        for k in (0..n).rev() {
            let mut value = work[k];
            for j in k + 1..n {
                value -= self.entry(j, k) * work[j];
            }
            work[k] = value;
        }
        for k in 0..n {
            rhs.array[self.permutation[k]] = work[k];
        }
        rhs.rebuild_index();
    }

    fn update(&mut self, pivot_column: &Scattered, pivot_row: usize) -> UpdateSignal {
        let pivot = pivot_column.array[pivot_row];
        debug_assert!(pivot != 0.0);

        let mut column = Vec::with_capacity(pivot_column.count);
        for &row in pivot_column.indices() {
            let value = if row == pivot_row {
                (pivot_column.array[row] - 1.0) / pivot
            } else {
                pivot_column.array[row] / pivot
            };
            if value != 0.0 {
                column.push((row, value));
            }
        }
        self.eta_size += column.len();
        self.etas.push(Eta { pivot_row, column });

        if 2 * self.eta_size > self.lu_size + self.dimension {
            UpdateSignal::PreferRefactor
        } else {
            UpdateSignal::Absorbed
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::basis::factorization::{Factorization, LuFactor};
    use crate::data::linear_algebra::matrix::ColumnMajor;
    use crate::data::linear_algebra::vector::Scattered;
    use crate::data::linear_program::LinearProgram;

    fn program() -> LinearProgram {
        // Rows of A: [2 1; 1 3], logicals 2 and 3 complete the variable space.
        LinearProgram::new(
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![f64::INFINITY; 2],
            vec![0.0, 0.0],
            vec![4.0, 6.0],
            ColumnMajor::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]], 2),
        ).unwrap()
    }

    fn rhs(values: &[f64]) -> Scattered {
        let mut vector = Scattered::setup(values.len());
        vector.array.copy_from_slice(values);
        vector.rebuild_index();
        vector
    }

    #[test]
    fn ftran_btran_structural_basis() {
        let program = program();
        let mut factor = LuFactor::new(2);
        assert_eq!(factor.compute(&program, &[0, 1]), 0);

        // B = [2 1; 1 3], B * [1, 2]^T = [4, 7]^T.
        let mut b = rhs(&[4.0, 7.0]);
        factor.ftran(&mut b);
        assert_abs_diff_eq!(b.array[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.array[1], 2.0, epsilon = 1e-12);

        // B^T * [1, 1]^T = [3, 4]^T.
        let mut b = rhs(&[3.0, 4.0]);
        factor.btran(&mut b);
        assert_abs_diff_eq!(b.array[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.array[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn detects_rank_deficiency() {
        let program = LinearProgram::new(
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![f64::INFINITY; 2],
            vec![0.0, 0.0],
            vec![4.0, 6.0],
            ColumnMajor::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]], 2),
        ).unwrap();

        let mut factor = LuFactor::new(2);
        assert_eq!(factor.compute(&program, &[0, 1]), 1);
    }

    #[test]
    fn eta_update_tracks_basis_change() {
        let program = program();
        let mut factor = LuFactor::new(2);
        // Start from the slack basis, bring variable 0 into row 0.
        assert_eq!(factor.compute(&program, &[2, 3]), 0);

        let mut pivot_column = rhs(&[2.0, 1.0]);
        factor.ftran(&mut pivot_column);
        factor.update(&pivot_column, 0);

        // The new basis is {0, 3} with matrix [2 0; 1 1].
        let mut b = rhs(&[2.0, 5.0]);
        factor.ftran(&mut b);
        assert_abs_diff_eq!(b.array[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.array[1], 4.0, epsilon = 1e-12);

        // Against a fresh factorization of the same basis.
        let mut fresh = LuFactor::new(2);
        assert_eq!(fresh.compute(&program, &[0, 3]), 0);
        let mut b_fresh = rhs(&[2.0, 5.0]);
        fresh.ftran(&mut b_fresh);
        assert_abs_diff_eq!(b.array[0], b_fresh.array[0], epsilon = 1e-12);
        assert_abs_diff_eq!(b.array[1], b_fresh.array[1], epsilon = 1e-12);
    }
}
