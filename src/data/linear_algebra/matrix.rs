//! # Column-major sparse matrix
//!
//! The constraint matrix of a linear program, stored by column. Only structural columns are
//! stored; the logical (slack) columns appended by the simplex method are unit vectors and are
//! produced on the fly by the consumer.
use crate::data::linear_algebra::{SparseTuple, SparseTupleVec};

/// A sparse matrix with quick access to its columns.
///
/// Rows within a column are sorted by index; explicit zeros are not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMajor {
    columns: Vec<SparseTupleVec>,
    nr_rows: usize,
}

impl ColumnMajor {
    /// Create a matrix from its columns.
    ///
    /// # Arguments
    ///
    /// * `columns`: Sparse columns; row indices must be in range, sorted and unique, values
    /// nonzero.
    /// * `nr_rows`: Row dimension.
    pub fn from_columns(columns: Vec<SparseTupleVec>, nr_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|column| {
            column.iter().all(|&(i, v)| i < nr_rows && v != 0.0)
                && column.windows(2).all(|w| w[0].0 < w[1].0)
        }));

        Self { columns, nr_rows }
    }

    /// Create a matrix from dense row data. Test and example convenience.
    pub fn from_rows(rows: &[Vec<f64>], nr_columns: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == nr_columns));

        let mut columns = vec![Vec::new(); nr_columns];
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    columns[j].push((i, value));
                }
            }
        }

        Self { columns, nr_rows: rows.len() }
    }

    /// A single column.
    pub fn column(&self, j: usize) -> &[SparseTuple] {
        debug_assert!(j < self.columns.len());

        &self.columns[j]
    }

    /// The row dimension.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// The number of (structural) columns.
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of explicitly stored values.
    pub fn size(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}
