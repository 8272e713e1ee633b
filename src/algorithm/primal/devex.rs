//! # Devex pricing weights
//!
//! Approximate steepest-edge weights maintained against a reference set of columns. The
//! reference set is the set of nonbasic columns at the moment the framework is (re)set; the
//! framework is reset when too many updates were made against badly outdated weights.
use crate::algorithm::basis::factorization::Factorization;
use crate::algorithm::primal::PrimalSimplex;

/// A stored weight more than this factor above the freshly computed pivot weight is bad.
const BAD_DEVEX_WEIGHT_FACTOR: f64 = 3.0;
/// Number of bad weights after which the framework is reset.
const ALLOWED_NUM_BAD_DEVEX_WEIGHT: usize = 3;

/// The Devex weights and their reference set.
#[derive(Clone, Debug)]
pub(super) struct Devex {
    /// The weight per variable, at least one.
    pub weight: Vec<f64>,
    /// Whether the variable is in the reference set.
    pub index: Vec<u8>,
    /// Updates since the framework was last reset.
    pub num_iterations: usize,
    /// Updates that found a badly outdated stored weight.
    pub num_bad_weight: usize,
}

impl Devex {
    pub fn new(nr_variables: usize) -> Self {
        Self {
            weight: vec![1.0; nr_variables],
            index: vec![0; nr_variables],
            num_iterations: 0,
            num_bad_weight: 0,
        }
    }
}

impl<'a, F: Factorization> PrimalSimplex<'a, F> {
    /// Reset the Devex framework: unit weights, and the current nonbasic columns as the
    /// reference set.
    pub(super) fn reset_devex(&mut self) {
        if self.devex.num_iterations > 0 {
            log::debug!(
                "devex framework reset after {} updates with {} bad weights",
                self.devex.num_iterations, self.devex.num_bad_weight,
            );
        }
        self.devex.weight.iter_mut().for_each(|weight| *weight = 1.0);
        for variable in 0..self.num_tot {
            let flag = self.basis.nonbasic_flag[variable];
            self.devex.index[variable] = (flag * flag) as u8;
        }
        self.devex.num_iterations = 0;
        self.devex.num_bad_weight = 0;
        self.hyper_choose_column_clear();
    }

    /// Whether the framework accumulated enough bad weights to warrant a reset.
    pub(super) fn devex_wants_reset(&self) -> bool {
        self.devex.num_bad_weight > ALLOWED_NUM_BAD_DEVEX_WEIGHT
    }

    /// Update the weights for a pivot on `(variable_in, row_out)`.
    pub(super) fn update_devex(&mut self, variable_in: usize, row_out: usize) {
        let variable_out = self.basis.basic_index[row_out];

        // The pivot weight, measured over the reference set.
        let mut pivot_weight = 0.0;
        let use_col_indices = self.col_aq_density.use_indices(self.col_aq.count, self.num_row);
        let entries = if use_col_indices { self.col_aq.count } else { self.num_row };
        for entry in 0..entries {
            let row = if use_col_indices { self.col_aq.index[entry] } else { entry };
            let variable = self.basis.basic_index[row];
            let alpha = f64::from(self.devex.index[variable]) * self.col_aq.array[row];
            pivot_weight += alpha * alpha;
        }
        pivot_weight += f64::from(self.devex.index[variable_in]);
        pivot_weight = pivot_weight.sqrt();

        if self.devex.weight[variable_in] > BAD_DEVEX_WEIGHT_FACTOR * pivot_weight {
            self.devex.num_bad_weight += 1;
        }

        let pivot = self.col_aq.array[row_out];
        pivot_weight /= pivot.abs();

        for entry in 0..self.row_ap.count {
            let column = self.row_ap.index[entry];
            let alpha = self.row_ap.array[column];
            let devex = pivot_weight * alpha.abs() + f64::from(self.devex.index[column]);
            if self.devex.weight[column] < devex {
                self.devex.weight[column] = devex;
            }
        }
        for entry in 0..self.row_ep.count {
            let row = self.row_ep.index[entry];
            let column = self.num_col + row;
            let alpha = self.row_ep.array[row];
            let devex = pivot_weight * alpha.abs() + f64::from(self.devex.index[column]);
            if self.devex.weight[column] < devex {
                self.devex.weight[column] = devex;
            }
        }

        // The weights of the pivot pair.
        self.devex.weight[variable_out] = pivot_weight.max(1.0);
        self.devex.weight[variable_in] = 1.0;
        self.devex.num_iterations += 1;
    }
}
