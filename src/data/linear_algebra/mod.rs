//! # Linear algebra primitives
//!
//! Linear algebra primitives used to represent data in either a dense or a sparse format.
pub mod matrix;
pub mod vector;

/// Inner value for the sparse matrix columns: a (row index, value) pair.
pub type SparseTuple = (usize, f64);
/// Shorthand for the common backing type of sparse data structures.
pub type SparseTupleVec = Vec<SparseTuple>;
