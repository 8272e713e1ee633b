//! # Data structures
//!
//! Linear algebra primitives, index collections and the linear program representation that the
//! simplex algorithm operates on.
pub mod heap;
pub mod index_set;
pub mod linear_algebra;
pub mod linear_program;
