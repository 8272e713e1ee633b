//! # A revised primal simplex solver.
//!
//! Linear programs are solved with a two-phase revised primal simplex method: Devex pricing with
//! a hyper-sparse candidate list, a Harris two-pass ratio test, bound flipping and bound
//! perturbation with post-hoc cleanup.
pub mod algorithm;
pub mod data;
