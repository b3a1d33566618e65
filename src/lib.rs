//! Minimal button-press solver for factory machine counters.
//!
//! A machine is a system of linear equations: each button press adds one to
//! a fixed set of counters, and every counter must land exactly on its
//! target level. [`min_presses`] finds the smallest total number of presses
//! that does so, entirely in exact integer arithmetic: the augmented matrix
//! is reduced to row echelon form, each pivot variable is expressed over the
//! free variables, the free variables are bounded by non-negativity of every
//! expression, and the bounded box is enumerated for the minimum sum.

pub mod bounds;
pub mod expr;
mod fmt;
pub mod matrix;
pub mod solver;

pub use matrix::{Matrix, Row};
pub use solver::{min_presses, SolveError};
