//! Mathematical utilities: least squares and straight-line fitting.

pub mod ols;

pub use ols::*;
