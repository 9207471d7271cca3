//! Fitting routines.
//!
//! - windowed `1/C²` vs `V` regression and the doping estimate (`doping`)

pub mod doping;

pub use doping::*;
