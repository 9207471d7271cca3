//! Reporting utilities: plain-text tables and the fit summary.

pub mod format;

pub use format::*;
