//! `ecv-profiler` library crate.
//!
//! Readers for electrochemical capacitance-voltage profiler output (CV, IV,
//! EP and measurement logs) and the Mott-Schottky doping fit.
//!
//! The binary (`ecv`) is a thin wrapper around this library so that:
//!
//! - readers and the fit are testable without spawning processes
//! - other front-ends (notebooks, plotting tools) can reuse them directly

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
