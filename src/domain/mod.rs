//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - sweep headers and the per-sample records each reader produces
//! - the fixed 17-field log schema (`LogField`, `LogEntry`, `LogColumn`)
//! - fit outputs (`FitResult`, `FitFile`) and physical constants

pub mod types;

pub use types::*;
