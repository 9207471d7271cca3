//! Command-line parsing for the ECV file tools.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the readers and the fit.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{CapacitanceModel, EPS_INAS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ecv", version, about = "ECV profiler file reader and Mott-Schottky doping fit")]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print capacitance vs voltage from a CV file.
    Cv(CvArgs),
    /// Print current vs voltage from an IV file.
    Iv(TableArgs),
    /// Print the doping profile from an EP file.
    Ep(TableArgs),
    /// Print selected columns of a measurement log.
    Log(LogArgs),
    /// Read a CV file and estimate the doping level from 1/C² vs V.
    Fit(FitArgs),
    /// Print the summary of a fit saved with `fit --export-json`.
    Show(ShowArgs),
    /// List the log field names.
    Fields,
}

#[derive(Debug, Parser, Clone)]
pub struct CvArgs {
    /// CV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Equivalent-circuit model for capacitance.
    #[arg(long, value_enum, default_value_t = CapacitanceModel::Cp)]
    pub model: CapacitanceModel,

    /// Export the table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct TableArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Export the table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct LogArgs {
    /// Log file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field names (see `ecv fields`).
    #[arg(value_name = "FIELD", required = true)]
    pub fields: Vec<String>,

    /// Export the columns to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// CV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Equivalent-circuit model for capacitance.
    #[arg(long, value_enum, default_value_t = CapacitanceModel::Cp)]
    pub model: CapacitanceModel,

    /// Lower bound of the fit window (V, inclusive).
    #[arg(long, allow_negative_numbers = true)]
    pub vmin: Option<f64>,

    /// Upper bound of the fit window (V, inclusive).
    #[arg(long, allow_negative_numbers = true)]
    pub vmax: Option<f64>,

    /// Relative dielectric constant (default: InAs).
    #[arg(long, default_value_t = EPS_INAS)]
    pub eps: f64,

    /// Export the fit to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Fit JSON file.
    #[arg(value_name = "FIT_JSON")]
    pub file: PathBuf,
}
