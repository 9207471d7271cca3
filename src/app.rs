//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - runs the requested reader or the fit pipeline, or loads a saved fit
//! - prints reports
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cli::{Cli, Command, CvArgs, FitArgs, LogArgs, ShowArgs, TableArgs};
use crate::domain::{CapacitanceModel, FitConfig, FitFile};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ecv` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Cv(args) => handle_cv(args),
        Command::Iv(args) => handle_iv(args),
        Command::Ep(args) => handle_ep(args),
        Command::Log(args) => handle_log(args),
        Command::Fit(args) => handle_fit(args),
        Command::Show(args) => handle_show(args),
        Command::Fields => {
            print!("{}", crate::report::format_log_fields());
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn handle_cv(args: CvArgs) -> Result<(), AppError> {
    info!("Reading CV file {}", args.file.display());
    let (capacitance, voltage) = crate::io::read_cv(&args.file, args.model)?;

    let label = format!("{} µF/cm²", args.model.display_name());
    println!(
        "{}",
        crate::report::format_series(
            &format!("cv {}", args.model.display_name()),
            ["V", label.as_str()],
            &voltage,
            &capacitance,
        )
    );

    if let Some(path) = &args.export {
        let column = match args.model {
            CapacitanceModel::Cp => "cp_uf_cm2",
            CapacitanceModel::Cs => "cs_uf_cm2",
        };
        crate::io::write_series_csv(path, ["voltage_v", column], &voltage, &capacitance)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_iv(args: TableArgs) -> Result<(), AppError> {
    info!("Reading IV file {}", args.file.display());
    let (current, voltage) = crate::io::read_iv(&args.file)?;

    println!(
        "{}",
        crate::report::format_series("iv", ["V", "I mA/cm²"], &voltage, &current)
    );

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, ["voltage_v", "current_ma_cm2"], &voltage, &current)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_ep(args: TableArgs) -> Result<(), AppError> {
    info!("Reading EP file {}", args.file.display());
    let (doping, depth) = crate::io::read_ep(&args.file)?;

    println!(
        "{}",
        crate::report::format_series("ep", ["depth µm", "N cm⁻³"], &depth, &doping)
    );

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, ["depth_um", "doping_cm3"], &depth, &doping)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_log(args: LogArgs) -> Result<(), AppError> {
    let names: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let fields = crate::io::measurement_log::resolve_fields(&names)?;

    info!("Reading log file {}", args.file.display());
    let entries = crate::io::read_log(&args.file)?;
    let columns = crate::io::measurement_log::columns(&entries, &fields);

    println!("{}", crate::report::format_log_columns(&fields, &columns));

    if let Some(path) = &args.export {
        crate::io::write_log_csv(path, &fields, &columns)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_doping_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.fit, &config));

    if let Some(path) = &config.export_json {
        crate::io::write_fit_json(path, &run.fit, &config)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    info!("Reading fit file {}", args.file.display());
    let saved = crate::io::read_fit_json(&args.file)?;
    let config = fit_config_from_file(&saved);

    println!("{}", crate::report::format_fit_summary(&saved.fit, &config));
    Ok(())
}

/// Settings of a saved fit, in the shape the report expects.
pub fn fit_config_from_file(saved: &FitFile) -> FitConfig {
    FitConfig {
        cv_path: PathBuf::from(&saved.source),
        model: saved.model,
        vmin: saved.vmin,
        vmax: saved.vmax,
        eps: saved.eps,
        export_json: None,
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        cv_path: args.file.clone(),
        model: args.model,
        vmin: args.vmin,
        vmax: args.vmax,
        eps: args.eps,
        export_json: args.export_json.clone(),
    }
}
