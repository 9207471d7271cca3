//! Shared "read CV -> fit doping" workflow.
//!
//! Keeping this in one place lets the CLI (and any embedding caller) run the
//! whole chain from a `FitConfig` and focus on presentation.

use log::info;

use crate::domain::{CapacitanceRecord, FitConfig, FitResult};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_doping};
use crate::io::cv::{read_cv_records, split_records};

/// All computed outputs of a single `ecv fit` run.
#[derive(Debug, Clone)]
pub struct DopingRun {
    pub records: Vec<CapacitanceRecord>,
    pub capacitance: Vec<f64>,
    pub voltage: Vec<f64>,
    pub fit: FitResult,
}

/// Read the CV file named in `config` and fit the doping level.
pub fn run_doping_fit(config: &FitConfig) -> Result<DopingRun, AppError> {
    // 1) Read and convert admittance samples.
    let records = read_cv_records(&config.cv_path)?;
    let (capacitance, voltage) = split_records(&records, config.model);
    info!(
        "{}: {} samples ({})",
        config.cv_path.display(),
        records.len(),
        config.model.display_name()
    );

    // 2) Fit 1/C² over the requested window.
    let opts = FitOptions {
        vmin: config.vmin,
        vmax: config.vmax,
        eps: config.eps,
    };
    let fit = fit_doping(&capacitance, &voltage, &opts)?;
    info!("doping {:.4e} cm⁻³ from {} points", fit.doping, fit.n_points);

    Ok(DopingRun {
        records,
        capacitance,
        voltage,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::domain::CapacitanceModel;
    use crate::error::ErrorKind;

    fn config(model: CapacitanceModel, vmin: Option<f64>, vmax: Option<f64>) -> FitConfig {
        FitConfig {
            cv_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join("test.cv"),
            model,
            vmin,
            vmax,
            eps: 15.15,
            export_json: None,
        }
    }

    #[test]
    fn fixture_fit_on_rising_branch() {
        // Above -1.0 V capacitance grows with voltage, so 1/C² falls and the
        // doping comes out positive.
        let run = run_doping_fit(&config(CapacitanceModel::Cp, Some(-0.95), None)).unwrap();
        assert_eq!(run.fit.n_points, 4);
        assert!(run.fit.slope < 0.0);
        assert!(run.fit.doping > 0.0);
        assert_eq!(run.records.len(), 11);
        assert_eq!(run.capacitance.len(), run.voltage.len());
    }

    #[test]
    fn series_model_flows_through() {
        let cp = run_doping_fit(&config(CapacitanceModel::Cp, Some(-0.95), None)).unwrap();
        let cs = run_doping_fit(&config(CapacitanceModel::Cs, Some(-0.95), None)).unwrap();
        assert!(cs.capacitance.iter().zip(&cp.capacitance).all(|(s, p)| s >= p));
        assert_ne!(cs.fit.doping, cp.fit.doping);
    }

    #[test]
    fn missing_file_and_empty_window_fail() {
        let mut cfg = config(CapacitanceModel::Cp, None, None);
        cfg.cv_path = PathBuf::from("/no/such/file.cv");
        assert_eq!(run_doping_fit(&cfg).unwrap_err().kind(), ErrorKind::Io);

        let cfg = config(CapacitanceModel::Cp, Some(5.0), Some(6.0));
        assert_eq!(run_doping_fit(&cfg).unwrap_err().kind(), ErrorKind::DegenerateFit);
    }
}
