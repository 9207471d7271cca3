//! Read/write fit JSON files.
//!
//! A fit file records where the capacitance came from, the fit settings and
//! the `FitResult`, so the line can be redrawn without re-reading the CV file.
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitConfig, FitFile, FitResult};
use crate::error::AppError;

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitResult, config: &FitConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let out = FitFile {
        tool: "ecv".to_string(),
        source: config.cv_path.display().to_string(),
        model: config.model,
        eps: config.eps,
        vmin: config.vmin,
        vmax: config.vmax,
        fit: fit.clone(),
    };

    serde_json::to_writer_pretty(file, &out).map_err(|e| AppError::io(format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::malformed_record(format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::CapacitanceModel;

    #[test]
    fn fit_json_keeps_settings_and_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        let config = FitConfig {
            cv_path: PathBuf::from("sample.cv"),
            model: CapacitanceModel::Cs,
            vmin: Some(0.25),
            vmax: None,
            eps: 11.7,
            export_json: Some(path.clone()),
        };
        let fit = FitResult {
            cap_fit: [0.0, 100.0],
            volt_fit: [0.13, 0.96],
            doping: -9.96e16,
            slope: 121.0,
            intercept: -15.66,
            n_points: 6,
        };

        write_fit_json(&path, &fit, &config).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"model\": \"cs\""));

        let back = read_fit_json(&path).unwrap();
        assert_eq!(back.tool, "ecv");
        assert_eq!(back.source, "sample.cv");
        assert_eq!(back.vmin, Some(0.25));
        assert_eq!(back.vmax, None);
        assert_eq!(back.fit, fit);
    }
}
