//! Shared domain types.
//!
//! All records are built once per read call and never mutated afterwards.
//! Units follow the instrument: volts, µF/cm², mA/cm², µm and cm⁻³.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602176462e-19;

/// Vacuum permittivity (F/cm).
pub const VACUUM_PERMITTIVITY: f64 = 8.854187817e-14;

/// Relative dielectric constant of indium arsenide.
pub const EPS_INAS: f64 = 15.15;

/// Four scalars on the sweep line of CV/IV files.
///
/// The instrument stores a sweep as a descending run from `start` followed by
/// an ascending run from `start` again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHeader {
    pub start: f64,
    pub step: f64,
    pub negative_steps: usize,
    pub total_steps: usize,
}

impl SweepHeader {
    /// Number of points in the ascending run.
    pub fn positive_steps(&self) -> usize {
        self.total_steps.saturating_sub(self.negative_steps)
    }

    /// Length of the reconstructed sweep.
    pub fn point_count(&self) -> usize {
        self.negative_steps + 1 + self.positive_steps()
    }
}

/// Equivalent-circuit model used to turn admittance into capacitance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CapacitanceModel {
    /// Parallel model, `Cp = B / (ω·A)`.
    Cp,
    /// Series model, `Cs = Cp·(1 + D²)`.
    Cs,
}

impl CapacitanceModel {
    pub fn display_name(self) -> &'static str {
        match self {
            CapacitanceModel::Cp => "Cp",
            CapacitanceModel::Cs => "Cs",
        }
    }
}

/// One CV sample after conversion. `cp` and `cs` are two readings of the same
/// admittance, not two measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitanceRecord {
    pub voltage: f64,
    pub conductance: f64,
    pub susceptance: f64,
    pub cp: f64,
    pub cs: f64,
}

impl CapacitanceRecord {
    /// Dissipation factor `G / B`.
    pub fn dissipation(&self) -> f64 {
        self.conductance / self.susceptance
    }

    pub fn capacitance(&self, model: CapacitanceModel) -> f64 {
        match model {
            CapacitanceModel::Cp => self.cp,
            CapacitanceModel::Cs => self.cs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentRecord {
    pub voltage: f64,
    /// Current density in mA/cm².
    pub current: f64,
}

/// One row of an electrochemical profile. Negative doping is a measurement
/// artifact and is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub depth: f64,
    pub doping: f64,
}

/// Metadata carried by an amendment line (`F1=..., F2=..., Amp=..., dV=...`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amendment {
    pub f1: f32,
    pub f2: f32,
    pub amp: f32,
    pub dv: f32,
}

/// Field names of a log entry, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogField {
    No,
    Lmp,
    Mc,
    VEtch,
    IEtch,
    VMeas,
    IMeas,
    Dis,
    Fbp,
    Wr,
    Wd,
    X,
    N,
    F1,
    F2,
    Amp,
    DV,
}

impl LogField {
    pub const ALL: [LogField; 17] = [
        LogField::No,
        LogField::Lmp,
        LogField::Mc,
        LogField::VEtch,
        LogField::IEtch,
        LogField::VMeas,
        LogField::IMeas,
        LogField::Dis,
        LogField::Fbp,
        LogField::Wr,
        LogField::Wd,
        LogField::X,
        LogField::N,
        LogField::F1,
        LogField::F2,
        LogField::Amp,
        LogField::DV,
    ];

    /// Name as written in the instrument log header.
    pub fn name(self) -> &'static str {
        match self {
            LogField::No => "No",
            LogField::Lmp => "Lmp",
            LogField::Mc => "MC",
            LogField::VEtch => "V-etch",
            LogField::IEtch => "I-etch",
            LogField::VMeas => "V-meas",
            LogField::IMeas => "I-meas",
            LogField::Dis => "Dis",
            LogField::Fbp => "FBP",
            LogField::Wr => "Wr",
            LogField::Wd => "Wd",
            LogField::X => "X",
            LogField::N => "N",
            LogField::F1 => "F1",
            LogField::F2 => "F2",
            LogField::Amp => "Amp",
            LogField::DV => "dV",
        }
    }
}

impl fmt::Display for LogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| AppError::schema_violation(format!("Unknown log field '{s}'.")))
    }
}

/// A single measurement cycle from an ECV log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub no: i32,
    pub lmp: i32,
    /// Up to 8 bytes.
    pub mc: String,
    pub v_etch: f32,
    pub i_etch: f32,
    pub v_meas: f32,
    pub i_meas: f32,
    pub dis: f32,
    pub fbp: f32,
    pub wr: f32,
    pub wd: f32,
    pub x: f32,
    pub n: f32,
    /// Copied from the nearest preceding amendment line.
    pub amendment: Amendment,
}

/// One requested log field across all entries, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum LogColumn {
    Int(Vec<i32>),
    Text(Vec<String>),
    Float(Vec<f32>),
}

impl LogColumn {
    pub fn len(&self) -> usize {
        match self {
            LogColumn::Int(v) => v.len(),
            LogColumn::Text(v) => v.len(),
            LogColumn::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn display_at(&self, idx: usize) -> Option<String> {
        match self {
            LogColumn::Int(v) => v.get(idx).map(|x| x.to_string()),
            LogColumn::Text(v) => v.get(idx).cloned(),
            LogColumn::Float(v) => v.get(idx).map(|x| x.to_string()),
        }
    }
}

/// Output of the Mott-Schottky fit.
///
/// `volt_fit`/`cap_fit` are two points on the fitted `1/C²` line (x-intercept
/// and a rounded upper bound), meant for drawing the line, not residuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// `1/C²` in cm⁴/µF².
    pub cap_fit: [f64; 2],
    pub volt_fit: [f64; 2],
    /// Doping level in cm⁻³.
    pub doping: f64,
    pub slope: f64,
    pub intercept: f64,
    pub n_points: usize,
}

/// Configuration for a `read CV -> fit doping` run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub cv_path: PathBuf,
    pub model: CapacitanceModel,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub eps: f64,
    pub export_json: Option<PathBuf>,
}

/// A saved fit (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub source: String,
    pub model: CapacitanceModel,
    pub eps: f64,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub fit: FitResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_length_counts_both_runs() {
        let h = SweepHeader {
            start: -1.0,
            step: 0.1,
            negative_steps: 5,
            total_steps: 10,
        };
        assert_eq!(h.positive_steps(), 5);
        assert_eq!(h.point_count(), 11);
    }

    #[test]
    fn log_field_names_round_trip() {
        for field in LogField::ALL {
            assert_eq!(field.name().parse::<LogField>().unwrap(), field);
        }
        let err = "Freq".parse::<LogField>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::SchemaViolation);
    }

    #[test]
    fn capacitance_model_selects_projection() {
        let r = CapacitanceRecord {
            voltage: 0.0,
            conductance: 1.0,
            susceptance: 2.0,
            cp: 3.0,
            cs: 3.75,
        };
        assert_eq!(r.capacitance(CapacitanceModel::Cp), 3.0);
        assert_eq!(r.capacitance(CapacitanceModel::Cs), 3.75);
        assert!((r.dissipation() - 0.5).abs() < 1e-12);
    }
}
