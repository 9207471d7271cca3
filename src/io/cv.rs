//! Capacitance-voltage (`*.CV`) reader.
//!
//! Layout:
//! - line 12: `<index> <area cm²> <ω₁ rad/s> <ω₂ rad/s> <reserved>`
//! - line 15: sweep header (see `io::sweep`)
//! - line 16+: one complex admittance `G + iB` per line, written as two
//!   25-character fixed-width columns
//!
//! Only the first angular frequency is used; the instrument also writes a
//! second one which has no role in the conversion.

use std::path::Path;

use log::debug;
use nalgebra::Complex;

use crate::domain::{CapacitanceModel, CapacitanceRecord};
use crate::error::AppError;
use crate::io::schema::{FieldSpec, LineSchema, parse_float, split_fixed_width};
use crate::io::source::TextSource;
use crate::io::sweep::{SWEEP_DATA_START, ensure_sample_count, read_sweep_header, reconstruct_sweep, sort_by_voltage};

/// Width of one admittance column.
pub const ADMITTANCE_FIELD_WIDTH: usize = 25;

/// Measurement properties line.
pub const PROPERTY_LINE: LineSchema = LineSchema {
    line: 12,
    label: "CV properties",
    fields: &[
        FieldSpec::ignored("index"),
        FieldSpec::float("area"),
        FieldSpec::float("frequency"),
        FieldSpec::ignored("frequency_2"),
        FieldSpec::ignored("reserved"),
    ],
};

/// Read a CV file and return `(capacitance, voltage)` sorted by voltage,
/// capacitance in µF/cm² for the chosen model.
pub fn read_cv(path: &Path, model: CapacitanceModel) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let records = read_cv_records(path)?;
    Ok(split_records(&records, model))
}

/// Read a CV file into per-sample records sorted by voltage.
pub fn read_cv_records(path: &Path) -> Result<Vec<CapacitanceRecord>, AppError> {
    let source = TextSource::open(path)?;
    parse_cv(&source)
}

/// Split records into `(capacitance, voltage)` for one model.
pub fn split_records(records: &[CapacitanceRecord], model: CapacitanceModel) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .map(|r| (r.capacitance(model), r.voltage))
        .unzip()
}

/// Parse CV content that is already in memory.
pub fn parse_cv(source: &TextSource) -> Result<Vec<CapacitanceRecord>, AppError> {
    let props = PROPERTY_LINE.parse(source)?;
    let area = props.float("area")?;
    let frequency = props.float("frequency")?;
    if area == 0.0 || frequency == 0.0 {
        return Err(AppError::malformed_header(format!(
            "{}: area and frequency must be non-zero (area={area}, frequency={frequency}).",
            props.location()
        )));
    }

    let header = read_sweep_header(source)?;

    let mut samples = Vec::new();
    for (line_no, line) in source.data_lines(SWEEP_DATA_START) {
        let y = parse_admittance(line)
            .map_err(|e| AppError::malformed_record(format!("{}: {e}", source.location(line_no))))?;
        if y.im == 0.0 {
            return Err(AppError::malformed_record(format!(
                "{}: zero susceptance, capacitance is undefined.",
                source.location(line_no)
            )));
        }
        samples.push(y);
    }
    ensure_sample_count(source, samples.len(), header.point_count())?;

    let voltage = reconstruct_sweep(&header);
    let mut records: Vec<CapacitanceRecord> = voltage
        .iter()
        .zip(&samples)
        .map(|(&v, y)| capacitance_record(v, *y, frequency, area))
        .collect();
    sort_by_voltage(&mut records, |r| r.voltage);

    debug!(
        "{}: {} CV samples, area={area} cm², ω={frequency} rad/s",
        source.name(),
        records.len()
    );
    Ok(records)
}

/// Convert one admittance sample into parallel and series capacitance.
pub fn capacitance_record(voltage: f64, y: Complex<f64>, frequency: f64, area: f64) -> CapacitanceRecord {
    let dissipation = y.re / y.im;
    let cp = 1e6 * y.im / (frequency * area);
    let cs = cp * (1.0 + dissipation * dissipation);
    CapacitanceRecord {
        voltage,
        conductance: y.re,
        susceptance: y.im,
        cp,
        cs,
    }
}

/// Parse `G` and `B` from one data line.
///
/// Fixed-width columns are tried first; lines that do not split into exactly
/// two columns fall back to comma/whitespace separated tokens, optionally
/// wrapped in parentheses.
pub fn parse_admittance(line: &str) -> Result<Complex<f64>, String> {
    let columns = split_fixed_width(line, ADMITTANCE_FIELD_WIDTH);
    let tokens: Vec<String> = if columns.len() == 2 && columns.iter().all(|c| parse_float(c).is_some()) {
        columns
    } else {
        line.trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    if tokens.len() != 2 {
        return Err(format!(
            "expected 2 admittance fields (G, B), found {}: '{}'",
            tokens.len(),
            line.trim()
        ));
    }

    let re = parse_float(&tokens[0]).ok_or_else(|| format!("conductance is not a number: '{}'", tokens[0]))?;
    let im = parse_float(&tokens[1]).ok_or_else(|| format!("susceptance is not a number: '{}'", tokens[1]))?;
    Ok(Complex::new(re, im))
}
