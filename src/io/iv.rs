//! Current-voltage (`*.IV`) reader.
//!
//! Same sweep line as CV files (line 15); lines 16+ hold one current density
//! (mA/cm²) each.

use std::path::Path;

use log::debug;

use crate::domain::CurrentRecord;
use crate::error::AppError;
use crate::io::schema::parse_float;
use crate::io::source::TextSource;
use crate::io::sweep::{SWEEP_DATA_START, ensure_sample_count, read_sweep_header, reconstruct_sweep, sort_by_voltage};

/// Read an IV file and return `(current, voltage)` sorted by voltage.
pub fn read_iv(path: &Path) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let records = read_iv_records(path)?;
    Ok(records.iter().map(|r| (r.current, r.voltage)).unzip())
}

pub fn read_iv_records(path: &Path) -> Result<Vec<CurrentRecord>, AppError> {
    let source = TextSource::open(path)?;
    parse_iv(&source)
}

pub fn parse_iv(source: &TextSource) -> Result<Vec<CurrentRecord>, AppError> {
    let header = read_sweep_header(source)?;

    let mut current = Vec::new();
    for (line_no, line) in source.data_lines(SWEEP_DATA_START) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [token] = tokens.as_slice() else {
            return Err(AppError::malformed_record(format!(
                "{}: expected 1 current value, found {} fields.",
                source.location(line_no),
                tokens.len()
            )));
        };
        let value = parse_float(token).ok_or_else(|| {
            AppError::malformed_record(format!(
                "{}: current is not a number: '{token}'.",
                source.location(line_no)
            ))
        })?;
        current.push(value);
    }
    ensure_sample_count(source, current.len(), header.point_count())?;

    let voltage = reconstruct_sweep(&header);
    let mut records: Vec<CurrentRecord> = voltage
        .into_iter()
        .zip(current)
        .map(|(voltage, current)| CurrentRecord { voltage, current })
        .collect();
    sort_by_voltage(&mut records, |r| r.voltage);

    debug!("{}: {} IV samples", source.name(), records.len());
    Ok(records)
}
