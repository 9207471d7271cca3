//! Export reader output to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{LogColumn, LogField};
use crate::error::AppError;

fn create_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    Ok(csv::Writer::from_writer(file))
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::io(format!("Failed to write export CSV: {e}"))
}

/// Write two aligned columns (e.g. voltage and capacitance) with a header row.
pub fn write_series_csv(path: &Path, headers: [&str; 2], x: &[f64], y: &[f64]) -> Result<(), AppError> {
    if x.len() != y.len() {
        return Err(AppError::usage(format!(
            "Cannot export series of different lengths ({} vs {}).",
            x.len(),
            y.len()
        )));
    }

    let mut writer = create_writer(path)?;
    writer.write_record(headers).map_err(csv_err)?;
    for (a, b) in x.iter().zip(y) {
        writer
            .write_record([format!("{a:.10}"), format!("{b:.10e}")])
            .map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write requested log columns, one CSV column per field.
pub fn write_log_csv(path: &Path, fields: &[LogField], columns: &[LogColumn]) -> Result<(), AppError> {
    if fields.len() != columns.len() {
        return Err(AppError::usage("Log export needs exactly one column per field."));
    }
    let rows = columns.first().map_or(0, LogColumn::len);

    let mut writer = create_writer(path)?;
    writer
        .write_record(fields.iter().map(|f| f.name()))
        .map_err(csv_err)?;
    for idx in 0..rows {
        let record: Vec<String> = columns
            .iter()
            .map(|c| c.display_at(idx).unwrap_or_default())
            .collect();
        writer.write_record(&record).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.csv");
        write_series_csv(&path, ["voltage_v", "cp_uf_cm2"], &[-1.0, -0.9], &[0.002, 0.0141]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap(), vec!["voltage_v", "cp_uf_cm2"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].parse::<f64>().unwrap(), -0.9);
        assert!((rows[1][1].parse::<f64>().unwrap() - 0.0141).abs() < 1e-12);
    }

    #[test]
    fn log_csv_keeps_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let fields = [LogField::No, LogField::Mc, LogField::F1];
        let columns = [
            LogColumn::Int(vec![1, 2]),
            LogColumn::Text(vec!["A1".into(), "A2".into()]),
            LogColumn::Float(vec![740.0, 5555.0]),
        ];
        write_log_csv(&path, &fields, &columns).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "No,MC,F1\n1,A1,740\n2,A2,5555\n");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_series_csv(&dir.path().join("x.csv"), ["a", "b"], &[1.0], &[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
    }
}
