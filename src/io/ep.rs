//! Electrochemical profile (`*.EP`) reader.
//!
//! Thirteen header lines, then `depth doping` pairs (µm, cm⁻³) in file order.

use std::path::Path;

use log::debug;

use crate::domain::ProfilePoint;
use crate::error::AppError;
use crate::io::schema::parse_float;
use crate::io::source::TextSource;

/// Number of header lines before the profile table.
pub const EP_HEADER_LINES: usize = 13;

/// Read an EP file and return `(doping, depth)` in file order.
pub fn read_ep(path: &Path) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let points = read_ep_points(path)?;
    Ok(points.iter().map(|p| (p.doping, p.depth)).unzip())
}

pub fn read_ep_points(path: &Path) -> Result<Vec<ProfilePoint>, AppError> {
    let source = TextSource::open(path)?;
    parse_ep(&source)
}

pub fn parse_ep(source: &TextSource) -> Result<Vec<ProfilePoint>, AppError> {
    if source.line_count() < EP_HEADER_LINES {
        return Err(AppError::malformed_header(format!(
            "{}: expected {EP_HEADER_LINES} header lines, file has {}.",
            source.name(),
            source.line_count()
        )));
    }

    let mut points = Vec::new();
    for (line_no, line) in source.data_lines(EP_HEADER_LINES + 1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [depth, doping] = tokens.as_slice() else {
            return Err(AppError::malformed_record(format!(
                "{}: expected 2 fields (depth, doping), found {}.",
                source.location(line_no),
                tokens.len()
            )));
        };
        let parse = |name: &str, token: &str| {
            parse_float(token).ok_or_else(|| {
                AppError::malformed_record(format!(
                    "{}: {name} is not a number: '{token}'.",
                    source.location(line_no)
                ))
            })
        };
        points.push(ProfilePoint {
            depth: parse("depth", *depth)?,
            doping: parse("doping", *doping)?,
        });
    }

    debug!("{}: {} profile points", source.name(), points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorKind;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    #[test]
    fn reads_fixture_in_file_order() {
        let (doping, depth) = read_ep(&fixture("test.ep")).unwrap();
        let dop_ref = [1.17e15, 3.381e16, -8.4267e14, 1.4746e17, 1.3958e15];
        let depth_ref = [0.1, 0.86, 0.88, 0.98, 1.0];
        assert_eq!(doping.len(), 5);
        for (got, want) in doping.iter().zip(dop_ref) {
            assert!((got - want).abs() <= 1e-9 * want.abs());
        }
        for (got, want) in depth.iter().zip(depth_ref) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!(doping[2] < 0.0, "negative doping is passed through");
    }

    #[test]
    fn malformed_rows_fail() {
        let mut text = "header\n".repeat(13);
        text.push_str("0.1 1e15\n0.2\n");
        let err = parse_ep(&TextSource::from_text("mem", &text)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(err.message().contains("mem:15"));

        let mut text = "header\n".repeat(13);
        text.push_str("0.1 lots\n");
        let err = parse_ep(&TextSource::from_text("mem", &text)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn truncated_header_fails() {
        let err = parse_ep(&TextSource::from_text("mem", "a\nb\n")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHeader);
    }
}
