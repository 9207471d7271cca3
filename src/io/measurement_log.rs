//! ECV measurement log reader.
//!
//! A log interleaves three kinds of lines:
//!
//! - noise: banners, labels and column headers (dropped)
//! - amendment lines containing `F1=`: `F1=740, F2=3700, Amp=0.15, dV=0.2`
//! - data lines: 13 whitespace-separated columns
//!
//! Each data line is extended with the F1/F2/Amp/dV values of the closest
//! amendment line above it. A data line with no amendment above it is a
//! schema violation.

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::domain::{Amendment, LogColumn, LogEntry, LogField};
use crate::error::AppError;
use crate::io::source::TextSource;

/// Tokens that mark banner, label and column-header lines.
pub const NOISE_TOKENS: [&str; 24] = [
    "Spot",
    "Value",
    "Freq.",
    "Dis.",
    "C",
    "G",
    "Rs",
    "dC/dV",
    "FBP",
    "Depl.",
    "N",
    "No.",
    "ECVpro",
    "ID:",
    "Description:",
    "Saved",
    "Spot:",
    "Etch",
    "Ring:",
    "Recipe:",
    "Electrolyte:",
    "Pot:",
    "Contact",
    "ECVision",
];

/// Marker of an amendment line.
pub const AMENDMENT_MARKER: &str = "F1=";

/// Number of whitespace-separated columns on a data line.
pub const DATA_COLUMNS: usize = 13;

/// Maximum byte length of the `MC` column.
pub const MC_WIDTH: usize = 8;

/// When a line counts as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseRule {
    /// Drop the line if any of its tokens is a noise token. This is how the
    /// instrument software filters its own logs, so label lines such as
    /// `ID: 0042` disappear.
    #[default]
    AnyToken,
    /// Drop the line only if every token is a noise token.
    AllTokens,
}

impl NoiseRule {
    fn is_noise(self, tokens: &[&str], noise: &HashSet<&str>) -> bool {
        if tokens.is_empty() {
            return true;
        }
        match self {
            NoiseRule::AnyToken => tokens.iter().any(|t| noise.contains(t)),
            NoiseRule::AllTokens => tokens.iter().all(|t| noise.contains(t)),
        }
    }
}

/// Amendment carried forward through the file.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AmendmentState {
    NoAmendmentSeen,
    Active(Amendment),
}

impl AmendmentState {
    fn current(self, location: &str) -> Result<Amendment, AppError> {
        match self {
            AmendmentState::Active(amendment) => Ok(amendment),
            AmendmentState::NoAmendmentSeen => Err(AppError::schema_violation(format!(
                "{location}: data line before any amendment (F1=...) line."
            ))),
        }
    }
}

/// Read every entry of a log file with the default noise rule.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, AppError> {
    read_log_with(path, NoiseRule::default())
}

pub fn read_log_with(path: &Path, rule: NoiseRule) -> Result<Vec<LogEntry>, AppError> {
    let source = TextSource::open(path)?;
    parse_log(&source, rule)
}

/// Read a log file and return one column per requested field name, each in
/// file order. Field names are checked before the file is opened.
pub fn read_log_fields(path: &Path, names: &[&str]) -> Result<Vec<LogColumn>, AppError> {
    let fields = resolve_fields(names)?;
    let entries = read_log(path)?;
    Ok(columns(&entries, &fields))
}

/// Map field names to `LogField`s; unknown names are a schema violation.
pub fn resolve_fields(names: &[&str]) -> Result<Vec<LogField>, AppError> {
    names.iter().map(|name| name.parse()).collect()
}

/// Extract the requested columns from parsed entries.
pub fn columns(entries: &[LogEntry], fields: &[LogField]) -> Vec<LogColumn> {
    fields.iter().map(|&field| column(entries, field)).collect()
}

fn column(entries: &[LogEntry], field: LogField) -> LogColumn {
    let floats = |get: fn(&LogEntry) -> f32| LogColumn::Float(entries.iter().map(get).collect());
    match field {
        LogField::No => LogColumn::Int(entries.iter().map(|e| e.no).collect()),
        LogField::Lmp => LogColumn::Int(entries.iter().map(|e| e.lmp).collect()),
        LogField::Mc => LogColumn::Text(entries.iter().map(|e| e.mc.clone()).collect()),
        LogField::VEtch => floats(|e| e.v_etch),
        LogField::IEtch => floats(|e| e.i_etch),
        LogField::VMeas => floats(|e| e.v_meas),
        LogField::IMeas => floats(|e| e.i_meas),
        LogField::Dis => floats(|e| e.dis),
        LogField::Fbp => floats(|e| e.fbp),
        LogField::Wr => floats(|e| e.wr),
        LogField::Wd => floats(|e| e.wd),
        LogField::X => floats(|e| e.x),
        LogField::N => floats(|e| e.n),
        LogField::F1 => floats(|e| e.amendment.f1),
        LogField::F2 => floats(|e| e.amendment.f2),
        LogField::Amp => floats(|e| e.amendment.amp),
        LogField::DV => floats(|e| e.amendment.dv),
    }
}

pub fn parse_log(source: &TextSource, rule: NoiseRule) -> Result<Vec<LogEntry>, AppError> {
    let noise: HashSet<&str> = NOISE_TOKENS.into_iter().collect();
    let mut state = AmendmentState::NoAmendmentSeen;
    let mut entries = Vec::new();
    let mut amendments = 0usize;

    for (line_no, line) in source.data_lines(1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if rule.is_noise(&tokens, &noise) {
            continue;
        }

        let location = source.location(line_no);
        if line.contains(AMENDMENT_MARKER) {
            let amendment = parse_amendment(line).map_err(|e| AppError::malformed_record(format!("{location}: {e}")))?;
            debug!("{location}: amendment {amendment:?}");
            state = AmendmentState::Active(amendment);
            amendments += 1;
            continue;
        }

        let amendment = state.current(&location)?;
        let entry = parse_entry(&tokens, amendment).map_err(|e| AppError::malformed_record(format!("{location}: {e}")))?;
        entries.push(entry);
    }

    debug!(
        "{}: {} log entries, {} amendment lines",
        source.name(),
        entries.len(),
        amendments
    );
    Ok(entries)
}

/// Parse `F1=740, F2=3700, Amp=0.15, dV=0.2`. Extra keys are ignored; all four
/// known keys must be present.
pub fn parse_amendment(line: &str) -> Result<Amendment, String> {
    let (mut f1, mut f2, mut amp, mut dv) = (None, None, None, None);

    for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("amendment item without '=': '{part}'"))?;
        let key = key.trim();
        let slot = match key {
            "F1" => &mut f1,
            "F2" => &mut f2,
            "Amp" => &mut amp,
            "dV" => &mut dv,
            _ => continue,
        };
        let value = value.trim();
        let parsed = value
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("amendment `{key}` is not a number: '{value}'"))?;
        *slot = Some(parsed);
    }

    let missing = |key: &str| format!("amendment line has no `{key}`");
    Ok(Amendment {
        f1: f1.ok_or_else(|| missing("F1"))?,
        f2: f2.ok_or_else(|| missing("F2"))?,
        amp: amp.ok_or_else(|| missing("Amp"))?,
        dv: dv.ok_or_else(|| missing("dV"))?,
    })
}

fn parse_entry(tokens: &[&str], amendment: Amendment) -> Result<LogEntry, String> {
    if tokens.len() != DATA_COLUMNS {
        return Err(format!(
            "expected {DATA_COLUMNS} data columns, found {}",
            tokens.len()
        ));
    }

    let int = |field: LogField, idx: usize| {
        tokens[idx]
            .parse::<i32>()
            .map_err(|_| format!("`{field}` is not an integer: '{}'", tokens[idx]))
    };
    let float = |field: LogField, idx: usize| {
        tokens[idx]
            .parse::<f32>()
            .map_err(|_| format!("`{field}` is not a number: '{}'", tokens[idx]))
    };

    let mc = tokens[2];
    if mc.len() > MC_WIDTH {
        return Err(format!("`MC` is longer than {MC_WIDTH} bytes: '{mc}'"));
    }

    Ok(LogEntry {
        no: int(LogField::No, 0)?,
        lmp: int(LogField::Lmp, 1)?,
        mc: mc.to_string(),
        v_etch: float(LogField::VEtch, 3)?,
        i_etch: float(LogField::IEtch, 4)?,
        v_meas: float(LogField::VMeas, 5)?,
        i_meas: float(LogField::IMeas, 6)?,
        dis: float(LogField::Dis, 7)?,
        fbp: float(LogField::Fbp, 8)?,
        wr: float(LogField::Wr, 9)?,
        wd: float(LogField::Wd, 10)?,
        x: float(LogField::X, 11)?,
        n: float(LogField::N, 12)?,
        amendment,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorKind;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    fn parse(text: &str) -> Result<Vec<LogEntry>, AppError> {
        parse_log(&TextSource::from_text("mem", text), NoiseRule::AnyToken)
    }

    const ROW: &str = "1 0 A1 -1.2 0.50 -0.5 0.010 0.12 0.45 0.00 0.11 0.11 1.2e17";

    #[test]
    fn reads_fixture_columns() {
        let cols = read_log_fields(&fixture("test.log"), &["No", "F1"]).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0], LogColumn::Int(vec![1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(
            cols[1],
            LogColumn::Float(vec![740.0, 740.0, 740.0, 740.0, 5555.0, 5555.0, 5555.0])
        );
    }

    #[test]
    fn every_field_has_one_value_per_entry() {
        let entries = read_log(&fixture("test.log")).unwrap();
        let names: Vec<&str> = LogField::ALL.iter().map(|f| f.name()).collect();
        let cols = read_log_fields(&fixture("test.log"), &names).unwrap();
        assert_eq!(cols.len(), 17);
        assert!(cols.iter().all(|c| c.len() == entries.len()));
        assert!(matches!(cols[2], LogColumn::Text(_)));

        let LogColumn::Float(n) = &cols[12] else {
            panic!("expected float column for N");
        };
        assert_eq!(n, &entries.iter().map(|e| e.n).collect::<Vec<_>>());
        let LogColumn::Float(dv) = &cols[16] else {
            panic!("expected float column for dV");
        };
        assert_eq!(dv, &entries.iter().map(|e| e.amendment.dv).collect::<Vec<_>>());
    }

    #[test]
    fn data_before_amendment_is_schema_violation() {
        let text = format!("ECVision log\n{ROW}\nF1=740, F2=3700, Amp=0.15, dV=0.2\n{ROW}\n");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.message().contains("mem:2"));
    }

    #[test]
    fn entries_inherit_nearest_amendment() {
        let text = format!(
            "F1=740, F2=3700, Amp=0.15, dV=0.2\n{ROW}\n\nF1=5555, F2=1000, Amp=0.3, dV=0.1, T=25\n{ROW}\n{ROW}\n"
        );
        let entries = parse(&text).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].amendment.f1, 740.0);
        assert_eq!(entries[0].amendment.dv, 0.2);
        assert_eq!(entries[1].amendment.f1, 5555.0);
        assert_eq!(entries[2].amendment.amp, 0.3);
        assert_eq!(entries[2].mc, "A1");
        assert_eq!(entries[2].n, 1.2e17);
    }

    #[test]
    fn noise_rules_differ_on_mixed_lines() {
        let mixed = "ID: 0042\nF1=740, F2=3700, Amp=0.15, dV=0.2\nNo. Lmp MC\n";
        assert!(parse(mixed).unwrap().is_empty());

        let all_noise = "Spot Value\nF1=740, F2=3700, Amp=0.15, dV=0.2\n";
        let entries = parse_log(&TextSource::from_text("mem", all_noise), NoiseRule::AllTokens).unwrap();
        assert!(entries.is_empty());

        let err = parse_log(&TextSource::from_text("mem", mixed), NoiseRule::AllTokens).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }

    #[test]
    fn malformed_lines_fail() {
        let short = "F1=740, F2=3700, Amp=0.15, dV=0.2\n1 0 A1 -1.2\n";
        assert_eq!(parse(short).unwrap_err().kind(), ErrorKind::MalformedRecord);

        let bad_int = format!("F1=740, F2=3700, Amp=0.15, dV=0.2\n{}\n", ROW.replacen('1', "x", 1));
        assert_eq!(parse(&bad_int).unwrap_err().kind(), ErrorKind::MalformedRecord);

        let long_mc = format!("F1=740, F2=3700, Amp=0.15, dV=0.2\n{}\n", ROW.replace("A1", "TOOLONGMC"));
        assert_eq!(parse(&long_mc).unwrap_err().kind(), ErrorKind::MalformedRecord);

        let partial = "F1=740, F2=3700, Amp=0.15\n";
        assert_eq!(parse(partial).unwrap_err().kind(), ErrorKind::MalformedRecord);

        let junk = "F1=740, F2, Amp=0.15, dV=0.2\n";
        assert_eq!(parse(junk).unwrap_err().kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn unknown_field_name_fails_before_reading() {
        let err = read_log_fields(Path::new("/no/such/file.log"), &["No", "Bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }
}
