//! Declarative descriptions of fixed-position header lines and fixed-width
//! data columns.
//!
//! Instrument files put their parameters at fixed line numbers. Instead of
//! indexing into split lines ad hoc, each reader declares a `LineSchema`
//! (line number + ordered fields) and validates it when the file is read.

use crate::error::AppError;
use crate::io::source::TextSource;

/// How a header field is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Present in the file but not used; not validated.
    Ignored,
    /// Finite floating point value.
    Float,
    /// Non-negative whole number. The instrument may write it as `19` or `19.0`.
    Count,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn ignored(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Ignored,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
        }
    }

    pub const fn count(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Count,
        }
    }
}

/// A whitespace-separated header line at a fixed (1-indexed) line number.
#[derive(Debug, Clone, Copy)]
pub struct LineSchema {
    pub line: usize,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Converted values of one header line.
#[derive(Debug, Clone)]
pub struct HeaderValues {
    location: String,
    label: &'static str,
    values: Vec<(&'static str, Option<f64>)>,
}

impl LineSchema {
    /// Locate, split and convert the line. Missing line, wrong token count and
    /// non-numeric tokens are all `MalformedHeader`.
    pub fn parse(&self, source: &TextSource) -> Result<HeaderValues, AppError> {
        let location = source.location(self.line);
        let line = source.line(self.line).ok_or_else(|| {
            AppError::malformed_header(format!(
                "{location}: missing {} line (file has {} lines).",
                self.label,
                source.line_count()
            ))
        })?;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != self.fields.len() {
            return Err(AppError::malformed_header(format!(
                "{location}: {} line has {} fields, expected {}.",
                self.label,
                tokens.len(),
                self.fields.len()
            )));
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for (spec, token) in self.fields.iter().zip(tokens) {
            let value = match spec.kind {
                FieldKind::Ignored => None,
                FieldKind::Float => Some(parse_float(token).ok_or_else(|| {
                    AppError::malformed_header(format!(
                        "{location}: {} `{}` is not a number: '{token}'.",
                        self.label, spec.name
                    ))
                })?),
                FieldKind::Count => Some(parse_count(token).ok_or_else(|| {
                    AppError::malformed_header(format!(
                        "{location}: {} `{}` is not a non-negative whole number: '{token}'.",
                        self.label, spec.name
                    ))
                })? as f64),
            };
            values.push((spec.name, value));
        }

        Ok(HeaderValues {
            location,
            label: self.label,
            values,
        })
    }
}

impl HeaderValues {
    fn get(&self, name: &str) -> Result<f64, AppError> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| *v)
            .ok_or_else(|| {
                AppError::malformed_header(format!(
                    "{}: {} line has no value for `{name}`.",
                    self.location, self.label
                ))
            })
    }

    pub fn float(&self, name: &str) -> Result<f64, AppError> {
        self.get(name)
    }

    pub fn count(&self, name: &str) -> Result<usize, AppError> {
        self.get(name).map(|v| v as usize)
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Parse a finite float.
pub fn parse_float(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(token: &str) -> Option<usize> {
    let token = token.trim();
    if let Ok(n) = token.parse::<usize>() {
        return (n <= u32::MAX as usize).then_some(n);
    }
    let v = parse_float(token)?;
    if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as usize)
    } else {
        None
    }
}

/// Cut a line into fixed-width columns (by character), trimming each and
/// dropping empty ones.
pub fn split_fixed_width(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.trim_end().chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SCHEMA: LineSchema = LineSchema {
        line: 2,
        label: "test",
        fields: &[FieldSpec::ignored("skip"), FieldSpec::float("x"), FieldSpec::count("n")],
    };

    #[test]
    fn parses_declared_fields() {
        let src = TextSource::from_text("mem", "header\nabc 1.5 19.0\n");
        let v = SCHEMA.parse(&src).unwrap();
        assert_eq!(v.float("x").unwrap(), 1.5);
        assert_eq!(v.count("n").unwrap(), 19);
        assert!(v.float("skip").is_err());
    }

    #[test]
    fn wrong_token_count_is_malformed_header() {
        let src = TextSource::from_text("mem", "header\n1 2\n");
        let err = SCHEMA.parse(&src).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHeader);
        assert!(err.message().contains("mem:2"));
    }

    #[test]
    fn missing_line_and_bad_numbers_are_malformed_header() {
        let short = TextSource::from_text("mem", "only one line\n");
        assert_eq!(SCHEMA.parse(&short).unwrap_err().kind(), ErrorKind::MalformedHeader);

        let bad_float = TextSource::from_text("mem", "h\n0 abc 3\n");
        assert_eq!(SCHEMA.parse(&bad_float).unwrap_err().kind(), ErrorKind::MalformedHeader);

        for bad_count in ["-1", "2.5", "nan"] {
            let src = TextSource::from_text("mem", &format!("h\n0 1.0 {bad_count}\n"));
            assert_eq!(SCHEMA.parse(&src).unwrap_err().kind(), ErrorKind::MalformedHeader);
        }
    }

    #[test]
    fn fixed_width_split() {
        let line = format!("{:>25}{:>25}", "1.0E-08", "5.0E-07");
        assert_eq!(split_fixed_width(&line, 25), vec!["1.0E-08", "5.0E-07"]);
        assert_eq!(split_fixed_width("1 2", 25), vec!["1 2"]);
    }
}
