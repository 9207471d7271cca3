//! Whole-file text access with 1-indexed line addressing.
//!
//! Instrument files are small, so each read call loads the file once, closes
//! it, and works on the lines in memory.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::AppError;

/// Lines of one input file plus a name for error messages.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    lines: Vec<String>,
}

impl TextSource {
    /// Read a file from disk.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Failed to read '{}': {e}", path.display())))?;
        let source = Self::from_text(path.display().to_string(), &text);
        debug!("{}: {} lines", source.name, source.lines.len());
        Ok(source)
    }

    /// Build a source from in-memory text (used by tests and callers that
    /// already hold the file contents).
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line `number` (1-indexed), if present.
    pub fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|idx| self.lines.get(idx)).map(String::as_str)
    }

    /// `file:line` prefix for error messages.
    pub fn location(&self, number: usize) -> String {
        format!("{}:{number}", self.name)
    }

    /// Non-blank lines from `first` (1-indexed) to the end, with their line numbers.
    pub fn data_lines(&self, first: usize) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .skip(first.saturating_sub(1))
            .map(|(idx, line)| (idx + 1, line.as_str()))
            .filter(|(_, line)| !line.trim().is_empty())
    }
}
