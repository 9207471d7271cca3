//! Crate-wide error type.
//!
//! Every reader and the fit routine are atomic: they either return a complete
//! result or an `AppError`. The error carries an `ErrorKind` so callers can
//! tell a broken header from a broken record or a degenerate fit, and an exit
//! code for the `ecv` binary.

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File could not be opened or read.
    Io,
    /// A fixed-position header line is missing, has the wrong token count, or
    /// holds a non-numeric token.
    MalformedHeader,
    /// A data line has the wrong field count or a field failed its type
    /// conversion (includes sample-count mismatches).
    MalformedRecord,
    /// Log data line before any amendment line, or an unknown log field name.
    SchemaViolation,
    /// Fit window yields fewer than two usable points or a zero slope.
    DegenerateFit,
    /// Invalid command-line input.
    Usage,
}

impl ErrorKind {
    /// Process exit code used by the binary.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Io | ErrorKind::MalformedHeader | ErrorKind::MalformedRecord | ErrorKind::Usage => 2,
            ErrorKind::SchemaViolation => 3,
            ErrorKind::DegenerateFit => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedHeader, message)
    }

    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRecord, message)
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaViolation, message)
    }

    pub fn degenerate_fit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DegenerateFit, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::malformed_header("x").exit_code(), 2);
        assert_eq!(AppError::schema_violation("x").exit_code(), 3);
        assert_eq!(AppError::degenerate_fit("x").exit_code(), 4);
        assert_eq!(AppError::io("x").kind(), ErrorKind::Io);
    }
}
