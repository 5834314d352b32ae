//! Raw-layer parse errors and warnings.

use std::fmt;

/// Result type for raw-line parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error attached to one logical line.
///
/// Every kind is recoverable by design: the reader records the error as a
/// warning, skips the line, and continues. Only I/O failures abort a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Physical line number where the logical line started (1-based).
    pub line: usize,
    /// Additional context.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The logical line has no `:` delimiter outside quoted regions, or the
    /// group/property name is empty or contains disallowed characters.
    LineSyntax,
    /// A `VERSION` line carries an unrecognized version token.
    InvalidVersion,
    /// A `CHARSET` parameter names an unknown character set.
    CharsetDecode,
    /// A quoted-printable value contains a malformed `=XY` escape.
    QuotedPrintableDecode,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineSyntax => write!(f, "unparseable line"),
            Self::InvalidVersion => write!(f, "invalid version"),
            Self::CharsetDecode => write!(f, "unknown charset"),
            Self::QuotedPrintableDecode => write!(f, "malformed quoted-printable"),
        }
    }
}
