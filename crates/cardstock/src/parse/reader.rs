//! Pull-based raw vCard reader.

use std::io::{self, BufRead};

use super::error::{ParseError, ParseErrorKind};
use super::lexer::tokenize;
use super::unfold::Unfolder;
use crate::core::{Charset, RawLine, VCardVersion};
use crate::quoted_printable;

/// Streaming reader producing [`RawLine`]s from a vCard byte stream.
///
/// The reader starts at version 2.1 and re-reads its version from each
/// recognized `VERSION` line. Data errors never abort the stream: the
/// offending line is skipped and a warning is recorded; only I/O failures
/// propagate. Nested documents (an `AGENT` property whose value is itself a
/// vCard) are read by continuing to pull from the same reader, so the
/// physical line counter stays accurate across nesting.
///
/// Not safe to share across threads without external synchronization; each
/// parse session owns its reader.
pub struct RawVCardReader<R> {
    unfolder: Unfolder<R>,
    version: VCardVersion,
    caret_decoding: bool,
    default_charset: Charset,
    warnings: Vec<ParseError>,
}

impl<R: BufRead> RawVCardReader<R> {
    /// Creates a reader over a buffered byte stream.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            unfolder: Unfolder::new(reader),
            version: VCardVersion::DEFAULT,
            caret_decoding: false,
            default_charset: Charset::Utf8,
            warnings: Vec::new(),
        }
    }

    /// The version currently governing tokenization.
    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    /// Overrides the stream version (normally updated by `VERSION` lines).
    pub fn set_version(&mut self, version: VCardVersion) {
        self.version = version;
    }

    /// Whether caret decoding (RFC 6868) is applied to 3.0/4.0 parameters.
    #[must_use]
    pub fn caret_decoding_enabled(&self) -> bool {
        self.caret_decoding
    }

    /// Enables or disables caret decoding. Off by default; never
    /// auto-detected.
    pub fn set_caret_decoding_enabled(&mut self, enabled: bool) {
        self.caret_decoding = enabled;
    }

    /// Charset assumed for quoted-printable values without a usable
    /// `CHARSET` parameter.
    #[must_use]
    pub fn default_charset(&self) -> Charset {
        self.default_charset
    }

    /// Sets the fallback charset for quoted-printable decoding.
    pub fn set_default_charset(&mut self, charset: Charset) {
        self.default_charset = charset;
    }

    /// Physical lines consumed so far, counting lines inside folds.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.unfolder.line_number()
    }

    /// Physical line on which the most recent logical line started.
    #[must_use]
    pub fn logical_line_number(&self) -> usize {
        self.unfolder.logical_line_number()
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[ParseError] {
        &self.warnings
    }

    /// Removes and returns the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.warnings)
    }

    /// Reads the next content line, or `None` at end of stream.
    ///
    /// Unparseable lines are skipped with a warning; quoted-printable
    /// values are decoded before the line is returned.
    ///
    /// ## Errors
    /// Only I/O errors from the underlying stream.
    pub fn read_line(&mut self) -> io::Result<Option<RawLine>> {
        loop {
            let Some(logical) = self.unfolder.next_logical()? else {
                return Ok(None);
            };
            let line_number = self.unfolder.logical_line_number();

            match tokenize(&logical, self.version, self.caret_decoding, line_number) {
                Ok(mut line) => {
                    if line.group.is_none()
                        && line.is_named("VERSION")
                        && let Some(version) = VCardVersion::from_token(&line.value)
                    {
                        tracing::debug!(%version, line_number, "stream version updated");
                        self.version = version;
                    }
                    if line.params.is_quoted_printable() {
                        self.decode_quoted_printable(&mut line, line_number);
                    }
                    return Ok(Some(line));
                }
                Err(warning) => {
                    tracing::warn!(%warning, "skipping unparseable line");
                    self.warnings.push(warning);
                }
            }
        }
    }

    fn decode_quoted_printable(&mut self, line: &mut RawLine, line_number: usize) {
        let charset = match line.param_value("CHARSET") {
            None => self.default_charset,
            Some(label) => {
                if let Some(charset) = Charset::lookup(label) {
                    charset
                } else {
                    let warning = ParseError::new(
                        ParseErrorKind::CharsetDecode,
                        line_number,
                        format!(
                            "unknown charset {label:?}, falling back to {}",
                            self.default_charset.name()
                        ),
                    );
                    tracing::warn!(%warning, "charset fallback");
                    self.warnings.push(warning);
                    self.default_charset
                }
            }
        };

        let (decoded, malformed) = quoted_printable::decode(&line.value, charset);
        if malformed {
            let warning = ParseError::new(
                ParseErrorKind::QuotedPrintableDecode,
                line_number,
                format!(
                    "malformed quoted-printable escape in {} value passed through",
                    line.name
                ),
            );
            tracing::warn!(%warning, "quoted-printable fallback");
            self.warnings.push(warning);
        }
        line.value = decoded;
    }
}
