//! Line folding writer.

use std::io::{self, Write};

use super::error::{WriteError, WriteResult};
use crate::core::Charset;
use crate::quoted_printable;

/// Configuration for folding output lines.
///
/// Mutation is meaningful before writing only; changing the configuration
/// mid-line is not supported.
#[derive(Debug, Clone)]
pub struct FoldingConfig {
    line_length: Option<usize>,
    indent: String,
    newline: String,
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            line_length: Some(Self::DEFAULT_LINE_LENGTH),
            indent: " ".to_owned(),
            newline: "\r\n".to_owned(),
        }
    }
}

impl FoldingConfig {
    /// Default fold width in UTF-16 code units.
    pub const DEFAULT_LINE_LENGTH: usize = 75;

    /// The default configuration: width 75, single-space indent, CRLF.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fold width; `None` disables folding entirely.
    ///
    /// ## Errors
    /// `InvalidConfig` for a zero width or a width not greater than the
    /// indent length.
    pub fn line_length(mut self, length: Option<usize>) -> WriteResult<Self> {
        self.line_length = length;
        self.validate()?;
        Ok(self)
    }

    /// Sets the continuation indent (spaces and tabs only, non-empty).
    ///
    /// ## Errors
    /// `InvalidConfig` if the indent is empty, contains other characters,
    /// or is not shorter than the fold width.
    pub fn indent(mut self, indent: impl Into<String>) -> WriteResult<Self> {
        self.indent = indent.into();
        self.validate()?;
        Ok(self)
    }

    /// Sets the newline sequence used for terminators and folds.
    #[must_use]
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    fn validate(&self) -> WriteResult<()> {
        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(WriteError::InvalidConfig(format!(
                "indent must be one or more spaces or tabs, got {:?}",
                self.indent
            )));
        }
        if let Some(length) = self.line_length {
            if length == 0 {
                return Err(WriteError::InvalidConfig(
                    "line length must be greater than zero".to_owned(),
                ));
            }
            if self.indent.len() >= length {
                return Err(WriteError::InvalidConfig(format!(
                    "indent length {} must be shorter than line length {length}",
                    self.indent.len()
                )));
            }
        }
        Ok(())
    }
}

/// A writer that folds content lines at a configurable width.
///
/// Line length is counted in UTF-16 code units. A character encoded as a
/// surrogate pair is written atomically, so no physical line ever ends
/// between the two halves. Whitespace reached at the limit is written past
/// it: folding before whitespace would merge it into the continuation
/// indent and lose it on unfold.
pub struct FoldedLineWriter<W> {
    inner: W,
    config: FoldingConfig,
    line_units: usize,
}

impl<W: Write> FoldedLineWriter<W> {
    /// Creates a folding writer with the default configuration.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, FoldingConfig::default())
    }

    /// Creates a folding writer with `config`.
    #[must_use]
    pub fn with_config(inner: W, config: FoldingConfig) -> Self {
        Self {
            inner,
            config,
            line_units: 0,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FoldingConfig {
        &self.config
    }

    /// Replaces the configuration. Meaningful between lines only.
    pub fn set_config(&mut self, config: FoldingConfig) {
        self.config = config;
    }

    /// Writes text, folding as needed.
    ///
    /// Raw `\r\n`, `\r`, and `\n` in `text` are replaced with the
    /// configured newline sequence and reset the fold counter.
    ///
    /// ## Errors
    /// Propagates I/O errors from the sink.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        let mut chars = text.chars().peekable();
        let mut buf = [0u8; 4];

        while let Some(c) = chars.next() {
            if c == '\r' || c == '\n' {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                self.end_line()?;
                continue;
            }

            if let Some(max) = self.config.line_length
                && self.line_units >= max
                && !c.is_whitespace()
            {
                self.fold()?;
            }

            self.inner.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            self.line_units += c.len_utf16();
        }

        Ok(())
    }

    /// Writes a value quoted-printable encoded, folding with `=` soft
    /// breaks.
    ///
    /// The value is encoded with `charset` first. Fold points never split
    /// an `=XY` triplet, and every non-final physical line ends in `=`, the
    /// quoted-printable soft-break marker.
    ///
    /// ## Errors
    /// Propagates I/O errors from the sink.
    pub fn write_quoted_printable(&mut self, text: &str, charset: Charset) -> io::Result<()> {
        let encoded = quoted_printable::encode(text, charset);
        let bytes = encoded.as_bytes();

        let Some(max) = self.config.line_length else {
            self.inner.write_all(bytes)?;
            self.line_units += bytes.len();
            return Ok(());
        };

        let indent_units = self.config.indent.len();
        let mut i = 0;
        while i < bytes.len() {
            let unit = if bytes[i] == b'=' {
                3.min(bytes.len() - i)
            } else {
                1
            };

            // reserve one unit for the trailing soft-break marker
            if self.line_units + unit + 1 > max && self.line_units > indent_units {
                self.inner.write_all(b"=")?;
                self.inner.write_all(self.config.newline.as_bytes())?;
                self.inner.write_all(self.config.indent.as_bytes())?;
                self.line_units = indent_units;
            }

            self.inner.write_all(&bytes[i..i + unit])?;
            self.line_units += unit;
            i += unit;
        }

        Ok(())
    }

    /// Ends the current physical line with the configured newline.
    ///
    /// ## Errors
    /// Propagates I/O errors from the sink.
    pub fn end_line(&mut self) -> io::Result<()> {
        self.inner.write_all(self.config.newline.as_bytes())?;
        self.line_units = 0;
        Ok(())
    }

    /// Flushes the sink.
    ///
    /// ## Errors
    /// Propagates I/O errors from the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Consumes the writer, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Shared access to the sink.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn fold(&mut self) -> io::Result<()> {
        self.inner.write_all(self.config.newline.as_bytes())?;
        self.inner.write_all(self.config.indent.as_bytes())?;
        self.line_units = self.config.indent.chars().map(char::len_utf16).sum();
        Ok(())
    }
}
