//! Raw property writer.

use std::io::Write;

use super::error::{WriteError, WriteResult};
use super::fold::{FoldedLineWriter, FoldingConfig};
use crate::core::{Charset, Parameter, Parameters, RawLine, VCardVersion};
use crate::escape::{escape_param_value, needs_quoting};
use crate::syntax::NAME_CLASS;

/// Record of a value altered to fit the wire syntax.
///
/// Raised for lossy escaping (stripped or replaced characters) and charset
/// relabeling; reversible escaping is not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValueChange {
    /// Property the parameter belongs to.
    pub property: String,
    /// Parameter name, or `None` for a nameless token.
    pub parameter: Option<String>,
    /// Value as supplied by the caller.
    pub original: String,
    /// Value as written.
    pub modified: String,
}

/// Serializes raw properties through a [`FoldedLineWriter`].
///
/// The writer owns the version and the caret toggle; parameter syntax and
/// escaping follow the active version. Values containing line breaks are
/// re-encoded quoted-printable under 2.1 (with the `ENCODING` and `CHARSET`
/// parameters added) and escaped as `\n` under 3.0/4.0.
pub struct RawVCardWriter<W: Write> {
    folder: FoldedLineWriter<W>,
    version: VCardVersion,
    caret_encoding: bool,
    default_charset: Charset,
    changes: Vec<ParamValueChange>,
}

impl<W: Write> RawVCardWriter<W> {
    /// Creates a writer for `version` with the default folding
    /// configuration.
    #[must_use]
    pub fn new(inner: W, version: VCardVersion) -> Self {
        Self::with_config(inner, version, FoldingConfig::default())
    }

    /// Creates a writer with a custom folding configuration.
    #[must_use]
    pub fn with_config(inner: W, version: VCardVersion, config: FoldingConfig) -> Self {
        Self {
            folder: FoldedLineWriter::with_config(inner, config),
            version,
            caret_encoding: false,
            default_charset: Charset::Utf8,
            changes: Vec::new(),
        }
    }

    /// The version governing parameter syntax and escaping.
    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    /// Switches the target version.
    pub fn set_version(&mut self, version: VCardVersion) {
        self.version = version;
    }

    /// Whether caret encoding (RFC 6868) is used for 3.0/4.0 parameters.
    #[must_use]
    pub fn caret_encoding_enabled(&self) -> bool {
        self.caret_encoding
    }

    /// Enables or disables caret encoding. Off by default.
    pub fn set_caret_encoding_enabled(&mut self, enabled: bool) {
        self.caret_encoding = enabled;
    }

    /// Charset used when a value must be quoted-printable encoded and no
    /// usable `CHARSET` parameter is present.
    #[must_use]
    pub fn default_charset(&self) -> Charset {
        self.default_charset
    }

    /// Sets the default quoted-printable charset.
    pub fn set_default_charset(&mut self, charset: Charset) {
        self.default_charset = charset;
    }

    /// Change notices recorded so far.
    #[must_use]
    pub fn changes(&self) -> &[ParamValueChange] {
        &self.changes
    }

    /// Removes and returns the recorded change notices.
    pub fn take_changes(&mut self) -> Vec<ParamValueChange> {
        std::mem::take(&mut self.changes)
    }

    /// Writes `VERSION:x.y` and switches the writer to that version.
    ///
    /// ## Errors
    /// I/O errors from the sink.
    pub fn write_version(&mut self, version: VCardVersion) -> WriteResult<()> {
        self.write_property(None, "VERSION", &Parameters::new(), version.as_str())?;
        self.version = version;
        Ok(())
    }

    /// Writes a [`RawLine`] as produced by the reader.
    ///
    /// ## Errors
    /// Same conditions as [`Self::write_property`].
    pub fn write_raw_line(&mut self, line: &RawLine) -> WriteResult<()> {
        self.write_property(line.group.as_deref(), &line.name, &line.params, &line.value)
    }

    /// Writes one property as one or more folded physical lines.
    ///
    /// The value is expected to be escaped for its data type already,
    /// except for line breaks, which this writer encodes according to the
    /// version (quoted-printable under 2.1, `\n` under 3.0/4.0).
    ///
    /// ## Errors
    /// `InvalidName`/`InvalidGroup` when the name or group contains
    /// characters outside letters, digits, and hyphen; I/O errors from the
    /// sink.
    pub fn write_property(
        &mut self,
        group: Option<&str>,
        name: &str,
        params: &Parameters,
        value: &str,
    ) -> WriteResult<()> {
        if !NAME_CLASS.matches(name) {
            return Err(WriteError::InvalidName(name.to_owned()));
        }
        if let Some(g) = group
            && !NAME_CLASS.matches(g)
        {
            return Err(WriteError::InvalidGroup(g.to_owned()));
        }

        let has_newline = value.contains(['\r', '\n']);
        let quoted_printable =
            params.is_quoted_printable() || (has_newline && self.version.is_old_style());

        let mut charset = self.default_charset;
        let amended;
        let params = if quoted_printable {
            let mut fixed = params.clone();
            if !fixed.is_quoted_printable() {
                tracing::debug!(property = name, "re-encoding value as quoted-printable");
                fixed.push(Some("ENCODING"), "quoted-printable");
            }
            charset = self.resolve_charset(&mut fixed, name);
            amended = fixed;
            &amended
        } else {
            params
        };

        let mut head = String::new();
        if let Some(g) = group {
            head.push_str(g);
            head.push('.');
        }
        head.push_str(name);
        self.append_params(&mut head, name, params);
        head.push(':');
        self.folder.write(&head)?;

        if quoted_printable {
            self.folder.write_quoted_printable(value, charset)?;
        } else if has_newline {
            self.folder.write(&escape_value_newlines(value))?;
        } else {
            self.folder.write(value)?;
        }
        self.folder.end_line()?;

        Ok(())
    }

    /// Flushes the sink.
    ///
    /// ## Errors
    /// I/O errors from the sink.
    pub fn flush(&mut self) -> WriteResult<()> {
        self.folder.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.folder.into_inner()
    }

    /// Picks the charset for a quoted-printable value and repairs the
    /// `CHARSET` parameter so the emitted label matches the bytes.
    fn resolve_charset(&mut self, params: &mut Parameters, property: &str) -> Charset {
        let label = params.first_value("CHARSET").map(str::to_owned);
        match label {
            None => {
                params.push(Some("CHARSET"), self.default_charset.name());
                self.default_charset
            }
            Some(label) => Charset::lookup(&label).unwrap_or_else(|| {
                let charset = self.default_charset;
                params.set("CHARSET", charset.name());
                self.record_change(
                    property,
                    Some("CHARSET".to_owned()),
                    label,
                    charset.name().to_owned(),
                );
                charset
            }),
        }
    }

    fn append_params(&mut self, head: &mut String, property: &str, params: &Parameters) {
        let old = self.version.is_old_style();
        for param in params {
            if old {
                self.append_param_old(head, property, param);
            } else {
                self.append_param_new(head, property, param);
            }
        }
    }

    /// 2.1 syntax: nameless tokens stay bare, `TYPE` values are expanded to
    /// bare uppercase tokens, everything else repeats `;NAME=value` per
    /// value (commas are literal in 2.1).
    fn append_param_old(&mut self, head: &mut String, property: &str, param: &Parameter) {
        let type_param = param.is_named("TYPE");
        for value in &param.values {
            let (escaped, lossy) = escape_param_value(value, self.version, false);
            if lossy {
                self.record_change(property, param.name.clone(), value.clone(), escaped.clone());
            }
            head.push(';');
            match &param.name {
                None => head.push_str(&escaped),
                Some(_) if type_param => head.push_str(&escaped.to_ascii_uppercase()),
                Some(name) => {
                    head.push_str(name);
                    head.push('=');
                    head.push_str(&escaped);
                }
            }
        }
    }

    /// 3.0/4.0 syntax: `;NAME=v1,v2`, quote-wrapping any escaped value that
    /// still contains `,`, `;`, or `:`.
    fn append_param_new(&mut self, head: &mut String, property: &str, param: &Parameter) {
        head.push(';');
        if let Some(name) = &param.name {
            head.push_str(name);
            head.push('=');
        }
        for (i, value) in param.values.iter().enumerate() {
            if i > 0 {
                head.push(',');
            }
            let (escaped, lossy) = escape_param_value(value, self.version, self.caret_encoding);
            if lossy {
                self.record_change(property, param.name.clone(), value.clone(), escaped.clone());
            }
            if needs_quoting(&escaped) {
                head.push('"');
                head.push_str(&escaped);
                head.push('"');
            } else {
                head.push_str(&escaped);
            }
        }
    }

    fn record_change(
        &mut self,
        property: &str,
        parameter: Option<String>,
        original: String,
        modified: String,
    ) {
        tracing::warn!(
            property,
            parameter = parameter.as_deref().unwrap_or(""),
            %original,
            %modified,
            "value modified to fit the wire syntax"
        );
        self.changes.push(ParamValueChange {
            property: property.to_owned(),
            parameter,
            original,
            modified,
        });
    }
}

/// Replaces raw line breaks with the `\n` escape (3.0/4.0 values).
fn escape_value_newlines(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(version: VCardVersion, f: impl FnOnce(&mut RawVCardWriter<&mut Vec<u8>>)) -> String {
        let mut out = Vec::new();
        let mut writer = RawVCardWriter::new(&mut out, version);
        f(&mut writer);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn type_parameter_expands_old_style() {
        // 2.1 expands TYPE into bare uppercase tokens
        let mut params = Parameters::new();
        params.push(Some("TYPE"), "one");
        params.push(Some("TYPE"), "two");
        params.push(Some("TYPE"), "three");

        let out = written(VCardVersion::V2_1, |w| {
            w.write_property(None, "PROP", &params, "").unwrap();
        });
        assert_eq!(out, "PROP;ONE;TWO;THREE:\r\n");

        let out = written(VCardVersion::V3_0, |w| {
            w.write_property(None, "PROP", &params, "").unwrap();
        });
        assert_eq!(out, "PROP;TYPE=one,two,three:\r\n");
    }

    #[test]
    fn newline_value_is_quoted_printable_old_style() {
        // 2.1 cannot carry a raw line break; 4.0 escapes it
        let out = written(VCardVersion::V2_1, |w| {
            w.write_property(None, "NOTE", &Parameters::new(), "one\r\ntwo")
                .unwrap();
        });
        assert_eq!(
            out,
            "NOTE;ENCODING=quoted-printable;CHARSET=UTF-8:one=0D=0Atwo\r\n"
        );

        let out = written(VCardVersion::V4_0, |w| {
            w.write_property(None, "NOTE", &Parameters::new(), "one\r\ntwo")
                .unwrap();
        });
        assert_eq!(out, "NOTE:one\\ntwo\r\n");
    }

    #[test]
    fn grouped_property() {
        let out = written(VCardVersion::V4_0, |w| {
            w.write_property(Some("item1"), "TEL", &Parameters::new(), "555")
                .unwrap();
        });
        assert_eq!(out, "item1.TEL:555\r\n");
    }

    #[test]
    fn parameter_values_are_quoted_when_needed() {
        let mut params = Parameters::new();
        params.push(Some("LABEL"), "123 Main St, Anytown");

        let out = written(VCardVersion::V4_0, |w| {
            w.write_property(None, "ADR", &params, ";;123 Main St").unwrap();
        });
        assert_eq!(out, "ADR;LABEL=\"123 Main St, Anytown\":;;123 Main St\r\n");
    }

    #[test]
    fn caret_encoding_applies_when_enabled() {
        let mut params = Parameters::new();
        params.push(Some("X-NOTE"), "say \"hi\"\nbye");

        let out = written(VCardVersion::V4_0, |w| {
            w.set_caret_encoding_enabled(true);
            w.write_property(None, "TEL", &params, "555").unwrap();
        });
        assert_eq!(out, "TEL;X-NOTE=say ^'hi^'^nbye:555\r\n");
    }

    #[test]
    fn lossy_escaping_records_a_change() {
        let mut params = Parameters::new();
        params.push(Some("X-NOTE"), "a,b");

        let mut out = Vec::new();
        let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V2_1);
        writer.write_property(None, "TEL", &params, "555").unwrap();
        let changes = writer.take_changes();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].property, "TEL");
        assert_eq!(changes[0].parameter.as_deref(), Some("X-NOTE"));
        assert_eq!(changes[0].original, "a,b");
        assert_eq!(changes[0].modified, "ab");
        assert_eq!(String::from_utf8(out).unwrap(), "TEL;X-NOTE=ab:555\r\n");
    }

    #[test]
    fn explicit_quoted_printable_uses_charset_parameter() {
        let mut params = Parameters::new();
        params.push(Some("ENCODING"), "QUOTED-PRINTABLE");
        params.push(Some("CHARSET"), "ISO-8859-1");

        let out = written(VCardVersion::V2_1, |w| {
            w.write_property(None, "NOTE", &params, "café").unwrap();
        });
        assert_eq!(out, "NOTE;ENCODING=QUOTED-PRINTABLE;CHARSET=ISO-8859-1:caf=E9\r\n");
    }

    #[test]
    fn unknown_charset_is_relabeled() {
        let mut params = Parameters::new();
        params.push(Some("ENCODING"), "QUOTED-PRINTABLE");
        params.push(Some("CHARSET"), "KLINGON");

        let mut out = Vec::new();
        let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V2_1);
        writer.write_property(None, "NOTE", &params, "café").unwrap();

        assert_eq!(writer.changes().len(), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "NOTE;ENCODING=QUOTED-PRINTABLE;CHARSET=UTF-8:caf=C3=A9\r\n"
        );
    }

    #[test]
    fn nameless_parameters_round_trip() {
        let mut params = Parameters::new();
        params.push(None, "HOME");
        params.push(None, "WORK");

        let out = written(VCardVersion::V2_1, |w| {
            w.write_property(None, "ADR", &params, ";;5th Ave").unwrap();
        });
        assert_eq!(out, "ADR;HOME;WORK:;;5th Ave\r\n");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut out = Vec::new();
        let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V4_0);
        assert!(matches!(
            writer.write_property(None, "BAD NAME", &Parameters::new(), "x"),
            Err(WriteError::InvalidName(_))
        ));
        assert!(matches!(
            writer.write_property(Some("bad group"), "FN", &Parameters::new(), "x"),
            Err(WriteError::InvalidGroup(_))
        ));
        assert!(matches!(
            writer.write_property(None, "", &Parameters::new(), "x"),
            Err(WriteError::InvalidName(_))
        ));
    }

    #[test]
    fn write_version_switches_the_writer() {
        let mut out = Vec::new();
        let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V2_1);
        writer.write_version(VCardVersion::V3_0).unwrap();
        assert_eq!(writer.version(), VCardVersion::V3_0);
        assert_eq!(String::from_utf8(out).unwrap(), "VERSION:3.0\r\n");
    }
}
