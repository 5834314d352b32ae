//! Version-dependent escaping tables for parameter and property values.
//!
//! Writer-side escaping and its reader-side mirror are pure functions
//! dispatched exhaustively on the version and the caret toggle, so the
//! (version × mode) matrix stays checkable by the compiler. Caret escaping
//! (RFC 6868) is selected only by the caller's configuration, never by
//! inspecting content.

use crate::core::VCardVersion;

/// ASCII file separator; never representable in a parameter value.
const FS: char = '\u{1C}';

/// Escapes a parameter value for the wire.
///
/// Returns the escaped text and a flag reporting whether the value was
/// altered lossily (characters stripped or replaced, newlines collapsed).
/// Reversible escaping does not set the flag.
#[must_use]
pub fn escape_param_value(value: &str, version: VCardVersion, caret: bool) -> (String, bool) {
    match (version, caret) {
        (VCardVersion::V2_1, _) => escape_old(value),
        (VCardVersion::V3_0 | VCardVersion::V4_0, false) => escape_backslash(value),
        (VCardVersion::V3_0 | VCardVersion::V4_0, true) => escape_caret(value),
    }
}

/// vCard 2.1: strip `,` `:` `=` `[` `]` FS, backslash-escape `;` and `\`,
/// collapse newlines to a space. No quoting syntax exists.
fn escape_old(value: &str) -> (String, bool) {
    let mut out = String::with_capacity(value.len());
    let mut changed = false;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ',' | ':' | '=' | '[' | ']' | FS => changed = true,
            ';' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
                changed = true;
            }
            '\n' => {
                out.push(' ');
                changed = true;
            }
            _ => out.push(c),
        }
    }

    (out, changed)
}

/// vCard 3.0/4.0, backslash mode: `\` doubled, newline as `\n`, `"`
/// replaced by `'`, FS stripped.
fn escape_backslash(value: &str) -> (String, bool) {
    let mut out = String::with_capacity(value.len());
    let mut changed = false;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            '"' => {
                out.push('\'');
                changed = true;
            }
            FS => changed = true,
            _ => out.push(c),
        }
    }

    (out, changed)
}

/// vCard 3.0/4.0, caret mode (RFC 6868): `^` as `^^`, newline as `^n`, `"`
/// as `^'`, FS stripped.
fn escape_caret(value: &str) -> (String, bool) {
    let mut out = String::with_capacity(value.len());
    let mut changed = false;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '^' => out.push_str("^^"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("^n");
            }
            '\n' => out.push_str("^n"),
            '"' => out.push_str("^'"),
            FS => changed = true,
            _ => out.push(c),
        }
    }

    (out, changed)
}

/// Returns whether an escaped 3.0/4.0 parameter value must be wrapped in
/// double quotes on the wire.
#[must_use]
pub fn needs_quoting(value: &str) -> bool {
    value.contains([',', ';', ':'])
}

/// Reverses [`escape_param_value`] for the given version and mode.
///
/// Caret decoding is applied only when the caller enabled it; the scheme is
/// never auto-detected from the content.
#[must_use]
pub fn unescape_param_value(value: &str, version: VCardVersion, caret: bool) -> String {
    match (version, caret) {
        (VCardVersion::V2_1, _) => unescape_old(value),
        (VCardVersion::V3_0 | VCardVersion::V4_0, false) => unescape_backslash(value),
        (VCardVersion::V3_0 | VCardVersion::V4_0, true) => unescape_caret(value),
    }
}

/// Mirror of [`escape_old`]: only `\;` and `\\` decode; unknown escapes are
/// kept verbatim.
fn unescape_old(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&(next @ (';' | '\\'))) => {
                    chars.next();
                    out.push(next);
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Mirror of [`escape_backslash`]: `\n`/`\N` decode to newline, `\\` to a
/// backslash; unknown escapes are kept verbatim.
fn unescape_backslash(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n' | 'N') => {
                    chars.next();
                    out.push('\n');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Mirror of [`escape_caret`].
fn unescape_caret(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '^' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('\'') => out.push('"'),
                Some('^') => out.push('^'),
                Some(other) => {
                    out.push('^');
                    out.push(other);
                }
                None => out.push('^'),
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Unescapes a property value (the text after the `:` delimiter).
///
/// 3.0/4.0 use the full backslash table with `\n`/`\N` as newline; unknown
/// escapes are kept verbatim. 2.1 has no value-level newline escape, so only
/// `\;` and `\\` decode.
#[must_use]
pub fn decode_value(raw: &str, version: VCardVersion) -> String {
    match version {
        VCardVersion::V2_1 => unescape_old(raw),
        VCardVersion::V3_0 | VCardVersion::V4_0 => unescape_text(raw),
    }
}

/// Full backslash unescape for 3.0/4.0 property values.
fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n' | 'N') => {
                    chars.next();
                    out.push('\n');
                }
                Some(&(next @ (',' | ';' | '\\'))) => {
                    chars.next();
                    out.push(next);
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}
