//! Content-line tokenizer.
//!
//! Parses one logical line into group, name, parameters, and value. The
//! version decides the parameter syntax: 2.1 treats `"` as an ordinary
//! character, honors `\;` escapes, keeps commas literal, and trims
//! whitespace around `=`; 3.0/4.0 honor quoted regions, split values on
//! unquoted commas, and preserve whitespace literally (a documented quirk).

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::core::{Parameters, RawLine, VCardVersion};
use crate::escape::{decode_value, unescape_param_value};
use crate::syntax::NAME_CLASS;

/// Tokenizes a logical line.
///
/// `caret_decoding` applies to 3.0/4.0 parameter values only and is never
/// auto-detected. The returned line's value is unescaped for `version`,
/// except that quoted-printable values are left raw for the reader to
/// decode.
///
/// ## Errors
/// [`ParseErrorKind::LineSyntax`] when the line has no `:` delimiter
/// outside quoted regions or the group/name is empty or contains
/// disallowed characters; [`ParseErrorKind::InvalidVersion`] when the line
/// is a `VERSION` property with an unrecognized value (the caller decides
/// how to recover).
pub fn tokenize(
    line: &str,
    version: VCardVersion,
    caret_decoding: bool,
    line_number: usize,
) -> ParseResult<RawLine> {
    let (group, name, delim_pos, delim_char) = split_name(line, line_number)?;

    let mut params = Parameters::new();
    let value_raw = if delim_char == ';' {
        let after = &line[delim_pos + 1..];
        let value_offset = parse_params(after, version, caret_decoding, &mut params, line_number)?;
        &after[value_offset..]
    } else {
        &line[delim_pos + 1..]
    };

    if group.is_none()
        && name.eq_ignore_ascii_case("VERSION")
        && VCardVersion::from_token(value_raw).is_none()
    {
        return Err(ParseError::new(
            ParseErrorKind::InvalidVersion,
            line_number,
            format!("unrecognized version: {value_raw:?}"),
        ));
    }

    // Quoted-printable payloads carry no text escapes; the reader decodes
    // them against the right charset.
    let value = if params.is_quoted_printable() {
        value_raw.to_string()
    } else {
        decode_value(value_raw, version)
    };

    Ok(RawLine {
        group: group.map(String::from),
        name: name.to_string(),
        params,
        value,
    })
}

/// Locates the group/name region and its trailing `;` or `:` delimiter.
fn split_name(line: &str, line_number: usize) -> ParseResult<(Option<&str>, &str, usize, char)> {
    let mut group: Option<&str> = None;
    let mut name_start = 0usize;
    let mut delim: Option<(usize, char)> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '.' if group.is_none() => {
                group = Some(&line[..i]);
                name_start = i + 1;
            }
            ';' | ':' => {
                delim = Some((i, c));
                break;
            }
            _ => {}
        }
    }

    let Some((delim_pos, delim_char)) = delim else {
        return Err(ParseError::new(
            ParseErrorKind::LineSyntax,
            line_number,
            "missing colon separator",
        ));
    };

    let name = &line[name_start..delim_pos];
    if !NAME_CLASS.matches(name) {
        return Err(ParseError::new(
            ParseErrorKind::LineSyntax,
            line_number,
            format!("invalid property name: {name:?}"),
        ));
    }
    if let Some(g) = group
        && !NAME_CLASS.matches(g)
    {
        return Err(ParseError::new(
            ParseErrorKind::LineSyntax,
            line_number,
            format!("invalid group name: {g:?}"),
        ));
    }

    Ok((group, name, delim_pos, delim_char))
}

/// Parses the parameter region of `s` into `params` and returns the offset
/// just past the terminating `:`.
fn parse_params(
    s: &str,
    version: VCardVersion,
    caret: bool,
    params: &mut Parameters,
    line_number: usize,
) -> ParseResult<usize> {
    let old = version.is_old_style();
    let mut seg_start = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut value_offset: Option<usize> = None;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if old => escaped = true,
            '"' if !old => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                push_segment(&s[seg_start..i], version, caret, params);
                seg_start = i + 1;
            }
            ':' if !in_quotes => {
                push_segment(&s[seg_start..i], version, caret, params);
                value_offset = Some(i + 1);
                break;
            }
            _ => {}
        }
    }

    value_offset.ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::LineSyntax,
            line_number,
            "missing colon separator",
        )
    })
}

/// Parses one `;`-delimited parameter segment.
fn push_segment(segment: &str, version: VCardVersion, caret: bool, params: &mut Parameters) {
    if segment.is_empty() {
        return;
    }
    let old = version.is_old_style();

    let eq = if old {
        segment.find('=')
    } else {
        find_unquoted_eq(segment)
    };

    match eq {
        Some(pos) => {
            let (mut name, mut value) = (&segment[..pos], &segment[pos + 1..]);
            if old {
                name = name.trim_matches([' ', '\t']);
                value = value.trim_matches([' ', '\t']);
            }
            if old {
                params.push(Some(name), unescape_param_value(value, version, caret));
            } else {
                for sub in split_values(value) {
                    params.push(Some(name), unescape_param_value(&sub, version, caret));
                }
            }
        }
        None => {
            let token = if old {
                segment.trim_matches([' ', '\t'])
            } else {
                segment
            };
            if token.is_empty() {
                return;
            }
            if old {
                params.push(None, unescape_param_value(token, version, caret));
            } else {
                for sub in split_values(token) {
                    params.push(None, unescape_param_value(&sub, version, caret));
                }
            }
        }
    }
}

/// Finds the first `=` outside quoted regions.
fn find_unquoted_eq(segment: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in segment.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '=' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Splits a 3.0/4.0 value list on unquoted commas, stripping the quotes
/// themselves.
fn split_values(s: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in s.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    values.push(current);

    values
}
