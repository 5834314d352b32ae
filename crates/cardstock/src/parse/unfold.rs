//! Physical-line scanning and logical-line unfolding.

use std::io::{self, BufRead};

/// Reads physical lines, splitting on CRLF, CR, or LF.
///
/// Each terminator is consumed fully; a lone CR not followed by LF still
/// ends a line. Bytes are decoded as UTF-8, lossily. Keeps a 1-based
/// counter of physical lines consumed, including lines inside a fold.
struct LineScanner<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> LineScanner<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }

    /// Next physical line without its terminator, or `None` at end of
    /// stream.
    fn read_physical(&mut self) -> io::Result<Option<String>> {
        let mut buf: Vec<u8> = Vec::new();
        let mut saw_any = false;

        loop {
            let chunk = self.reader.fill_buf()?;
            if chunk.is_empty() {
                if !saw_any {
                    return Ok(None);
                }
                break;
            }
            saw_any = true;

            match chunk.iter().position(|&b| b == b'\r' || b == b'\n') {
                Some(pos) => {
                    buf.extend_from_slice(&chunk[..pos]);
                    let terminator = chunk[pos];
                    self.reader.consume(pos + 1);
                    if terminator == b'\r' {
                        // CRLF: consume the LF half, possibly across a
                        // buffer refill
                        let next = self.reader.fill_buf()?;
                        if next.first() == Some(&b'\n') {
                            self.reader.consume(1);
                        }
                    }
                    break;
                }
                None => {
                    buf.extend_from_slice(chunk);
                    let len = chunk.len();
                    self.reader.consume(len);
                }
            }
        }

        self.line_number += 1;
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Unfolds physical lines into logical content lines.
///
/// Holds exactly one physical line of lookahead. A physical line beginning
/// with a single space or tab continues the line in progress (only that one
/// whitespace character is stripped). When the line in progress already
/// shows a quoted-printable `ENCODING` parameter and ends in `=`, that `=`
/// is a soft-break marker: it is stripped, and the next physical line is
/// joined even without leading whitespace — the fold-without-marker
/// continuation some producers emit. Blank physical lines are boundaries
/// and are never merged.
pub struct Unfolder<R> {
    scanner: LineScanner<R>,
    lookahead: Option<String>,
    logical_start: usize,
}

impl<R: BufRead> Unfolder<R> {
    /// Creates an unfolder over a buffered byte stream.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            scanner: LineScanner::new(reader),
            lookahead: None,
            logical_start: 0,
        }
    }

    /// Physical lines consumed so far (1-based for the last line read).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.scanner.line_number
    }

    /// Physical line on which the most recent logical line started.
    #[must_use]
    pub fn logical_line_number(&self) -> usize {
        self.logical_start
    }

    /// Reads the next logical line, or `None` at end of stream.
    ///
    /// ## Errors
    /// Propagates I/O errors from the underlying stream.
    pub fn next_logical(&mut self) -> io::Result<Option<String>> {
        let mut logical = loop {
            let Some(line) = self.take_physical()? else {
                return Ok(None);
            };
            if !line.is_empty() {
                self.logical_start = self.scanner.line_number;
                break line;
            }
        };

        loop {
            let Some(next) = self.take_physical()? else {
                break;
            };
            if next.is_empty() {
                // blank line: boundary, consumed
                break;
            }
            let soft_break = logical.ends_with('=') && is_quoted_printable_prefix(&logical);
            if next.starts_with([' ', '\t']) {
                if soft_break {
                    logical.pop();
                }
                logical.push_str(&next[1..]);
            } else if soft_break {
                logical.pop();
                logical.push_str(&next);
            } else {
                self.lookahead = Some(next);
                break;
            }
        }

        Ok(Some(logical))
    }

    fn take_physical(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.lookahead.take() {
            return Ok(Some(line));
        }
        self.scanner.read_physical()
    }
}

/// Sniffs the already-seen part of a logical line for a quoted-printable
/// `ENCODING` parameter (named or bare), looking only before the first
/// unquoted `:`.
fn is_quoted_printable_prefix(line: &str) -> bool {
    let mut in_quotes = false;
    let mut seg_start = 0usize;
    let mut in_name = true;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' | ':' if !in_quotes => {
                if !in_name && segment_is_quoted_printable(&line[seg_start..i]) {
                    return true;
                }
                if c == ':' {
                    return false;
                }
                in_name = false;
                seg_start = i + 1;
            }
            _ => {}
        }
    }

    // No value delimiter yet; the trailing partial segment counts too.
    !in_name && segment_is_quoted_printable(&line[seg_start..])
}

fn segment_is_quoted_printable(segment: &str) -> bool {
    match segment.split_once('=') {
        Some((name, value)) => {
            name.trim_matches([' ', '\t']).eq_ignore_ascii_case("ENCODING")
                && value
                    .trim_matches([' ', '\t'])
                    .trim_matches('"')
                    .eq_ignore_ascii_case("QUOTED-PRINTABLE")
        }
        None => segment
            .trim_matches([' ', '\t'])
            .eq_ignore_ascii_case("QUOTED-PRINTABLE"),
    }
}
