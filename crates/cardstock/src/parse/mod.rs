//! Raw-line parsing: unfolding, tokenization, and the streaming reader.
//!
//! ## Usage
//!
//! ```rust
//! use cardstock::parse::RawVCardReader;
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:3.0\r\n\
//! FN:John\r\n Doe\r\n\
//! END:VCARD\r\n";
//!
//! let mut reader = RawVCardReader::new(input.as_bytes());
//! reader.read_line().unwrap(); // BEGIN
//! reader.read_line().unwrap(); // VERSION
//! let fn_line = reader.read_line().unwrap().unwrap();
//! assert_eq!(fn_line.value, "JohnDoe");
//! ```

mod error;
mod lexer;
mod reader;
mod unfold;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::tokenize;
pub use reader::RawVCardReader;
pub use unfold::Unfolder;

/// Unfolds a complete document, joining logical lines with `\n`.
///
/// Convenience wrapper around [`Unfolder`] for in-memory input.
#[must_use]
pub fn unfold(input: &str) -> String {
    let mut unfolder = Unfolder::new(input.as_bytes());
    let mut out = String::with_capacity(input.len());
    let mut first = true;

    // reading from a byte slice cannot fail
    while let Ok(Some(line)) = unfolder.next_logical() {
        if !first {
            out.push('\n');
        }
        out.push_str(&line);
        first = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::unfold;

    #[test]
    fn unfold_joins_logical_lines() {
        assert_eq!(unfold("A:1\r\n b\r\nB:2\r\n"), "A:1b\nB:2");
    }

    #[test]
    fn unfold_spec_scenario() {
        assert_eq!(unfold("NOTE:line1\r\n \r\n line2\r\n"), "NOTE:line1line2");
    }
}
