//! Codec for the vCard text wire format (versions 2.1, 3.0, and 4.0).
//!
//! This crate implements the raw line layer shared by every vCard version:
//! unfolding physical lines into logical content lines, tokenizing a
//! content line into group/name/parameters/value, the version-dependent
//! escaping rules (backslash vs. caret, quoted-printable), and the folding
//! writer that reverses all of it. Mapping named properties to typed
//! objects is the business of consumers of [`RawLine`], not of this crate.
//!
//! The layer is deliberately forgiving: mixed newline conventions,
//! fold-without-marker quoted-printable continuations, unknown charsets,
//! and unparseable lines are all recovered from with recorded warnings.
//! Only I/O failures and invalid caller configuration abort.
//!
//! ## Reading
//!
//! ```rust
//! use cardstock::parse::RawVCardReader;
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:3.0\r\n\
//! FN:John\r\n Doe\r\n\
//! TEL;TYPE=home,voice:+1-555-555-5555\r\n\
//! END:VCARD\r\n";
//!
//! let mut reader = RawVCardReader::new(input.as_bytes());
//! let mut names = Vec::new();
//! while let Some(line) = reader.read_line().unwrap() {
//!     names.push(line.name);
//! }
//! assert_eq!(names, ["BEGIN", "VERSION", "FN", "TEL", "END"]);
//! ```
//!
//! ## Writing
//!
//! ```rust
//! use cardstock::build::RawVCardWriter;
//! use cardstock::core::{Parameters, VCardVersion};
//!
//! let mut out = Vec::new();
//! let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V4_0);
//! writer.write_property(None, "BEGIN", &Parameters::new(), "VCARD").unwrap();
//! writer.write_version(VCardVersion::V4_0).unwrap();
//! writer.write_property(None, "FN", &Parameters::new(), "Jane Doe").unwrap();
//! writer.write_property(None, "END", &Parameters::new(), "VCARD").unwrap();
//!
//! assert!(String::from_utf8(out).unwrap().contains("FN:Jane Doe"));
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - Value types (`RawLine`, `Parameters`, `VCardVersion`, `Charset`)
//! - [`parse`] - Unfolder, tokenizer, and the streaming reader
//! - [`build`] - Folding writer and raw property writer
//! - [`escape`] - Per-version escaping tables
//! - [`quoted_printable`] - Quoted-printable codec

pub mod build;
pub mod core;
pub mod error;
pub mod escape;
pub mod parse;
pub mod quoted_printable;
pub mod syntax;

#[cfg(test)]
mod tests;

pub use self::build::{
    FoldedLineWriter, FoldingConfig, ParamValueChange, RawVCardWriter, WriteError, WriteResult,
};
pub use self::core::{Charset, Parameter, Parameters, RawLine, VCardVersion};
pub use self::error::{CodecError, CodecResult};
pub use self::parse::{ParseError, ParseErrorKind, ParseResult, RawVCardReader, Unfolder};
