//! Raw-line serialization: the folding writer and the property writer.
//!
//! ## Usage
//!
//! ```rust
//! use cardstock::build::RawVCardWriter;
//! use cardstock::core::{Parameters, VCardVersion};
//!
//! let mut out = Vec::new();
//! let mut writer = RawVCardWriter::new(&mut out, VCardVersion::V4_0);
//! let mut params = Parameters::new();
//! params.push(Some("TYPE"), "home");
//! writer.write_property(None, "TEL", &params, "+1-555-555-5555").unwrap();
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "TEL;TYPE=home:+1-555-555-5555\r\n");
//! ```

mod error;
mod fold;
mod writer;

pub use error::{WriteError, WriteResult};
pub use fold::{FoldedLineWriter, FoldingConfig};
pub use writer::{ParamValueChange, RawVCardWriter};
