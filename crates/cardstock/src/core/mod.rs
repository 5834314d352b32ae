//! Core value types shared by the parse and build sides.

mod charset;
mod line;
mod parameter;
mod version;

pub use charset::Charset;
pub use line::RawLine;
pub use parameter::{Parameter, Parameters};
pub use version::VCardVersion;
