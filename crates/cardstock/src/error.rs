//! Crate-level error type.

use thiserror::Error;

use crate::build::WriteError;
use crate::parse::ParseError;

/// Any error this crate can produce.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A parse diagnostic surfaced as an error by a caller.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A write-side failure.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Stream I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias using [`CodecError`].
pub type CodecResult<T> = std::result::Result<T, CodecError>;
