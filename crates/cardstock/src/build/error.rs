//! Serialization errors.

use thiserror::Error;

/// An error raised while writing raw properties.
///
/// These are caller mistakes or sink failures. Data that merely does not
/// fit the wire syntax is repaired by escaping and reported as a change
/// notice instead.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Property name is empty or contains characters outside letters,
    /// digits, and hyphen.
    #[error("invalid property name: {0:?}")]
    InvalidName(String),

    /// Group name contains characters outside letters, digits, and hyphen.
    #[error("invalid group name: {0:?}")]
    InvalidGroup(String),

    /// Folding configuration violates an invariant (zero width, indent not
    /// shorter than the width, non-whitespace indent).
    #[error("invalid folding configuration: {0}")]
    InvalidConfig(String),

    /// Underlying sink failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;
