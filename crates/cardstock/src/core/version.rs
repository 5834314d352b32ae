//! vCard version tags.

use std::fmt;

/// A vCard specification version.
///
/// The version selects the escaping, quoting, and parameter syntax tables
/// everywhere in this crate. A stream may switch versions mid-document when
/// a `VERSION` line is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VCardVersion {
    /// vCard 2.1 (the pre-RFC specification).
    V2_1,
    /// vCard 3.0 (RFC 2426).
    V3_0,
    /// vCard 4.0 (RFC 6350).
    V4_0,
}

impl VCardVersion {
    /// Version assumed for a stream until a `VERSION` line is seen.
    pub const DEFAULT: Self = Self::V2_1;

    /// Parses a `VERSION` property value, tolerating surrounding whitespace.
    #[must_use]
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim_matches([' ', '\t']) {
            "2.1" => Some(Self::V2_1),
            "3.0" => Some(Self::V3_0),
            "4.0" => Some(Self::V4_0),
            _ => None,
        }
    }

    /// The wire form of the version number.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
        }
    }

    /// vCard 2.1 predates quoting and comma-separated parameter values; `"`
    /// is an ordinary character and parameter commas are literal.
    #[must_use]
    pub const fn is_old_style(self) -> bool {
        matches!(self, Self::V2_1)
    }
}

impl fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
