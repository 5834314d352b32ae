//! Raw content lines.

use super::parameter::{Parameter, Parameters};

/// One unfolded, tokenized content line.
///
/// The value is stored fully unescaped for the version and escaping mode
/// that were active when the line was read; it is never re-escaped
/// implicitly. Case of the group and name is preserved as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Property group (`item1` in `item1.TEL`), if any.
    pub group: Option<String>,
    /// Property name, case preserved.
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Parameters,
    /// Property value, unescaped.
    pub value: String,
}

impl RawLine {
    /// Creates a line with no group and no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into(),
            params: Parameters::new(),
            value: value.into(),
        }
    }

    /// Returns whether the property name matches (case-insensitive).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// The parameter entry for `name` (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// First value of the parameter `name`.
    #[must_use]
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params.first_value(name)
    }
}
