//! Source coordinates attached to declarations, statements and calls.

use std::fmt;

/// Where an entity was written in the source.
///
/// The coordinates double as identity: two declarations never share a
/// `(filename, line, tok)` triple, so [`DebugInfo::unique_string_id`] is used
/// to disambiguate shadowed locals and overloaded functions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DebugInfo {
    pub filename: String,
    pub line: u32,
    pub tok: u32,
}

impl DebugInfo {
    pub fn new(filename: impl Into<String>, line: u32, tok: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
            tok,
        }
    }

    /// `file@line:tok`.
    pub fn unique_string_id(&self) -> String {
        format!("{}@{}:{}", self.filename, self.line, self.tok)
    }
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.tok)
    }
}
