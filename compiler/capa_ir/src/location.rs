//! Source locations.
//!
//! The parser collaborator hands over `file`, `line`, and `column` for every
//! declaration; the engine only carries them through to diagnostics.

use std::fmt;

/// A position in a grammar source file.
///
/// Lines and columns are 1-based. Ordering is by file, then line, then column,
/// which is the order diagnostics are reported in.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Create a new location.
    #[inline]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Location {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location used for definitions the engine synthesizes itself.
    pub fn generated(origin: &str) -> Self {
        Location::new(format!("<generated:{origin}>"), 0, 0)
    }

    /// Whether this location points at synthesized code.
    #[inline]
    pub fn is_generated(&self) -> bool {
        self.file.starts_with("<generated")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
