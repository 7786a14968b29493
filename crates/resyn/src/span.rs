//! Line/column source positions.
//!
//! Diagnostics and tokens are addressed by line and column rather than byte
//! offset: the lexer tracks positions as it scans, and every downstream
//! consumer (error reporter, CLI) renders them directly.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A region of source text on a single line.
///
/// Lines and columns are 1-based. `end_col` is exclusive. Tokens never span
/// lines: comments and whitespace runs stop at the newline, and the newline
/// itself is a separate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Span {
    /// 1-based line number
    pub line: u32,
    /// 1-based column of the first character
    pub start_col: u32,
    /// Column one past the last character
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }

    /// Create an empty span at a single position.
    #[must_use]
    pub const fn at(line: u32, col: u32) -> Self {
        Self::new(line, col, col)
    }

    /// Width of the span in columns.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end_col - self.start_col
    }

    /// Check whether the span covers no characters.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start_col == self.end_col
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.start_col)
    }
}
