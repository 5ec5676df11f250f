//! Source locations of decoded blocks.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A position within a configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// 0-based byte offset.
    pub byte: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize, byte: usize) -> Self {
        Self { line, column, byte }
    }
}

/// The source range a block was declared at.
///
/// Two registrations of the same name are only legal when their ranges are
/// equal, since that means the decoder reprocessed the same block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclRange {
    /// File the block was declared in.
    pub filename: String,
    /// Start of the block header.
    pub start: Pos,
    /// End of the block header.
    pub end: Pos,
}

impl DeclRange {
    /// Creates a range spanning `start..end` in `filename`.
    #[must_use]
    pub fn new(filename: impl Into<String>, start: Pos, end: Pos) -> Self {
        Self {
            filename: filename.into(),
            start,
            end,
        }
    }

    /// Creates a single-line range, convenient for blocks whose header fits on one line.
    #[must_use]
    pub fn line(filename: impl Into<String>, line: usize) -> Self {
        Self::new(filename, Pos::new(line, 1, 0), Pos::new(line, 1, 0))
    }
}

impl fmt::Display for DeclRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{}-{},{}",
            self.filename, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_file_and_positions() {
        let range = DeclRange::new("dash.pp", Pos::new(3, 1, 20), Pos::new(3, 18, 37));
        assert_eq!(range.to_string(), "dash.pp:3,1-3,18");
    }

    #[test]
    fn ranges_compare_by_value() {
        assert_eq!(DeclRange::line("a.pp", 1), DeclRange::line("a.pp", 1));
        assert_ne!(DeclRange::line("a.pp", 1), DeclRange::line("a.pp", 2));
        assert_ne!(DeclRange::line("a.pp", 1), DeclRange::line("b.pp", 1));
    }
}
