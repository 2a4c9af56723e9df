//! Byte-offset to line/column translation, cached lazily per source.
//!
//! Mirrors the teacher's `Code` wrapper (`lang_pt::Code`): a source buffer
//! paired with a lazily built newline index, so translating an offset to a
//! [`Position`] never re-scans the whole input more than once.

use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

/// A 1-indexed line and column pair.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Wraps the raw grammar source together with a cached newline index so
/// [`PegfmtError`](crate::error::PegfmtError) can report line/column without
/// scanning from the start of the file for every diagnostic.
pub struct Source<'s> {
    pub text: &'s str,
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'s> Source<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            text,
            line_breaks: OnceCell::new(),
        }
    }

    fn line_breaks(&self) -> &[usize] {
        self.line_breaks.get_or_init(|| {
            self.text
                .bytes()
                .enumerate()
                .filter_map(|(i, b)| if b == b'\n' { Some(i) } else { None })
                .collect()
        })
    }

    /// Translate a byte offset into the source into a 1-indexed [`Position`].
    pub fn position_at(&self, offset: usize) -> Position {
        let breaks = self.line_breaks();
        let line = breaks.partition_point(|&b| b < offset);
        let col_start = if line == 0 { 0 } else { breaks[line - 1] + 1 };
        Position::new(line + 1, offset - col_start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let src = Source::new("abc\ndef\n");
        assert_eq!(src.position_at(0), Position::new(1, 1));
    }

    #[test]
    fn after_newline() {
        let src = Source::new("abc\ndef\n");
        assert_eq!(src.position_at(4), Position::new(2, 1));
        assert_eq!(src.position_at(6), Position::new(2, 3));
    }

    #[test]
    fn caches_line_breaks_once() {
        let src = Source::new("a\nb\nc\n");
        let _ = src.position_at(0);
        let _ = src.position_at(2);
        assert_eq!(src.line_breaks().len(), 3);
    }
}
