//! Source position tracking for the Lithium compiler.
//!
//! Lithium compiles a single source unit at a time (there is no module or
//! file-import system), so this crate is intentionally simpler than a
//! multi-file source manager: one [`SourceFile`] owns the program text and
//! can answer every `{line, column, raw_line_text}` question the reader and
//! diagnostics need.

use std::fmt;

/// A 1-indexed line/column position within a [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl Position {
    /// The position of the first character of a file.
    #[must_use]
    pub const fn start_of_file() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range between two [`Position`]s, both within the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First position covered by the span.
    pub start: Position,
    /// First position past the end of the span.
    pub end: Position,
}

impl Span {
    /// Creates a span covering exactly one position (an empty range at that
    /// point).
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Combines two spans into the smallest span covering both.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

/// The program text being compiled, with precomputed line-start offsets so
/// that `{line, column, raw_line_text}` can be recovered cheaply from any
/// byte offset.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
    /// Byte offset of the first character of each line; `line_starts[0]`
    /// is always `0`.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Builds a new source file, scanning the content once to index line
    /// starts.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            content,
            line_starts,
        }
    }

    fn compute_line_starts(content: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    /// The full source text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Converts a byte offset into a 1-indexed [`Position`].
    ///
    /// Panics if `offset` is past the end of the content; callers only ever
    /// pass offsets produced while scanning this same content.
    #[must_use]
    pub fn position_from_offset(&self, offset: usize) -> Position {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        Position {
            line: line_index + 1,
            column: offset - line_start + 1,
        }
    }

    /// The raw text of the given 1-indexed line, without its trailing
    /// newline. Used to render the offending line underneath a diagnostic.
    #[must_use]
    pub fn raw_line_text(&self, line: usize) -> &str {
        let idx = line - 1;
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.content.len(), |&next| next);
        self.content[start..end].trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Position,
        SourceFile,
    };

    #[test]
    fn position_from_offset_tracks_lines_and_columns() {
        let file = SourceFile::new("(defun f (x)\n  (+ x 1))\n");
        assert_eq!(file.position_from_offset(0), Position { line: 1, column: 1 });
        // offset 13 is the first space on line 2
        assert_eq!(
            file.position_from_offset(13),
            Position { line: 2, column: 1 }
        );
    }

    #[test]
    fn raw_line_text_strips_newline() {
        let file = SourceFile::new("(a)\n(b)\n");
        assert_eq!(file.raw_line_text(1), "(a)");
        assert_eq!(file.raw_line_text(2), "(b)");
    }

    #[test]
    fn raw_line_text_handles_final_line_without_trailing_newline() {
        let file = SourceFile::new("(a)\n(b)");
        assert_eq!(file.raw_line_text(2), "(b)");
    }

    #[test]
    fn span_combine_takes_the_widest_bounds() {
        use super::Span;
        let a = Span::point(Position { line: 1, column: 1 });
        let b = Span::point(Position { line: 1, column: 5 });
        let combined = a.combine(b);
        assert_eq!(combined.start, a.start);
        assert_eq!(combined.end, b.end);
    }
}
