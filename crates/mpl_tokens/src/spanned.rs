//! Source locations, and a trait that can provide the [Span] of the complete context of a tree node

use std::fmt::{Display, Formatter};
use std::ops::{Range, RangeInclusive};

/// A trait that can provide the [Span] of the complete context of a node
pub trait Spanned {
    fn span(&self) -> Span;
}

/// A line and column in a source buffer.
///
/// Lines are 1-based. Columns are 0-based and count characters, not bytes.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first position of any buffer
    pub const fn start() -> Self {
        Self::new(1, 0)
    }

    /// Moves this position past `text`
    pub fn advance(&mut self, text: &str) {
        for char in text.chars() {
            if char == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    /// Gets the position after `text`, leaving this one untouched
    pub fn advanced(mut self, text: &str) -> Self {
        self.advance(text);
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range of source text, as byte offsets plus the line/column of both ends
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub struct Span {
    offset: usize,
    len: usize,
    start: Position,
    end: Position,
}

impl Span {
    /// Creates a new span
    pub const fn new(offset: usize, len: usize, start: Position, end: Position) -> Self {
        Self {
            offset,
            len,
            start,
            end,
        }
    }

    /// Creates a span covering `text`, which starts at `offset`/`start`
    pub fn covering(offset: usize, start: Position, text: &str) -> Self {
        Self::new(offset, text.len(), start, start.advanced(text))
    }

    /// Creates an empty span at a location
    pub const fn empty_at(offset: usize, position: Position) -> Self {
        Self::new(offset, 0, position, position)
    }

    /// Gets an empty span directly after this span
    pub const fn after(&self) -> Self {
        Self::empty_at(self.offset + self.len, self.end)
    }

    /// Creates a span that encompasses both
    pub fn join(&self, other: Self) -> Self {
        let (start_offset, start) = if self.offset <= other.offset {
            (self.offset, self.start)
        } else {
            (other.offset, other.start)
        };
        let (end_offset, end) = if self.offset + self.len >= other.offset + other.len {
            (self.offset + self.len, self.end)
        } else {
            (other.offset + other.len, other.end)
        };
        Self::new(start_offset, end_offset - start_offset, start, end)
    }

    /// Checks whether `other` lies completely within this span
    pub fn contains(&self, other: Self) -> bool {
        self.offset <= other.offset && other.offset + other.len <= self.offset + self.len
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn start(&self) -> Position {
        self.start
    }

    pub const fn end(&self) -> Position {
        self.end
    }

    /// The byte range of this span
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Slices the text this span covers out of `source`
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.range())
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// A line reader struct that's responsible for getting lines from a span
#[derive(Debug, Default)]
pub struct LineReader {
    before: usize,
    after: usize,
}

impl LineReader {
    /// Creates a new line reader that gets `before` number of lines before a span and `after` number
    /// of lines after.
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Gets the lines surrounding a span, plus the line the span starts on
    pub fn lines(&self, source: &str, span: &Span) -> (Vec<Line>, usize) {
        let base_line = span.start().line;
        let range: RangeInclusive<usize> =
            base_line.saturating_sub(self.before).max(1)..=base_line.saturating_add(self.after);
        let mut byte_offset = 0usize;
        let mut lines = vec![];
        for (idx, src) in source.split('\n').enumerate() {
            let line = idx + 1;
            if range.contains(&line) {
                lines.push(Line {
                    line,
                    col: if line == base_line {
                        span.start().column
                    } else {
                        0
                    },
                    byte_offset,
                    src: src.trim_end_matches('\r').to_string(),
                });
            }
            byte_offset += src.len() + 1;
        }
        (lines, base_line)
    }
}

#[derive(Debug)]
pub struct Line {
    pub line: usize,
    pub col: usize,
    pub byte_offset: usize,
    pub src: String,
}
