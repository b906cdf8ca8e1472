//! Source locations for tokens and diagnostics
//!
//! The grammar engine never sees positions; they travel next to each token
//! so the driver can turn a rejected token into a located error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte offset plus 1-based line and character column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl Position {
    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    pub const fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position after consuming `ch`; a lone `\r` counts as a line break
    pub fn advance(self, ch: char) -> Self {
        let offset = self.offset + ch.len_utf8();
        if matches!(ch, '\n' | '\r') {
            Self::new(offset, self.line + 1, 1)
        } else {
            Self::new(offset, self.line, self.column + 1)
        }
    }

    /// Position after consuming `text`; `\r\n` counts as a single line break
    pub fn advance_str(self, text: &str) -> Self {
        let mut previous = None;
        text.chars().fold(self, |pos, ch| {
            let after_cr = previous.replace(ch) == Some('\r');
            if ch == '\n' && after_cr {
                Self::new(pos.offset + 1, pos.line, pos.column)
            } else {
                pos.advance(ch)
            }
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)` of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "span ends before it starts: {start} > {end}");
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span, used for the synthetic end-of-input token
    pub fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source text covered by this span, if the offsets are valid for `input`
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }
}

/// `line:col-col` on one line, `line:col-line:col` across lines
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            let (line, from, to) = (self.start.line, self.start.column, self.end.column);
            write!(f, "{line}:{from}-{to}")
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value tagged with the source text it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// Text of the 1-based `line` of `source`, without its terminator
pub fn line_of(source: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    source.lines().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::start().advance_str("ab\ncd");
        assert_eq!(pos, Position::new(5, 2, 3));
        assert_eq!(Position::start().advance('é').offset, 2);

        let crlf = Position::start().advance_str("a\r\nb");
        assert_eq!(crlf, Position::new(4, 2, 2));
    }

    #[test]
    fn test_span_merge_and_slice() {
        let source = "var x int";
        let a = Span::new(Position::new(0, 1, 1), Position::new(3, 1, 4));
        let b = Span::new(Position::new(6, 1, 7), Position::new(9, 1, 10));
        let merged = a.merge(b);

        assert_eq!(merged.len(), 9);
        assert_eq!(merged.slice(source), Some("var x int"));
        assert_eq!(a.to_string(), "1:1-4");
        assert!(Span::point(Position::start()).is_empty());
    }

    #[test]
    fn test_line_of() {
        let source = "first\nsecond\r\nthird";
        assert_eq!(line_of(source, 2), Some("second"));
        assert_eq!(line_of(source, 0), None);
        assert_eq!(line_of(source, 9), None);
    }
}
