//! Source positions and spans.
//!
//! Every token, node and diagnostic carries a [`Span`] made of two
//! [`Position`]s. Offsets count Unicode scalar values from the start of the
//! input, lines are 1-based and columns are 0-based.

use serde::Serialize;
use std::fmt;

/// An absolute offset into the source, measured in characters.
pub type TextPos = u32;

/// A line/column/offset triple.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column within the line.
    pub column: u32,
    /// Absolute character offset.
    pub index: TextPos,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32, index: TextPos) -> Self {
        Self { line, column, index }
    }

    /// A position `offset` characters further along the same line.
    #[inline]
    pub fn with_column_offset(self, offset: i32) -> Self {
        Self {
            line: self.line,
            column: (self.column as i64 + offset as i64).max(0) as u32,
            index: (self.index as i64 + offset as i64).max(0) as u32,
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A start/end pair of positions. The end is exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.index >= start.index);
        Self { start, end }
    }

    /// An empty span at a position.
    #[inline]
    pub fn empty(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Length in characters.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end.index - self.start.index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end.index == self.start.index
    }

    /// Whether this span contains the given offset.
    #[inline]
    pub fn contains(&self, index: TextPos) -> bool {
        index >= self.start.index && index < self.end.index
    }

    /// Whether `other` lies entirely inside this span.
    #[inline]
    pub fn encloses(&self, other: &Span) -> bool {
        other.start.index >= self.start.index && other.end.index <= self.end.index
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &Span) -> Span {
        let start = if other.start.index < self.start.index { other.start } else { self.start };
        let end = if other.end.index > self.end.index { other.end } else { self.end };
        Span { start, end }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.index, self.end.index)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Whether `ch` terminates a line in ECMAScript source.
#[inline]
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// A map from character offsets to line numbers, built from source text.
///
/// The lexer tracks lines as it goes; the line map answers the same question
/// for arbitrary offsets (error positions computed after the fact, CLI
/// rendering).
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Character offsets of the start of each line.
    line_starts: Vec<TextPos>,
    start_line: u32,
    start_column: u32,
}

impl LineMap {
    /// Build a line map. `start_line` and `start_column` shift reported
    /// positions for sources embedded in a larger document.
    pub fn new(text: &[char], start_line: u32, start_column: u32) -> Self {
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < text.len() {
            let ch = text[i];
            if ch == '\r' && text.get(i + 1) == Some(&'\n') {
                i += 1;
            }
            if is_line_terminator(ch) {
                line_starts.push((i + 1) as u32);
            }
            i += 1;
        }
        Self { line_starts, start_line, start_column }
    }

    /// Build a line map from a string slice.
    pub fn from_str(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::new(&chars, 1, 0)
    }

    /// Get the 0-based line index for an offset.
    pub fn line_index_of(&self, pos: TextPos) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    /// Get the full position for an offset.
    pub fn position_of(&self, pos: TextPos) -> Position {
        let line = self.line_index_of(pos);
        let mut column = pos - self.line_starts[line];
        if line == 0 {
            column += self.start_column;
        }
        Position::new(self.start_line + line as u32, column, pos)
    }

    /// Get the offset of the start of a 0-based line index.
    pub fn line_start(&self, line: usize) -> TextPos {
        self.line_starts[line]
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_span_union_and_len() {
        let a = Span::new(Position::new(1, 0, 0), Position::new(1, 3, 3));
        let b = Span::new(Position::new(1, 5, 5), Position::new(1, 9, 9));
        let u = a.union(&b);
        assert_eq!(u.start.index, 0);
        assert_eq!(u.end.index, 9);
        assert_eq!(u.len(), 9);
        assert!(u.encloses(&a));
        assert!(!a.encloses(&u));
        assert!(a.contains(2));
        assert!(!a.contains(3));
    }

    #[test]
    fn test_line_map_positions() {
        let map = LineMap::new(&chars("ab\ncd\r\nef"), 1, 0);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_of(0), Position::new(1, 0, 0));
        assert_eq!(map.position_of(4), Position::new(2, 1, 4));
        assert_eq!(map.position_of(7), Position::new(3, 0, 7));
    }

    #[test]
    fn test_line_map_start_offsets() {
        let map = LineMap::new(&chars("x\ny"), 10, 4);
        assert_eq!(map.position_of(0), Position::new(10, 4, 0));
        // Only the first line is shifted by the start column.
        assert_eq!(map.position_of(2), Position::new(11, 0, 2));
    }

    #[test]
    fn test_line_map_unicode_separators() {
        let map = LineMap::new(&chars("a\u{2028}b\u{2029}c"), 1, 0);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_of(4).line, 3);
    }

    #[test]
    fn test_column_offset() {
        let p = Position::new(2, 5, 20);
        assert_eq!(p.with_column_offset(1), Position::new(2, 6, 21));
        assert_eq!(p.with_column_offset(-2), Position::new(2, 3, 18));
    }
}
