//! Line index for converting byte offsets into line/column positions.
//!
//! Diagnostics carry byte offsets; every human-facing output wants lines.
//! The index stores the byte offset of each line start so lookups are a
//! binary search instead of a rescan of the source.

use serde::Serialize;

/// Zero-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Precomputed line starts for a source text.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offset of the first character of every line
    line_starts: Vec<u32>,
    /// Total length in bytes
    len: u32,
    /// Whether the text is pure ASCII (columns == byte distance)
    ascii: bool,
    /// Kept only for non-ASCII text, where columns need a char count
    text: Option<Box<str>>,
}

impl LineIndex {
    /// Build an index for `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }

        let ascii = text.is_ascii();
        Self {
            line_starts,
            len: text.len() as u32,
            ascii,
            text: if ascii { None } else { Some(text.into()) },
        }
    }

    /// Number of lines in the indexed text.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a zero-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to the
    /// end of the text.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];

        let column = match &self.text {
            Some(text) => text[line_start as usize..offset as usize].chars().count() as u32,
            None => offset - line_start,
        };

        (line as u32, column)
    }

    /// Same as [`LineIndex::line_col`] but as a [`LineCol`].
    #[inline]
    pub fn position(&self, offset: u32) -> LineCol {
        let (line, column) = self.line_col(offset);
        LineCol { line, column }
    }

    /// Whether the indexed text was pure ASCII.
    #[inline]
    pub fn is_ascii(&self) -> bool {
        self.ascii
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_ascii() {
        let index = LineIndex::new("abc\ndef\nghi");
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(3), (0, 3));
        assert_eq!(index.line_col(4), (1, 0));
        assert_eq!(index.line_col(8), (2, 0));
        assert_eq!(index.line_col(10), (2, 2));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(100), (0, 2));
    }

    #[test]
    fn test_line_col_counts_chars() {
        // "é" is two bytes
        let source = "const é = 1;\nlet x";
        let index = LineIndex::new(source);
        assert!(!index.is_ascii());
        let x = source.find('x').unwrap() as u32;
        assert_eq!(index.line_col(x), (1, 4));
        let one = source.find('1').unwrap() as u32;
        assert_eq!(index.line_col(one), (0, 10));
    }

    #[test]
    fn test_trailing_newline() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.position(2), LineCol { line: 1, column: 0 });
    }
}
