//! Byte offset to line/column conversion.

use text_size::TextSize;

/// Maps byte offsets of one file to 1-indexed line/column pairs.
///
/// Columns count bytes, matching the positions Go tooling reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// 1-indexed (line, column) of `offset`.
    pub fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = offset - self.line_starts[line];
        (line as u32 + 1, u32::from(column) + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
