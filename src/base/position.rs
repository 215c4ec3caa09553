use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A resolved position in a source file (1-indexed line and byte column).
///
/// Displays as `file:line:column`, the conventional compiler format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub file: Arc<Path>,
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(file: Arc<Path>, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Final path component of the file, used for compact listings.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }

    /// Same position rendered with only the final path component.
    pub fn short(&self) -> String {
        format!("{}:{}:{}", self.file_name(), self.line, self.column)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
