use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::base::constants::{SOURCE_EXTENSION, TEST_FILE_SUFFIX};

/// A source file read from disk.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: Arc<Path>,
    pub text: Arc<str>,
}

/// Reads one source file.
pub fn load_file(path: &Path) -> io::Result<LoadedFile> {
    let text = std::fs::read_to_string(path)?;
    tracing::trace!(path = %path.display(), bytes = text.len(), "loaded source file");
    Ok(LoadedFile {
        path: path.into(),
        text: text.into(),
    })
}

/// `*.go`
pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// `*_test.go`
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEST_FILE_SUFFIX))
}
