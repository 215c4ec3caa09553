use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to enumerate compilation units under a root.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("{}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: path must be a directory", .0.display())]
    NotADirectory(PathBuf),
}

impl WalkError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        WalkError::Path {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Convert a walkdir failure, keeping the path it occurred at.
    pub(crate) fn from_walkdir(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
        WalkError::Path { path, source }
    }

    pub fn path(&self) -> &Path {
        match self {
            WalkError::Path { path, .. } | WalkError::NotADirectory(path) => path,
        }
    }
}
