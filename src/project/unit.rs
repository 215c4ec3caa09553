use std::path::{Path, PathBuf};
use std::sync::Arc;

use smol_str::SmolStr;

/// One package scope's worth of source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    path: Arc<Path>,
    files: Vec<PathBuf>,
    single_file: bool,
    import_path: Option<SmolStr>,
}

impl CompilationUnit {
    /// A directory unit. Files are kept sorted.
    pub fn directory(path: impl Into<Arc<Path>>, mut files: Vec<PathBuf>) -> Self {
        files.sort();
        Self {
            path: path.into(),
            files,
            single_file: false,
            import_path: None,
        }
    }

    /// A synthetic unit holding only `file`, using its own package clause.
    pub fn single_file(file: &Path) -> Self {
        Self {
            path: file.into(),
            files: vec![file.to_path_buf()],
            single_file: true,
            import_path: None,
        }
    }

    pub fn with_import_path(mut self, import_path: Option<SmolStr>) -> Self {
        self.import_path = import_path;
        self
    }

    /// Directory of the unit, or the file itself for a single-file unit.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn shared_path(&self) -> Arc<Path> {
        self.path.clone()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_single_file(&self) -> bool {
        self.single_file
    }

    /// Path other packages of the module import this unit's package by,
    /// when the unit lies inside a Go module.
    pub fn import_path(&self) -> Option<&str> {
        self.import_path.as_deref()
    }

    /// Directory holding the unit's files.
    pub fn source_dir(&self) -> &Path {
        if !self.single_file {
            return &self.path;
        }
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
