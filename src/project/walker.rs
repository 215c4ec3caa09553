use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::WalkError;
use super::file_loader::{is_source_file, is_test_file};
use super::module::ModuleResolver;
use super::unit::CompilationUnit;

/// How a root directory is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Descend into subdirectories; otherwise only the root is analysed.
    pub recursive: bool,
    /// Include `*_test.go` files.
    pub include_tests: bool,
    pub follow_links: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_tests: true,
            follow_links: false,
        }
    }
}

/// Enumerates the compilation units under a root path.
#[derive(Debug, Clone, Default)]
pub struct UnitWalker {
    options: WalkOptions,
}

impl UnitWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// A file root yields one single-file unit; a directory root yields one
    /// unit per directory holding source files, sorted by path. Units inside
    /// a Go module carry their import path.
    pub fn units_for_path(&self, root: &Path) -> Result<Vec<CompilationUnit>, WalkError> {
        let metadata = std::fs::metadata(root).map_err(|e| WalkError::io(root, e))?;
        if metadata.is_dir() {
            self.walk(root)
        } else {
            tracing::debug!(root = %root.display(), "root is a single file");
            Ok(with_import_paths(vec![CompilationUnit::single_file(root)]))
        }
    }

    /// Directory-only entry point; a file root fails with `NotADirectory`.
    pub fn units_in_directory(&self, root: &Path) -> Result<Vec<CompilationUnit>, WalkError> {
        let metadata = std::fs::metadata(root).map_err(|e| WalkError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(WalkError::NotADirectory(root.to_path_buf()));
        }
        self.walk(root)
    }

    fn walk(&self, root: &Path) -> Result<Vec<CompilationUnit>, WalkError> {
        let mut walker = WalkDir::new(root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();
        if !self.options.recursive {
            walker = walker.max_depth(1);
        }

        let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for entry in walker {
            let entry = entry.map_err(|e| WalkError::from_walkdir(root, e))?;
            if !entry.file_type().is_file() || !self.accepts(entry.path()) {
                continue;
            }
            let dir = entry
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            groups.entry(dir).or_default().push(entry.into_path());
        }

        tracing::debug!(root = %root.display(), units = groups.len(), "walked source tree");
        Ok(with_import_paths(
            groups
                .into_iter()
                .map(|(dir, files)| CompilationUnit::directory(dir, files))
                .collect(),
        ))
    }

    fn accepts(&self, path: &Path) -> bool {
        is_source_file(path) && (self.options.include_tests || !is_test_file(path))
    }
}

fn with_import_paths(units: Vec<CompilationUnit>) -> Vec<CompilationUnit> {
    let mut modules = ModuleResolver::new();
    units
        .into_iter()
        .map(|unit| {
            let import_path = modules.import_path(unit.source_dir());
            unit.with_import_path(import_path)
        })
        .collect()
}
