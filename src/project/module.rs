//! Go modules: mapping directories to import paths through `go.mod`.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Name of the file declaring a module.
pub const GO_MOD: &str = "go.mod";

/// A module rooted at the directory holding its `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    /// The path declared by the `module` directive.
    pub path: SmolStr,
}

impl GoModule {
    /// Load the module declared in `dir`, if `dir` holds a readable `go.mod`
    /// with a `module` directive.
    pub fn load(dir: &Path) -> Option<Self> {
        let file = dir.join(GO_MOD);
        if !file.is_file() {
            return None;
        }
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "unreadable go.mod ignored");
                return None;
            }
        };
        match module_path(&text) {
            Some(path) => Some(Self {
                root: dir.to_path_buf(),
                path,
            }),
            None => {
                tracing::warn!(file = %file.display(), "go.mod without a module directive ignored");
                None
            }
        }
    }

    /// Import path of `dir`, which must lie inside the module root.
    pub fn import_path_of(&self, dir: &Path) -> Option<SmolStr> {
        let relative = dir.strip_prefix(&self.root).ok()?;
        let mut path = self.path.to_string();
        for component in relative.components() {
            let Component::Normal(segment) = component else {
                return None;
            };
            path.push('/');
            path.push_str(segment.to_str()?);
        }
        Some(path.into())
    }
}

/// The path declared by the `module` directive of a `go.mod` file.
pub fn module_path(go_mod: &str) -> Option<SmolStr> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| SmolStr::from(path))
    })
}

/// Finds the enclosing module of directories, caching every lookup.
#[derive(Debug, Default)]
pub struct ModuleResolver {
    modules: FxHashMap<PathBuf, Option<Arc<GoModule>>>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import path of `dir` in its nearest enclosing module, if there is one.
    pub fn import_path(&mut self, dir: &Path) -> Option<SmolStr> {
        let dir = match std::fs::canonicalize(dir) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "cannot canonicalize");
                return None;
            }
        };
        self.module_for(&dir)?.import_path_of(&dir)
    }

    fn module_for(&mut self, dir: &Path) -> Option<Arc<GoModule>> {
        let mut pending = Vec::new();
        let mut found = None;
        for ancestor in dir.ancestors() {
            if let Some(cached) = self.modules.get(ancestor) {
                found = cached.clone();
                break;
            }
            pending.push(ancestor.to_path_buf());
            if let Some(module) = GoModule::load(ancestor) {
                tracing::debug!(root = %module.root.display(), module = %module.path, "found module");
                found = Some(Arc::new(module));
                break;
            }
        }
        for path in pending {
            self.modules.insert(path, found.clone());
        }
        found
    }
}
