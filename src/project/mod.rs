//! Project layout: turning a root path into compilation units.
//!
//! A compilation unit is one directory's Go files, or a single file when the
//! root is a file. [`UnitWalker`] discovers units and tags them with their
//! import path when they lie in a Go module; [`load_file`] reads one source
//! file for a frontend.

mod error;
mod file_loader;
mod module;
mod unit;
mod walker;

pub use error::WalkError;
pub use file_loader::{LoadedFile, is_source_file, is_test_file, load_file};
pub use module::{GO_MOD, GoModule, ModuleResolver, module_path};
pub use unit::CompilationUnit;
pub use walker::{UnitWalker, WalkOptions};

#[cfg(test)]
mod tests;
