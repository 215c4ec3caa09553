//! Frontends: turning a compilation unit into a symbol table.
//!
//! The analysis engine only depends on the [`Frontend`] trait, so any
//! source of symbols can drive it. [`GoFrontend`] is the declaration-level
//! Go frontend shipped with the crate:
//!
//! ```text
//! CompilationUnit
//!     ↓  load + parse files in parallel (rayon)
//! SourceFile per file
//!     ↓  group by package clause
//! PackageScope per package      ← declarations, imports, type lowering
//!     ↓
//! method sets (own + promoted)  ← Go's embedding and receiver rules
//!     ↓
//! SymbolTable
//! ```

mod error;
mod go;

pub use error::FrontendError;
pub use go::GoFrontend;

use crate::hir::SymbolTable;
use crate::project::CompilationUnit;

/// Resolves one compilation unit into the symbols it declares.
///
/// Implementations are called concurrently from several workers.
pub trait Frontend: Send + Sync {
    fn resolve(&self, unit: &CompilationUnit) -> Result<SymbolTable, FrontendError>;
}

impl<F: Frontend + ?Sized> Frontend for &F {
    fn resolve(&self, unit: &CompilationUnit) -> Result<SymbolTable, FrontendError> {
        (**self).resolve(unit)
    }
}
