use crate::base::constants::BLANK_IDENT;
use crate::frontend::Frontend;
use crate::hir::Symbol;
use crate::project::CompilationUnit;

use super::ResolutionError;

/// Runs the frontend on one compilation unit at a time.
#[derive(Debug, Clone)]
pub struct SymbolCollector<F> {
    frontend: F,
}

impl<F: Frontend> SymbolCollector<F> {
    pub fn new(frontend: F) -> Self {
        Self { frontend }
    }

    /// Symbols declared in `unit`. Whatever the frontend, symbols without a
    /// usable name (empty or `_`) are dropped.
    pub fn collect(
        &self,
        unit: &CompilationUnit,
    ) -> Result<impl Iterator<Item = Symbol> + use<F>, ResolutionError> {
        let table = self
            .frontend
            .resolve(unit)
            .map_err(|err| ResolutionError::new(unit.path(), err))?;
        tracing::debug!(
            unit = %unit.path().display(),
            symbols = table.len(),
            "collected symbols"
        );
        Ok(table
            .into_iter()
            .filter(|symbol| !symbol.name.is_empty() && symbol.name != BLANK_IDENT))
    }
}
