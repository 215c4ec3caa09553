//! Declaration-level Go frontend.
//!
//! Bodies are never type-checked and imported packages are never loaded:
//! only package-level type declarations and method declarations matter.

mod method_set;
mod scope;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use self::method_set::{MethodTable, concrete_method_set, warn_unpromoted_embeds};
use self::scope::{PackageFile, PackageScope, Underlying};
use super::{Frontend, FrontendError};
use crate::base::{LineIndex, PackageId, TextSize};
use crate::hir::{MethodSet, Symbol, SymbolKind, SymbolTable};
use crate::parser::{Parse, SourceFile, TypeExpr, parse};
use crate::project::{CompilationUnit, load_file};

/// The Go frontend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoFrontend;

impl GoFrontend {
    pub fn new() -> Self {
        Self
    }
}

/// A file parsed off-thread; green trees are `Send`, syntax nodes are not.
struct ParsedSource {
    path: Arc<Path>,
    text: Arc<str>,
    parse: Parse,
}

fn parse_source(path: &Path) -> Result<ParsedSource, FrontendError> {
    let loaded = load_file(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse = parse(&loaded.text);
    Ok(ParsedSource {
        path: loaded.path,
        text: loaded.text,
        parse,
    })
}

impl Frontend for GoFrontend {
    fn resolve(&self, unit: &CompilationUnit) -> Result<SymbolTable, FrontendError> {
        let sources = unit
            .files()
            .par_iter()
            .map(|path| parse_source(path))
            .collect::<Result<Vec<_>, _>>()?;

        // A directory may hold several packages (`foo` and `foo_test`).
        let mut packages: IndexMap<SmolStr, Vec<PackageFile>> = IndexMap::new();
        for source in sources {
            let line_index = LineIndex::new(&source.text);
            let tree = SourceFile::from_parse(&source.parse);
            let file = PackageFile::new(source.path, tree, line_index);
            if let Some(error) = source.parse.errors.first() {
                return Err(FrontendError::syntax(
                    file.position(error.range.start()),
                    error.message.clone(),
                ));
            }
            let Some(name) = file.tree.package_name() else {
                return Err(FrontendError::syntax(
                    file.position(TextSize::new(0)),
                    "expected 'package' clause",
                ));
            };
            packages.entry(name.text().into()).or_default().push(file);
        }

        let mut table = SymbolTable::new(unit.shared_path());
        for (name, files) in packages {
            let package = PackageId::new(unit.shared_path(), name);
            table.extend(resolve_package(package, files)?);
        }
        tracing::debug!(
            unit = %unit.path().display(),
            symbols = table.len(),
            "resolved compilation unit"
        );
        Ok(table)
    }
}

/// Resolve every symbol of one package, in source order.
fn resolve_package(
    package: PackageId,
    files: Vec<PackageFile>,
) -> Result<Vec<Symbol>, FrontendError> {
    let scope = PackageScope::new(package, files)?;
    let methods = MethodTable::collect(&scope)?;
    let mut method_sets: FxHashMap<(SmolStr, bool), Arc<MethodSet>> = FxHashMap::default();
    let mut concrete = |base: &SmolStr, pointer: bool| -> Result<Arc<MethodSet>, FrontendError> {
        let key = (base.clone(), pointer);
        if let Some(set) = method_sets.get(&key) {
            return Ok(set.clone());
        }
        let set = Arc::new(concrete_method_set(&scope, &methods, base, pointer)?);
        method_sets.insert(key, set.clone());
        Ok(set)
    };

    let mut symbols: Vec<(usize, TextSize, Symbol)> = Vec::new();
    for decl in scope.decls() {
        if decl.is_alias() || decl.is_generic() {
            tracing::debug!(
                package = %scope.package,
                name = %decl.name,
                "skipping alias or generic declaration"
            );
            continue;
        }
        if let Some(TypeExpr::Struct(ty)) = decl.spec.ty() {
            warn_unpromoted_embeds(&scope, decl.file, &decl.name, &ty);
        }
        let (kind, method_set, partial) = match scope.underlying_of(&decl.name)? {
            Underlying::Interface {
                constraint: true, ..
            } => {
                tracing::debug!(
                    package = %scope.package,
                    name = %decl.name,
                    "skipping constraint interface"
                );
                continue;
            }
            Underlying::Interface {
                methods, partial, ..
            } => (SymbolKind::Interface, methods, partial),
            _ => (SymbolKind::Concrete, concrete(&decl.name, false)?, false),
        };
        symbols.push((
            decl.file,
            decl.offset,
            Symbol {
                name: decl.name.clone(),
                package: scope.package.clone(),
                kind,
                pointer: false,
                position: decl.position.clone(),
                declaration: decl.position.clone(),
                method_set,
                partial,
            },
        ));
    }

    for site in methods.receivers() {
        let Some(decl) = scope.lookup(&site.base) else {
            continue;
        };
        symbols.push((
            site.file,
            site.offset,
            Symbol {
                name: site.base.clone(),
                package: scope.package.clone(),
                kind: SymbolKind::Concrete,
                pointer: site.pointer,
                position: site.position.clone(),
                declaration: decl.position.clone(),
                method_set: concrete(&site.base, site.pointer)?,
                partial: false,
            },
        ));
    }

    symbols.sort_by_key(|(file, offset, _)| (*file, *offset));
    tracing::trace!(package = %scope.package, symbols = symbols.len(), "resolved package");
    Ok(symbols.into_iter().map(|(_, _, symbol)| symbol).collect())
}
