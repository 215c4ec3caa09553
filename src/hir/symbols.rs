//! Symbols: the declared types a frontend reports for one compilation unit.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

use super::types::MethodSet;
use crate::base::{PackageId, SourcePosition};

/// Interface or concrete classification of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Interface,
    Concrete,
}

/// A declared type with its resolved method set.
///
/// Receiver symbols (`*T` for a method declared on `*T`) are separate
/// symbols from `T`, but report `T`'s declaration as their position.
/// Once aggregated, only the owners of imported types in the method set are
/// rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub package: PackageId,
    pub kind: SymbolKind,
    /// The symbol denotes `*T` rather than `T`.
    pub pointer: bool,
    /// Where the symbol was found.
    pub position: SourcePosition,
    /// Where the named type behind the symbol is declared.
    pub declaration: SourcePosition,
    pub method_set: Arc<MethodSet>,
    /// The method set lacks methods from packages that were never loaded;
    /// such a symbol is neither a match target nor an implementer.
    pub partial: bool,
}

impl Symbol {
    /// `pkg.Name`, the form interface targets are given in.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package.name(), self.name)
    }

    /// Textual type representation: `pkg.Name` or `*pkg.Name`.
    pub fn type_string(&self) -> String {
        if self.pointer {
            format!("*{}", self.qualified_name())
        } else {
            self.qualified_name()
        }
    }

    /// Display name without the package: `Name` or `*Name`.
    pub fn display_name(&self) -> String {
        if self.pointer {
            format!("*{}", self.name)
        } else {
            self.name.to_string()
        }
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            package: self.package.clone(),
            type_string: self.type_string().into(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == SymbolKind::Interface
    }
}

/// (package identity, textual type) pair deciding whether two symbols are
/// the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub package: PackageId,
    pub type_string: SmolStr,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.type_string, self.package.unit().display())
    }
}

/// Everything one frontend call reports for a compilation unit.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    unit: Option<Arc<Path>>,
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new(unit: impl Into<Arc<Path>>) -> Self {
        Self {
            unit: Some(unit.into()),
            symbols: Vec::new(),
        }
    }

    pub fn unit(&self) -> Option<&Path> {
        self.unit.as_deref()
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Find a symbol by its textual type (`pkg.Name` / `*pkg.Name`).
    pub fn lookup(&self, type_string: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.type_string() == type_string)
    }
}

impl Extend<Symbol> for SymbolTable {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, iter: I) {
        self.symbols.extend(iter);
    }
}

impl IntoIterator for SymbolTable {
    type Item = Symbol;
    type IntoIter = std::vec::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}
