use crate::hir::Symbol;

/// Every symbol gathered in one query, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct SymbolUniverse {
    symbols: Vec<Symbol>,
}

impl SymbolUniverse {
    pub fn new() -> Self {
        Self::default()
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

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Symbol> {
        self.symbols.iter_mut()
    }

    /// Symbols whose textual type is `pkg.Name`, in any package.
    pub fn lookup<'a>(&'a self, qualified_name: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols
            .iter()
            .filter(move |s| s.type_string() == qualified_name)
    }

    /// Interfaces whose qualified name is `qualified_name`.
    pub fn interfaces_named<'a>(
        &'a self,
        qualified_name: &'a str,
    ) -> impl Iterator<Item = &'a Symbol> {
        self.lookup(qualified_name).filter(|s| s.is_interface())
    }
}

impl Extend<Symbol> for SymbolUniverse {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, iter: I) {
        self.symbols.extend(iter);
    }
}

impl FromIterator<Symbol> for SymbolUniverse {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}
