use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::SymbolUniverse;
use crate::base::PackageId;
use crate::project::CompilationUnit;

/// Import paths of the units scanned in one query.
///
/// Each unit's frontend call sees its sibling packages only through import
/// paths, so a type another scanned package declares arrives as imported.
/// Once every unit is in, [`ImportIndex::localize`] points those owners at
/// the resolved packages so signatures compare equal across packages.
#[derive(Debug, Clone, Default)]
pub struct ImportIndex {
    units: FxHashMap<Arc<Path>, SmolStr>,
}

impl ImportIndex {
    pub fn new(units: &[CompilationUnit]) -> Self {
        let units = units
            .iter()
            .filter_map(|unit| Some((unit.shared_path(), SmolStr::from(unit.import_path()?))))
            .collect();
        Self { units }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Packages of `universe` by import path. External test packages
    /// (`foo_test`) cannot be imported.
    fn packages(&self, universe: &SymbolUniverse) -> FxHashMap<SmolStr, PackageId> {
        let mut packages: FxHashMap<SmolStr, PackageId> = FxHashMap::default();
        for package in universe.iter().map(|symbol| &symbol.package) {
            if package.name().ends_with("_test") {
                continue;
            }
            let Some(path) = self.units.get(package.unit()) else {
                continue;
            };
            match packages.entry(path.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(package.clone());
                }
                Entry::Occupied(entry) if entry.get() != package => {
                    tracing::debug!(
                        import = %path,
                        kept = %entry.get(),
                        ignored = %package,
                        "two packages share an import path"
                    );
                }
                Entry::Occupied(_) => {}
            }
        }
        packages
    }

    /// Rewrite imported type owners that name a scanned package. Returns
    /// how many symbols changed.
    pub fn localize(&self, universe: &mut SymbolUniverse) -> usize {
        if self.is_empty() {
            return 0;
        }
        let packages = self.packages(universe);
        if packages.is_empty() {
            return 0;
        }
        let local = |path: &str| packages.get(path).cloned();

        let mut rewritten = 0;
        for symbol in universe.iter_mut() {
            let mut method_set = (*symbol.method_set).clone();
            if method_set.localize(&local) {
                symbol.method_set = Arc::new(method_set);
                rewritten += 1;
            }
        }
        tracing::debug!(
            packages = packages.len(),
            symbols = rewritten,
            "resolved imports of scanned packages"
        );
        rewritten
    }
}
