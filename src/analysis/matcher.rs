use rustc_hash::{FxHashMap, FxHashSet};

use super::{InterfaceName, SymbolUniverse};
use crate::hir::{IdentityKey, Symbol};

/// One target interface and the symbols satisfying it, in discovery order.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub interface: Symbol,
    pub implementers: Vec<Symbol>,
}

/// Which (interface, candidate) pairs have already been tested.
#[derive(Debug, Default)]
pub struct SeenTable {
    pairs: FxHashMap<IdentityKey, FxHashSet<IdentityKey>>,
}

impl SeenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `interface`; false if it was already matched.
    pub fn begin(&mut self, interface: &IdentityKey) -> bool {
        if self.pairs.contains_key(interface) {
            return false;
        }
        self.pairs.insert(interface.clone(), FxHashSet::default());
        true
    }

    /// Record the pair; false if it was already recorded.
    pub fn record(&mut self, interface: &IdentityKey, candidate: IdentityKey) -> bool {
        self.pairs
            .entry(interface.clone())
            .or_default()
            .insert(candidate)
    }

    pub fn contains(&self, interface: &IdentityKey, candidate: &IdentityKey) -> bool {
        self.pairs
            .get(interface)
            .is_some_and(|seen| seen.contains(candidate))
    }
}

/// Structural interface matching over a [`SymbolUniverse`].
#[derive(Debug)]
pub struct ImplementerMatcher<'a> {
    universe: &'a SymbolUniverse,
    concrete_only: bool,
}

impl<'a> ImplementerMatcher<'a> {
    pub fn new(universe: &'a SymbolUniverse) -> Self {
        Self {
            universe,
            concrete_only: false,
        }
    }

    pub fn concrete_only(mut self, concrete_only: bool) -> Self {
        self.concrete_only = concrete_only;
        self
    }

    /// Every distinct interface named `target` with its implementers.
    pub fn find(&self, target: &InterfaceName) -> Vec<MatchResult> {
        let target = target.to_string();
        let mut seen = SeenTable::new();
        let mut results = Vec::new();

        for interface in self.universe.interfaces_named(&target) {
            let key = interface.identity();
            if !seen.begin(&key) {
                continue;
            }
            if interface.partial {
                tracing::warn!(
                    interface = %key,
                    "method set is incomplete without its imported embeds; skipped"
                );
                continue;
            }

            let mut implementers = Vec::new();
            for candidate in self.universe.iter() {
                let candidate_key = candidate.identity();
                if !seen.record(&key, candidate_key.clone()) {
                    continue;
                }
                if candidate.partial || (self.concrete_only && candidate.is_interface()) {
                    continue;
                }
                if candidate_key == key {
                    continue;
                }
                if candidate.method_set.satisfies(&interface.method_set) {
                    implementers.push(candidate.clone());
                }
            }

            tracing::debug!(
                interface = %key,
                implementers = implementers.len(),
                "matched interface"
            );
            results.push(MatchResult {
                interface: interface.clone(),
                implementers,
            });
        }

        if results.is_empty() {
            tracing::debug!(target = %target, "no interface with this name");
        }
        results
    }
}
