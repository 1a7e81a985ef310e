//! Inference registry: what the engine knows about each symbol.
//!
//! For every propositional symbol the registry keeps:
//!
//! - an `inferred` flag, flipped once when the engine first expands the
//!   symbol and never cleared for the lifetime of the registry
//! - the *watch list*: clause keys in which the symbol appears as a premise,
//!   in the order the clauses were ingested
//!
//! The watch list is the inverted index that drives forward chaining: when a
//! symbol becomes true, exactly the clauses on its list lose one outstanding
//! premise. A symbol listed twice in one clause's premises appears twice in
//! that clause's entry here, and so counts twice.

use super::table::OpenTable;

/// Per-symbol state held by the [`InferenceRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolRecord {
    inferred: bool,
    premise_of: Vec<String>,
}

impl SymbolRecord {
    pub fn inferred(&self) -> bool {
        self.inferred
    }

    /// Clause keys watching this symbol, in ingestion order.
    pub fn premise_of(&self) -> &[String] {
        &self.premise_of
    }
}

#[derive(Debug, Clone)]
pub struct InferenceRegistry {
    symbols: OpenTable<SymbolRecord>,
}

impl InferenceRegistry {
    pub fn new(capacity: usize, max_load: f64) -> Self {
        InferenceRegistry { symbols: OpenTable::with_capacity_and_load(capacity, max_load) }
    }

    /// Make `symbol` known with `inferred = false`. No-op if already present.
    pub fn register(&mut self, symbol: &str) {
        self.symbols.get_or_insert_with(symbol, SymbolRecord::default);
    }

    /// Append `clause` to the watch list of `symbol`, registering the symbol
    /// if needed.
    pub fn record_as_premise(&mut self, symbol: &str, clause: &str) {
        self.symbols.get_or_insert_with(symbol, SymbolRecord::default).premise_of.push(clause.to_owned());
    }

    /// Flag `symbol` as inferred. Returns `true` only on the first call for a
    /// symbol; the flag is never reset.
    pub fn mark_inferred(&mut self, symbol: &str) -> bool {
        let record = self.symbols.get_or_insert_with(symbol, SymbolRecord::default);
        !std::mem::replace(&mut record.inferred, true)
    }

    /// `false` for symbols that were never registered.
    pub fn is_inferred(&self, symbol: &str) -> bool {
        self.symbols.get(symbol).is_some_and(SymbolRecord::inferred)
    }

    /// Empty for symbols that were never registered.
    pub fn watch_list(&self, symbol: &str) -> &[String] {
        self.symbols.get(symbol).map(SymbolRecord::premise_of).unwrap_or_default()
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolRecord> {
        self.symbols.get(symbol)
    }

    /// Number of distinct symbols seen.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn inferred_count(&self) -> usize {
        self.symbols.iter().filter(|(_, record)| record.inferred).count()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.symbols.capacity()
    }
}
