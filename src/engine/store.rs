//! Clause store: the knowledge base proper.
//!
//! Every ingested source line becomes one [`ClauseRecord`] keyed by the exact
//! line text. Two lines that differ only in spacing or premise order are two
//! records; an identical line read twice is one.
//!
//! A record is either
//!
//! - a **rule** (`head` is `Some`): `premises THEN head`, with `remaining`
//!   counting premises not yet known true, or
//! - a **bare fact** (`head` is `None`): the symbols in `premises` are known
//!   true.
//!
//! Symbols derived by the engine are written back as bare-fact records keyed
//! by the symbol's own name ([`ClauseStore::mark_true`]), so later queries see
//! them in [`ClauseStore::seed_agenda`].

use super::table::OpenTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseRecord {
    head: Option<String>,
    premises: Vec<String>,
    remaining: usize,
}

impl ClauseRecord {
    /// A bare fact asserting `symbols`.
    pub fn fact(symbols: Vec<String>) -> Self {
        ClauseRecord { head: None, remaining: symbols.len(), premises: symbols }
    }

    pub fn rule(premises: Vec<String>, head: String) -> Self {
        ClauseRecord { head: Some(head), remaining: premises.len(), premises }
    }

    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    pub fn premises(&self) -> &[String] {
        &self.premises
    }

    /// Premises not yet known true. Never below zero.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_fact(&self) -> bool {
        self.head.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ClauseStore {
    clauses: OpenTable<ClauseRecord>,
    rules: usize,
    facts: usize,
    derived: usize,
    decrement_calls: u64,
}

impl ClauseStore {
    pub fn new(capacity: usize, max_load: f64) -> Self {
        ClauseStore {
            clauses: OpenTable::with_capacity_and_load(capacity, max_load),
            rules: 0,
            facts: 0,
            derived: 0,
            decrement_calls: 0,
        }
    }

    /// Store the line `raw_line` as a rule (`head` present) or bare fact.
    ///
    /// Returns `false` and leaves the existing record untouched, including its
    /// current count, when `raw_line` is already stored.
    pub fn put_fact_or_rule(&mut self, raw_line: &str, head: Option<&str>, premises: Vec<String>) -> bool {
        if self.clauses.contains_key(raw_line) {
            return false;
        }
        let record = match head {
            Some(head) => {
                self.rules += 1;
                ClauseRecord::rule(premises, head.to_owned())
            }
            None => {
                self.facts += 1;
                ClauseRecord::fact(premises)
            }
        };
        self.clauses.insert(raw_line, record);
        true
    }

    pub fn head(&self, key: &str) -> Option<&str> {
        self.clauses.get(key).and_then(ClauseRecord::head)
    }

    pub fn count(&self, key: &str) -> Option<usize> {
        self.clauses.get(key).map(ClauseRecord::remaining)
    }

    pub fn get(&self, key: &str) -> Option<&ClauseRecord> {
        self.clauses.get(key)
    }

    /// Knock one outstanding premise off `key`.
    ///
    /// Returns `true` iff this call took the count from 1 to 0, i.e. the
    /// clause fires now. The count saturates at 0 and unknown keys are
    /// ignored; both still count towards [`decrement_calls`](Self::decrement_calls).
    pub fn decrement(&mut self, key: &str) -> bool {
        self.decrement_calls += 1;
        match self.clauses.get_mut(key) {
            Some(record) if record.remaining > 0 => {
                record.remaining -= 1;
                record.remaining == 0
            }
            _ => false,
        }
    }

    /// Record `symbol` as a derived bare fact keyed by its own name.
    ///
    /// Returns `false` if a record with that key already exists.
    pub fn mark_true(&mut self, symbol: &str) -> bool {
        if self.clauses.contains_key(symbol) {
            return false;
        }
        self.clauses.insert(symbol, ClauseRecord::fact(vec![symbol.to_owned()]));
        self.derived += 1;
        true
    }

    /// Every symbol asserted by a bare-fact record, in storage order.
    ///
    /// Scans the whole slot array, so the cost tracks capacity rather than
    /// occupancy.
    pub fn seed_agenda(&self) -> Vec<String> {
        self.clauses
            .iter()
            .filter(|(_, record)| record.is_fact())
            .flat_map(|(_, record)| record.premises.iter().cloned())
            .collect()
    }

    /// Total `decrement` calls over the store's lifetime.
    pub fn decrement_calls(&self) -> u64 {
        self.decrement_calls
    }

    /// Records of any kind, derived facts included.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Rule lines ingested from source.
    pub fn rule_count(&self) -> usize {
        self.rules
    }

    /// Bare-fact lines ingested from source.
    pub fn fact_count(&self) -> usize {
        self.facts
    }

    /// Fact records created by [`mark_true`](Self::mark_true).
    pub fn derived_count(&self) -> usize {
        self.derived
    }

    pub(crate) fn capacity(&self) -> usize {
        self.clauses.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::table::{INITIAL_CAPACITY, MAX_LOAD_FACTOR};

    fn store() -> ClauseStore {
        ClauseStore::new(INITIAL_CAPACITY, MAX_LOAD_FACTOR)
    }

    fn syms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rule_records_track_head_and_count() {
        let mut kb = store();
        assert!(kb.put_fact_or_rule("p1 p2 THEN p3", Some("p3"), syms(&["p1", "p2"])));

        assert_eq!(kb.head("p1 p2 THEN p3"), Some("p3"));
        assert_eq!(kb.count("p1 p2 THEN p3"), Some(2));
        assert_eq!(kb.rule_count(), 1);
        assert_eq!(kb.fact_count(), 0);
    }

    #[test]
    fn identical_line_is_stored_once() {
        let mut kb = store();
        assert!(kb.put_fact_or_rule("p1 THEN p2", Some("p2"), syms(&["p1"])));
        kb.decrement("p1 THEN p2");
        assert!(!kb.put_fact_or_rule("p1 THEN p2", Some("p2"), syms(&["p1"])));

        assert_eq!(kb.count("p1 THEN p2"), Some(0));
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.rule_count(), 1);
    }

    #[test]
    fn textually_distinct_lines_are_distinct_records() {
        let mut kb = store();
        kb.put_fact_or_rule("p1 p2 THEN p3", Some("p3"), syms(&["p1", "p2"]));
        kb.put_fact_or_rule("p2 p1 THEN p3", Some("p3"), syms(&["p2", "p1"]));
        kb.put_fact_or_rule("p1  p2 THEN p3", Some("p3"), syms(&["p1", "p2"]));

        assert_eq!(kb.rule_count(), 3);
    }

    #[test]
    fn decrement_fires_once_and_saturates() {
        let mut kb = store();
        kb.put_fact_or_rule("p1 p2 THEN p3", Some("p3"), syms(&["p1", "p2"]));

        assert!(!kb.decrement("p1 p2 THEN p3"));
        assert!(kb.decrement("p1 p2 THEN p3"));
        assert!(!kb.decrement("p1 p2 THEN p3"));
        assert_eq!(kb.count("p1 p2 THEN p3"), Some(0));
        assert_eq!(kb.decrement_calls(), 3);
    }

    #[test]
    fn seed_agenda_lists_facts_only() {
        let mut kb = store();
        kb.put_fact_or_rule("p1", None, syms(&["p1"]));
        kb.put_fact_or_rule("p1 THEN p2", Some("p2"), syms(&["p1"]));
        kb.put_fact_or_rule("p4 p5", None, syms(&["p4", "p5"]));

        let mut seeds = kb.seed_agenda();
        seeds.sort();
        assert_eq!(seeds, ["p1", "p4", "p5"]);
    }

    #[test]
    fn mark_true_makes_symbol_a_seed() {
        let mut kb = store();
        kb.put_fact_or_rule("p1", None, syms(&["p1"]));

        assert!(kb.mark_true("p2"));
        assert!(!kb.mark_true("p2"));
        assert!(!kb.mark_true("p1"));

        let mut seeds = kb.seed_agenda();
        seeds.sort();
        assert_eq!(seeds, ["p1", "p2"]);
        assert_eq!(kb.derived_count(), 1);
        assert_eq!(kb.fact_count(), 1);
    }

    #[test]
    fn unknown_keys_read_as_absent() {
        let mut kb = store();
        assert_eq!(kb.head("p9 THEN p10"), None);
        assert_eq!(kb.count("p9 THEN p10"), None);
        assert!(!kb.decrement("p9 THEN p10"));
    }
}
