//! Forward-chaining entailment.
//!
//! A query for symbol `Q` runs a small state machine over an agenda of
//! known-true symbols:
//!
//! ```text
//!             seed_agenda()
//!                  │
//!                  v
//!   ┌──────── Running ◀───────────────────────────┐
//!   │  pop s       │                              │
//!   │  s == Q ─────┼──▶ Found      (return true)  │
//!   │              │                              │
//!   │  first time s is inferred:                  │
//!   │    for c in watch_list(s):                  │
//!   │      decrement(c); count hit 0? ──▶ push head(c), mark_true(head)
//!   │  already inferred: skip ────────────────────┘
//!   │
//!   └─ agenda empty ──▶ Exhausted  (return false)
//! ```
//!
//! The match short-circuits: the query symbol itself is neither marked
//! inferred nor expanded.
//!
//! ## Termination
//!
//! A clause is decremented once per (premise symbol, clause) edge: either
//! when that symbol is inferred for the first time, or when the clause is
//! told and the symbol is already inferred. Inferred flags are never
//! cleared, so the total number of decrements over the engine's whole life is
//! bounded by the number of premise edges, cycles or not.
//!
//! ## Queries share work
//!
//! Inferred flags, clause counts, and derived facts all persist between
//! queries. Each query re-seeds from the store (which now includes earlier
//! derivations) and skips symbols that are already expanded, so a sequence of
//! queries behaves like one fixpoint computation split into pieces. Only a
//! fresh `ForwardChainer` starts over.

use super::metrics::QueryMetrics;
use super::parser::ParsedLine;
use super::registry::InferenceRegistry;
use super::store::ClauseStore;
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryState {
    /// Agenda non-empty, query symbol not seen yet.
    Running,
    /// The query symbol came off the agenda.
    Found,
    /// The agenda drained without reaching the query symbol.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub state: QueryState,
    pub metrics: QueryMetrics,
}

impl QueryResult {
    pub fn entailed(&self) -> bool {
        self.state == QueryState::Found
    }
}

/// Owns the knowledge base and answers entailment queries against it.
#[derive(Debug, Clone)]
pub struct ForwardChainer {
    registry: InferenceRegistry,
    store: ClauseStore,
}

impl ForwardChainer {
    pub fn new(capacity: usize, max_load: f64) -> Self {
        ForwardChainer {
            registry: InferenceRegistry::new(capacity, max_load),
            store: ClauseStore::new(capacity, max_load),
        }
    }

    /// Add one parsed source line to the knowledge base.
    ///
    /// Returns `false` if an identical line was already stored; nothing is
    /// changed in that case, so watch lists never see the same clause twice
    /// from one line.
    ///
    /// A rule told after queries have run is decremented right away for each
    /// premise that is already inferred, since those symbols will never be
    /// expanded again. If that satisfies the rule, its head is stored as a
    /// derived fact and the next query seeds it.
    pub fn tell(&mut self, line: &ParsedLine) -> bool {
        if !self.store.put_fact_or_rule(&line.raw, line.head.as_deref(), line.premises.clone()) {
            tracing::debug!(line = %line.raw, "duplicate line ignored");
            return false;
        }

        match &line.head {
            Some(head) => {
                for premise in &line.premises {
                    self.registry.record_as_premise(premise, &line.raw);
                }
                self.registry.register(head);

                for premise in &line.premises {
                    if self.registry.is_inferred(premise) && self.store.decrement(&line.raw) {
                        tracing::debug!(clause = %line.raw, head = %head, "clause fired on tell");
                        self.store.mark_true(head);
                    }
                }
            }
            None => {
                for symbol in &line.premises {
                    self.registry.register(symbol);
                }
            }
        }
        true
    }

    /// Whether `query` is derivable from the knowledge base.
    pub fn entails(&mut self, query: &str) -> bool {
        self.entails_with_metrics(query).entailed()
    }

    /// Run one query and report its final state plus what it cost.
    pub fn entails_with_metrics(&mut self, query: &str) -> QueryResult {
        let _query = tracing::debug_span!("entails", query).entered();
        let start = Instant::now();
        let mut metrics = QueryMetrics::default();

        let mut agenda: VecDeque<String> = self.store.seed_agenda().into();
        metrics.seeded = agenda.len();

        let mut state = QueryState::Running;
        while state == QueryState::Running {
            let Some(symbol) = agenda.pop_front() else {
                state = QueryState::Exhausted;
                break;
            };
            metrics.dequeued += 1;
            tracing::trace!(symbol = %symbol, pending = agenda.len(), "dequeued");

            if symbol == query {
                state = QueryState::Found;
                continue;
            }

            if !self.registry.mark_inferred(&symbol) {
                metrics.skipped += 1;
                continue;
            }
            metrics.expanded += 1;

            for clause in self.registry.watch_list(&symbol) {
                metrics.decrements += 1;
                if !self.store.decrement(clause) {
                    continue;
                }
                if let Some(head) = self.store.head(clause).map(str::to_owned) {
                    tracing::debug!(clause = %clause, head = %head, "clause fired");
                    self.store.mark_true(&head);
                    metrics.derived.push(head.clone());
                    agenda.push_back(head);
                }
            }
        }

        metrics.elapsed = start.elapsed();
        tracing::debug!(?state, dequeued = metrics.dequeued, fired = metrics.firings(), "query finished");
        QueryResult { state, metrics }
    }

    pub fn store(&self) -> &ClauseStore {
        &self.store
    }

    pub fn registry(&self) -> &InferenceRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parser::parse_source;
    use crate::engine::table::{INITIAL_CAPACITY, MAX_LOAD_FACTOR};

    fn chainer(source: &str) -> ForwardChainer {
        let mut fc = ForwardChainer::new(INITIAL_CAPACITY, MAX_LOAD_FACTOR);
        for line in parse_source(source) {
            fc.tell(&line);
        }
        fc
    }

    #[test]
    fn tell_registers_premises_and_heads() {
        let fc = chainer("p1\np1 p2 THEN p3\n");
        assert_eq!(fc.registry().watch_list("p1"), ["p1 p2 THEN p3"]);
        assert_eq!(fc.registry().watch_list("p2"), ["p1 p2 THEN p3"]);
        assert!(fc.registry().get("p3").is_some());
        assert_eq!(fc.registry().len(), 3);
    }

    #[test]
    fn duplicate_lines_do_not_double_watch() {
        let mut fc = chainer("p1 THEN p2\np1 THEN p2\n");
        assert_eq!(fc.registry().watch_list("p1").len(), 1);
        assert_eq!(fc.store().rule_count(), 1);

        let again = parse_source("p1 THEN p2").remove(0);
        assert!(!fc.tell(&again));
    }

    #[test]
    fn rule_told_late_sees_inferred_premises() {
        let mut fc = chainer("p1\np1 THEN p2\n");
        assert!(!fc.entails("p9"));
        assert!(fc.registry().is_inferred("p2"));

        let late = parse_source("p2 THEN p3").remove(0);
        assert!(fc.tell(&late));
        assert_eq!(fc.store().count("p2 THEN p3"), Some(0));
        assert!(fc.store().get("p3").is_some_and(|r| r.is_fact()));
        assert!(fc.entails("p3"));
    }

    #[test]
    fn rule_told_late_waits_for_unexpanded_premises() {
        let mut fc = chainer("p1\n");
        assert!(fc.entails("p1"));

        let late = parse_source("p1 p2 THEN p3").remove(0);
        assert!(fc.tell(&late));
        assert_eq!(fc.store().count("p1 p2 THEN p3"), Some(2));
        assert!(!fc.entails("p3"));

        let fact = parse_source("p2").remove(0);
        assert!(fc.tell(&fact));
        assert!(fc.entails("p3"));
    }

    #[test]
    fn match_is_not_expanded() {
        let mut fc = chainer("p1\np1 THEN p2\n");
        let res = fc.entails_with_metrics("p1");

        assert_eq!(res.state, QueryState::Found);
        assert!(!fc.registry().is_inferred("p1"));
        assert_eq!(res.metrics.decrements, 0);
        assert_eq!(fc.store().count("p1 THEN p2"), Some(1));
    }

    #[test]
    fn empty_knowledge_base_is_exhausted() {
        let mut fc = chainer("");
        let res = fc.entails_with_metrics("p1");
        assert_eq!(res.state, QueryState::Exhausted);
        assert_eq!(res.metrics.seeded, 0);
    }

    #[test]
    fn derived_symbols_are_materialised() {
        let mut fc = chainer("p1\np1 THEN p2\np2 THEN p3\n");
        assert!(fc.entails("p3"));

        assert_eq!(fc.store().derived_count(), 2);
        assert!(fc.store().get("p2").is_some_and(|r| r.is_fact()));
        assert!(fc.store().get("p3").is_some_and(|r| r.is_fact()));
    }

    #[test]
    fn query_metrics_describe_the_run() {
        let mut fc = chainer("p1\np1 THEN p2\np2 THEN p3\n");
        let res = fc.entails_with_metrics("p3");

        assert!(res.entailed());
        assert_eq!(res.metrics.seeded, 1);
        assert_eq!(res.metrics.dequeued, 3);
        assert_eq!(res.metrics.expanded, 2);
        assert_eq!(res.metrics.decrements, 2);
        assert_eq!(res.metrics.derived, ["p2", "p3"]);
    }
}
