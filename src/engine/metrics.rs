//! Per-query engine metrics.
//!
//! Every query collects these counters; they are cheap enough that there is
//! no separate "fast path" without them. [`ForwardChainer::entails`] simply
//! drops them.
//!
//! Counters describe *this* query only. Work done by earlier queries (symbols
//! already inferred, clauses already fired) shows up as `skipped` rather than
//! as fresh decrements.
//!
//! [`ForwardChainer::entails`]: super::ForwardChainer::entails

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryMetrics {
    /// Wall time spent inside the query.
    pub elapsed: Duration,
    /// Symbols placed on the agenda by the initial seed.
    pub seeded: usize,
    /// Symbols taken off the agenda (including the match, if any).
    pub dequeued: usize,
    /// Symbols inferred for the first time and expanded.
    pub expanded: usize,
    /// Symbols dropped because an earlier expansion already covered them.
    pub skipped: usize,
    /// Clause decrements performed.
    pub decrements: usize,
    /// Clauses whose count reached zero, in firing order (their heads).
    pub derived: Vec<String>,
}

impl QueryMetrics {
    /// Number of clauses that fired.
    pub fn firings(&self) -> usize {
        self.derived.len()
    }
}
