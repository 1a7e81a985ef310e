//! Knowledge base and entailment engine.
//!
//! This module is the core of the crate. It is split into focused submodules
//! under `src/engine/` while keeping public paths flat (for example
//! `crate::engine::ForwardChainer` and `crate::engine::OpenTable`).
//!
//! ## How the parts work together
//!
//! ```text
//! source text ── parse_source ──▶ ParsedLine*          (parser.rs)
//!                                     │
//!                                     v
//!                           ForwardChainer::tell        (chainer.rs)
//!                             ├─ ClauseStore            (store.rs)
//!                             │    line -> head, premises, remaining
//!                             └─ InferenceRegistry      (registry.rs)
//!                                  symbol -> inferred, watch list
//!                                     │
//! query ──▶ ForwardChainer::entails_with_metrics
//!             - seed agenda from the store's bare facts
//!             - drain agenda, decrement watched clauses
//!             - fired heads go back on the agenda and into the store
//!                                     │
//!                                     v
//!                          QueryResult { state, metrics } (metrics.rs)
//! ```
//!
//! Both the store and the registry are instances of one open-addressing table
//! (`table.rs`): string keys, linear probing, growth on insert.
//!
//! ## Responsibilities by module
//!
//! - `table.rs`: the generic `OpenTable` and its growth policy.
//! - `registry.rs`: per-symbol inferred flag + watch list.
//! - `store.rs`: per-line clause records, agenda seeding, derived facts.
//! - `chainer.rs`: ingestion and the forward-chaining state machine.
//! - `parser.rs`: turns a source line into a `ParsedLine`.
//! - `metrics.rs`: per-query counters and timing.
//!
//! ## Debugging
//!
//! Everything here logs through `tracing`. With the CLI, set
//! `HORNCHAIN_LOG=debug` to see table growth and clause firings, or
//! `HORNCHAIN_LOG=trace` to follow every agenda pop.

#[path = "engine/chainer.rs"]
mod chainer;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/store.rs"]
mod store;
#[path = "engine/table.rs"]
mod table;


pub use chainer::{ForwardChainer, QueryResult, QueryState};
pub use metrics::QueryMetrics;
pub use parser::{LineFlags, ParsedLine, is_symbol, parse_line, parse_source};
pub use registry::{InferenceRegistry, SymbolRecord};
pub use store::{ClauseRecord, ClauseStore};
pub use table::{DeterministicState, INITIAL_CAPACITY, MAX_LOAD_FACTOR, MIN_LOAD_FACTOR, OpenTable};
