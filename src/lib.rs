//! Propositional entailment by forward chaining.
//!
//! A knowledge base is a list of lines, each either a bare fact (`p1`) or a
//! definite clause (`p1 p2 THEN p3`). [`Session`] loads one and answers
//! "is this symbol derivable?" queries against it.
//!
//! ```
//! use hornchain::{Options, Session};
//!
//! let kb = "p1\np2\np1 p2 THEN p3\np3 THEN p4\n";
//! let mut session = Session::from_source(kb, &Options::default()).unwrap();
//!
//! assert!(session.entails("p4"));
//! assert!(!session.entails("p5"));
//! ```
//!
//! The lower-level pieces (the open-addressing [`OpenTable`], the
//! [`ClauseStore`] and [`InferenceRegistry`] built on it, and the
//! [`ForwardChainer`] that drives them) are exported for callers that want
//! to manage ingestion themselves.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;

pub use api::{KbSummary, Options, QueryOutcome, Session};
pub use engine::{
    ClauseRecord, ClauseStore, DeterministicState, ForwardChainer, INITIAL_CAPACITY, InferenceRegistry, LineFlags,
    MAX_LOAD_FACTOR, MIN_LOAD_FACTOR, OpenTable, ParsedLine, QueryMetrics, QueryResult, QueryState, SymbolRecord,
    is_symbol, parse_line, parse_source,
};
pub use error::{ConfigError, LoadError};
