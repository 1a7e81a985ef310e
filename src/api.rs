use crate::engine::{ForwardChainer, INITIAL_CAPACITY, MAX_LOAD_FACTOR, MIN_LOAD_FACTOR, QueryMetrics, QueryState, parse_line};
use crate::error::{ConfigError, LoadError};
use std::path::Path;

/// Options that shape the backing tables.
///
/// Both tables (clause store and inference registry) start at
/// `initial_capacity` slots and grow to `2 * capacity + 2` whenever a new key
/// would push their load factor above `max_load_factor`, which must lie in
/// `[MIN_LOAD_FACTOR, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options { initial_capacity: INITIAL_CAPACITY, max_load_factor: MAX_LOAD_FACTOR }
    }
}

impl Options {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(ConfigError::LoadFactor(self.max_load_factor));
        }
        if self.max_load_factor < MIN_LOAD_FACTOR {
            return Err(ConfigError::LoadFactorTooSmall(self.max_load_factor));
        }
        Ok(())
    }
}

/// Source lines of the loaded knowledge base, in file order.
///
/// Duplicate lines and lines that do not describe a clause are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KbSummary {
    /// Lines of the form `premises THEN head`.
    pub rules: Vec<String>,
    /// Bare-fact lines.
    pub facts: Vec<String>,
}

/// Answer to one query made through [`Session::query`].
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub state: QueryState,
    pub metrics: QueryMetrics,
}

impl QueryOutcome {
    pub fn entailed(&self) -> bool {
        self.state == QueryState::Found
    }
}

/// A loaded knowledge base plus the engine state built up by its queries.
///
/// Inferred symbols and derived facts carry over from one query to the next;
/// build a new `Session` to start from a clean slate.
///
/// # Example
/// ```
/// use hornchain::{Options, Session};
///
/// let mut kb = Session::from_source("p1\np1 THEN p2\n", &Options::default()).unwrap();
/// assert!(kb.entails("p2"));
/// assert!(!kb.entails("p3"));
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    chainer: ForwardChainer,
    summary: KbSummary,
}

impl Session {
    /// A session with no facts or rules; every query answers `false`.
    pub fn empty(options: &Options) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Session {
            chainer: ForwardChainer::new(options.initial_capacity, options.max_load_factor),
            summary: KbSummary::default(),
        })
    }

    /// Build a session from knowledge-base text, one entry per line.
    pub fn from_source(text: &str, options: &Options) -> Result<Self, ConfigError> {
        let mut session = Self::empty(options)?;
        for line in text.lines() {
            session.tell(line);
        }
        tracing::debug!(
            rules = session.summary.rules.len(),
            facts = session.summary.facts.len(),
            symbols = session.chainer.registry().len(),
            store_capacity = session.chainer.store().capacity(),
            registry_capacity = session.chainer.registry().capacity(),
            "knowledge base loaded"
        );
        Ok(session)
    }

    /// Read and load the knowledge-base file at `path`.
    pub fn load(path: impl AsRef<Path>, options: &Options) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Unreadable { path: path.to_path_buf(), source })?;
        Ok(Self::from_source(&text, options)?)
    }

    /// Add one more source line. Returns `false` if the line was blank,
    /// malformed, or already present.
    ///
    /// Safe to call between queries: answers afterwards are the same as for a
    /// fresh session loaded with every line told so far.
    pub fn tell(&mut self, line: &str) -> bool {
        let Some(parsed) = parse_line(line) else {
            return false;
        };
        if !self.chainer.tell(&parsed) {
            return false;
        }
        let listing = if parsed.is_rule() { &mut self.summary.rules } else { &mut self.summary.facts };
        listing.push(parsed.raw);
        true
    }

    pub fn entails(&mut self, query: &str) -> bool {
        self.chainer.entails(query)
    }

    pub fn query(&mut self, query: &str) -> QueryOutcome {
        let result = self.chainer.entails_with_metrics(query);
        QueryOutcome { query: query.to_string(), state: result.state, metrics: result.metrics }
    }

    pub fn summary(&self) -> &KbSummary {
        &self.summary
    }

    /// Clause decrements performed by every query so far.
    pub fn lifetime_decrements(&self) -> u64 {
        self.chainer.store().decrement_calls()
    }

    pub fn chainer(&self) -> &ForwardChainer {
        &self.chainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_options_validate() {
        assert_eq!(Options::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let zero = Options { initial_capacity: 0, ..Options::default() };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroCapacity));

        for load in [0.0, 1.0, -0.5, f64::NAN] {
            let opts = Options { max_load_factor: load, ..Options::default() };
            assert!(matches!(opts.validate(), Err(ConfigError::LoadFactor(_))), "load {load}");
        }
        assert!(Session::from_source("p1", &Options { initial_capacity: 0, ..Options::default() }).is_err());
    }

    #[test]
    fn tiny_load_factor_is_rejected() {
        let opts = Options { initial_capacity: 1, max_load_factor: 1e-12 };
        assert_eq!(opts.validate(), Err(ConfigError::LoadFactorTooSmall(1e-12)));
        assert!(Session::from_source("p1\n", &opts).is_err());

        let floor = Options { initial_capacity: 1, max_load_factor: MIN_LOAD_FACTOR };
        assert_eq!(floor.validate(), Ok(()));
    }

    #[test]
    fn summary_lists_lines_in_order() {
        let src = "p1\np1 THEN p2\n\np3\np1 THEN p2\np2 p3 THEN p4\nnot a clause\n";
        let session = Session::from_source(src, &Options::default()).unwrap();

        assert_eq!(session.summary().rules, ["p1 THEN p2", "p2 p3 THEN p4"]);
        assert_eq!(session.summary().facts, ["p1", "p3"]);
    }

    #[test]
    fn query_reports_outcome() {
        let mut session = Session::from_source("p1\np1 THEN p2\n", &Options::default()).unwrap();
        let yes = session.query("p2");
        assert!(yes.entailed());
        assert_eq!(yes.query, "p2");
        assert_eq!(yes.metrics.derived, ["p2"]);

        let no = session.query("p3");
        assert_eq!(no.state, QueryState::Exhausted);
    }

    #[test]
    fn lifetime_decrements_stop_growing_once_saturated() {
        let mut session = Session::from_source("p1\np1 THEN p2\n", &Options::default()).unwrap();
        assert!(session.entails("p2"));
        let first = session.lifetime_decrements();
        assert!(session.entails("p2"));
        assert_eq!(session.lifetime_decrements(), first);
    }

    #[test]
    fn tell_extends_a_live_session() {
        let mut session = Session::empty(&Options::default()).unwrap();
        assert!(!session.entails("p1"));

        assert!(session.tell("p1"));
        assert!(session.tell("p1 THEN p2"));
        assert!(!session.tell("p1 THEN p2"));
        assert!(!session.tell("   "));
        assert!(session.entails("p2"));
    }

    #[test]
    fn rule_told_after_a_query_matches_fresh_load() {
        let mut live = Session::from_source("p1\np1 THEN p2\n", &Options::default()).unwrap();
        assert!(!live.entails("p9"));
        assert!(live.tell("p2 THEN p3"));
        assert!(live.chainer().store().get("p3").is_some());

        let mut fresh = Session::from_source("p1\np1 THEN p2\np2 THEN p3\n", &Options::default()).unwrap();
        assert_eq!(live.entails("p3"), fresh.entails("p3"));
        assert!(live.entails("p3"));
        assert_eq!(live.summary().rules, ["p1 THEN p2", "p2 THEN p3"]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "p1").unwrap();
        writeln!(file, "p2").unwrap();
        writeln!(file, "p1 p2 THEN p3").unwrap();

        let mut session = Session::load(file.path(), &Options::default()).unwrap();
        assert!(session.entails("p3"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.kb");

        let err = Session::load(&missing, &Options::default()).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
        assert!(err.to_string().contains("missing.kb"));
    }
}
