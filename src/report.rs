use hornchain::{KbSummary, QueryOutcome};
use std::io::{self, Write};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print the loaded rules and facts.
///
/// ```text
/// KB has 2 conditional clauses and 2 propositional symbols.
///
///     Clauses: p1 THEN p2
///              p2 p3 THEN p4
///     Symbols: p1, p3
/// ```
pub fn print_summary(out: &mut impl Write, summary: &KbSummary, color: bool) -> io::Result<()> {
    let palette = ansi::Palette::new(color);
    writeln!(
        out,
        "{}\n",
        palette.bold(format!(
            "KB has {} conditional clauses and {} propositional symbols.",
            summary.rules.len(),
            summary.facts.len()
        ))
    )?;

    write!(out, "\t{} ", palette.paint("Clauses:", ansi::GRAY))?;
    if summary.rules.is_empty() {
        writeln!(out, "{}", palette.dim("NONE"))?;
    } else {
        for (idx, rule) in summary.rules.iter().enumerate() {
            if idx > 0 {
                write!(out, "\t         ")?;
            }
            writeln!(out, "{}", palette.paint(rule, ansi::CYAN))?;
        }
    }

    write!(out, "\t{} ", palette.paint("Symbols:", ansi::GRAY))?;
    if summary.facts.is_empty() {
        writeln!(out, "{}\n", palette.dim("NONE"))?;
    } else {
        writeln!(out, "{}\n", palette.paint(summary.facts.join(", "), ansi::CYAN))?;
    }
    Ok(())
}

/// Print the fixed answer sentence for one query.
pub fn print_answer(out: &mut impl Write, outcome: &QueryOutcome) -> io::Result<()> {
    if outcome.entailed() {
        writeln!(out, "Yes! {} is entailed by our knowledge-base.\n", outcome.query)
    } else {
        writeln!(out, "No. {} is not entailed by our knowledge-base.\n", outcome.query)
    }
}

/// One compact line of per-query counters, for `--stats`.
pub fn print_stats(out: &mut impl Write, outcome: &QueryOutcome, color: bool) -> io::Result<()> {
    let palette = ansi::Palette::new(color);
    let m = &outcome.metrics;
    writeln!(
        out,
        "  {} {}  {} seeded {}  dequeued {}  expanded {}  skipped {}  decrements {}  fired {}",
        palette.paint(format!("{:?}", outcome.state), ansi::YELLOW),
        palette.paint(format!("{:?}", m.elapsed), ansi::GREEN),
        palette.dim("│"),
        m.seeded,
        m.dequeued,
        m.expanded,
        m.skipped,
        m.decrements,
        m.firings(),
    )?;
    if !m.derived.is_empty() {
        writeln!(out, "  {} {}", palette.dim("derived:"), m.derived.join(", "))?;
    }
    writeln!(out)
}
