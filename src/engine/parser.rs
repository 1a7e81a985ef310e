//! Source line parsing.
//!
//! The knowledge-base format is one entry per line, whitespace-tokenised:
//!
//! ```text
//! p1                  bare fact: p1 is true
//! p1 p2 THEN p3       rule: p1 and p2 imply p3
//! p4 p5               bare fact: p4 and p5 are true
//! ```
//!
//! - `THEN` (exact, case-sensitive, a whole token) separates premises from the
//!   head. It is found with a word-bounded regex, so symbols such as `pTHEN`
//!   are not mistaken for the separator.
//! - Before `THEN`, only tokens starting with `p` are symbols. Anything else is
//!   skipped and flagged with [`LineFlags::IGNORED_TOKENS`].
//! - After `THEN`, the first token is the head; further tokens are skipped and
//!   flagged with [`LineFlags::EXTRA_HEAD_TOKENS`].
//!
//! Lines that cannot describe a clause (blank, `THEN` with nothing after it,
//! a fact line without symbols) parse to `None`. The last two are logged at
//! `warn`.

bitflags::bitflags! {
    /// Shape of a parsed line, collected while scanning it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LineFlags: u8 {
        const HAS_THEN          = 1 << 0;
        const HAS_HEAD          = 1 << 1;
        const IGNORED_TOKENS    = 1 << 2;
        const EXTRA_HEAD_TOKENS = 1 << 3;
        const NO_PREMISES       = 1 << 4;
    }
}

/// One source line, ready for [`ForwardChainer::tell`](super::ForwardChainer::tell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// The line exactly as read; this is the clause identity.
    pub raw: String,
    /// Premise symbols of a rule, or the asserted symbols of a fact.
    pub premises: Vec<String>,
    pub head: Option<String>,
    pub flags: LineFlags,
}

impl ParsedLine {
    pub fn is_rule(&self) -> bool {
        self.head.is_some()
    }
}

/// Whether `token` names a propositional symbol.
pub fn is_symbol(token: &str) -> bool {
    token.starts_with('p')
}

pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut flags = LineFlags::empty();
    let (body, after_then) = match regex!(r"(?:^|\s)THEN(?:\s|$)").find(raw) {
        Some(m) => {
            flags |= LineFlags::HAS_THEN;
            (&raw[..m.start()], Some(&raw[m.end()..]))
        }
        None => (raw, None),
    };

    let mut premises = Vec::new();
    for token in body.split_whitespace() {
        if is_symbol(token) {
            premises.push(token.to_owned());
        } else {
            flags |= LineFlags::IGNORED_TOKENS;
        }
    }
    if premises.is_empty() {
        flags |= LineFlags::NO_PREMISES;
    }

    let head = match after_then {
        Some(rest) => {
            let mut tokens = rest.split_whitespace();
            let Some(head) = tokens.next() else {
                tracing::warn!(line = raw, "rule has no head after THEN; skipping");
                return None;
            };
            if tokens.next().is_some() {
                flags |= LineFlags::EXTRA_HEAD_TOKENS;
            }
            flags |= LineFlags::HAS_HEAD;
            Some(head.to_owned())
        }
        None => None,
    };

    if head.is_none() && premises.is_empty() {
        tracing::warn!(line = raw, "line asserts no symbols; skipping");
        return None;
    }
    if head.is_some() && premises.is_empty() {
        tracing::warn!(line = raw, "rule has no premises and can never fire");
    }
    if flags.intersects(LineFlags::IGNORED_TOKENS | LineFlags::EXTRA_HEAD_TOKENS) {
        tracing::debug!(line = raw, ?flags, "ignored tokens in line");
    }

    Some(ParsedLine { raw: raw.to_owned(), premises, head, flags })
}

/// Parse every line of `text`, dropping lines that do not describe a clause.
pub fn parse_source(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let _line = tracing::trace_span!("source_line", number = idx + 1).entered();
            parse_line(line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_fact() {
        let line = parse_line("p1").unwrap();
        assert_eq!(line.raw, "p1");
        assert_eq!(line.premises, ["p1"]);
        assert_eq!(line.head, None);
        assert!(!line.is_rule());
        assert_eq!(line.flags, LineFlags::empty());
    }

    #[test]
    fn rule_splits_on_then() {
        let line = parse_line("p1 p2 THEN p3").unwrap();
        assert_eq!(line.premises, ["p1", "p2"]);
        assert_eq!(line.head.as_deref(), Some("p3"));
        assert_eq!(line.flags, LineFlags::HAS_THEN | LineFlags::HAS_HEAD);
    }

    #[test]
    fn raw_line_is_kept_verbatim() {
        let line = parse_line("  p1   THEN  p2 ").unwrap();
        assert_eq!(line.raw, "  p1   THEN  p2 ");
        assert_eq!(line.premises, ["p1"]);
        assert_eq!(line.head.as_deref(), Some("p2"));
    }

    #[test]
    fn non_symbol_premises_are_ignored() {
        let line = parse_line("p1 AND p2 THEN p3").unwrap();
        assert_eq!(line.premises, ["p1", "p2"]);
        assert!(line.flags.contains(LineFlags::IGNORED_TOKENS));
    }

    #[test]
    fn first_token_after_then_is_head() {
        let line = parse_line("p1 THEN p2 p3").unwrap();
        assert_eq!(line.head.as_deref(), Some("p2"));
        assert!(line.flags.contains(LineFlags::EXTRA_HEAD_TOKENS));
    }

    #[test]
    fn then_must_be_a_whole_token() {
        let line = parse_line("pTHEN p2").unwrap();
        assert_eq!(line.premises, ["pTHEN", "p2"]);
        assert_eq!(line.head, None);
        assert!(!line.flags.contains(LineFlags::HAS_THEN));

        assert!(parse_line("p1 then p2").unwrap().head.is_none());
    }

    #[test]
    fn rule_without_premises_is_kept() {
        let line = parse_line("THEN p5").unwrap();
        assert!(line.premises.is_empty());
        assert_eq!(line.head.as_deref(), Some("p5"));
        assert!(line.flags.contains(LineFlags::NO_PREMISES));
    }

    #[test]
    fn unusable_lines_are_dropped() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   \t"), None);
        assert_eq!(parse_line("p1 THEN"), None);
        assert_eq!(parse_line("p1 THEN   "), None);
        assert_eq!(parse_line("hello world"), None);
    }

    #[test]
    fn parse_source_skips_blank_lines() {
        let lines = parse_source("p1\n\np1 THEN p2\r\np2 p3 THEN p4\n");
        let raws: Vec<&str> = lines.iter().map(|l| l.raw.as_str()).collect();
        assert_eq!(raws, ["p1", "p1 THEN p2", "p2 p3 THEN p4"]);
    }
}
