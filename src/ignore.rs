/**
 * Ignore-Pragma Scanner
 *
 * DESIGN DECISION: A single source-text scan (not an AST walk) that builds a
 * `SuppressionTable` up front, consulted by the Hook Site Analyzer's first
 * policy step
 * WHY: spec.md §6 "Ignore pragmas" defines suppression purely in terms of
 * comment text and line numbers, independent of what the comment is
 * attached to syntactically — a line-oriented scan is both simpler and
 * matches the "line-local or preceding line" rule literally
 *
 * REASONING CHAIN:
 * 1. Two markers, `rld-ignore`/`rcd-ignore` (same-line) and
 *    `rld-ignore-next-line` (next-line), each optionally followed by one
 *    space-separated error code, are the entire suppression surface
 *    (spec.md §6)
 * 2. Both `//` and `/* ... */` comment forms are accepted, so the scanner
 *    matches on the marker text itself rather than anchoring on a comment
 *    delimiter
 * 3. A suppression with no code suppresses every diagnostic on that line; a
 *    suppression with a code suppresses only that code (spec.md §8
 *    invariant 4: "suppresses exactly that diagnostic")
 *
 * PATTERN: precomputed lookup table over repeated text scans
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

// `regex` has no lookahead, so the `-next-line` suffix is captured here
// (group 1) rather than excluded, and `scan` below skips the match when
// that group is present — otherwise `rld-ignore` being a prefix of
// `rld-ignore-next-line` would register a spurious same-line, unrestricted
// suppression on the next-line marker's own line.
static SAME_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:rld-ignore|rcd-ignore)(-next-line)?(?:\s+(RLD-\d{3}))?\b").unwrap()
});

static NEXT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rld-ignore-next-line(?:\s+(RLD-\d{3}))?\b").unwrap()
});

/// Suppression scope for one line: either every code, or one specific code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suppression {
    All,
    Code(String),
}

impl Suppression {
    fn suppresses(&self, code: &str) -> bool {
        match self {
            Suppression::All => true,
            Suppression::Code(c) => c == code,
        }
    }
}

/// Line number (1-based) -> suppression in effect for that line, built once
/// per file by [`scan`].
#[derive(Debug, Clone, Default)]
pub struct SuppressionTable {
    by_line: HashMap<usize, Vec<Suppression>>,
}

impl SuppressionTable {
    pub fn is_suppressed(&self, line: usize, error_code: &str) -> bool {
        self.by_line
            .get(&line)
            .map(|sups| sups.iter().any(|s| s.suppresses(error_code)))
            .unwrap_or(false)
    }
}

/// Scans `source` line by line, recording same-line suppressions on their
/// own line and next-line suppressions on the following line (spec.md §6).
pub fn scan(source: &str) -> SuppressionTable {
    let mut table = SuppressionTable::default();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(caps) = SAME_LINE_RE.captures(line) {
            if caps.get(1).is_none() {
                let sup = match caps.get(2) {
                    Some(code) => Suppression::Code(code.as_str().to_string()),
                    None => Suppression::All,
                };
                table.by_line.entry(line_no).or_default().push(sup);
            }
        }
        if let Some(caps) = NEXT_LINE_RE.captures(line) {
            let sup = match caps.get(1) {
                Some(code) => Suppression::Code(code.as_str().to_string()),
                None => Suppression::All,
            };
            table.by_line.entry(line_no + 1).or_default().push(sup);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_line_marker_suppresses_that_line_only() {
        let src = "setN(n + 1); // rld-ignore\nsetM(m + 1);\n";
        let table = scan(src);
        assert!(table.is_suppressed(1, "RLD-200"));
        assert!(!table.is_suppressed(2, "RLD-200"));
    }

    #[test]
    fn next_line_marker_with_code_restricts_suppression() {
        let src = "// rld-ignore-next-line RLD-201\nuseEffect(() => { setN(n + 1); });\n";
        let table = scan(src);
        assert!(table.is_suppressed(2, "RLD-201"));
        assert!(!table.is_suppressed(2, "RLD-200"));
    }

    #[test]
    fn block_comment_form_is_recognized() {
        let src = "setN(n + 1); /* rcd-ignore */\n";
        let table = scan(src);
        assert!(table.is_suppressed(1, "RLD-100"));
    }

    #[test]
    fn trailing_next_line_marker_does_not_also_suppress_its_own_line() {
        // `rld-ignore` is a prefix of `rld-ignore-next-line`; a trailing
        // next-line marker must not register a same-line, all-codes
        // suppression on the line it sits on.
        let src = "useEffect(() => { setN(n + 1); }, [n]); // rld-ignore-next-line RLD-200\nconst x = 1;\n";
        let table = scan(src);
        assert!(!table.is_suppressed(1, "RLD-200"));
        assert!(table.is_suppressed(2, "RLD-200"));
        assert!(!table.is_suppressed(2, "RLD-300"));
    }

    #[test]
    fn unrelated_lines_are_not_suppressed() {
        let src = "const n = 0;\nsetN(n + 1);\n";
        let table = scan(src);
        assert!(!table.is_suppressed(2, "RLD-200"));
    }
}
