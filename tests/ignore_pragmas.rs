//! Round-trip coverage for ignore-pragma suppression through the full
//! pipeline: present without a pragma, absent with one, restored once the
//! pragma names a different code.

use std::fs;

use render_loop_lint::{analyze, ErrorCode, Options, RelativeFsResolver};
use tempfile::tempdir;

fn analyze_source(source: &str) -> Vec<render_loop_lint::HookDiagnostic> {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Component.tsx");
    fs::write(&file, source).unwrap();
    let options = Options::default();
    let resolver = RelativeFsResolver::default();
    analyze(&[file], &options, &resolver)
}

const UNGUARDED: &str =
    "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n";

/// Without any pragma, the unconditional self-dependency loop is reported.
#[test]
fn without_pragma_the_loop_is_reported() {
    let diagnostics = analyze_source(UNGUARDED);
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// A same-line, unrestricted `rld-ignore` on the hook site's own line
/// suppresses the diagnostic entirely.
#[test]
fn same_line_unrestricted_pragma_suppresses_the_diagnostic() {
    let source =
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => { // rld-ignore\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n";
    let diagnostics = analyze_source(source);
    assert!(!diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// `rld-ignore-next-line` suppresses the diagnostic reported on the line
/// immediately following the marker comment.
#[test]
fn next_line_pragma_suppresses_the_following_line() {
    let source =
        "function Counter() {\n  const [n, setN] = useState(0);\n  // rld-ignore-next-line\n  useEffect(() => {\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n";
    let diagnostics = analyze_source(source);
    assert!(!diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// A pragma restricted to a code that doesn't match the actual diagnostic
/// does not suppress it — the code restriction is exact, not advisory.
#[test]
fn pragma_restricted_to_a_different_code_does_not_suppress() {
    let source =
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => { // rld-ignore RLD-999\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n";
    let diagnostics = analyze_source(source);
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// A pragma restricted to the exact code that would fire still suppresses
/// it, same as the unrestricted form.
#[test]
fn pragma_restricted_to_the_matching_code_suppresses() {
    let source =
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => { // rld-ignore RLD-200\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n";
    let diagnostics = analyze_source(source);
    assert!(!diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// A trailing `rld-ignore-next-line` comment on the hook site's own line
/// does not suppress that line's diagnostic — `rld-ignore` being a textual
/// prefix of `rld-ignore-next-line` must not register a spurious same-line
/// suppression.
#[test]
fn trailing_next_line_marker_does_not_suppress_the_line_it_sits_on() {
    let source =
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setN(n + 1); }, [n]); // rld-ignore-next-line RLD-200\n  return null;\n}\n";
    let diagnostics = analyze_source(source);
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}
