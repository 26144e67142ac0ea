//! Properties that must hold for every diagnostic set `analyze` produces,
//! independent of which specific re-render shape triggered it.

use std::fs;

use render_loop_lint::{analyze, DiagnosticKind, ErrorCode, Options, RelativeFsResolver};
use tempfile::tempdir;

fn analyze_source(source: &str) -> Vec<render_loop_lint::HookDiagnostic> {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Component.tsx");
    fs::write(&file, source).unwrap();
    let options = Options::default();
    let resolver = RelativeFsResolver::default();
    analyze(&[file], &options, &resolver)
}

/// Every diagnostic anchors to a real 1-based source position, the file it
/// was found in, and a recognized error code from the taxonomy.
#[test]
fn every_diagnostic_has_a_valid_position_file_and_error_code() {
    let diagnostics = analyze_source(
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n",
    );
    assert!(!diagnostics.is_empty());
    for d in &diagnostics {
        assert!(d.line >= 1);
        assert!(d.file.to_string_lossy().ends_with("Component.tsx"));
        assert!(ErrorCode::from_code(d.error_code.code()).is_some());
    }
}

/// A hook site where an unstable-ref finding and a dependency-loop finding
/// could both apply yields exactly one diagnostic: the unstable-ref check
/// (policy.rs step 3) short-circuits before the per-dependency loop runs.
#[test]
fn at_most_one_diagnostic_per_hook_site() {
    let diagnostics = analyze_source(
        "function C({ id }) {\n  const [n, setN] = useState(0);\n  const options = { id };\n  useEffect(() => {\n    setN(n + 1);\n  }, [options, n]);\n  return null;\n}\n",
    );
    let site_line = 4; // the useEffect call's own line
    let at_site: Vec<_> = diagnostics.iter().filter(|d| d.line == site_line).collect();
    assert_eq!(at_site.len(), 1, "expected exactly one diagnostic for the hook site, got {at_site:?}");
    assert_eq!(at_site[0].error_code, ErrorCode::Rld400);
}

/// Running the same input through the pipeline twice produces identical,
/// identically-ordered output — no iteration-order leakage from the
/// `HashMap`/`HashSet` collections the pipeline builds along the way.
#[test]
fn analysis_is_idempotent_and_stably_ordered() {
    let source = "function C() {\n  const [a, setA] = useState(0);\n  const [b, setB] = useState(0);\n  useEffect(() => { setA(a + 1); }, [a]);\n  useEffect(() => { setB(b + 1); }, [b]);\n  return null;\n}\n";
    let dir = tempdir().unwrap();
    let file = dir.path().join("Component.tsx");
    fs::write(&file, source).unwrap();
    let options = Options::default();
    let resolver = RelativeFsResolver::default();

    let first = analyze(&[file.clone()], &options, &resolver);
    let second = analyze(&[file], &options, &resolver);

    assert_eq!(first.len(), second.len());
    assert!(first.len() >= 2);
    let first_identity: Vec<_> = first.iter().map(|d| d.identity()).collect();
    let second_identity: Vec<_> = second.iter().map(|d| d.identity()).collect();
    assert_eq!(first_identity, second_identity);
}

/// An ignore pragma with an explicit error code suppresses only that code —
/// a different diagnosable line in the same file is unaffected.
#[test]
fn ignore_pragma_suppresses_exactly_the_named_code() {
    let diagnostics = analyze_source(
        "function C() {\n  const [a, setA] = useState(0);\n  const [b, setB] = useState(0);\n  useEffect(() => { setA(a + 1); }, [a]); // rld-ignore RLD-200\n  useEffect(() => { setB(b + 1); }, [b]);\n  return null;\n}\n",
    );
    assert!(!diagnostics.iter().any(|d| d.problematic_dependency.as_deref() == Some("a")));
    assert!(diagnostics.iter().any(|d| d.problematic_dependency.as_deref() == Some("b") && d.error_code == ErrorCode::Rld200));
}

/// An effect with a literal empty dependency array has no dependency
/// identifiers for the policy engine to walk, so it can never itself be
/// diagnosed as a confirmed infinite loop from dependency analysis.
#[test]
fn empty_dependency_array_never_yields_a_confirmed_loop() {
    let diagnostics = analyze_source(
        "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    setN(n + 1);\n  }, []);\n  return null;\n}\n",
    );
    assert!(!diagnostics.iter().any(|d| d.kind == DiagnosticKind::ConfirmedInfiniteLoop));
}

/// A `useLayoutEffect` that unconditionally sets its own dependency emits
/// the layout-effect variant of the confirmed-loop code, not the plain
/// effect code.
#[test]
fn unconditional_layout_effect_on_its_own_dependency_is_rld_202() {
    let diagnostics = analyze_source(
        "function Counter() {\n  const [n, setN] = useState(0);\n  useLayoutEffect(() => {\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n",
    );
    assert!(diagnostics
        .iter()
        .any(|d| d.error_code == ErrorCode::Rld202 && d.kind == DiagnosticKind::ConfirmedInfiniteLoop));
    assert!(!diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200));
}

/// A `useLayoutEffect` with no dependency array at all that reaches a
/// setter still emits RLD-201 — the taxonomy has no distinct layout-effect
/// code for the missing-deps-array case.
#[test]
fn layout_effect_without_deps_array_is_rld_201_not_rld_202() {
    let diagnostics = analyze_source(
        "function Counter() {\n  const [n, setN] = useState(0);\n  useLayoutEffect(() => {\n    setN(n + 1);\n  });\n  return null;\n}\n",
    );
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld201));
    assert!(!diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld202));
}

/// A setter passed as a bare function reference (an event-listener handler)
/// rather than called directly resolves to the safe-pattern outcome, even
/// though its underlying state is listed as a dependency.
#[test]
fn setter_used_only_as_a_function_reference_yields_no_diagnostic() {
    let diagnostics = analyze_source(
        "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    window.addEventListener('click', setN);\n  }, [n]);\n  return null;\n}\n",
    );
    assert!(diagnostics.is_empty());
}
