//! End-to-end scenarios driving `render_loop_lint::analyze` against inline
//! fixtures through the real `SwcParserFacade`/`RelativeFsResolver`, one per
//! named re-render shape the engine is meant to tell apart.

use std::fs;
use std::path::PathBuf;

use render_loop_lint::{analyze, DiagnosticKind, ErrorCode, Options, RelativeFsResolver};
use tempfile::tempdir;

fn analyze_source(source: &str) -> (tempfile::TempDir, Vec<render_loop_lint::HookDiagnostic>) {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Component.tsx");
    fs::write(&file, source).unwrap();
    let options = Options::default();
    let resolver = RelativeFsResolver::default();
    let diagnostics = analyze(&[file], &options, &resolver);
    (dir, diagnostics)
}

fn analyze_two_files(entry_source: &str, helper_source: &str) -> Vec<render_loop_lint::HookDiagnostic> {
    let dir = tempdir().unwrap();
    let helper = dir.path().join("helpers.ts");
    fs::write(&helper, helper_source).unwrap();
    let entry: PathBuf = dir.path().join("Component.tsx");
    fs::write(&entry, entry_source).unwrap();
    let options = Options::default();
    let resolver = RelativeFsResolver::default();
    analyze(&[entry], &options, &resolver)
}

/// Scenario 1: an effect unconditionally calls the setter for the exact
/// state it also depends on — every render re-fires the effect.
#[test]
fn unconditional_effect_on_its_own_dependency_is_confirmed_loop() {
    let (_dir, diagnostics) = analyze_source(
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    setN(n + 1);\n  }, [n]);\n  return null;\n}\n",
    );
    assert!(diagnostics
        .iter()
        .any(|d| d.error_code == ErrorCode::Rld200 && d.kind == DiagnosticKind::ConfirmedInfiniteLoop));
}

/// Scenario 2: a derived-state guard (`if (value !== prev) setPrev(value)`)
/// is the textbook safe re-render-on-change pattern and must not diagnose.
#[test]
fn derived_state_guard_inside_effect_is_a_safe_pattern() {
    let (_dir, diagnostics) = analyze_source(
        "function Row({ value }) {\n  const [prev, setPrev] = useState(value);\n  useEffect(() => {\n    if (value !== prev) {\n      setPrev(value);\n    }\n  }, [value, prev]);\n  return null;\n}\n",
    );
    assert!(diagnostics.is_empty());
}

/// Scenario 3: an effect depends on a freshly-allocated object with no
/// setter call anywhere in its body — a performance concern, not a loop.
#[test]
fn unstable_object_dependency_without_a_setter_call_is_a_potential_issue() {
    let (_dir, diagnostics) = analyze_source(
        "function C({ id }) {\n  const options = { id };\n  useEffect(() => {\n    console.log(options);\n  }, [options]);\n  return null;\n}\n",
    );
    let finding = diagnostics.iter().find(|d| d.error_code == ErrorCode::Rld400).expect("RLD-400 finding");
    assert_eq!(finding.kind, DiagnosticKind::PotentialIssue);
}

/// Scenario 4: the same unstable-object dependency, but the effect also
/// unconditionally fires a setter from inside a `.then` callback — the
/// unstable reference and the render loop compound into a confirmed loop.
#[test]
fn unstable_object_dependency_with_unconditional_setter_via_promise_then_is_confirmed_loop() {
    let (_dir, diagnostics) = analyze_source(
        "function C({ id }) {\n  const [n, setN] = useState(0);\n  const options = { id };\n  useEffect(() => {\n    fetchData().then(() => {\n      setN(n + 1);\n    });\n  }, [options]);\n  return null;\n}\n",
    );
    let finding = diagnostics.iter().find(|d| d.error_code == ErrorCode::Rld400).expect("RLD-400 finding");
    assert_eq!(finding.kind, DiagnosticKind::ConfirmedInfiniteLoop);
}

/// Scenario 5: an effect with no dependency array at all reaches a setter
/// only through a same-file helper function — indirect, but still a loop.
#[test]
fn effect_without_deps_array_reaching_setter_through_helper_function_is_rld_201() {
    let (_dir, diagnostics) = analyze_source(
        "function bump() {\n  setN(n + 1);\n}\nfunction C() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    bump();\n  });\n  return null;\n}\n",
    );
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld201));
}

/// Cross-file variant of scenario 5: the helper lives in an imported module
/// and only recognizes the setter by the parameter name its own call site
/// happens to pass (see the Cross-File Relation Builder's grounding note).
#[test]
fn effect_reaching_setter_through_an_imported_helper_is_rld_300() {
    let diagnostics = analyze_two_files(
        "import { bump } from './helpers';\nfunction C() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    bump(setN);\n  }, [n]);\n  return null;\n}\n",
        "export function bump(setN) {\n  setN(x => x + 1);\n}\n",
    );
    assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld300));
}

/// Scenario 6: a `useCallback` whose dependency's setter is only ever
/// invoked with a functional update never needs to read the stale value.
#[test]
fn functional_update_in_usecallback_body_is_a_safe_pattern() {
    let (_dir, diagnostics) = analyze_source(
        "function C() {\n  const [n, setN] = useState(0);\n  const increment = useCallback(() => {\n    setN(prev => prev + 1);\n  }, [n]);\n  return increment;\n}\n",
    );
    assert!(diagnostics.is_empty());
}

/// An updater that looks like a functional update but still closes over the
/// depended-on state itself is not exempt — it changes on every render that
/// changes `n`, so the effect re-fires just as it would for a plain read.
#[test]
fn functional_update_that_reads_depended_state_is_still_a_confirmed_loop() {
    let (_dir, diagnostics) = analyze_source(
        "function Counter() {\n  const [n, setN] = useState(0);\n  useEffect(() => {\n    setN(v => v + n);\n  }, [n]);\n  return null;\n}\n",
    );
    assert!(diagnostics
        .iter()
        .any(|d| d.error_code == ErrorCode::Rld200 && d.kind == DiagnosticKind::ConfirmedInfiniteLoop));
}
