/**
 * Engine Orchestrator
 *
 * DESIGN DECISION: A single `analyze()` entry point that drives every other
 * component in a fixed order per file, isolating each file's (and each hook
 * site's) failures behind `catch_unwind` so one malformed input cannot sink
 * a batch
 * WHY: spec.md §4.13 is the one component whose whole job is sequencing —
 * parse, discover components, extract facts, build indirect/cross-file
 * maps, then run every per-hook-site detector and hand the results to the
 * policy engine — and spec.md §7 requires that failures stay local to the
 * file or call that produced them
 *
 * REASONING CHAIN:
 * 1. Import expansion is one level deep (spec.md §4.5): for every primary
 *    file's imports, resolve what the configured `ImportResolver` can, parse
 *    those files too, and build their indirect-setter maps — nothing
 *    transitively beyond that
 * 2. `RLD-500` (missing dependency array) is emitted directly here rather
 *    than through policy.rs, because it is the one diagnosis that applies
 *    before any interaction analysis is possible at all: a `useCallback`/
 *    `useMemo` site with no dependency array has nothing yet for the Hook
 *    Site Analyzer to reason about per-dependency, while `useEffect`/
 *    `useLayoutEffect` sites without an array route through the Effect-
 *    Without-Deps Detector (no_deps.rs) instead, since only a setter call
 *    reachable from their body is diagnostic-worthy
 * 3. Diagnostics are concatenated across files, filtered through each file's
 *    own `SuppressionTable`, sorted by `diagnostic::sort_key`, and deduped
 *    by `HookDiagnostic::identity` (spec.md §3, §8 invariant 3)
 *
 * PATTERN: sequenced pipeline driver with per-unit failure isolation
 * (tracing spans per file, matching the teacher's `verification.rs`
 * per-claim isolation)
 */

use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::control_flow::ControlFlowClassifier;
use crate::cross_file::build_cross_file_map;
use crate::diagnostic::{sort_key, Category, Confidence, DiagnosticKind, ErrorCode, HookDiagnostic, Severity};
use crate::effect_interaction::analyze_hook_body;
use crate::error::Error;
use crate::extractor::{callee_name, extract_component_facts, extract_hook_sites, find_components};
use crate::ignore::{self, SuppressionTable};
use crate::indirect_setters::build_indirect_setter_map;
use crate::model::{HookKind, IndirectSetterMap};
use crate::no_deps::find_missing_deps_loop;
use crate::options::Options;
use crate::parser::{ParsedFile, ParserFacade, SwcParserFacade};
use crate::policy::{analyze_hook_site, HookSiteContext};
use crate::resolver::ImportResolver;
use crate::stability::StabilityOracle;
use crate::unstable_refs::find_unstable_ref;

/// Runs the full pipeline over `entry_files`, expanding imports one level
/// deep and returning a sorted, deduplicated set of diagnostics.
pub fn analyze(entry_files: &[PathBuf], options: &Options, resolver: &dyn ImportResolver) -> Vec<HookDiagnostic> {
    let facade = SwcParserFacade::new();
    let mut diagnostics = Vec::new();

    let mut parsed_cache: HashMap<PathBuf, ParsedFile> = HashMap::new();
    for entry in entry_files {
        if let Some(parsed) = parse_with_log(&facade, entry) {
            parsed_cache.insert(entry.clone(), parsed);
        }
    }

    // Expand imports one level deep for every entry file already parsed,
    // back-filling each `ImportRecord::resolved_path` so the Cross-File
    // Relation Builder (cross_file.rs) can key its imported-file lookups
    // off it.
    let mut imported_paths: HashSet<PathBuf> = HashSet::new();
    for entry in entry_files {
        let Some(parsed) = parsed_cache.get(entry) else { continue };
        let mut resolved_for_entry = Vec::with_capacity(parsed.imports.len());
        for import in &parsed.imports {
            let resolved = resolver.resolve(entry, &import.source);
            if let Some(resolved) = &resolved {
                imported_paths.insert(resolved.clone());
            } else if resolver.can_resolve(&import.source) {
                warn!(from = %entry.display(), spec = %import.source, "could not resolve import");
            }
            resolved_for_entry.push(resolved);
        }
        if let Some(parsed) = parsed_cache.get_mut(entry) {
            for (import, resolved) in parsed.imports.iter_mut().zip(resolved_for_entry) {
                import.resolved_path = resolved;
            }
        }
    }
    for path in &imported_paths {
        if !parsed_cache.contains_key(path) {
            if let Some(parsed) = parse_with_log(&facade, path) {
                parsed_cache.insert(path.clone(), parsed);
            }
        }
    }

    // Build indirect-setter maps for every parsed file (entry or imported) —
    // the Cross-File Relation Builder needs the imported files' maps, and
    // each entry file needs its own for same-file resolution. Setter names
    // are collected across the whole parsed set, not just the file being
    // scanned: an imported helper only ever sees a setter by whatever
    // parameter name its signature gives it (`function bump(setN) { ... }`),
    // which this lightweight syntactic resolver recognizes by matching that
    // name against every setter identifier known anywhere in the analysis,
    // not by tracing the binding across the module boundary.
    let all_setters: HashSet<String> = parsed_cache.values().flat_map(all_setter_names).collect();
    let mut indirect_by_file: HashMap<PathBuf, IndirectSetterMap> = HashMap::new();
    for (path, parsed) in &parsed_cache {
        indirect_by_file.insert(path.clone(), build_indirect_setter_map(&parsed.module, &all_setters));
    }

    // `indirect_by_file` already covers every parsed file, entry and
    // imported alike, so the same map doubles as the Cross-File Relation
    // Builder's "imported files' indirect-setter maps" lookup (cross_file.rs
    // resolves keys by `ImportRecord::resolved_path`, which only ever names
    // paths present in this cache).
    for entry in entry_files {
        let Some(parsed) = parsed_cache.get(entry) else { continue };
        let file_diagnostics = catch_unwind(AssertUnwindSafe(|| {
            analyze_file(parsed, options, &indirect_by_file, &indirect_by_file)
        }));
        match file_diagnostics {
            Ok(ds) => diagnostics.extend(ds),
            Err(_) => warn!(file = %entry.display(), "analysis panicked on this file; skipping"),
        }
    }

    diagnostics.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    diagnostics.dedup_by_key(|d| d.identity());
    diagnostics
}

fn parse_with_log(facade: &SwcParserFacade, path: &Path) -> Option<ParsedFile> {
    match facade.parse(path) {
        Ok(parsed) => Some(parsed),
        Err(Error::Parse { file, reason }) => {
            warn!(file = %file.display(), reason, "parse error; excluding file from analysis");
            None
        }
        Err(other) => {
            warn!(file = %path.display(), error = %other, "could not read file; excluding from analysis");
            None
        }
    }
}

fn all_setter_names(parsed: &ParsedFile) -> HashSet<String> {
    let stability_options = Options::default();
    let stability = StabilityOracle::new(&stability_options);
    let mut names = HashSet::new();
    for component in find_components(&parsed.module) {
        let facts = extract_component_facts(&component.name, component.body, parsed, &stability);
        names.extend(facts.state_bindings.into_iter().map(|b| b.setter_name));
    }
    names
}

fn analyze_file(
    parsed: &ParsedFile,
    options: &Options,
    indirect_by_file: &HashMap<PathBuf, IndirectSetterMap>,
    imported_indirect: &HashMap<PathBuf, IndirectSetterMap>,
) -> Vec<HookDiagnostic> {
    let stability = StabilityOracle::new(options);
    let suppression = ignore::scan(&parsed.source_text);
    let same_file_indirect = indirect_by_file.get(&parsed.path).cloned().unwrap_or_default();

    let mut out = Vec::new();

    for component in find_components(&parsed.module) {
        debug!(component = %component.name, file = %parsed.path.display(), "analyzing component");
        let facts = extract_component_facts(&component.name, component.body, parsed, &stability);
        let hook_sites = extract_hook_sites(component.body, parsed);
        let cross_file = build_cross_file_map(
            parsed,
            component.body,
            &same_file_indirect,
            &parsed.imports,
            imported_indirect,
        );
        let setter_names: Vec<String> = facts.state_bindings.iter().map(|b| b.setter_name.clone()).collect();

        for site in &hook_sites {
            if !site.has_deps_array {
                // RLD-500/effect-without-deps split (see module doc point 2).
                let Some(callback_body) = find_hook_callback_body(component.body, parsed, site) else { continue };
                if site.kind.is_effect_like() {
                    if let Some(finding) = find_missing_deps_loop(&callback_body, &setter_names, &same_file_indirect) {
                        // RLD-201 is the taxonomy's only code for the no-deps-array
                        // case; RLD-202 is reserved for the layout-effect variant of
                        // RLD-200 (unconditional/cleanup setter on a depended state).
                        out.push(missing_deps_loop_diagnostic(parsed, &component.name, site, ErrorCode::Rld201, finding.confidence));
                    }
                } else if let Some(d) = missing_deps_array_diagnostic(parsed, &component.name, site) {
                    out.push(d);
                }
                continue;
            }

            let Some(callback_body) = find_hook_callback_body(component.body, parsed, site) else { continue };
            let interaction = analyze_hook_body(&callback_body, &facts, &same_file_indirect, &stability, parsed, site);

            let has_unconditional_setter_call = {
                let setter_names_set: HashSet<String> = setter_names.iter().cloned().collect();
                let target_of = |call: &swc_ecma_ast::CallExpr| -> Vec<String> {
                    callee_name(&call.callee)
                        .filter(|n| setter_names_set.contains(n))
                        .into_iter()
                        .collect()
                };
                ControlFlowClassifier::classify_calls(&callback_body, &target_of)
                    .iter()
                    .any(|c| c.unconditional)
            };
            let unstable_ref = find_unstable_ref(site, &facts, has_unconditional_setter_call);

            let ctx = HookSiteContext {
                file: &parsed.path,
                site,
                facts: &facts,
                interaction: &interaction,
                cross_file: &cross_file,
                unstable_ref: unstable_ref.as_ref(),
                debug: options.debug,
            };
            if let Some(d) = analyze_hook_site(&ctx, &suppression) {
                out.push(d);
            }
        }

        out.extend(render_phase_diagnostics(parsed, &component.name, component.body, &facts, &suppression));
    }

    out
}

fn find_hook_callback_body(
    component_body: &swc_ecma_ast::BlockStmt,
    parsed: &ParsedFile,
    site: &crate::model::HookSite,
) -> Option<swc_ecma_ast::BlockStmt> {
    use swc_common::Spanned;
    use swc_ecma_ast::*;
    use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

    struct Finder<'a, 'p> {
        parsed: &'p ParsedFile,
        target: &'a crate::model::HookSite,
        out: &'a mut Option<BlockStmt>,
    }
    impl<'a, 'p> Visit for Finder<'a, 'p> {
        noop_visit_type!();
        fn visit_call_expr(&mut self, call: &CallExpr) {
            if self.out.is_some() {
                return;
            }
            let matches_kind = HookKind::from_callee_name(&callee_name(&call.callee).unwrap_or_default())
                == Some(self.target.kind);
            let matches_position = self.parsed.position_of(call.span()) == self.target.position;
            if matches_kind && matches_position {
                if let Some(Expr::Arrow(arrow)) = call.args.first().map(|a| a.expr.as_ref()) {
                    if let BlockStmtOrExpr::BlockStmt(b) = arrow.body.as_ref() {
                        *self.out = Some(b.clone());
                        return;
                    }
                }
            }
            call.visit_children_with(self);
        }
    }

    let mut found = None;
    let mut finder = Finder { parsed, target: site, out: &mut found };
    component_body.visit_children_with(&mut finder);
    found
}

fn missing_deps_loop_diagnostic(
    parsed: &ParsedFile,
    _component: &str,
    site: &crate::model::HookSite,
    code: ErrorCode,
    confidence: Confidence,
) -> HookDiagnostic {
    HookDiagnostic {
        file: parsed.path.clone(),
        line: site.position.line,
        column: Some(site.position.column),
        hook_type: site.kind,
        kind: DiagnosticKind::ConfirmedInfiniteLoop,
        error_code: code,
        category: Category::Critical,
        severity: Severity::High,
        confidence,
        problematic_dependency: None,
        state_variable: None,
        setter_function: None,
        state_modifications: Vec::new(),
        state_reads: Vec::new(),
        explanation: format!("{} has no dependency array and calls a setter in its body", site.kind.name()),
        suggestion: Some("add a dependency array, or move the setter call behind a condition".to_string()),
        debug_info: None,
    }
}

fn missing_deps_array_diagnostic(
    parsed: &ParsedFile,
    _component: &str,
    site: &crate::model::HookSite,
) -> Option<HookDiagnostic> {
    if site.has_deps_array {
        return None;
    }
    Some(HookDiagnostic {
        file: parsed.path.clone(),
        line: site.position.line,
        column: Some(site.position.column),
        hook_type: site.kind,
        kind: DiagnosticKind::PotentialIssue,
        error_code: ErrorCode::Rld500,
        category: ErrorCode::Rld500.category(),
        severity: Severity::Low,
        confidence: Confidence::Medium,
        problematic_dependency: None,
        state_variable: None,
        setter_function: None,
        state_modifications: Vec::new(),
        state_reads: Vec::new(),
        explanation: format!("{} has no dependency array", site.kind.name()),
        suggestion: Some("add a dependency array listing every value the callback closes over".to_string()),
        debug_info: None,
    })
}

fn render_phase_diagnostics(
    parsed: &ParsedFile,
    _component: &str,
    component_body: &swc_ecma_ast::BlockStmt,
    facts: &crate::model::ComponentFacts,
    suppression: &SuppressionTable,
) -> Vec<HookDiagnostic> {
    use crate::render_phase::{find_render_phase_issues, RenderPhaseFinding, RenderPhaseSeverity};

    find_render_phase_issues(component_body, facts, parsed)
        .into_iter()
        .filter_map(|finding| {
            let (line, error_code, severity, explanation, dependency) = match finding {
                RenderPhaseFinding::UnguardedSetterCall { setter_name, position } => (
                    position.line,
                    ErrorCode::Rld100,
                    Severity::High,
                    format!("{setter_name} is called directly in the render phase"),
                    facts.state_for_setter(&setter_name).map(|s| s.to_string()),
                ),
                RenderPhaseFinding::RiskyGuardedSetterCall { setter_name, position } => (
                    position.line,
                    ErrorCode::Rld100,
                    Severity::High,
                    format!("{setter_name} is called in the render phase behind a guard that does not prevent re-entry"),
                    facts.state_for_setter(&setter_name).map(|s| s.to_string()),
                ),
                RenderPhaseFinding::RefMutation { ref_name, severity, position } => (
                    position.line,
                    ErrorCode::Rld600,
                    match severity {
                        RenderPhaseSeverity::High => Severity::High,
                        RenderPhaseSeverity::Medium => Severity::Medium,
                    },
                    format!("{ref_name}.current is mutated in the render phase"),
                    None,
                ),
            };
            if suppression.is_suppressed(line, error_code.code()) {
                return None;
            }
            Some(HookDiagnostic {
                file: parsed.path.clone(),
                line,
                column: None,
                hook_type: HookKind::Effect,
                kind: DiagnosticKind::ConfirmedInfiniteLoop,
                error_code,
                category: error_code.category(),
                severity,
                confidence: Confidence::High,
                problematic_dependency: dependency,
                state_variable: None,
                setter_function: None,
                state_modifications: Vec::new(),
                state_reads: Vec::new(),
                explanation,
                suggestion: None,
                debug_info: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RelativeFsResolver;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn render_phase_setter_call_is_reported_as_rld_100() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("C.tsx");
        fs::write(
            &file,
            "function C() {\n  const [n, setN] = useState(0);\n  setN(n + 1);\n  return null;\n}\n",
        )
        .unwrap();

        let options = Options::default();
        let resolver = RelativeFsResolver::default();
        let diagnostics = analyze(&[file], &options, &resolver);
        assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld100));
    }

    #[test]
    fn effect_unconditionally_setting_its_own_dependency_is_confirmed_loop() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("C.tsx");
        fs::write(
            &file,
            "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setN(n + 1); }, [n]);\n  return null;\n}\n",
        )
        .unwrap();

        let options = Options::default();
        let resolver = RelativeFsResolver::default();
        let diagnostics = analyze(&[file], &options, &resolver);
        assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld200 && d.kind == DiagnosticKind::ConfirmedInfiniteLoop));
    }

    #[test]
    fn missing_dependency_array_on_usememo_is_rld_500() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("C.tsx");
        fs::write(
            &file,
            "function C() {\n  const value = useMemo(() => compute());\n  return null;\n}\n",
        )
        .unwrap();

        let options = Options::default();
        let resolver = RelativeFsResolver::default();
        let diagnostics = analyze(&[file], &options, &resolver);
        assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld500));
    }

    #[test]
    fn cross_file_setter_reachable_through_import_is_rld_300() {
        let dir = tempdir().unwrap();
        let helper = dir.path().join("helpers.ts");
        fs::write(&helper, "export function bump(setN) { setN(x => x + 1); }\n").unwrap();
        let entry = dir.path().join("C.tsx");
        fs::write(
            &entry,
            "import { bump } from './helpers';\nfunction C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { bump(setN); }, [n]);\n  return null;\n}\n",
        )
        .unwrap();

        let options = Options::default();
        let resolver = RelativeFsResolver::default();
        let diagnostics = analyze(&[entry], &options, &resolver);
        assert!(diagnostics.iter().any(|d| d.error_code == ErrorCode::Rld300));
    }
}
