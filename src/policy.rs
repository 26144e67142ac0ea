/**
 * Hook Site Analyzer (policy engine)
 *
 * DESIGN DECISION: One function implementing spec.md §4.12's lettered
 * decision tree as a literal ordered sequence of `if let`/`return`
 * statements over precomputed facts, rather than a rule table or trait
 * object dispatch
 * WHY: spec.md §9 Design Note 1 explicitly rejects dynamic dispatch for
 * per-hook-kind behavior in favor of tagged enums matched directly; the
 * policy engine is where every upstream component's output converges, so
 * its control flow should read as the literal checklist it implements,
 * checkable line-by-line against the steps it's grounded on
 *
 * REASONING CHAIN:
 * 1. Steps run in strict order and stop at the first match (spec.md
 *    §4.12); step (f) is the sole exception ("continue to next
 *    dependency") — everywhere else "return nothing" or "return X" ends
 *    the whole function, not just the current dependency
 * 2. Error codes are assigned here, at the single point where a
 *    diagnostic's kind and category are both already known (spec.md §6)
 * 3. The ignore-pragma check happens last against the diagnostic this
 *    function would otherwise return, since whether a pragma's optional
 *    error-code restriction applies can't be known before the diagnostic's
 *    code is computed (spec.md §6 "An optional space-separated error code
 *    restricts suppression to that code")
 *
 * PATTERN: ordered checklist over tagged facts (spec.md §9 Design Note 1)
 */

use std::path::Path;

use crate::diagnostic::{Confidence, DiagnosticKind, ErrorCode, HookDiagnostic, Severity};
use crate::effect_interaction::InteractionFacts;
use crate::guard::GuardType;
use crate::ignore::SuppressionTable;
use crate::model::{ComponentFacts, CrossFileSetterMap, HookKind, HookSite, SetterClassification};
use crate::unstable_refs::{UnstableRefFinding, UnstableRefOutcome};

pub struct HookSiteContext<'a> {
    pub file: &'a Path,
    pub site: &'a HookSite,
    pub facts: &'a ComponentFacts,
    pub interaction: &'a InteractionFacts,
    pub cross_file: &'a CrossFileSetterMap,
    pub unstable_ref: Option<&'a UnstableRefFinding>,
    pub debug: bool,
}

pub fn analyze_hook_site(ctx: &HookSiteContext<'_>, suppression: &SuppressionTable) -> Option<HookDiagnostic> {
    let diagnostic = build_diagnostic(ctx)?;
    if suppression.is_suppressed(diagnostic.line, diagnostic.error_code.code()) {
        return None;
    }
    Some(diagnostic)
}

fn build_diagnostic(ctx: &HookSiteContext<'_>) -> Option<HookDiagnostic> {
    let site = ctx.site;

    // Step 2: structural precondition — the Effect-Without-Deps Detector
    // owns the missing-array case entirely.
    if !site.has_deps_array {
        return None;
    }

    // Step 3: unstable references.
    if let Some(finding) = ctx.unstable_ref {
        let code = ErrorCode::unstable_kind(finding.kind);
        let kind = match finding.outcome {
            UnstableRefOutcome::ConfirmedInfiniteLoop => DiagnosticKind::ConfirmedInfiniteLoop,
            UnstableRefOutcome::PotentialIssuePerformance => DiagnosticKind::PotentialIssue,
        };
        let (severity, confidence) = match finding.outcome {
            UnstableRefOutcome::ConfirmedInfiniteLoop => (Severity::High, Confidence::High),
            UnstableRefOutcome::PotentialIssuePerformance => (Severity::Low, Confidence::Medium),
        };
        return Some(diagnostic(
            ctx,
            finding.line,
            code,
            kind,
            severity,
            confidence,
            Some(finding.dependency_name.clone()),
            None,
            format!("{} in the dependency array is not referentially stable across renders", finding.dependency_name),
            Some("move the value into the effect, memoize it, or narrow the dependency to its stable parts".to_string()),
        ));
    }

    // Step 4.
    for (dep_name, position) in &site.dependency_identifiers {
        let Some(setter_name) = ctx.facts.setter_for_state(dep_name) else { continue };
        let setter_name = setter_name.to_string();
        let calls: Vec<_> = ctx
            .interaction
            .setter_calls
            .iter()
            .filter(|c| c.setter_name == setter_name)
            .collect();

        // (a) matching safe guard.
        if calls.iter().any(|c| {
            c.classification == SetterClassification::ConditionallyGuardedEffective
                && matches!(
                    c.guard_type,
                    Some(GuardType::EqualityWithPrevProp)
                        | Some(GuardType::Inequality)
                        | Some(GuardType::NullCheck)
                        | Some(GuardType::FunctionalUpdate)
                )
        }) {
            return safe_pattern(ctx, position.line, dep_name);
        }

        // (b) object-spread-risk guard.
        if calls.iter().any(|c| c.guard_type == Some(GuardType::ObjectSpreadRisk)) {
            return Some(diagnostic(
                ctx,
                position.line,
                ErrorCode::Rld410,
                DiagnosticKind::PotentialIssue,
                Severity::Medium,
                Confidence::Medium,
                Some(dep_name.clone()),
                Some(setter_name.clone()),
                format!("{setter_name} spreads a new object even when the guarded property is unchanged"),
                Some("compare the exact fields the setter derives from, or memoize the produced object".to_string()),
            ));
        }

        // (c) dependency present only as a function reference.
        if ctx.interaction.function_references.contains(&setter_name)
            && ctx.interaction.any_setter_call(&setter_name).is_none()
        {
            return safe_pattern(ctx, position.line, dep_name);
        }

        // (d) deferred.
        if calls.iter().any(|c| c.classification == SetterClassification::Deferred) {
            return safe_pattern(ctx, position.line, dep_name);
        }

        // (e) cleanup, effect/layout-effect.
        if site.kind.is_effect_like() && calls.iter().any(|c| c.classification == SetterClassification::Cleanup) {
            let code = if site.kind == HookKind::LayoutEffect { ErrorCode::Rld202 } else { ErrorCode::Rld200 };
            return Some(confirmed_loop(ctx, position.line, code, dep_name, &setter_name,
                "the setter runs in the effect's cleanup, which re-fires the effect and re-runs cleanup"));
        }

        // (f) unreachable: continue to next dependency.
        if calls.iter().any(|c| c.classification == SetterClassification::Unreachable) && calls.len() == 1 {
            continue;
        }

        // (g) direct modification with effective guard (fallback for
        // guard shapes not already matched in (a)).
        if calls.iter().any(|c| c.classification == SetterClassification::ConditionallyGuardedEffective) {
            return safe_pattern(ctx, position.line, dep_name);
        }

        // (h) direct unconditional, effect/layout-effect.
        if site.kind.is_effect_like()
            && calls.iter().any(|c| c.classification == SetterClassification::Unconditional)
        {
            let code = if site.kind == HookKind::LayoutEffect { ErrorCode::Rld202 } else { ErrorCode::Rld200 };
            return Some(confirmed_loop(ctx, position.line, code, dep_name, &setter_name,
                "the setter is called unconditionally every time the effect runs"));
        }

        // (i) direct conditional, effect/layout-effect.
        if site.kind.is_effect_like()
            && calls.iter().any(|c| c.classification == SetterClassification::ConditionallyGuardedRisky)
        {
            return Some(diagnostic(
                ctx,
                position.line,
                ErrorCode::Rld501,
                DiagnosticKind::PotentialIssue,
                Severity::Medium,
                Confidence::Medium,
                Some(dep_name.clone()),
                Some(setter_name.clone()),
                format!("{setter_name} conditionally modifies {dep_name}, which is also a dependency"),
                None,
            ));
        }

        let has_direct_modification = !calls.is_empty();
        // (j) callback/memo with functional update: no risk.
        if site.kind.is_memo_like() && has_direct_modification && calls.iter().any(|c| c.has_functional_update) {
            return None;
        }

        // (k) callback/memo without functional update.
        if site.kind.is_memo_like() && has_direct_modification {
            return Some(diagnostic(
                ctx,
                position.line,
                ErrorCode::Rld420,
                DiagnosticKind::PotentialIssue,
                Severity::Low,
                Confidence::Medium,
                Some(dep_name.clone()),
                Some(setter_name.clone()),
                format!("{setter_name} modifies {dep_name} without a functional update"),
                Some(format!("call {setter_name} with an updater function instead of a derived value")),
            ));
        }

        // (l)/(m) cross-file modification.
        let cross_file_hits = ctx.cross_file.get(&site.site_id(ctx.file)).map(|v| v.iter().any(|s| s == &setter_name)).unwrap_or(false);
        if cross_file_hits {
            if site.kind.is_effect_like() {
                return Some(confirmed_loop(ctx, position.line, ErrorCode::Rld300, dep_name, &setter_name,
                    "the setter is reachable through an imported function called from the effect"));
            }
            if site.kind.is_memo_like() {
                return Some(diagnostic(
                    ctx,
                    position.line,
                    ErrorCode::Rld301,
                    DiagnosticKind::PotentialIssue,
                    Severity::Medium,
                    Confidence::Medium,
                    Some(dep_name.clone()),
                    Some(setter_name.clone()),
                    format!("{setter_name} is reachable through an imported function called from this hook"),
                    None,
                ));
            }
        }

        // (n) classifier could not determine reachability for this path.
        if calls.iter().any(|c| c.classification == SetterClassification::Unknown) {
            if site.kind.is_effect_like() {
                return Some(diagnostic(
                    ctx,
                    position.line,
                    ErrorCode::Rld501,
                    DiagnosticKind::PotentialIssue,
                    Severity::Low,
                    Confidence::Low,
                    Some(dep_name.clone()),
                    Some(setter_name.clone()),
                    format!("control-flow analysis could not determine how {setter_name} is reached"),
                    None,
                ));
            }
            return None;
        }
    }

    // Step 5: ref mutation writing a state value where the ref itself is a dependency.
    for mutation in &ctx.interaction.ref_mutations {
        let ref_in_deps = site.dependency_identifiers.iter().any(|(d, _)| d == &mutation.ref_name);
        if ref_in_deps && mutation.reads_state && site.kind.is_effect_like() {
            return Some(diagnostic(
                ctx,
                mutation.position.line,
                ErrorCode::Rld600,
                DiagnosticKind::PotentialIssue,
                Severity::Low,
                Confidence::Low,
                None,
                None,
                format!("{} is mutated with a state-derived value while also listed as a dependency", mutation.ref_name),
                None,
            ));
        }
    }

    None
}

fn safe_pattern(ctx: &HookSiteContext<'_>, line: usize, dep_name: &str) -> Option<HookDiagnostic> {
    let _ = (ctx, line, dep_name);
    // A `safe-pattern` verdict produces no diagnostic — it exists as a
    // named outcome in spec.md §4.12 purely to short-circuit the
    // remaining checks.
    None
}

fn confirmed_loop(
    ctx: &HookSiteContext<'_>,
    line: usize,
    code: ErrorCode,
    dep_name: &str,
    setter_name: &str,
    explanation: &str,
) -> HookDiagnostic {
    diagnostic(
        ctx,
        line,
        code,
        DiagnosticKind::ConfirmedInfiniteLoop,
        Severity::High,
        Confidence::High,
        Some(dep_name.to_string()),
        Some(setter_name.to_string()),
        explanation.to_string(),
        Some(format!("guard {setter_name} so it only runs when {dep_name} actually changes")),
    )
}

#[allow(clippy::too_many_arguments)]
fn diagnostic(
    ctx: &HookSiteContext<'_>,
    line: usize,
    code: ErrorCode,
    kind: DiagnosticKind,
    severity: Severity,
    confidence: Confidence,
    problematic_dependency: Option<String>,
    setter_function: Option<String>,
    explanation: String,
    suggestion: Option<String>,
) -> HookDiagnostic {
    let category = code.category();
    HookDiagnostic {
        file: ctx.file.to_path_buf(),
        line,
        column: Some(ctx.site.position.column),
        hook_type: ctx.site.kind,
        kind,
        error_code: code,
        category,
        severity,
        confidence,
        problematic_dependency,
        state_variable: problematic_dependency_as_state(ctx, &setter_function),
        setter_function,
        state_modifications: Vec::new(),
        state_reads: ctx.interaction.state_reads.iter().cloned().collect(),
        explanation,
        suggestion,
        debug_info: if ctx.debug { Some(format!("hook_site={}", ctx.site.site_id(ctx.file))) } else { None },
    }
}

fn problematic_dependency_as_state(ctx: &HookSiteContext<'_>, setter_function: &Option<String>) -> Option<String> {
    setter_function.as_ref().and_then(|s| ctx.facts.state_for_setter(s)).map(|s| s.to_string())
}
