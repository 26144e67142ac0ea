/**
 * Unstable-Refs Detector
 *
 * DESIGN DECISION: Runs over a hook site's dependency identifiers and a
 * component's already-extracted unstable locals (extractor.rs), not over
 * the AST directly
 * WHY: spec.md §4.11 is purely a lookup against data two upstream
 * components already computed — the State & Ref Extractor's unstable-local
 * list and the hook site's own dependency-identifier list — so this module
 * has no AST-walking of its own
 *
 * REASONING CHAIN:
 * 1. First-hit-wins per hook site (spec.md §4.11) means this returns at
 *    most one finding even if several dependency identifiers are unstable
 * 2. Escalation to `confirmed-infinite-loop` for effect-kind hooks depends
 *    on the Control-Flow Classifier reporting at least one unconditional
 *    setter call in the body — callers pass that as a precomputed bool
 *    rather than this module re-deriving it
 * 3. Callback/memo-kind hooks never escalate; they are always
 *    `potential-issue` of category performance regardless of body content
 *    (spec.md §4.11)
 *
 * PATTERN: precomputed-data lookup (cf. unstable_refs's siblings model.rs)
 */

use crate::model::{ComponentFacts, HookKind, HookSite, UnstableKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnstableRefOutcome {
    ConfirmedInfiniteLoop,
    PotentialIssuePerformance,
}

#[derive(Debug, Clone)]
pub struct UnstableRefFinding {
    pub dependency_name: String,
    pub kind: UnstableKind,
    pub line: usize,
    pub outcome: UnstableRefOutcome,
}

/// Finds the first dependency identifier resolving to an unstable local
/// (spec.md §4.11, "first-hit wins"). `has_unconditional_setter_call`
/// comes from the Control-Flow Classifier's report for this hook's body.
pub fn find_unstable_ref(
    site: &HookSite,
    facts: &ComponentFacts,
    has_unconditional_setter_call: bool,
) -> Option<UnstableRefFinding> {
    for (name, position) in &site.dependency_identifiers {
        let Some(local) = facts.unstable_local(name) else { continue };
        let outcome = if site.kind.is_effect_like() {
            if has_unconditional_setter_call {
                UnstableRefOutcome::ConfirmedInfiniteLoop
            } else {
                UnstableRefOutcome::PotentialIssuePerformance
            }
        } else {
            UnstableRefOutcome::PotentialIssuePerformance
        };
        return Some(UnstableRefFinding {
            dependency_name: name.clone(),
            kind: local.kind,
            line: position.line,
            outcome,
        });
    }
    None
}
