/**
 * Effect-Without-Deps Detector
 *
 * DESIGN DECISION: Reachability over the same `target_of` closure shape
 * used by cross_file.rs and effect_interaction.rs, distinguishing *direct*
 * reachability (literal setter call) from *indirect* (through a known
 * local function or `obj.method()`)
 * WHY: spec.md §4.10 requires confidence *high* for direct reachability
 * and *medium* for indirect — a single "is any setter reachable" boolean
 * would lose that distinction
 *
 * REASONING CHAIN:
 * 1. This only runs for hook sites with exactly one argument (no
 *    dependency array) — the Hook Site Analyzer's own structural
 *    precondition check (spec.md §4.12 step 2) explicitly defers the
 *    missing-array case to this detector
 * 2. Direct reachability is checked first; if none, indirect reachability
 *    (local function names, `obj.method()` keys) is checked — the first
 *    match wins and sets confidence accordingly
 *
 * PATTERN: two-tier reachability (direct, then indirect), same shape as
 * cross_file.rs's one-level call resolution
 */

use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::diagnostic::Confidence;
use crate::extractor::callee_name;
use crate::model::IndirectSetterMap;

pub struct NoDepsFinding {
    pub confidence: Confidence,
}

/// `callback_body` is the sole argument to an effect/layout-effect hook
/// invoked without a dependency array.
pub fn find_missing_deps_loop(
    callback_body: &BlockStmt,
    setter_names: &[String],
    indirect: &IndirectSetterMap,
) -> Option<NoDepsFinding> {
    let mut direct = DirectCallVisitor { setter_names, found: false };
    callback_body.visit_children_with(&mut direct);
    if direct.found {
        return Some(NoDepsFinding { confidence: Confidence::High });
    }

    let mut indirect_visitor = IndirectCallVisitor { indirect, found: false };
    callback_body.visit_children_with(&mut indirect_visitor);
    if indirect_visitor.found {
        return Some(NoDepsFinding { confidence: Confidence::Medium });
    }

    None
}

struct DirectCallVisitor<'a> {
    setter_names: &'a [String],
    found: bool,
}

impl<'a> Visit for DirectCallVisitor<'a> {
    noop_visit_type!();

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(name) = callee_name(&call.callee) {
            if self.setter_names.iter().any(|s| s == &name) {
                self.found = true;
            }
        }
        call.visit_children_with(self);
    }
}

struct IndirectCallVisitor<'a> {
    indirect: &'a IndirectSetterMap,
    found: bool,
}

impl<'a> Visit for IndirectCallVisitor<'a> {
    noop_visit_type!();

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(name) = callee_name(&call.callee) {
            if !self.indirect.setters_for_function(&name).is_empty() {
                self.found = true;
            }
        }
        if let Callee::Expr(e) = &call.callee {
            if let Expr::Member(m) = e.as_ref() {
                if let (Expr::Ident(obj), Some(method)) = (m.obj.as_ref(), m.prop.as_ident()) {
                    let key = format!("{}.{}", obj.sym, method.sym);
                    if !self.indirect.setters_for_method(&key).is_empty() {
                        self.found = true;
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParserFacade, SwcParserFacade};
    use std::path::Path;

    fn body_of(src: &str) -> BlockStmt {
        let parsed = SwcParserFacade::new().parse_source(Path::new("a.ts"), src).unwrap();
        match &parsed.module.body[0] {
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(f))) => f.function.body.clone().unwrap(),
            _ => panic!("expected function"),
        }
    }

    #[test]
    fn direct_setter_call_is_high_confidence() {
        let body = body_of("function f() { setN(1); }\n");
        let finding = find_missing_deps_loop(&body, &["setN".to_string()], &IndirectSetterMap::default()).unwrap();
        assert_eq!(finding.confidence, Confidence::High);
    }

    #[test]
    fn indirect_local_function_call_is_medium_confidence() {
        let body = body_of("function f() { bumpCount(); }\n");
        let mut indirect = IndirectSetterMap::default();
        indirect.by_function.insert("bumpCount".to_string(), vec!["setN".to_string()]);
        let finding = find_missing_deps_loop(&body, &["setN".to_string()], &indirect).unwrap();
        assert_eq!(finding.confidence, Confidence::Medium);
    }

    #[test]
    fn no_setter_reachable_yields_no_finding() {
        let body = body_of("function f() { console.log('x'); }\n");
        assert!(find_missing_deps_loop(&body, &["setN".to_string()], &IndirectSetterMap::default()).is_none());
    }
}
