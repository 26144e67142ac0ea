/**
 * Render-Phase Detector
 *
 * DESIGN DECISION: Walk a component body with a visitor that stops at the
 * three boundaries spec.md §4.9 names — nested functions, hook-callback
 * arguments, and the component's own function expression — treating
 * anything left over as render-phase code
 * WHY: spec.md §4.9 defines "render phase" negatively ("outside any nested
 * function, effect callback, event handler, or useEffect/useCallback/
 * useMemo argument") rather than positively, so the boundary logic is the
 * entire component
 *
 * REASONING CHAIN:
 * 1. The component's own arrow-function body is not itself a "nested
 *    function" boundary — this module is handed the component body
 *    directly (extractor.rs's `Component::body`) and walks it as the
 *    render-phase scope, stopping only at further nesting beneath it
 * 2. A call to `useEffect`/`useLayoutEffect`/`useCallback`/`useMemo` is
 *    itself visited (so a render-phase setter call passed as one of its
 *    *other* arguments would still be seen) but its callback argument is
 *    skipped, since that callback's body belongs to the Effect Interaction
 *    Analyzer, not the render phase
 * 3. Derived-state guards (guard.rs) downgrade an otherwise-critical
 *    render-phase setter call to safe (spec.md §4.9) using the same
 *    `GuardAnalyzer` the Effect Interaction Analyzer uses
 *
 * PATTERN: scoped visitor with explicit boundary overrides (cf. extractor.rs)
 */

use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::extractor::callee_name;
use crate::guard::{GuardAnalyzer, GuardContext};
use crate::model::{ComponentFacts, HookKind, Position};
use crate::parser::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhaseSeverity {
    High,
    Medium,
}

#[derive(Debug, Clone)]
pub enum RenderPhaseFinding {
    UnguardedSetterCall { setter_name: String, position: Position },
    RiskyGuardedSetterCall { setter_name: String, position: Position },
    RefMutation { ref_name: String, severity: RenderPhaseSeverity, position: Position },
}

pub fn find_render_phase_issues(
    body: &BlockStmt,
    facts: &ComponentFacts,
    parsed: &ParsedFile,
) -> Vec<RenderPhaseFinding> {
    let mut visitor = RenderVisitor {
        facts,
        parsed,
        enclosing_if_test: None,
        findings: Vec::new(),
    };
    body.visit_children_with(&mut visitor);
    visitor.findings
}

struct RenderVisitor<'a, 'p, 'ast> {
    facts: &'a ComponentFacts,
    parsed: &'p ParsedFile,
    enclosing_if_test: Option<&'ast Expr>,
    findings: Vec<RenderPhaseFinding>,
}

impl<'a, 'p, 'ast> Visit for RenderVisitor<'a, 'p, 'ast> {
    noop_visit_type!();

    fn visit_function(&mut self, _f: &Function) {
        // Nested function: not render phase (spec.md §4.9).
    }

    fn visit_arrow_expr(&mut self, _a: &ArrowExpr) {
        // Nested closure (event handler, inline callback): not render
        // phase (spec.md §4.9). Hook callback arguments are also arrow
        // expressions and are equally excluded here.
    }

    fn visit_assign_expr(&mut self, assign: &AssignExpr) {
        if let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left {
            if let (Expr::Ident(obj), Some(prop)) = (member.obj.as_ref(), member.prop.as_ident()) {
                if prop.sym.as_ref() == "current" && self.facts.is_ref(&obj.sym) {
                    let reads_state = expr_reads_state(&assign.right, self.facts);
                    let severity = if reads_state { RenderPhaseSeverity::High } else { RenderPhaseSeverity::Medium };
                    self.findings.push(RenderPhaseFinding::RefMutation {
                        ref_name: obj.sym.to_string(),
                        severity,
                        position: self.parsed.position_of(assign.span),
                    });
                }
            }
        }
        assign.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let Some(name) = callee_name(&call.callee) else {
            call.visit_children_with(self);
            return;
        };

        if HookKind::from_callee_name(&name).is_some() {
            // Visit every argument except the callback itself, per
            // spec.md §4.9.
            for arg in call.args.iter().skip(1) {
                arg.expr.visit_with(self);
            }
            return;
        }

        if self.facts.is_setter(&name) {
            let position = self.parsed.position_of(call.span);
            let state = self.facts.state_for_setter(&name);
            let all_state_names: Vec<&str> = self.facts.all_state_names();
            let guard = state.and_then(|state| {
                // No hook dependency array applies to a render-phase call, so
                // there is no depended-on state a functional update could be
                // exempted against.
                let ctx = GuardContext { enclosing_if_test: self.enclosing_if_test, setter_args: &call.args, depended_state_names: &[] };
                GuardAnalyzer::new().analyze(&ctx, &name, state, &all_state_names)
            });
            match guard {
                Some(g) if g.is_safe => {}
                Some(_) => self.findings.push(RenderPhaseFinding::RiskyGuardedSetterCall { setter_name: name, position }),
                None => self.findings.push(RenderPhaseFinding::UnguardedSetterCall { setter_name: name, position }),
            }
        }

        call.visit_children_with(self);
    }

    fn visit_if_stmt(&mut self, if_stmt: &IfStmt) {
        let mut inner = RenderVisitor {
            facts: self.facts,
            parsed: self.parsed,
            enclosing_if_test: Some(&if_stmt.test),
            findings: Vec::new(),
        };
        if_stmt.cons.visit_with(&mut inner);
        if let Some(alt) = &if_stmt.alt {
            alt.visit_with(&mut inner);
        }
        self.findings.append(&mut inner.findings);
    }
}

fn expr_reads_state(expr: &Expr, facts: &ComponentFacts) -> bool {
    struct Finder<'a> {
        facts: &'a ComponentFacts,
        found: bool,
    }
    impl<'a> Visit for Finder<'a> {
        noop_visit_type!();
        fn visit_ident(&mut self, id: &Ident) {
            if self.facts.all_state_names().iter().any(|s| *s == id.sym.as_ref()) {
                self.found = true;
            }
        }
    }
    let facts_ref = facts;
    let mut finder = Finder { facts: facts_ref, found: false };
    expr.visit_with(&mut finder);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{extract_component_facts, find_components};
    use crate::options::Options;
    use crate::parser::{ParserFacade, SwcParserFacade};
    use crate::stability::StabilityOracle;
    use std::path::Path;

    #[test]
    fn unguarded_render_phase_setter_is_flagged() {
        let src = "function C() {\n  const [n, setN] = useState(0);\n  setN(n + 1);\n  return null;\n}\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("c.tsx"), src).unwrap();
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let component = &find_components(&parsed.module)[0];
        let facts = extract_component_facts(&component.name, component.body, &parsed, &stability);
        let findings = find_render_phase_issues(component.body, &facts, &parsed);
        assert!(matches!(findings[0], RenderPhaseFinding::UnguardedSetterCall { .. }));
    }

    #[test]
    fn derived_state_guard_downgrades_render_phase_call_to_safe() {
        let src = "function C({ row }) {\n  const [prev, setPrev] = useState(row);\n  if (row !== prev) {\n    setPrev(row);\n  }\n  return null;\n}\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("c.tsx"), src).unwrap();
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let component = &find_components(&parsed.module)[0];
        let facts = extract_component_facts(&component.name, component.body, &parsed, &stability);
        let findings = find_render_phase_issues(component.body, &facts, &parsed);
        assert!(findings.is_empty());
    }

    #[test]
    fn effect_callback_setter_is_not_a_render_phase_finding() {
        let src = "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setN(n + 1); }, [n]);\n  return null;\n}\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("c.tsx"), src).unwrap();
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let component = &find_components(&parsed.module)[0];
        let facts = extract_component_facts(&component.name, component.body, &parsed, &stability);
        let findings = find_render_phase_issues(component.body, &facts, &parsed);
        assert!(findings.is_empty());
    }
}
