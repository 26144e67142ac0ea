/**
 * Effect Interaction Analyzer
 *
 * DESIGN DECISION: Two explicit passes over a hook callback body — pass 1
 * tags event-listener arguments and async-callback bodies, pass 2 (driven
 * by the Control-Flow Classifier and Guard Analyzer) classifies every
 * setter call, state read, functional update, and ref mutation against
 * what pass 1 found
 * WHY: spec.md §4.8 specifies the two passes in this order because pass
 * 2's "deferred" classification depends on knowing, ahead of time, which
 * call spans are async-callback bodies — a single pass can't know that
 * before it reaches the call
 *
 * REASONING CHAIN:
 * 1. A setter call's span falling inside a pass-1 async-callback span is
 *    *deferred* regardless of what the Control-Flow Classifier would
 *    otherwise report for it (spec.md §4.8) — checked before consulting
 *    guard/reachability at all
 * 2. A setter call inside an effect's cleanup return (flagged by the
 *    Control-Flow Classifier's `in_cleanup`) is *cleanup*, also checked
 *    before guard/reachability
 * 3. Everything else funnels through the Guard Analyzer using the same
 *    `(state, all_state_names)` pair the State & Ref Extractor already
 *    computed, so guard classification here is identical in shape to the
 *    Render-Phase Detector's own guard lookups (render_phase.rs)
 * 4. Outputs are deduplicated per setter within each category (spec.md
 *    §4.8) since the policy engine (policy.rs) only ever asks "is there a
 *    record of kind X for setter Y", not "how many times"
 *
 * PATTERN: two-pass analysis with a shared intermediate set (spec.md §4.8)
 */

use std::collections::{HashMap, HashSet};

use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::control_flow::ControlFlowClassifier;
use crate::extractor::callee_name;
use crate::guard::{GuardAnalyzer, GuardContext};
use crate::model::{ComponentFacts, HookSite, IndirectSetterMap, Position, SetterCall, SetterClassification};
use crate::parser::ParsedFile;
use crate::stability::StabilityOracle;

#[derive(Debug, Clone)]
pub struct RefMutation {
    pub ref_name: String,
    pub reads_state: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionFacts {
    pub function_references: HashSet<String>,
    pub state_reads: HashSet<String>,
    pub setter_calls: Vec<SetterCall>,
    pub ref_mutations: Vec<RefMutation>,
}

impl InteractionFacts {
    pub fn setter_call(&self, setter: &str, classification: SetterClassification) -> bool {
        self.setter_calls
            .iter()
            .any(|c| c.setter_name == setter && c.classification == classification)
    }

    pub fn any_setter_call(&self, setter: &str) -> Option<&SetterCall> {
        self.setter_calls.iter().find(|c| c.setter_name == setter)
    }
}

pub fn analyze_hook_body(
    callback_body: &BlockStmt,
    facts: &ComponentFacts,
    indirect: &IndirectSetterMap,
    stability: &StabilityOracle<'_>,
    parsed: &ParsedFile,
    hook_site: &HookSite,
) -> InteractionFacts {
    let mut pass1 = Pass1 { stability, function_references: HashSet::new(), async_callback_spans: Vec::new() };
    callback_body.visit_children_with(&mut pass1);

    let setter_names: HashSet<String> = facts.state_bindings.iter().map(|b| b.setter_name.clone()).collect();

    let target_of = |call: &CallExpr| -> Vec<String> {
        if let Some(name) = callee_name(&call.callee) {
            if setter_names.contains(&name) {
                return vec![name];
            }
            let mut out: Vec<String> = indirect.setters_for_function(&name).to_vec();
            if let Callee::Expr(e) = &call.callee {
                if let Expr::Member(m) = e.as_ref() {
                    if let (Expr::Ident(obj), Some(method)) = (m.obj.as_ref(), m.prop.as_ident()) {
                        let key = format!("{}.{}", obj.sym, method.sym);
                        out.extend(indirect.setters_for_method(&key).iter().cloned());
                    }
                }
            }
            return out;
        }
        Vec::new()
    };

    let call_sites = ControlFlowClassifier::classify_calls(callback_body, &target_of);
    let guard_analyzer = GuardAnalyzer::new();
    let all_state_names: Vec<&str> = facts.all_state_names();
    let depended_state_names: Vec<&str> = hook_site
        .dependency_identifiers
        .iter()
        .map(|(name, _)| name.as_str())
        .filter(|name| all_state_names.contains(name))
        .collect();

    let mut setter_calls: HashMap<(String, SetterClassification), SetterCall> = HashMap::new();

    for site in &call_sites {
        let has_functional_update = site
            .call_args
            .first()
            .is_some_and(|a| matches!(a.expr.as_ref(), Expr::Arrow(_) | Expr::Fn(_)));

        let is_deferred = pass1
            .async_callback_spans
            .iter()
            .any(|s| span_contains(*s, site.span));

        let (classification, rationale, guard_type) = if is_deferred {
            (SetterClassification::Deferred, "call occurs inside an async-callback receiver's callback".to_string(), None)
        } else if site.in_cleanup {
            (SetterClassification::Cleanup, "call occurs inside the effect's cleanup function".to_string(), None)
        } else {
            let state = facts.state_for_setter(&site.target_name);
            let guard = state.and_then(|state| {
                let ctx = GuardContext {
                    enclosing_if_test: site.enclosing_if_test,
                    setter_args: site.call_args,
                    depended_state_names: &depended_state_names,
                };
                guard_analyzer.analyze(&ctx, &site.target_name, state, &all_state_names)
            });
            match guard {
                Some(g) => {
                    let guard_type = Some(g.guard_type);
                    if g.is_safe {
                        (SetterClassification::ConditionallyGuardedEffective, g.rationale, guard_type)
                    } else {
                        (SetterClassification::ConditionallyGuardedRisky, g.rationale, guard_type)
                    }
                }
                None if site.unconditional => {
                    (SetterClassification::Unconditional, format!("{} is called unconditionally", site.target_name), None)
                }
                None => (
                    SetterClassification::ConditionallyGuardedRisky,
                    format!("{} is called conditionally with no recognized safe guard", site.target_name),
                    None,
                ),
            }
        };

        setter_calls
            .entry((site.target_name.clone(), classification))
            .or_insert_with(|| SetterCall {
                setter_name: site.target_name.clone(),
                classification,
                has_functional_update,
                guard_type,
                rationale,
            });
    }

    let state_reads = collect_state_reads(callback_body, facts);
    let ref_mutations = collect_ref_mutations(callback_body, facts, parsed);

    InteractionFacts {
        function_references: pass1.function_references,
        state_reads,
        setter_calls: setter_calls.into_values().collect(),
        ref_mutations,
    }
}

fn span_contains(outer: Span, inner: Span) -> bool {
    outer.lo() <= inner.lo() && inner.hi() <= outer.hi()
}

struct Pass1<'a> {
    stability: &'a StabilityOracle<'a>,
    function_references: HashSet<String>,
    async_callback_spans: Vec<Span>,
}

impl<'a> Visit for Pass1<'a> {
    noop_visit_type!();

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(name) = callee_name(&call.callee) {
            if self.stability.is_event_listener_method(&name) {
                for arg in &call.args {
                    if let Expr::Ident(id) = arg.expr.as_ref() {
                        self.function_references.insert(id.sym.to_string());
                    }
                }
            }
            if self.stability.is_async_callback_receiver(&name) {
                for arg in &call.args {
                    if matches!(arg.expr.as_ref(), Expr::Arrow(_) | Expr::Fn(_)) {
                        self.async_callback_spans.push(arg.expr.span());
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

fn collect_state_reads(body: &BlockStmt, facts: &ComponentFacts) -> HashSet<String> {
    struct ReadVisitor<'a> {
        facts: &'a ComponentFacts,
        reads: HashSet<String>,
    }
    impl<'a> Visit for ReadVisitor<'a> {
        noop_visit_type!();

        fn visit_assign_expr(&mut self, assign: &AssignExpr) {
            // Skip the left-hand identifier of a plain assignment; still
            // walk the right-hand side for reads.
            assign.right.visit_with(self);
        }

        fn visit_ident(&mut self, id: &Ident) {
            let name = id.sym.to_string();
            if self.facts.all_state_names().iter().any(|s| *s == name) {
                self.reads.insert(name);
            }
        }
    }
    let mut visitor = ReadVisitor { facts, reads: HashSet::new() };
    body.visit_children_with(&mut visitor);
    visitor.reads
}

fn collect_ref_mutations(body: &BlockStmt, facts: &ComponentFacts, parsed: &ParsedFile) -> Vec<RefMutation> {
    struct RefVisitor<'a, 'p> {
        facts: &'a ComponentFacts,
        parsed: &'p ParsedFile,
        out: Vec<RefMutation>,
    }
    impl<'a, 'p> Visit for RefVisitor<'a, 'p> {
        noop_visit_type!();

        fn visit_assign_expr(&mut self, assign: &AssignExpr) {
            if let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left {
                if let (Expr::Ident(obj), Some(prop)) = (member.obj.as_ref(), member.prop.as_ident()) {
                    if prop.sym.as_ref() == "current" && self.facts.is_ref(&obj.sym) {
                        let reads_state = expr_reads_state(&assign.right, self.facts);
                        self.out.push(RefMutation {
                            ref_name: obj.sym.to_string(),
                            reads_state,
                            position: self.parsed.position_of(assign.span),
                        });
                    }
                }
            }
            assign.visit_children_with(self);
        }
    }
    let mut visitor = RefVisitor { facts, parsed, out: Vec::new() };
    body.visit_children_with(&mut visitor);
    visitor.out
}

fn expr_reads_state(expr: &Expr, facts: &ComponentFacts) -> bool {
    struct Finder<'a> {
        facts: &'a ComponentFacts,
        found: bool,
    }
    impl<'a> Visit for Finder<'a> {
        noop_visit_type!();
        fn visit_ident(&mut self, id: &Ident) {
            if facts_has_state(self.facts, &id.sym) {
                self.found = true;
            }
        }
    }
    fn facts_has_state(facts: &ComponentFacts, name: &str) -> bool {
        facts.all_state_names().iter().any(|s| *s == name)
    }
    let mut finder = Finder { facts, found: false };
    expr.visit_with(&mut finder);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{extract_component_facts, extract_hook_sites, find_components};
    use crate::options::Options;
    use crate::parser::{ParserFacade, SwcParserFacade};
    use std::path::Path;

    fn hook_body(src: &str) -> (ParsedFile, ComponentFacts, BlockStmt, HookSite) {
        let parsed = SwcParserFacade::new().parse_source(Path::new("c.tsx"), src).unwrap();
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let components = find_components(&parsed.module);
        let c = &components[0];
        let facts = extract_component_facts(&c.name, c.body, &parsed, &stability);
        let site = extract_hook_sites(c.body, &parsed).into_iter().next().unwrap();
        // find first useEffect call's callback body
        let mut callback = None;
        struct Finder<'a> { out: &'a mut Option<BlockStmt> }
        impl<'a> Visit for Finder<'a> {
            noop_visit_type!();
            fn visit_call_expr(&mut self, call: &CallExpr) {
                if callee_name(&call.callee).as_deref() == Some("useEffect") {
                    if let Some(Expr::Arrow(arrow)) = call.args.first().map(|a| a.expr.as_ref()) {
                        if let BlockStmtOrExpr::BlockStmt(b) = arrow.body.as_ref() {
                            *self.out = Some(b.clone());
                        }
                    }
                }
                call.visit_children_with(self);
            }
        }
        let mut finder = Finder { out: &mut callback };
        c.body.visit_children_with(&mut finder);
        (parsed, facts, callback.unwrap(), site)
    }

    #[test]
    fn unconditional_setter_call_is_classified_unconditional() {
        let (parsed, facts, body, site) = hook_body(
            "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setN(n + 1); }, [n]);\n  return null;\n}\n",
        );
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let indirect = IndirectSetterMap::default();
        let facts_analyzed = analyze_hook_body(&body, &facts, &indirect, &stability, &parsed, &site);
        assert!(facts_analyzed.setter_call("setN", SetterClassification::Unconditional));
    }

    #[test]
    fn setter_inside_settimeout_is_deferred() {
        let (parsed, facts, body, site) = hook_body(
            "function C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { setTimeout(() => { setN(n + 1); }, 1000); }, [n]);\n  return null;\n}\n",
        );
        let opts = Options::default();
        let stability = StabilityOracle::new(&opts);
        let indirect = IndirectSetterMap::default();
        let facts_analyzed = analyze_hook_body(&body, &facts, &indirect, &stability, &parsed, &site);
        assert!(facts_analyzed.setter_call("setN", SetterClassification::Deferred));
    }
}
