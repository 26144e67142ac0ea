/**
 * Guard Analyzer
 *
 * DESIGN DECISION: Guard classification is a pure function over a setter
 * call's syntactic ancestor chain, returning a tagged `GuardRecord` rather
 * than a bool, so downstream components (Control-Flow Classifier, Hook
 * Site Analyzer) can distinguish *why* a guard is or isn't safe
 * WHY: spec.md §4.6 enumerates four safe guard shapes and two risky ones;
 * collapsing them to a bool would lose the rationale the policy engine
 * needs to choose between `safe-pattern`, `potential-issue`, and
 * `confirmed-infinite-loop` (spec.md §4.12)
 *
 * REASONING CHAIN:
 * 1. The innermost enclosing `if` (or ternary/`&&`) around a setter call is
 *    the only guard this engine reasons about — spec.md explicitly scopes
 *    this to "bounded, syntactic and lightweight control-flow reasoning"
 *    (§1 Non-goals), not full symbolic execution
 * 2. Recognized safe guards are pattern-matched on the shape of the `if`
 *    test expression and the setter's own argument, not on evaluating
 *    either side
 * 3. object-spread-risk requires comparing the guard's compared property
 *    against the setter's produced object shape — both present as syntax,
 *    not as values
 *
 * PATTERN: tagged record over bool (spec.md Design Note 1)
 */

use swc_ecma_ast::{BinExpr, BinaryOp, BlockStmtOrExpr, Expr, Ident, Lit, ObjectLit, PropOrSpread, UnaryOp};
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardType {
    EqualityWithPrevProp,
    Inequality,
    NullCheck,
    FunctionalUpdate,
    ObjectSpreadRisk,
    Conditional,
}

#[derive(Debug, Clone)]
pub struct GuardRecord {
    pub guard_type: GuardType,
    pub is_safe: bool,
    pub rationale: String,
}

/// Ancestor context a setter call is found within, innermost-first, as
/// produced by the Control-Flow Classifier's CFG walk (control_flow.rs).
#[derive(Debug, Clone)]
pub struct GuardContext<'a> {
    /// The nearest enclosing `if` test expression, if the call sits
    /// directly in that `if`'s consequent (or alternate) branch.
    pub enclosing_if_test: Option<&'a Expr>,
    /// Arguments passed to the setter call itself.
    pub setter_args: &'a [swc_ecma_ast::ExprOrSpread],
    /// Component state names the enclosing hook lists in its dependency
    /// array, used to tell a true functional update (`setS(f => ...)` with
    /// no outside reads) apart from one whose updater still closes over
    /// state the hook depends on.
    pub depended_state_names: &'a [&'a str],
}

pub struct GuardAnalyzer;

impl GuardAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify the guard enclosing `setter_name`'s call, given `state`
    /// (the state variable the dependency array names) and the full set of
    /// state names in the component (needed to recognize a derived-state
    /// comparison against a *different* state's prop source, e.g. `row`
    /// compared to `prev`).
    pub fn analyze(
        &self,
        ctx: &GuardContext<'_>,
        setter_name: &str,
        state: &str,
        all_state_names: &[&str],
    ) -> Option<GuardRecord> {
        let setter_arg = ctx.setter_args.first().map(|a| a.expr.as_ref());

        // Functional updates are recognized independent of any enclosing
        // guard (spec.md §4.6 "functional update without read" makes no
        // mention of a required `if`).
        if let Some(record) = self.try_functional_update(setter_arg, ctx.depended_state_names) {
            return Some(record);
        }

        let test = ctx.enclosing_if_test?;
        if let Some(record) = self.try_equality_guards(test, setter_arg, state, all_state_names) {
            return Some(record);
        }
        if let Some(record) = self.try_null_check(test, setter_arg, state) {
            return Some(record);
        }
        if let Some(record) = self.try_object_spread_risk(test, setter_arg) {
            return Some(record);
        }

        // Anything else is a generic conditional guard: reads the same
        // state and is not provably convergent (spec.md §4.6 "risky
        // guards": `if (s < N) setS(s+1)`).
        Some(GuardRecord {
            guard_type: GuardType::Conditional,
            is_safe: false,
            rationale: format!(
                "{setter_name} is called inside a conditional that does not match a known safe guard shape"
            ),
        })
    }

    /// `setS(f => ...)` where the updater does not close over any state the
    /// hook depends on — spec.md §4.6 "Functional update without read". An
    /// updater that reads depended-on state (e.g. `setN(v => v + n)` where
    /// `n` is also a dependency) still changes on every run that changes
    /// `n`, so it is not exempt from the loop check.
    fn try_functional_update(&self, setter_arg: Option<&Expr>, depended_state_names: &[&str]) -> Option<GuardRecord> {
        let arg = setter_arg?;
        if !matches!(arg, Expr::Arrow(_) | Expr::Fn(_)) {
            return None;
        }
        if reads_any_ident(arg, depended_state_names) {
            return None;
        }
        Some(GuardRecord {
            guard_type: GuardType::FunctionalUpdate,
            is_safe: true,
            rationale: "setter receives an updater function rather than a value".into(),
        })
    }

    /// `if (x !== prev) setPrev(x)` (derived-state guard) and
    /// `if (newValue !== s) setS(newValue)` (equality short-circuit) share
    /// a shape: a `!==`/`!=` comparison where one operand matches the
    /// setter's argument.
    fn try_equality_guards(
        &self,
        test: &Expr,
        setter_arg: Option<&Expr>,
        state: &str,
        all_state_names: &[&str],
    ) -> Option<GuardRecord> {
        let bin = as_bin(test)?;
        if !matches!(bin.op, BinaryOp::NotEqEq | BinaryOp::NotEq) {
            return None;
        }
        let setter_arg = setter_arg?;
        let (lhs_name, rhs_name) = (ident_name(&bin.left), ident_name(&bin.right));
        let arg_name = ident_name(setter_arg);

        let matches_setter_arg = arg_name.as_deref() == lhs_name.as_deref()
            || arg_name.as_deref() == rhs_name.as_deref();
        if !matches_setter_arg {
            return None;
        }

        // Derived-state guard: one side of the comparison is the state
        // itself (`prev`), the other is some other in-scope value (a prop).
        let compares_state = lhs_name.as_deref() == Some(state) || rhs_name.as_deref() == Some(state);
        if compares_state {
            let other_is_known_state = all_state_names
                .iter()
                .any(|s| lhs_name.as_deref() == Some(s) && rhs_name.as_deref() == Some(s));
            if !other_is_known_state {
                return Some(GuardRecord {
                    guard_type: GuardType::EqualityWithPrevProp,
                    is_safe: true,
                    rationale: format!("guarded by inequality against {state} before updating it"),
                });
            }
        }

        Some(GuardRecord {
            guard_type: GuardType::Inequality,
            is_safe: true,
            rationale: "setter argument matches the inequality comparison operand".into(),
        })
    }

    /// `if (!s) setS(init)` when the setter argument is not derived from
    /// `s` — spec.md §4.6 "Null/undefined guard".
    fn try_null_check(&self, test: &Expr, setter_arg: Option<&Expr>, state: &str) -> Option<GuardRecord> {
        let unary = match test {
            Expr::Unary(u) if u.op == UnaryOp::Bang => u,
            _ => return None,
        };
        if ident_name(&unary.arg).as_deref() != Some(state) {
            return None;
        }
        let setter_arg = setter_arg?;
        if ident_name(setter_arg).as_deref() == Some(state) {
            return None; // argument still derived from `state`, not a plain init
        }
        Some(GuardRecord {
            guard_type: GuardType::NullCheck,
            is_safe: true,
            rationale: format!("guarded by falsiness check on {state} before initializing it"),
        })
    }

    /// A guard that compares a *property* of a state object while the
    /// setter produces a new object via spread — identity changes even
    /// when the compared property does not (spec.md §4.6 risky guard).
    fn try_object_spread_risk(&self, test: &Expr, setter_arg: Option<&Expr>) -> Option<GuardRecord> {
        let bin = as_bin(test)?;
        let compares_member = matches!(bin.left.as_ref(), Expr::Member(_))
            || matches!(bin.right.as_ref(), Expr::Member(_));
        if !compares_member {
            return None;
        }
        let produces_spread_object = match setter_arg {
            Some(Expr::Object(obj)) => object_has_spread(obj),
            _ => false,
        };
        if !produces_spread_object {
            return None;
        }
        Some(GuardRecord {
            guard_type: GuardType::ObjectSpreadRisk,
            is_safe: false,
            rationale: "guard compares a property but the setter spreads a new object, changing identity regardless".into(),
        })
    }
}

fn as_bin(expr: &Expr) -> Option<&BinExpr> {
    match expr {
        Expr::Bin(b) => Some(b),
        Expr::Paren(p) => as_bin(&p.expr),
        _ => None,
    }
}

fn ident_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(id) => Some(id.sym.to_string()),
        Expr::Paren(p) => ident_name(&p.expr),
        Expr::Lit(Lit::Null(_)) => Some("null".to_string()),
        _ => None,
    }
}

fn object_has_spread(obj: &ObjectLit) -> bool {
    obj.props.iter().any(|p| matches!(p, PropOrSpread::Spread(_)))
}

/// Whether `updater`'s body contains a read of any identifier in `names` —
/// a plain, unscoped identifier scan matching the rest of this engine's
/// "bounded, syntactic" posture (no shadowing analysis).
fn reads_any_ident(updater: &Expr, names: &[&str]) -> bool {
    struct Finder<'a> {
        names: &'a [&'a str],
        found: bool,
    }
    impl<'a> Visit for Finder<'a> {
        noop_visit_type!();
        fn visit_ident(&mut self, id: &Ident) {
            if self.names.iter().any(|n| *n == id.sym.as_ref()) {
                self.found = true;
            }
        }
    }
    if names.is_empty() {
        return false;
    }
    let mut finder = Finder { names, found: false };
    match updater {
        Expr::Arrow(arrow) => match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(b) => b.visit_with(&mut finder),
            BlockStmtOrExpr::Expr(e) => e.visit_with(&mut finder),
        },
        Expr::Fn(fn_expr) => {
            if let Some(body) = &fn_expr.function.body {
                body.visit_with(&mut finder);
            }
        }
        _ => {}
    }
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{Bool, ExprOrSpread, Ident, Lit};
    use swc_common::DUMMY_SP;

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name.into(), DUMMY_SP))
    }

    fn bin(op: BinaryOp, l: Expr, r: Expr) -> Expr {
        Expr::Bin(BinExpr { span: DUMMY_SP, op, left: Box::new(l), right: Box::new(r) })
    }

    fn spread_arg(expr: Expr) -> ExprOrSpread {
        ExprOrSpread { spread: None, expr: Box::new(expr) }
    }

    #[test]
    fn derived_state_guard_is_safe() {
        let test = bin(BinaryOp::NotEqEq, ident("row"), ident("prev"));
        let arg = ident("row");
        let args = vec![spread_arg(arg)];
        let ctx = GuardContext { enclosing_if_test: Some(&test), setter_args: &args, depended_state_names: &[] };
        let record = GuardAnalyzer::new().analyze(&ctx, "setPrev", "prev", &["prev"]).unwrap();
        assert_eq!(record.guard_type, GuardType::EqualityWithPrevProp);
        assert!(record.is_safe);
    }

    #[test]
    fn functional_update_is_safe_even_without_if() {
        let updater = Expr::Arrow(swc_ecma_ast::ArrowExpr {
            span: DUMMY_SP,
            params: vec![],
            body: Box::new(swc_ecma_ast::BlockStmtOrExpr::Expr(Box::new(ident("x")))),
            is_async: false,
            is_generator: false,
            type_params: None,
            return_type: None,
        });
        let args = vec![spread_arg(updater)];
        let analyzer = GuardAnalyzer::new();
        let ctx = GuardContext { enclosing_if_test: None, setter_args: &args, depended_state_names: &["n"] };
        let record = analyzer.analyze(&ctx, "setN", "n", &["n"]).unwrap();
        assert_eq!(record.guard_type, GuardType::FunctionalUpdate);
        assert!(record.is_safe);
    }

    #[test]
    fn functional_update_that_reads_depended_state_is_not_safe() {
        // setN(v => v + n) where `n` is itself a dependency of the hook.
        let updater = Expr::Arrow(swc_ecma_ast::ArrowExpr {
            span: DUMMY_SP,
            params: vec![],
            body: Box::new(swc_ecma_ast::BlockStmtOrExpr::Expr(Box::new(bin(
                BinaryOp::Add,
                ident("v"),
                ident("n"),
            )))),
            is_async: false,
            is_generator: false,
            type_params: None,
            return_type: None,
        });
        let args = vec![spread_arg(updater)];
        let analyzer = GuardAnalyzer::new();
        let ctx = GuardContext { enclosing_if_test: None, setter_args: &args, depended_state_names: &["n"] };
        assert!(analyzer.analyze(&ctx, "setN", "n", &["n"]).is_none());
    }

    #[test]
    fn plain_value_without_guard_or_functional_update_is_unclassified() {
        let args = vec![spread_arg(Expr::Lit(Lit::Bool(Bool { span: DUMMY_SP, value: true })))];
        let analyzer = GuardAnalyzer::new();
        let ctx = GuardContext { enclosing_if_test: None, setter_args: &args, depended_state_names: &[] };
        assert!(analyzer.analyze(&ctx, "setN", "n", &["n"]).is_none());
    }

    #[test]
    fn risky_conditional_guard_reads_same_state() {
        let test = bin(BinaryOp::Lt, ident("s"), ident("limit"));
        let args = vec![spread_arg(ident("s"))];
        let ctx = GuardContext { enclosing_if_test: Some(&test), setter_args: &args, depended_state_names: &["s"] };
        let record = GuardAnalyzer::new().analyze(&ctx, "setS", "s", &["s"]).unwrap();
        assert_eq!(record.guard_type, GuardType::Conditional);
        assert!(!record.is_safe);
    }
}
