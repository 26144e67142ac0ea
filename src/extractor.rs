/**
 * Component Discovery + State & Ref Extractor
 *
 * DESIGN DECISION: A single module owns both "what counts as a component"
 * (shared by the Render-Phase Detector, Indirect-Setter Resolver, and the
 * orchestrator) and the per-component-scope extraction spec.md §4.2
 * describes, since both are AST walks over the same functions with the
 * same function-boundary rule
 * WHY: spec.md §4.9 names "PascalCase named or wrapper-wrapped" as the
 * component recognition rule but never gives it its own component number;
 * every other component that needs "is this a component" reuses this
 * module rather than re-deriving the rule
 *
 * REASONING CHAIN:
 * 1. A nested function/arrow boundary (spec.md §4.2 "ignores declarations
 *    inside nested functions") is implemented by overriding `visit_function`
 *    and `visit_arrow_expr` to not recurse — everything else (blocks,
 *    `if`, loops, `try`) is walked normally since those are not function
 *    boundaries
 * 2. Precedence state→ref→unstable (spec.md §4.2) is enforced by checking
 *    the state-hook shape first, then the ref-hook shape, then falling
 *    through to the unstable-local check, never re-classifying a name
 *    already recorded under an earlier category
 * 3. Hook-site extraction (useEffect/useLayoutEffect/useCallback/useMemo
 *    call expressions) lives here too since it is the same "find call
 *    expressions inside a component body" walk, just collecting a
 *    different record type
 *
 * PATTERN: `noop_visit_*` scoped visitor (cf. swc_ecma_visit idiom; the
 * teacher's own AST walks in code_map/parser.rs are line-oriented instead,
 * since its MVP parser has no real tree — this crate's facade does)
 */

use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::model::{
    ComponentFacts, HookKind, HookSite, Position, RefBinding, StateBinding, UnstableKind,
    UnstableLocal,
};
use crate::parser::ParsedFile;
use crate::stability::StabilityOracle;

/// A discovered component: a PascalCase-named function, or a PascalCase
/// `const` bound to an arrow/function expression, optionally wrapped in a
/// call such as `memo(...)`/`React.memo(...)`/`forwardRef(...)`.
pub struct Component<'ast> {
    pub name: String,
    pub body: &'ast BlockStmt,
    pub span: Span,
}

pub fn find_components(module: &Module) -> Vec<Component<'_>> {
    let mut out = Vec::new();
    for item in &module.body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => collect_from_decl(decl, &mut out),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_from_decl(&export.decl, &mut out)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                if let DefaultDecl::Fn(fn_expr) = &export.decl {
                    if let Some(body) = &fn_expr.function.body {
                        let name = fn_expr
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string());
                        out.push(Component { name, body, span: fn_expr.function.span });
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn collect_from_decl<'ast>(decl: &'ast Decl, out: &mut Vec<Component<'ast>>) {
    match decl {
        Decl::Fn(fn_decl) => {
            if is_pascal_case(&fn_decl.ident.sym) {
                if let Some(body) = &fn_decl.function.body {
                    out.push(Component {
                        name: fn_decl.ident.sym.to_string(),
                        body,
                        span: fn_decl.function.span,
                    });
                }
            }
        }
        Decl::Var(var_decl) => {
            for declarator in &var_decl.decls {
                let Pat::Ident(binding) = &declarator.name else { continue };
                if !is_pascal_case(&binding.id.sym) {
                    continue;
                }
                let Some(init) = &declarator.init else { continue };
                if let Some(body) = arrow_or_fn_body(unwrap_wrapper_call(init)) {
                    out.push(Component { name: binding.id.sym.to_string(), body, span: declarator.span });
                }
            }
        }
        _ => {}
    }
}

/// Unwraps one layer of `memo(...)`/`React.memo(...)`/`forwardRef(...)` to
/// reach the wrapped function expression (spec.md §4.9 "wrapper-wrapped").
fn unwrap_wrapper_call(expr: &Expr) -> &Expr {
    if let Expr::Call(call) = expr {
        let is_wrapper = match &call.callee {
            Callee::Expr(e) => match e.as_ref() {
                Expr::Ident(id) => matches!(id.sym.as_ref(), "memo" | "forwardRef"),
                Expr::Member(m) => matches!(
                    m.prop.as_ident().map(|i| i.sym.as_ref()),
                    Some("memo") | Some("forwardRef")
                ),
                _ => false,
            },
            _ => false,
        };
        if is_wrapper {
            if let Some(arg) = call.args.first() {
                return &arg.expr;
            }
        }
    }
    expr
}

fn arrow_or_fn_body(expr: &Expr) -> Option<&BlockStmt> {
    match expr {
        Expr::Arrow(arrow) => match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(body) => Some(body),
            BlockStmtOrExpr::Expr(_) => None,
        },
        Expr::Fn(fn_expr) => fn_expr.function.body.as_ref(),
        _ => None,
    }
}

fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Extracts state bindings, ref bindings, and unstable locals from a
/// component body, honoring the function-scope boundary (spec.md §4.2).
pub fn extract_component_facts(
    name: &str,
    body: &BlockStmt,
    parsed: &ParsedFile,
    stability: &StabilityOracle<'_>,
) -> ComponentFacts {
    let mut visitor = ScopeVisitor {
        parsed,
        stability,
        facts: ComponentFacts { component_name: name.to_string(), ..Default::default() },
    };
    body.visit_children_with(&mut visitor);
    visitor.facts
}

struct ScopeVisitor<'a, 'p> {
    parsed: &'p ParsedFile,
    stability: &'a StabilityOracle<'a>,
    facts: ComponentFacts,
}

impl<'a, 'p> Visit for ScopeVisitor<'a, 'p> {
    noop_visit_type!();

    fn visit_function(&mut self, _f: &Function) {
        // function boundary: do not descend (spec.md §4.2).
    }

    fn visit_arrow_expr(&mut self, _a: &ArrowExpr) {
        // function boundary: do not descend (spec.md §4.2).
    }

    fn visit_var_declarator(&mut self, d: &VarDeclarator) {
        let position = self.parsed.position_of(d.span);
        if self.try_state_binding(d, position) {
            return;
        }
        if self.try_ref_binding(d, position) {
            return;
        }
        self.try_unstable_local(d, position);
    }
}

impl<'a, 'p> ScopeVisitor<'a, 'p> {
    fn try_state_binding(&mut self, d: &VarDeclarator, position: Position) -> bool {
        let Pat::Array(arr) = &d.name else { return false };
        if arr.elems.len() != 2 {
            return false;
        }
        let (Some(state_pat), Some(setter_pat)) = (&arr.elems[0], &arr.elems[1]) else {
            return false;
        };
        let (Pat::Ident(state), Pat::Ident(setter)) = (state_pat, setter_pat) else {
            return false;
        };
        let Some(init) = &d.init else { return false };
        if !call_matches_hook(init, "useState") && !call_matches_hook(init, "useReducer") {
            return false;
        }
        self.facts.state_bindings.push(StateBinding {
            state_name: state.id.sym.to_string(),
            setter_name: setter.id.sym.to_string(),
            position,
        });
        true
    }

    fn try_ref_binding(&mut self, d: &VarDeclarator, position: Position) -> bool {
        let Pat::Ident(binding) = &d.name else { return false };
        let Some(init) = &d.init else { return false };
        if !call_matches_hook(init, "useRef") {
            return false;
        }
        self.facts
            .ref_bindings
            .push(RefBinding { ref_name: binding.id.sym.to_string(), position });
        true
    }

    fn try_unstable_local(&mut self, d: &VarDeclarator, position: Position) {
        let Pat::Ident(binding) = &d.name else { return };
        let Some(init) = &d.init else { return };
        let kind = match &**init {
            Expr::Object(_) => Some(UnstableKind::Object),
            Expr::Array(_) => Some(UnstableKind::Array),
            Expr::Fn(_) | Expr::Arrow(_) => Some(UnstableKind::Function),
            Expr::Call(call) => {
                let callee_name = callee_name(&call.callee);
                let stable = callee_name
                    .as_deref()
                    .map(|n| self.stability.is_stable_function(n))
                    .unwrap_or(false);
                if stable {
                    None
                } else {
                    Some(UnstableKind::CallResult)
                }
            }
            _ => None,
        };
        if let Some(kind) = kind {
            self.facts
                .unstable_locals
                .push(UnstableLocal { name: binding.id.sym.to_string(), kind, position });
        }
    }
}

fn call_matches_hook(expr: &Expr, hook_name: &str) -> bool {
    match expr {
        Expr::Call(call) => callee_name(&call.callee).as_deref() == Some(hook_name),
        _ => false,
    }
}

pub fn callee_name(callee: &Callee) -> Option<String> {
    match callee {
        Callee::Expr(e) => match e.as_ref() {
            Expr::Ident(id) => Some(id.sym.to_string()),
            Expr::Member(m) => m.prop.as_ident().map(|i| i.sym.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Finds `useEffect`/`useLayoutEffect`/`useCallback`/`useMemo` call
/// expressions directly within a component body (not inside nested
/// functions), recording each as a [`HookSite`].
pub fn extract_hook_sites(body: &BlockStmt, parsed: &ParsedFile) -> Vec<HookSite> {
    let mut visitor = HookSiteVisitor { parsed, sites: Vec::new() };
    body.visit_children_with(&mut visitor);
    visitor.sites
}

struct HookSiteVisitor<'p> {
    parsed: &'p ParsedFile,
    sites: Vec<HookSite>,
}

impl<'p> Visit for HookSiteVisitor<'p> {
    noop_visit_type!();

    fn visit_function(&mut self, _f: &Function) {}
    fn visit_arrow_expr(&mut self, _a: &ArrowExpr) {}

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let Some(name) = callee_name(&call.callee) else {
            call.visit_children_with(self);
            return;
        };
        if let Some(kind) = HookKind::from_callee_name(&name) {
            let position = self.parsed.position_of(call.span);
            let has_deps_array = call.args.len() >= 2 && matches!(call.args[1].expr.as_ref(), Expr::Array(_));
            let dependency_identifiers = if has_deps_array {
                match call.args[1].expr.as_ref() {
                    Expr::Array(arr) => arr
                        .elems
                        .iter()
                        .filter_map(|e| e.as_ref())
                        .filter_map(|e| match e.expr.as_ref() {
                            Expr::Ident(id) => Some((id.sym.to_string(), self.parsed.position_of(e.expr.span()))),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                }
            } else {
                Vec::new()
            };
            self.sites.push(HookSite { kind, position, has_deps_array, dependency_identifiers });
        }
        // Do not descend into hook callback bodies here; the Effect
        // Interaction Analyzer (effect_interaction.rs) walks those
        // separately with its own two-pass rules.
    }
}
