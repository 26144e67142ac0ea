/**
 * Indirect-Setter Resolver
 *
 * DESIGN DECISION: Two flat maps (`function_name -> [setter]`,
 * `"object.method" -> [setter]`) built by one full-body walk per named
 * function or object-literal method, not a general call-graph
 * WHY: spec.md §4.4 scopes this to one level: "setters called from within
 * that function's body", leaving deeper inter-procedural chasing to the
 * Cross-File Relation Builder's own one-level rule (§4.5) and to whatever
 * consumer walks these maps a second time (no_deps.rs)
 *
 * REASONING CHAIN:
 * 1. Setters passed as bare arguments count as "called" for this map's
 *    purpose (spec.md §4.4: "argument passing inside effect bodies
 *    generally leads to invocation") — recorded alongside direct calls
 * 2. Components (PascalCase-named functions) are never setter factories
 *    for this purpose and are skipped outright (spec.md §4.4)
 * 3. Unlike the State & Ref Extractor's component-scope walk, this walk
 *    does not stop at nested function boundaries — an inline callback
 *    passed to e.g. `.map(...)` still runs as part of the enclosing
 *    function's call, so its setter calls count toward that function
 *
 * PATTERN: named-scope-keyed map built by scoped visitors (cf. extractor.rs)
 */

use std::collections::HashSet;

use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::extractor::callee_name;
use crate::model::IndirectSetterMap;

pub fn build_indirect_setter_map(module: &Module, setter_names: &HashSet<String>) -> IndirectSetterMap {
    let mut map = IndirectSetterMap::default();
    collect_from_items(&module.body, setter_names, &mut map);
    map
}

fn collect_from_items(items: &[ModuleItem], setters: &HashSet<String>, map: &mut IndirectSetterMap) {
    for item in items {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => collect_from_decl(decl, setters, map),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_from_decl(&export.decl, setters, map)
            }
            _ => {}
        }
    }
}

fn collect_from_decl(decl: &Decl, setters: &HashSet<String>, map: &mut IndirectSetterMap) {
    match decl {
        Decl::Fn(fn_decl) => {
            record_function(&fn_decl.ident.sym, fn_decl.function.body.as_ref(), setters, map);
        }
        Decl::Var(var_decl) => {
            for d in &var_decl.decls {
                record_var_declarator(d, setters, map);
            }
        }
        _ => {}
    }
}

fn record_var_declarator(d: &VarDeclarator, setters: &HashSet<String>, map: &mut IndirectSetterMap) {
    let Pat::Ident(binding) = &d.name else { return };
    let name = binding.id.sym.to_string();
    if is_component_name(&name) {
        return;
    }
    let Some(init) = &d.init else { return };
    match init.as_ref() {
        Expr::Arrow(arrow) => {
            if let BlockStmtOrExpr::BlockStmt(body) = arrow.body.as_ref() {
                record_function(&name, Some(body), setters, map);
            }
        }
        Expr::Fn(fn_expr) => record_function(&name, fn_expr.function.body.as_ref(), setters, map),
        Expr::Object(obj) => record_object_methods(&name, obj, setters, map),
        _ => {}
    }
}

fn record_object_methods(object_name: &str, obj: &ObjectLit, setters: &HashSet<String>, map: &mut IndirectSetterMap) {
    for prop in &obj.props {
        let PropOrSpread::Prop(p) = prop else { continue };
        let Prop::Method(method) = p.as_ref() else { continue };
        let PropName::Ident(ident) = &method.key else { continue };
        let Some(body) = &method.function.body else { continue };
        let found = calls_in_body(body, setters);
        if !found.is_empty() {
            map.by_method.insert(format!("{object_name}.{}", ident.sym), found);
        }
    }
}

fn record_function(name: &str, body: Option<&BlockStmt>, setters: &HashSet<String>, map: &mut IndirectSetterMap) {
    if is_component_name(name) {
        return;
    }
    let Some(body) = body else { return };
    let found = calls_in_body(body, setters);
    if !found.is_empty() {
        map.by_function.insert(name.to_string(), found);
    }
}

fn calls_in_body(body: &BlockStmt, setters: &HashSet<String>) -> Vec<String> {
    let mut visitor = SetterCallVisitor { setters, found: Vec::new() };
    body.visit_children_with(&mut visitor);
    visitor.found.sort();
    visitor.found.dedup();
    visitor.found
}

fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

struct SetterCallVisitor<'a> {
    setters: &'a HashSet<String>,
    found: Vec<String>,
}

impl<'a> Visit for SetterCallVisitor<'a> {
    noop_visit_type!();

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(name) = callee_name(&call.callee) {
            if self.setters.contains(&name) {
                self.found.push(name);
            }
        }
        for arg in &call.args {
            if let Expr::Ident(id) = arg.expr.as_ref() {
                let name = id.sym.to_string();
                if self.setters.contains(&name) {
                    self.found.push(name);
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

    fn setters(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_direct_call_under_function_name() {
        let src = "function bumpCount() { setN(n + 1); }\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("a.ts"), src).unwrap();
        let map = build_indirect_setter_map(&parsed.module, &setters(&["setN"]));
        assert_eq!(map.setters_for_function("bumpCount"), &["setN".to_string()]);
    }

    #[test]
    fn skips_pascal_case_component_functions() {
        let src = "function Widget() { setN(1); }\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("a.ts"), src).unwrap();
        let map = build_indirect_setter_map(&parsed.module, &setters(&["setN"]));
        assert!(map.setters_for_function("Widget").is_empty());
    }

    #[test]
    fn records_setter_passed_as_bare_argument() {
        let src = "function wire() { register(setN); }\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("a.ts"), src).unwrap();
        let map = build_indirect_setter_map(&parsed.module, &setters(&["setN"]));
        assert_eq!(map.setters_for_function("wire"), &["setN".to_string()]);
    }

    #[test]
    fn records_object_method_under_object_dot_method_key() {
        let src = "const store = { bump() { setN(1); } };\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("a.ts"), src).unwrap();
        let map = build_indirect_setter_map(&parsed.module, &setters(&["setN"]));
        assert_eq!(map.setters_for_method("store.bump"), &["setN".to_string()]);
    }
}
