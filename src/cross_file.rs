/**
 * Cross-File Relation Builder
 *
 * DESIGN DECISION: One builder invocation per primary component body,
 * given the same-file indirect-setter map plus the indirect-setter maps of
 * files the primary file imports, producing `hook-site-id -> [setter]`
 * WHY: spec.md §4.5 scopes this to "the set of parsed files (primary
 * inputs plus transitively imported files up to one level)" — the
 * orchestrator (orchestrator.rs) resolves and parses that one-level set
 * before calling this builder, so this module only ever reasons about
 * already-resolved maps, never drives file resolution itself
 *
 * REASONING CHAIN:
 * 1. A hook callback's body is walked in full (no function-boundary stop)
 *    since every call inside it executes as part of the hook's effect,
 *    mirroring the Indirect-Setter Resolver's own walk of a function body
 * 2. A call resolves one level: either to a same-file function/method
 *    already present in `same_file_indirect`, or to an identifier imported
 *    from a file whose own indirect-setter map is supplied — never further
 *    (spec.md §4.5 "deeper inter-procedural reasoning is out of scope")
 * 3. Keys are `HookSite::site_id` strings so the Hook Site Analyzer
 *    (policy.rs) can look up cross-file reachability with the same key it
 *    already has from hook-site extraction
 *
 * PATTERN: one-level lookup composition over two pre-built maps (cf.
 * indirect_setters.rs, whose maps this module only ever reads)
 */

use std::collections::HashMap;
use std::path::PathBuf;

use swc_ecma_ast::*;
use swc_ecma_visit::{noop_visit_type, Visit, VisitWith};

use crate::extractor::callee_name;
use crate::model::{CrossFileSetterMap, HookKind, ImportRecord, IndirectSetterMap};
use crate::parser::ParsedFile;

pub fn build_cross_file_map(
    file: &ParsedFile,
    component_body: &BlockStmt,
    same_file_indirect: &IndirectSetterMap,
    imports: &[ImportRecord],
    imported_indirect: &HashMap<PathBuf, IndirectSetterMap>,
) -> CrossFileSetterMap {
    let mut visitor = HookCallVisitor {
        file,
        same_file_indirect,
        imports,
        imported_indirect,
        map: HashMap::new(),
    };
    component_body.visit_children_with(&mut visitor);
    visitor.map
}

struct HookCallVisitor<'a> {
    file: &'a ParsedFile,
    same_file_indirect: &'a IndirectSetterMap,
    imports: &'a [ImportRecord],
    imported_indirect: &'a HashMap<PathBuf, IndirectSetterMap>,
    map: CrossFileSetterMap,
}

impl<'a> Visit for HookCallVisitor<'a> {
    noop_visit_type!();

    fn visit_function(&mut self, _f: &Function) {}
    fn visit_arrow_expr(&mut self, _a: &ArrowExpr) {}

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let Some(name) = callee_name(&call.callee) else {
            call.visit_children_with(self);
            return;
        };
        let Some(kind) = HookKind::from_callee_name(&name) else {
            call.visit_children_with(self);
            return;
        };
        let position = self.file.position_of(call.span);
        let site_id = format!("{}:{}:{}", self.file.path.display(), position.line, kind.name());

        if let Some(callback) = call.args.first() {
            let mut found = Vec::new();
            collect_reachable_setters(
                &callback.expr,
                self.same_file_indirect,
                self.imports,
                self.imported_indirect,
                &mut found,
            );
            if !found.is_empty() {
                found.sort();
                found.dedup();
                self.map.insert(site_id, found);
            }
        }
    }
}

fn collect_reachable_setters(
    expr: &Expr,
    same_file_indirect: &IndirectSetterMap,
    imports: &[ImportRecord],
    imported_indirect: &HashMap<PathBuf, IndirectSetterMap>,
    out: &mut Vec<String>,
) {
    struct CallWalker<'a> {
        same_file_indirect: &'a IndirectSetterMap,
        imports: &'a [ImportRecord],
        imported_indirect: &'a HashMap<PathBuf, IndirectSetterMap>,
        out: &'a mut Vec<String>,
    }

    impl<'a> Visit for CallWalker<'a> {
        noop_visit_type!();

        fn visit_call_expr(&mut self, call: &CallExpr) {
            if let Callee::Expr(callee) = &call.callee {
                match callee.as_ref() {
                    Expr::Ident(id) => {
                        let name = id.sym.to_string();
                        self.out.extend(self.same_file_indirect.setters_for_function(&name).iter().cloned());
                        if let Some(import) = self.imports.iter().find(|i| i.imported_names.contains(&name)) {
                            if let Some(resolved) = &import.resolved_path {
                                if let Some(map) = self.imported_indirect.get(resolved) {
                                    self.out.extend(map.setters_for_function(&name).iter().cloned());
                                }
                            }
                        }
                    }
                    Expr::Member(m) => {
                        if let (Expr::Ident(obj), Some(method)) = (m.obj.as_ref(), m.prop.as_ident()) {
                            let key = format!("{}.{}", obj.sym, method.sym);
                            self.out.extend(
                                self.same_file_indirect.setters_for_method(&key).iter().cloned(),
                            );
                        }
                    }
                    _ => {}
                }
            }
            call.visit_children_with(self);
        }
    }

    let mut walker = CallWalker { same_file_indirect, imports, imported_indirect, out };
    expr.visit_with(&mut walker);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::find_components;
    use crate::parser::{ParserFacade, SwcParserFacade};
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn finds_same_file_indirect_setter_through_hook_callback() {
        let src = "function bumpCount() { setN(n + 1); }\nfunction C() {\n  const [n, setN] = useState(0);\n  useEffect(() => { bumpCount(); }, []);\n}\n";
        let parsed = SwcParserFacade::new().parse_source(Path::new("c.tsx"), src).unwrap();
        let mut setters = HashSet::new();
        setters.insert("setN".to_string());
        let indirect = crate::indirect_setters::build_indirect_setter_map(&parsed.module, &setters);
        let components = find_components(&parsed.module);
        let c = components.iter().find(|c| c.name == "C").unwrap();
        let map = build_cross_file_map(&parsed, c.body, &indirect, &[], &HashMap::new());
        let expected_key = format!("{}:4:useEffect", parsed.path.display());
        assert_eq!(map.get(&expected_key), Some(&vec!["setN".to_string()]));
    }
}
