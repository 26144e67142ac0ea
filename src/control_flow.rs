/**
 * Control-Flow Classifier
 *
 * DESIGN DECISION: Direct structural recursion over statements (if/return/
 * try), not an explicit basic-block graph data structure, computing
 * reachable/unconditional/enclosing-guard for every call a caller asks
 * about in one pass
 * WHY: spec.md §1 Non-goals explicitly scope this engine to "bounded,
 * syntactic and lightweight control-flow reasoning", not a general
 * dataflow engine — a basic-block graph would be the right shape for loop-
 * carried dataflow or SSA, neither of which this component needs; what it
 * needs is "does every completing path reach this call", which falls out
 * directly from walking statements in order and tracking whether a branch
 * or an early return has been crossed
 *
 * REASONING CHAIN:
 * 1. `target_of(call)` is supplied by the caller rather than hard-coded to
 *    "is this a setter call", since both direct setter calls
 *    (effect_interaction.rs) and indirect calls through the Indirect-
 *    Setter Resolver's maps (cross_file.rs's same pattern) need the same
 *    reachability/unconditional reasoning — a call can implicate more than
 *    one setter, so `target_of` returns a list
 * 2. A `return` statement terminates reachability for the rest of its
 *    block (spec.md "no preceding early-return can dominate it"); a
 *    `return () => {...}` arrow is treated specially as the effect's
 *    cleanup function, walked with `in_cleanup = true` and restored to
 *    unconditional context, since cleanup always runs if entered
 * 3. Anything inside an `if`/`else` branch, a `try` block, or a `catch`
 *    handler is conditional — `unconditional` only stays true through
 *    strictly sequential statements with no intervening branch
 * 4. Constructs this walk does not specifically model (`switch`, `for`,
 *    `while`, `do`) are treated as already conditional in the caller's
 *    context by the fact that they are visited structurally for calls but
 *    never themselves grant unconditional status — matches "failures
 *    downgrade to unknown" in spirit without needing a literal failure path
 *
 * PATTERN: recursive descent classification (spec.md §1 Non-goals), rather
 * than explicit CFG construction
 */

use swc_common::Span;
use swc_ecma_ast::*;

/// One call site implicating one or more targets (a literal setter, or a
/// setter reached indirectly through a known local function/method).
pub struct CallSite<'ast> {
    pub target_name: String,
    pub span: Span,
    pub reachable: bool,
    pub unconditional: bool,
    pub enclosing_if_test: Option<&'ast Expr>,
    pub call_args: &'ast [ExprOrSpread],
    pub in_cleanup: bool,
}

pub struct ControlFlowClassifier;

impl ControlFlowClassifier {
    /// Walks `body`, calling `target_of` on every call expression found;
    /// `target_of` returns the names (setters, typically) implicated by
    /// that call, or an empty vec if the call is irrelevant.
    pub fn classify_calls<'ast>(
        body: &'ast BlockStmt,
        target_of: &dyn Fn(&CallExpr) -> Vec<String>,
    ) -> Vec<CallSite<'ast>> {
        let mut out = Vec::new();
        walk_block(body, target_of, true, None, false, &mut out);
        out
    }
}

fn walk_block<'ast>(
    block: &'ast BlockStmt,
    target_of: &dyn Fn(&CallExpr) -> Vec<String>,
    mut unconditional_ctx: bool,
    enclosing_if: Option<&'ast Expr>,
    in_cleanup: bool,
    out: &mut Vec<CallSite<'ast>>,
) {
    for stmt in &block.stmts {
        match stmt {
            Stmt::Expr(expr_stmt) => {
                walk_expr(&expr_stmt.expr, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
            }
            Stmt::If(if_stmt) => {
                walk_stmt_as_block(&if_stmt.cons, target_of, false, Some(&if_stmt.test), in_cleanup, out);
                if let Some(alt) = &if_stmt.alt {
                    walk_stmt_as_block(alt, target_of, false, Some(&if_stmt.test), in_cleanup, out);
                }
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    if let Expr::Arrow(arrow) = arg.as_ref() {
                        if let BlockStmtOrExpr::BlockStmt(cleanup_body) = arrow.body.as_ref() {
                            walk_block(cleanup_body, target_of, true, None, true, out);
                        } else {
                            walk_expr(arg, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
                        }
                    } else {
                        walk_expr(arg, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
                    }
                }
                // An early return terminates reachability for sequential
                // statements that would otherwise follow it in this block.
                unconditional_ctx = false;
                break;
            }
            Stmt::Try(try_stmt) => {
                walk_block(&try_stmt.block, target_of, false, enclosing_if, in_cleanup, out);
                if let Some(handler) = &try_stmt.handler {
                    walk_block(&handler.body, target_of, false, enclosing_if, in_cleanup, out);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    walk_block(finalizer, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
                }
            }
            Stmt::Block(inner) => {
                walk_block(inner, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
            }
            Stmt::For(for_stmt) => {
                if let Some(body) = stmt_as_block_ref(&for_stmt.body) {
                    walk_block(body, target_of, false, enclosing_if, in_cleanup, out);
                }
            }
            Stmt::ForOf(for_stmt) => {
                if let Some(body) = stmt_as_block_ref(&for_stmt.body) {
                    walk_block(body, target_of, false, enclosing_if, in_cleanup, out);
                }
            }
            Stmt::ForIn(for_stmt) => {
                if let Some(body) = stmt_as_block_ref(&for_stmt.body) {
                    walk_block(body, target_of, false, enclosing_if, in_cleanup, out);
                }
            }
            Stmt::While(while_stmt) => {
                if let Some(body) = stmt_as_block_ref(&while_stmt.body) {
                    walk_block(body, target_of, false, enclosing_if, in_cleanup, out);
                }
            }
            _ => {}
        }
    }
}

fn stmt_as_block_ref(stmt: &Stmt) -> Option<&BlockStmt> {
    match stmt {
        Stmt::Block(b) => Some(b),
        _ => None,
    }
}

fn walk_stmt_as_block<'ast>(
    stmt: &'ast Stmt,
    target_of: &dyn Fn(&CallExpr) -> Vec<String>,
    unconditional_ctx: bool,
    enclosing_if: Option<&'ast Expr>,
    in_cleanup: bool,
    out: &mut Vec<CallSite<'ast>>,
) {
    match stmt {
        Stmt::Block(b) => walk_block(b, target_of, unconditional_ctx, enclosing_if, in_cleanup, out),
        Stmt::Expr(e) => walk_expr(&e.expr, target_of, unconditional_ctx, enclosing_if, in_cleanup, out),
        Stmt::Return(ret) => {
            if let Some(arg) = &ret.arg {
                walk_expr(arg, target_of, unconditional_ctx, enclosing_if, in_cleanup, out);
            }
        }
        _ => {}
    }
}

fn walk_expr<'ast>(
    expr: &'ast Expr,
    target_of: &dyn Fn(&CallExpr) -> Vec<String>,
    unconditional_ctx: bool,
    enclosing_if: Option<&'ast Expr>,
    in_cleanup: bool,
    out: &mut Vec<CallSite<'ast>>,
) {
    if let Expr::Call(call) = expr {
        let names = target_of(call);
        for name in names {
            out.push(CallSite {
                target_name: name,
                span: call.span,
                reachable: true,
                unconditional: unconditional_ctx,
                enclosing_if_test: enclosing_if,
                call_args: &call.args,
                in_cleanup,
            });
        }
        for arg in &call.args {
            // A callback argument (`.then(() => {...})`, `setTimeout(() => {...})`)
            // introduces its own unconditional context: whatever runs at its
            // top level runs unconditionally whenever the callback itself
            // runs, independent of the guard the outer call sits behind.
            match arg.expr.as_ref() {
                Expr::Arrow(arrow) => match arrow.body.as_ref() {
                    BlockStmtOrExpr::BlockStmt(body) => {
                        walk_block(body, target_of, true, None, false, out);
                    }
                    BlockStmtOrExpr::Expr(e) => {
                        walk_expr(e, target_of, true, None, false, out);
                    }
                },
                Expr::Fn(fn_expr) => {
                    if let Some(body) = &fn_expr.function.body {
                        walk_block(body, target_of, true, None, false, out);
                    }
                }
                other => walk_expr(other, target_of, unconditional_ctx, enclosing_if, in_cleanup, out),
            }
        }
    }
}
