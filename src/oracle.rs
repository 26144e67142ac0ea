/**
 * Type-Oracle Contract
 *
 * DESIGN DECISION: A narrow, read-only, side-effect-free trait the engine
 * queries and never assumes is present
 * WHY: spec.md §6 describes the type oracle as an optional external
 * collaborator (a type-checker/language-service) that may answer "is this
 * identifier's static type stable" questions the syntactic Stability
 * Oracle (stability.rs) cannot answer on its own
 *
 * REASONING CHAIN:
 * 1. The engine must degrade gracefully without an oracle (spec.md §9
 *    Design Note "Type-oracle coupling") — `None` from every method means
 *    "fall back to syntactic heuristics", not an error
 * 2. Any persistent program/language-service state belongs to the oracle
 *    implementation, not the engine — the trait carries no lifecycle
 *    methods, just queries
 * 3. Thread-safety of a shared oracle is the collaborator's responsibility
 *    (spec.md §5) — the engine only requires `Send + Sync` so one oracle
 *    instance can back parallel engine instances over disjoint file sets
 *
 * PATTERN: narrow query interface (spec.md Design Note 1 "Type-oracle coupling")
 */

use std::path::Path;

/// Optional external collaborator providing type-driven stability answers.
pub trait TypeOracle: Send + Sync {
    /// Is the value bound to `identifier` at `file:line` of a stable type
    /// (a type whose values are referentially stable across renders, e.g.
    /// a dispatch function or a ref object)? `None` means unknown.
    fn type_stable_at(&self, file: &Path, line: usize, identifier: &str) -> Option<bool>;

    /// Does calling `callee` at `file:line` return a value of stable type?
    /// `None` means unknown.
    fn return_type_stable_at(&self, file: &Path, line: usize, callee: &str) -> Option<bool>;
}

/// The oracle used when no external type information is wired in: every
/// query is unknown, so the Stability Oracle falls through to its
/// syntactic default (stability.rs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTypeOracle;

impl TypeOracle for NullTypeOracle {
    fn type_stable_at(&self, _file: &Path, _line: usize, _identifier: &str) -> Option<bool> {
        None
    }

    fn return_type_stable_at(&self, _file: &Path, _line: usize, _callee: &str) -> Option<bool> {
        None
    }
}
