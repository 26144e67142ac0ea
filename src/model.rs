/**
 * Core Data Model
 *
 * DESIGN DECISION: Plain structs and tagged enums for every record named in
 * the specification's data model, with no behavior beyond small accessors
 * WHY: spec.md §3 defines a data model shared by all thirteen pipeline
 * components; keeping it in one module (rather than letting each component
 * define its own view of "a setter" or "a hook site") is what lets the
 * Hook Site Analyzer (policy.rs) consume the outputs of every upstream
 * component without translation layers
 *
 * REASONING CHAIN:
 * 1. Records are built per-analysis and discarded at the end (spec.md §3
 *    "Lifecycles") — nothing here needs to be `Clone`-cheap across calls,
 *    only within one call, so plain owned `String`/`Vec` fields are fine
 * 2. Dynamic dispatch over hook kinds is explicitly rejected by Design
 *    Note 1 (spec.md §9) in favor of tagged enums matched in policy.rs
 * 3. Source coordinates (line, column) are carried on every record that
 *    can anchor a diagnostic, since Parser Facade guarantees they survive
 *    from the AST (spec.md §4.1)
 *
 * PATTERN: flat per-component data, threaded explicitly (spec.md §9)
 */

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One source position, 1-based line and column as required by spec.md §8
/// invariant 1 (`d.line >= 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A resolved import: the source string as written, and the absolute path
/// it resolved to (when the import resolver, §6, could resolve it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub source: String,
    pub resolved_path: Option<PathBuf>,
    pub imported_names: Vec<String>,
    pub line: usize,
}

/// Which hook a call site invokes. Kept as a closed enum per Design Note 1
/// (spec.md §9) rather than a string, so the policy engine can exhaustively
/// match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    Effect,
    LayoutEffect,
    Callback,
    Memo,
}

impl HookKind {
    pub fn from_callee_name(name: &str) -> Option<Self> {
        match name {
            "useEffect" => Some(HookKind::Effect),
            "useLayoutEffect" => Some(HookKind::LayoutEffect),
            "useCallback" => Some(HookKind::Callback),
            "useMemo" => Some(HookKind::Memo),
            _ => None,
        }
    }

    pub fn is_effect_like(self) -> bool {
        matches!(self, HookKind::Effect | HookKind::LayoutEffect)
    }

    pub fn is_memo_like(self) -> bool {
        matches!(self, HookKind::Callback | HookKind::Memo)
    }

    pub fn name(self) -> &'static str {
        match self {
            HookKind::Effect => "useEffect",
            HookKind::LayoutEffect => "useLayoutEffect",
            HookKind::Callback => "useCallback",
            HookKind::Memo => "useMemo",
        }
    }
}

/// A `[state, setState] = useState(...)` pair found by the State & Ref
/// Extractor (spec.md §4.2). Invariant: setter identifiers are unique
/// within a component and never overlap with state identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBinding {
    pub state_name: String,
    pub setter_name: String,
    pub position: Position,
}

/// A `useRef(...)` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefBinding {
    pub ref_name: String,
    pub position: Position,
}

/// Why a locally declared value is considered unstable (spec.md §3
/// "Unstable Local"). Error codes RLD-400..403 key off this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnstableKind {
    Object,
    Array,
    Function,
    CallResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstableLocal {
    pub name: String,
    pub kind: UnstableKind,
    pub position: Position,
}

/// Everything the State & Ref Extractor (spec.md §4.2) collects about one
/// component body, scoped to that component's lexical range.
#[derive(Debug, Clone, Default)]
pub struct ComponentFacts {
    pub component_name: String,
    pub state_bindings: Vec<StateBinding>,
    pub ref_bindings: Vec<RefBinding>,
    pub unstable_locals: Vec<UnstableLocal>,
}

impl ComponentFacts {
    pub fn setter_for_state(&self, state: &str) -> Option<&str> {
        self.state_bindings
            .iter()
            .find(|b| b.state_name == state)
            .map(|b| b.setter_name.as_str())
    }

    pub fn state_for_setter(&self, setter: &str) -> Option<&str> {
        self.state_bindings
            .iter()
            .find(|b| b.setter_name == setter)
            .map(|b| b.state_name.as_str())
    }

    pub fn is_setter(&self, name: &str) -> bool {
        self.state_bindings.iter().any(|b| b.setter_name == name)
    }

    pub fn is_ref(&self, name: &str) -> bool {
        self.ref_bindings.iter().any(|r| r.ref_name == name)
    }

    pub fn unstable_local(&self, name: &str) -> Option<&UnstableLocal> {
        self.unstable_locals.iter().find(|u| u.name == name)
    }

    pub fn all_state_names(&self) -> Vec<&str> {
        self.state_bindings.iter().map(|b| b.state_name.as_str()).collect()
    }
}

/// A hook call expression: `useEffect(fn, deps)`, `useMemo(fn, deps)`, etc.
#[derive(Debug, Clone)]
pub struct HookSite {
    pub kind: HookKind,
    pub position: Position,
    pub has_deps_array: bool,
    /// Dependency array elements that are plain identifiers, in source
    /// order, alongside their own position for per-dependency diagnostics.
    pub dependency_identifiers: Vec<(String, Position)>,
}

impl HookSite {
    pub fn site_id(&self, file: &std::path::Path) -> String {
        format!("{}:{}:{}", file.display(), self.position.line, self.kind.name())
    }
}

/// How a single setter call inside a hook body is classified by the
/// Control-Flow Classifier (spec.md §4.7) plus the deferred/cleanup tags
/// that the Effect Interaction Analyzer (§4.8) contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetterClassification {
    Unreachable,
    Unconditional,
    ConditionallyGuardedEffective,
    ConditionallyGuardedRisky,
    Deferred,
    Cleanup,
    /// Control-flow construction failed on this path (spec.md §4.7); the
    /// policy engine treats this as conditionally risky but not dead.
    Unknown,
}

/// One resolved setter call found somewhere beneath a hook body, direct or
/// indirect (through a local function or `obj.method()`).
#[derive(Debug, Clone)]
pub struct SetterCall {
    pub setter_name: String,
    pub classification: SetterClassification,
    pub has_functional_update: bool,
    /// The specific guard shape recognized for this call, when
    /// `classification` is one of the guarded variants (guard.rs).
    pub guard_type: Option<crate::guard::GuardType>,
    pub rationale: String,
}

/// Function-name / object-method maps built by the Indirect-Setter
/// Resolver (spec.md §4.4), scoped to one file.
#[derive(Debug, Clone, Default)]
pub struct IndirectSetterMap {
    pub by_function: HashMap<String, Vec<String>>,
    pub by_method: HashMap<String, Vec<String>>,
}

impl IndirectSetterMap {
    pub fn setters_for_function(&self, name: &str) -> &[String] {
        self.by_function.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn setters_for_method(&self, object_dot_method: &str) -> &[String] {
        self.by_method.get(object_dot_method).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Cross-File Setter Map entry (spec.md §3, §4.5): for a given hook site,
/// the setters reachable through call expressions that cross file
/// boundaries via the one-level-deep import graph.
pub type CrossFileSetterMap = HashMap<String, Vec<String>>;
