/**
 * Hook Diagnostic — the engine's public output type
 *
 * DESIGN DECISION: One record type, `HookDiagnostic`, closed tagged enums
 * for kind/category/severity/confidence/error code, identity derived from a
 * tuple rather than stored as a synthetic key
 * WHY: spec.md §3's Hook Diagnostic record and §6's error-code taxonomy are
 * the engine's entire public contract — everything upstream (policy.rs)
 * exists to produce these
 *
 * REASONING CHAIN:
 * 1. `(file, line, error_code, problematic_dependency)` is the identity
 *    spec.md §3 specifies; deduplication (policy.rs) keys on exactly this
 * 2. Error codes are part of the public contract used by ignore pragmas
 *    (spec.md §4.12) — they are a fixed, closed enum, not strings, so a
 *    typo in a new rule can't silently mint an unrecognized code
 * 3. `debug_info` is only populated when `Options::debug` is set (spec.md
 *    §6), kept as `Option<String>` rather than always-present to avoid
 *    dragging rationale strings through production call sites
 *
 * PATTERN: tagged record (spec.md Design Note 1), cf. validation/quality.rs
 * QualityIssue in the teacher crate
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::HookKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Render-phase setter call.
    Rld100,
    /// Effect depends on state it unconditionally sets.
    Rld200,
    /// Effect without dependency array calls a setter.
    Rld201,
    /// Layout-effect variant of RLD-200.
    Rld202,
    /// Effect indirectly sets a depended state across files.
    Rld300,
    /// Callback/memo variant of RLD-300.
    Rld301,
    /// Unstable object in deps.
    Rld400,
    /// Unstable array in deps.
    Rld401,
    /// Unstable function in deps.
    Rld402,
    /// Unstable function-call-result in deps.
    Rld403,
    /// Object-spread risk around a guarded setter.
    Rld410,
    /// Callback/memo modifies a depended state without functional update.
    Rld420,
    /// Missing dependency array.
    Rld500,
    /// Conditionally modifies a depended state.
    Rld501,
    /// Ref mutation with state value on the render path, or ref-in-deps pattern.
    Rld600,
}

impl ErrorCode {
    /// Stable string form used in ignore pragmas (spec.md §6) and JSON output.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::Rld100 => "RLD-100",
            ErrorCode::Rld200 => "RLD-200",
            ErrorCode::Rld201 => "RLD-201",
            ErrorCode::Rld202 => "RLD-202",
            ErrorCode::Rld300 => "RLD-300",
            ErrorCode::Rld301 => "RLD-301",
            ErrorCode::Rld400 => "RLD-400",
            ErrorCode::Rld401 => "RLD-401",
            ErrorCode::Rld402 => "RLD-402",
            ErrorCode::Rld403 => "RLD-403",
            ErrorCode::Rld410 => "RLD-410",
            ErrorCode::Rld420 => "RLD-420",
            ErrorCode::Rld500 => "RLD-500",
            ErrorCode::Rld501 => "RLD-501",
            ErrorCode::Rld600 => "RLD-600",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "RLD-100" => ErrorCode::Rld100,
            "RLD-200" => ErrorCode::Rld200,
            "RLD-201" => ErrorCode::Rld201,
            "RLD-202" => ErrorCode::Rld202,
            "RLD-300" => ErrorCode::Rld300,
            "RLD-301" => ErrorCode::Rld301,
            "RLD-400" => ErrorCode::Rld400,
            "RLD-401" => ErrorCode::Rld401,
            "RLD-402" => ErrorCode::Rld402,
            "RLD-403" => ErrorCode::Rld403,
            "RLD-410" => ErrorCode::Rld410,
            "RLD-420" => ErrorCode::Rld420,
            "RLD-500" => ErrorCode::Rld500,
            "RLD-501" => ErrorCode::Rld501,
            "RLD-600" => ErrorCode::Rld600,
            _ => return None,
        })
    }

    pub fn category(self) -> Category {
        match self {
            ErrorCode::Rld100
            | ErrorCode::Rld200
            | ErrorCode::Rld201
            | ErrorCode::Rld202
            | ErrorCode::Rld300 => Category::Critical,
            ErrorCode::Rld301
            | ErrorCode::Rld410
            | ErrorCode::Rld420
            | ErrorCode::Rld500
            | ErrorCode::Rld501
            | ErrorCode::Rld600 => Category::Warning,
            ErrorCode::Rld400 | ErrorCode::Rld401 | ErrorCode::Rld402 | ErrorCode::Rld403 => {
                Category::Performance
            }
        }
    }

    pub fn unstable_kind(kind: crate::model::UnstableKind) -> Self {
        use crate::model::UnstableKind::*;
        match kind {
            Object => ErrorCode::Rld400,
            Array => ErrorCode::Rld401,
            Function => ErrorCode::Rld402,
            CallResult => ErrorCode::Rld403,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    ConfirmedInfiniteLoop,
    PotentialIssue,
    SafePattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Critical,
    Warning,
    Performance,
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// The engine's single public output record (spec.md §3 "Hook Diagnostic").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookDiagnostic {
    pub file: PathBuf,
    pub line: usize,
    pub column: Option<usize>,
    pub hook_type: HookKind,
    pub kind: DiagnosticKind,
    pub error_code: ErrorCode,
    pub category: Category,
    pub severity: Severity,
    pub confidence: Confidence,
    pub problematic_dependency: Option<String>,
    pub state_variable: Option<String>,
    pub setter_function: Option<String>,
    pub state_modifications: Vec<String>,
    pub state_reads: Vec<String>,
    pub explanation: String,
    pub suggestion: Option<String>,
    pub debug_info: Option<String>,
}

impl HookDiagnostic {
    /// Identity per spec.md §3: `(file, line, error_code, problematic_dependency)`.
    pub fn identity(&self) -> (PathBuf, usize, ErrorCode, Option<String>) {
        (self.file.clone(), self.line, self.error_code, self.problematic_dependency.clone())
    }
}

/// Stable total order for diagnostics: file path, then line, then column,
/// then error code (spec.md §8 invariant 3, idempotence / stable order).
pub fn sort_key(d: &HookDiagnostic) -> (String, usize, usize, &'static str) {
    (
        d.file.to_string_lossy().to_string(),
        d.line,
        d.column.unwrap_or(0),
        d.error_code.code(),
    )
}
