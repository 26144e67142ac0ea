/**
 * Error Handling Module
 *
 * DESIGN DECISION: Centralized error types using thiserror, one variant per
 * error kind crossing the engine boundary
 * WHY: spec.md §7 names exactly three error kinds (ParseError, AnalysisError,
 * ResolveError) plus I/O and serialization failures incurred by the
 * orchestrator reading files and the demo binary emitting JSON
 *
 * REASONING CHAIN:
 * 1. No error may propagate out of a single hook analysis (spec.md §7) —
 *    callers of the engine only ever see file-level or call-level failures
 * 2. thiserror removes boilerplate Display impls while keeping the enum
 *    exhaustively matchable at call sites
 * 3. Each variant carries exactly the context a caller needs to act on it
 *    (path, line, rationale) and nothing more
 * 4. From conversions for std::io and serde_json enable ? propagation
 *    through the orchestrator without manual wrapping
 *
 * PATTERN: Rust error handling best practices
 */

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for the render-loop diagnostics engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The parser facade could not produce an AST for a file. Per spec.md
    /// §4.1/§7, the orchestrator logs this and excludes the file from
    /// analysis rather than failing the whole batch.
    #[error("failed to parse {file}: {reason}")]
    Parse { file: PathBuf, reason: String },

    /// An internal check failed on an unusual construct (spec.md §7). The
    /// affected check degrades to "unknown" and the rest of the pipeline
    /// proceeds; this variant exists so the degradation can be logged.
    #[error("{component} could not analyze {file}:{line}: {reason}")]
    Analysis {
        file: PathBuf,
        line: usize,
        component: &'static str,
        reason: String,
    },

    /// An import could not be resolved to a file on disk. Silently skipped
    /// by the cross-file phase per spec.md §7 — this variant exists so
    /// `--debug` runs can still see what was missed.
    #[error("could not resolve import {spec:?} from {}", from.display())]
    Resolve { from: PathBuf, spec: String },

    /// Reading a file from disk failed outside of parsing (permissions,
    /// missing file, etc.).
    #[error("I/O error reading {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// Serializing or deserializing diagnostics / preset configuration
    /// failed (demo binary JSON/TOML surfaces, see SPEC_FULL.md §6.1-6.2).
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_file_and_reason() {
        let err = Error::Parse {
            file: PathBuf::from("src/App.tsx"),
            reason: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("App.tsx"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn errors_are_cloneable_and_comparable() {
        let a = Error::Resolve { from: PathBuf::from("a.tsx"), spec: "./b".into() };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
