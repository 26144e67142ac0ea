/**
 * Render-Loop Diagnostics Engine
 *
 * DESIGN DECISION: Thirteen focused modules, each owning exactly one
 * pipeline component, wired together by a single `orchestrator::analyze`
 * entry point re-exported at the crate root
 * WHY: spec.md §9 Design Note 1 rejects a monolithic dynamic-dispatch engine
 * in favor of tagged data flowing through named stages that can each be
 * tested in isolation — this is the same separation-of-concerns argument the
 * teacher crate makes for its own pattern/confidence/matching split, applied
 * to a static-analysis pipeline instead of a pattern-matching one
 *
 * REASONING CHAIN:
 * 1. `model.rs` is the shared vocabulary every other module imports from,
 *    mirroring how the teacher's own `pattern.rs` anchors its API
 * 2. `error.rs` centralizes the engine's three failure kinds so no module
 *    invents its own error type
 * 3. The crate root re-exports only what a host project actually calls:
 *    `analyze`, `Options`, the diagnostic/model types, and the two traits a
 *    host may want to implement (`ImportResolver`, `TypeOracle`)
 *
 * # Example
 *
 * ```no_run
 * use render_loop_lint::{analyze, Options, RelativeFsResolver};
 * use std::path::PathBuf;
 *
 * let options = Options::default();
 * let resolver = RelativeFsResolver::default();
 * let diagnostics = analyze(&[PathBuf::from("src/App.tsx")], &options, &resolver);
 * for d in &diagnostics {
 *     println!("{}:{} {} - {}", d.file.display(), d.line, d.error_code.code(), d.explanation);
 * }
 * ```
 */

pub mod control_flow;
pub mod cross_file;
pub mod diagnostic;
pub mod effect_interaction;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod ignore;
pub mod indirect_setters;
pub mod model;
pub mod no_deps;
pub mod options;
pub mod oracle;
pub mod orchestrator;
pub mod parser;
pub mod policy;
pub mod render_phase;
pub mod resolver;
pub mod stability;
pub mod unstable_refs;

pub use diagnostic::{Category, Confidence, DiagnosticKind, ErrorCode, HookDiagnostic, Severity};
pub use error::{Error, Result};
pub use model::{ComponentFacts, HookKind, HookSite, Position, SetterClassification};
pub use options::{CustomFunctionConfig, Options, OptionsBuilder};
pub use oracle::{NullTypeOracle, TypeOracle};
pub use orchestrator::analyze;
pub use parser::{ParsedFile, ParserFacade, SwcParserFacade};
pub use resolver::{ImportResolver, RelativeFsResolver};

/// Crate version, exposed for `--version` surfaces and debug output.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
