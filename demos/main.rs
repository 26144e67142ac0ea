// Lint demo CLI
//
// DESIGN DECISION: A thin `clap`-derived binary over `render_loop_lint::analyze`
// WHY: SPEC_FULL.md §6.1 scopes this crate's CLI surface to "exercise the
// library end-to-end" — file paths in, diagnostics out, either
// human-readable or JSON — leaving the SARIF formatter, incremental cache,
// and LSP server spec.md places out of scope unbuilt
//
// REASONING CHAIN:
// 1. `--preset <name>` loads a bundled `demos/presets/*.toml` file and
//    merges its stability configuration into the `Options` builder before
//    `analyze` ever sees an input file — a convenience layered on top of
//    the engine, not a component of it (SPEC_FULL.md §6.1)
// 2. `--strict` and `--debug` map directly onto `Options::strict_mode` and
//    `Options::debug`
// 3. Exit code reflects whether any diagnostic reached `Category::Critical`,
//    the shape a CI collaborator needs (spec.md §1 "Out of scope" places
//    CI wiring itself outside the engine, but the exit code is cheap to
//    offer here)
//
// PATTERN: Pattern-CLI-001 (Command-Line Interface), adapted from the
// teacher's `clap`-derived `rust-parser` binary

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use render_loop_lint::{analyze, Category, Options, RelativeFsResolver};

mod presets;

#[derive(Parser)]
#[command(name = "lint-demo")]
#[command(about = "Detect infinite re-render risk in hooks-based components")]
struct Cli {
    /// TypeScript/JSX files to analyze
    files: Vec<PathBuf>,

    /// Treat ambiguous patterns as issues rather than safe
    #[arg(long)]
    strict: bool,

    /// Populate debug_info on every diagnostic and emit tracing spans
    #[arg(long)]
    debug: bool,

    /// Load a bundled stability preset (see demos/presets/)
    #[arg(long)]
    preset: Option<String>,

    /// Emit diagnostics as a JSON array instead of human-readable lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let mut builder = Options::builder().strict_mode(cli.strict).debug(cli.debug);

    if let Some(name) = &cli.preset {
        match presets::load(name) {
            Ok(preset) => builder = preset.apply(builder),
            Err(err) => {
                eprintln!("could not load preset '{name}': {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let options = builder.build();
    let resolver = RelativeFsResolver::default();
    let diagnostics = analyze(&cli.files, &options, &resolver);

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize diagnostics: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for d in &diagnostics {
            let dep = d.problematic_dependency.as_deref().unwrap_or("-");
            println!(
                "{}:{} {} [{:?}] {} (dep: {})",
                d.file.display(),
                d.line,
                d.error_code.code(),
                d.category,
                d.explanation,
                dep,
            );
        }
    }

    let has_critical = diagnostics.iter().any(|d| d.category == Category::Critical);
    if has_critical {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
