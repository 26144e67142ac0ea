/**
 * Engine Options
 *
 * DESIGN DECISION: One `Options` value threaded explicitly through the
 * pipeline, built with a builder, never a global/thread-local
 * WHY: spec.md §9 Design Note "Global mutable options" explicitly rejects
 * process-wide option storage in favor of a value passed by reference; the
 * orchestrator (orchestrator.rs) holds one `Options` for the lifetime of a
 * single `analyze()` call and every component borrows it
 *
 * REASONING CHAIN:
 * 1. `stable_hooks`/`unstable_hooks`/patterns/`custom_functions` are the
 *    Stability Oracle's (stability.rs) configuration surface (spec.md §6)
 * 2. `strict_mode` and `type_oracle` are threaded to the Stability Oracle
 *    for the optional type-driven layer (spec.md §4.3)
 * 3. `debug` controls whether `debug_info` is populated on diagnostics and
 *    whether `tracing::debug!` spans are emitted (SPEC_FULL.md §3)
 * 4. `ignore_patterns` is carried on `Options` because spec.md §6 names it
 *    as part of the contract, but the engine itself never reads it — glob
 *    filtering of the input file set is explicitly the CLI collaborator's
 *    job (spec.md §1 "Out of scope")
 *
 * PATTERN: explicit config value over global state (spec.md Design Note 1)
 */

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::oracle::{NullTypeOracle, TypeOracle};

#[derive(Debug, Clone, Default)]
pub struct CustomFunctionConfig {
    pub stable: Option<bool>,
    pub deferred: Option<bool>,
}

#[derive(Clone)]
pub struct Options {
    pub stable_hooks: Vec<String>,
    pub unstable_hooks: Vec<String>,
    pub stable_hook_patterns: Vec<Regex>,
    pub unstable_hook_patterns: Vec<Regex>,
    pub custom_functions: HashMap<String, CustomFunctionConfig>,
    pub strict_mode: bool,
    pub type_oracle: Arc<dyn TypeOracle>,
    pub debug: bool,
    /// Carried per spec.md §6 but never consulted by the engine itself —
    /// see module doc.
    pub ignore_patterns: Vec<String>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("stable_hooks", &self.stable_hooks)
            .field("unstable_hooks", &self.unstable_hooks)
            .field("stable_hook_patterns", &self.stable_hook_patterns.len())
            .field("unstable_hook_patterns", &self.unstable_hook_patterns.len())
            .field("custom_functions", &self.custom_functions)
            .field("strict_mode", &self.strict_mode)
            .field("debug", &self.debug)
            .field("ignore_patterns", &self.ignore_patterns)
            .finish()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            stable_hooks: Vec::new(),
            unstable_hooks: Vec::new(),
            stable_hook_patterns: Vec::new(),
            unstable_hook_patterns: Vec::new(),
            custom_functions: HashMap::new(),
            strict_mode: false,
            type_oracle: Arc::new(NullTypeOracle),
            debug: false,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

pub struct OptionsBuilder {
    inner: Options,
}

impl OptionsBuilder {
    pub fn stable_hooks(mut self, hooks: impl IntoIterator<Item = String>) -> Self {
        self.inner.stable_hooks.extend(hooks);
        self
    }

    pub fn unstable_hooks(mut self, hooks: impl IntoIterator<Item = String>) -> Self {
        self.inner.unstable_hooks.extend(hooks);
        self
    }

    pub fn stable_hook_pattern(mut self, pattern: Regex) -> Self {
        self.inner.stable_hook_patterns.push(pattern);
        self
    }

    pub fn unstable_hook_pattern(mut self, pattern: Regex) -> Self {
        self.inner.unstable_hook_patterns.push(pattern);
        self
    }

    pub fn custom_function(mut self, name: impl Into<String>, config: CustomFunctionConfig) -> Self {
        self.inner.custom_functions.insert(name.into(), config);
        self
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.inner.strict_mode = strict;
        self
    }

    pub fn type_oracle(mut self, oracle: Arc<dyn TypeOracle>) -> Self {
        self.inner.type_oracle = oracle;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.inner.debug = debug;
        self
    }

    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.inner.ignore_patterns.extend(patterns);
        self
    }

    pub fn build(self) -> Options {
        self.inner
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self { inner: Options::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_stable_hooks() {
        let opts = Options::builder()
            .stable_hooks(["useDispatch".to_string(), "useStore".to_string()])
            .debug(true)
            .build();
        assert_eq!(opts.stable_hooks, vec!["useDispatch", "useStore"]);
        assert!(opts.debug);
    }
}
