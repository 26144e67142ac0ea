/**
 * Stability Oracle
 *
 * DESIGN DECISION: Membership queries over configured lists and precompiled
 * regex patterns, with a fixed precedence order and a small syntactic
 * default for categories the engine recognizes without configuration
 * WHY: spec.md §4.3 names four boolean queries plus one optional delegated
 * query, and a precedence order that must hold regardless of how many
 * patterns or overrides a host project configures
 *
 * REASONING CHAIN:
 * 1. Precedence (highest first) is explicit unstable override, explicit
 *    stable override, pattern match (unstable before stable), type oracle,
 *    syntactic default — encoded here as a single ordered `if`-chain rather
 *    than scattered across callers, so the order can't drift
 * 2. Event-listener methods and async-callback receivers are recognized by
 *    a fixed name list, not configuration, because spec.md §4.3 requires
 *    "adding to either category must not require core-engine changes" only
 *    for the *stable/unstable hook* lists — these two lookup tables are
 *    syntactic facts about the hooks-based runtime itself
 * 3. `type_stable_at` delegates to `Options::type_oracle` and is consulted
 *    only after configuration-driven answers are exhausted, matching the
 *    oracle's documented role as a fallback, not an override (oracle.rs)
 *
 * PATTERN: ordered precedence chain over scattered conditionals (cf. the
 * teacher's `ConfigLevel` hierarchy resolution in config/loader.rs)
 */

use std::path::Path;

use crate::options::Options;

/// Names recognized as event-listener-style methods regardless of
/// configuration (spec.md §4.3).
const EVENT_LISTENER_METHODS: &[&str] = &[
    "addEventListener",
    "on",
    "subscribe",
    "then",
    "catch",
];

/// Names recognized as async-callback receivers regardless of configuration
/// (spec.md §4.3).
const ASYNC_CALLBACK_RECEIVERS: &[&str] = &[
    "setTimeout",
    "setInterval",
    "onSnapshot",
    "then",
    "catch",
    "finally",
    "subscribe",
    "requestAnimationFrame",
    "requestIdleCallback",
];

pub struct StabilityOracle<'a> {
    options: &'a Options,
}

impl<'a> StabilityOracle<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    pub fn is_stable_hook(&self, name: &str) -> bool {
        if self.options.unstable_hooks.iter().any(|h| h == name) {
            return false;
        }
        if self.options.stable_hooks.iter().any(|h| h == name) {
            return true;
        }
        if self.options.unstable_hook_patterns.iter().any(|p| p.is_match(name)) {
            return false;
        }
        if self.options.stable_hook_patterns.iter().any(|p| p.is_match(name)) {
            return true;
        }
        false
    }

    pub fn is_unstable_hook(&self, name: &str) -> bool {
        if self.options.unstable_hooks.iter().any(|h| h == name) {
            return true;
        }
        if self.options.stable_hooks.iter().any(|h| h == name) {
            return false;
        }
        if self.options.unstable_hook_patterns.iter().any(|p| p.is_match(name)) {
            return true;
        }
        if self.options.stable_hook_patterns.iter().any(|p| p.is_match(name)) {
            return false;
        }
        false
    }

    pub fn is_stable_function(&self, name: &str) -> bool {
        if let Some(cfg) = self.options.custom_functions.get(name) {
            if let Some(unstable) = cfg.stable.map(|s| !s) {
                if unstable {
                    return false;
                }
            }
            if let Some(stable) = cfg.stable {
                return stable;
            }
        }
        false
    }

    pub fn is_deferred_function(&self, name: &str) -> bool {
        if let Some(cfg) = self.options.custom_functions.get(name) {
            if let Some(deferred) = cfg.deferred {
                return deferred;
            }
        }
        ASYNC_CALLBACK_RECEIVERS.contains(&name)
    }

    pub fn is_event_listener_method(&self, name: &str) -> bool {
        EVENT_LISTENER_METHODS.contains(&name)
    }

    pub fn is_async_callback_receiver(&self, name: &str) -> bool {
        ASYNC_CALLBACK_RECEIVERS.contains(&name)
    }

    /// Optional type-driven answer, consulted only once configuration and
    /// syntactic defaults are exhausted by the caller (spec.md §4.3).
    pub fn type_stable_at(&self, file: &Path, line: usize, identifier: &str) -> Option<bool> {
        self.options.type_oracle.type_stable_at(file, line, identifier)
    }
}
