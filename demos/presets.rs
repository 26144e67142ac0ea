/**
 * Bundled stability presets
 *
 * DESIGN DECISION: One flat `PresetFile` struct, deserialized with
 * `toml::from_str`, merged into an `OptionsBuilder` by hand
 * WHY: SPEC_FULL.md §6.2 scales the teacher's 4-tier hierarchical config
 * loader (`config/loader.rs`) down to the single layer this engine's
 * contract actually exposes — there is no System/Team/Project/User
 * hierarchy here, just "load one named preset and merge it in"
 *
 * REASONING CHAIN:
 * 1. Presets only ever contribute to the Stability Oracle's configuration
 *    surface (`stable_hooks`, `unstable_hook_patterns`, `custom_functions`)
 *    — nothing here can turn on strict mode or debug output, those stay
 *    CLI flags
 * 2. Regex compilation happens at load time so a malformed pattern in a
 *    preset file fails fast with the file name attached, rather than
 *    surfacing as an opaque panic deep in the Stability Oracle
 *
 * PATTERN: Pattern-CONFIG-001 (Hierarchical Configuration), scaled to one
 * layer
 */

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use render_loop_lint::{CustomFunctionConfig, OptionsBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
struct PresetFile {
    #[serde(default)]
    stable_hooks: Vec<String>,
    #[serde(default)]
    unstable_hooks: Vec<String>,
    #[serde(default)]
    stable_hook_patterns: Vec<String>,
    #[serde(default)]
    unstable_hook_patterns: Vec<String>,
    #[serde(default)]
    custom_functions: HashMap<String, CustomFunctionPreset>,
}

#[derive(Debug, Deserialize, Default)]
struct CustomFunctionPreset {
    #[serde(default)]
    stable: Option<bool>,
    #[serde(default)]
    deferred: Option<bool>,
}

#[derive(Debug)]
pub enum PresetError {
    Unknown(String),
    Parse(toml::de::Error),
    BadPattern(String, regex::Error),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::Unknown(name) => write!(f, "no bundled preset named '{name}'"),
            PresetError::Parse(err) => write!(f, "{err}"),
            PresetError::BadPattern(pattern, err) => write!(f, "invalid pattern '{pattern}': {err}"),
        }
    }
}

const BUNDLED: &[(&str, &str)] = &[
    ("redux", include_str!("presets/redux.toml")),
    ("zustand", include_str!("presets/zustand.toml")),
];

/// A preset with its pattern strings already compiled, ready to fold into
/// a builder.
pub struct CompiledPreset {
    file: PresetFile,
    stable_hook_patterns: Vec<Regex>,
    unstable_hook_patterns: Vec<Regex>,
}

/// Loads a bundled preset by name and compiles its regex patterns.
pub fn load(name: &str) -> Result<CompiledPreset, PresetError> {
    let raw = BUNDLED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, contents)| *contents)
        .ok_or_else(|| PresetError::Unknown(name.to_string()))?;

    let file: PresetFile = toml::from_str(raw).map_err(PresetError::Parse)?;

    let mut stable_hook_patterns = Vec::with_capacity(file.stable_hook_patterns.len());
    for pattern in &file.stable_hook_patterns {
        let re = Regex::new(pattern).map_err(|e| PresetError::BadPattern(pattern.clone(), e))?;
        stable_hook_patterns.push(re);
    }
    let mut unstable_hook_patterns = Vec::with_capacity(file.unstable_hook_patterns.len());
    for pattern in &file.unstable_hook_patterns {
        let re = Regex::new(pattern).map_err(|e| PresetError::BadPattern(pattern.clone(), e))?;
        unstable_hook_patterns.push(re);
    }

    Ok(CompiledPreset { file, stable_hook_patterns, unstable_hook_patterns })
}

impl CompiledPreset {
    pub fn apply(self, mut builder: OptionsBuilder) -> OptionsBuilder {
        builder = builder.stable_hooks(self.file.stable_hooks);
        builder = builder.unstable_hooks(self.file.unstable_hooks);
        for pattern in self.stable_hook_patterns {
            builder = builder.stable_hook_pattern(pattern);
        }
        for pattern in self.unstable_hook_patterns {
            builder = builder.unstable_hook_pattern(pattern);
        }
        for (name, cfg) in self.file.custom_functions {
            builder = builder.custom_function(
                name,
                CustomFunctionConfig { stable: cfg.stable, deferred: cfg.deferred },
            );
        }
        builder
    }
}
