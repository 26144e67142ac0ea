/**
 * Import Resolution Contract
 *
 * DESIGN DECISION: A narrow `ImportResolver` trait plus one default
 * implementation covering relative and index-file resolution, with
 * workspace-alias and absolute resolution left to a caller-supplied
 * resolver
 * WHY: spec.md §6 "Import resolution contract" names `resolve` and
 * `can_resolve` as the entire surface the engine needs; the Cross-File
 * Relation Builder (cross_file.rs) only ever calls through this trait, so
 * a host project's own path-alias configuration (tsconfig `paths`, webpack
 * aliases, ...) can be plugged in without touching the engine
 *
 * REASONING CHAIN:
 * 1. One-level import expansion (spec.md §4.5) means the resolver is only
 *    ever asked to resolve imports that appear directly in a primary file
 * 2. Recognized source extensions and index files (spec.md §6) are the
 *    default resolver's concern, not the trait's
 * 3. A resolver that cannot resolve a spec returns `None`; the engine
 *    treats this as `ResolveError`, logged and skipped (spec.md §7)
 *
 * PATTERN: narrow query interface (spec.md Design Note 1 "Type-oracle
 * coupling" applies equally here — same shape, different collaborator)
 */

use std::path::{Path, PathBuf};

pub trait ImportResolver: Send + Sync {
    fn resolve(&self, from_file: &Path, spec: &str) -> Option<PathBuf>;
    fn can_resolve(&self, spec: &str) -> bool;
}

/// Resolves relative (`./x`, `../x`) specs against the importing file's
/// directory, trying a fixed list of source extensions and `index` files.
/// Absolute and workspace-alias specs are left unresolved — a host project
/// wires those in via its own `ImportResolver`.
#[derive(Debug, Clone)]
pub struct RelativeFsResolver {
    extensions: Vec<String>,
}

impl Default for RelativeFsResolver {
    fn default() -> Self {
        Self {
            extensions: vec![
                "tsx".into(),
                "ts".into(),
                "jsx".into(),
                "js".into(),
            ],
        }
    }
}

impl ImportResolver for RelativeFsResolver {
    fn resolve(&self, from_file: &Path, spec: &str) -> Option<PathBuf> {
        if !self.can_resolve(spec) {
            return None;
        }
        let base_dir = from_file.parent()?;
        let candidate = base_dir.join(spec);

        if candidate.is_file() {
            return Some(candidate);
        }
        for ext in &self.extensions {
            let with_ext = append_extension(&candidate, ext);
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }
        for ext in &self.extensions {
            let index = candidate.join(format!("index.{ext}"));
            if index.is_file() {
                return Some(index);
            }
        }
        None
    }

    fn can_resolve(&self, spec: &str) -> bool {
        spec.starts_with("./") || spec.starts_with("../")
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_spec_is_resolvable_by_prefix() {
        let r = RelativeFsResolver::default();
        assert!(r.can_resolve("./sibling"));
        assert!(r.can_resolve("../parent/mod"));
        assert!(!r.can_resolve("react"));
        assert!(!r.can_resolve("@alias/mod"));
    }
}
