//! Deciding which imports stay external to a bundle.
//!
//! A module is left to the runtime when it is a platform builtin
//! (`node:*`), the editor extension API (`vscode`), or a declared
//! dependency of the package or its parent workspace. Anything the
//! resolver already located on disk is always bundled.

use std::sync::Arc;

use crate::core::manifest::Manifest;
use crate::core::package_name::is_valid_package_name;

/// Prefix of platform builtin modules.
pub const BUILTIN_PREFIX: &str = "node:";

/// Module namespace provided only by the editor extension host.
pub const EDITOR_HOST_MODULE: &str = "vscode";

/// Collect the valid dependency names of one or two manifests.
///
/// Names from `own` come first; names repeated in `parent` keep their
/// first position.
pub fn collect_dependencies(own: &Manifest, parent: Option<&Manifest>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let candidates = own
        .dependency_names()
        .iter()
        .chain(parent.into_iter().flat_map(|m| m.dependency_names()));

    for name in candidates {
        if is_valid_package_name(name) && !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Build the external predicate for a package.
pub fn resolve_external(own: &Manifest, parent: Option<&Manifest>) -> ExternalPredicate {
    let dependencies = collect_dependencies(own, parent);
    tracing::debug!("External dependencies: {:?}", dependencies);
    ExternalPredicate::new(dependencies)
}

/// Read-only externality check shared by every task of a build.
///
/// The check is expressed as a pattern list: the builtin wildcard, the
/// editor host module, then every dependency name. A pattern ending in
/// `*` matches by prefix; any other pattern matches a specifier exactly,
/// so `chalk` does not cover `chalk/ansi`.
///
/// Cloning is cheap; all clones share the same pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPredicate {
    patterns: Arc<[String]>,
}

/// Patterns present in every predicate, ahead of the dependency names.
const FIXED_PATTERNS: usize = 2;

impl ExternalPredicate {
    /// Create a predicate over an already-filtered dependency set.
    pub fn new(dependencies: Vec<String>) -> Self {
        let mut patterns = Vec::with_capacity(FIXED_PATTERNS + dependencies.len());
        patterns.push(format!("{}*", BUILTIN_PREFIX));
        patterns.push(EDITOR_HOST_MODULE.to_string());
        patterns.extend(dependencies);
        ExternalPredicate {
            patterns: patterns.into(),
        }
    }

    /// Whether `source`, imported from `importer`, must stay external.
    ///
    /// `importer` is accepted for parity with bundler hooks and ignored.
    pub fn is_external(&self, source: &str, _importer: Option<&str>, is_resolved: bool) -> bool {
        !is_resolved
            && self
                .patterns
                .iter()
                .any(|pattern| matches_pattern(pattern, source))
    }

    /// The declared dependency names, in resolution order.
    pub fn dependencies(&self) -> &[String] {
        &self.patterns[FIXED_PATTERNS..]
    }

    /// Every pattern this predicate treats as external.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Match one external pattern against an import specifier.
pub fn matches_pattern(pattern: &str, source: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => source.starts_with(prefix),
        None => pattern == source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn manifest(value: serde_json::Value) -> Manifest {
        Manifest::from_value(value, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_filters_invalid_names() {
        let own = manifest(json!({
            "dependencies": {"@scope/pkg": "*", "pkg-b": "*", "bad@name": "*"}
        }));
        assert_eq!(collect_dependencies(&own, None), ["@scope/pkg", "pkg-b"]);
    }

    #[test]
    fn test_filter_dependencies() {
        let own = manifest(json!({
            "dependencies": {
                "@drawidgets/demo": "workspace:*",
                "@types/node": "^22.0.0",
                "chalk": "^5.0.0",
                "invalid-value": "invalid",
                "@invalid.format": "^1.2.3",
                "invalid@format": "^4.5.6"
            }
        }));
        assert_eq!(
            collect_dependencies(&own, None),
            ["@drawidgets/demo", "@types/node", "chalk", "invalid-value"]
        );
    }

    #[test]
    fn test_merges_parent_without_duplicates() {
        let own = manifest(json!({"dependencies": {"chalk": "*", "yaml": "*"}}));
        let parent = manifest(json!({"dependencies": {"rollup": "*", "chalk": "*"}}));
        assert_eq!(
            collect_dependencies(&own, Some(&parent)),
            ["chalk", "yaml", "rollup"]
        );
    }

    #[test]
    fn test_missing_dependencies() {
        let own = manifest(json!({}));
        assert!(collect_dependencies(&own, None).is_empty());
    }

    #[test]
    fn test_resolved_is_never_external() {
        let own = manifest(json!({"dependencies": {"chalk": "*"}}));
        let external = resolve_external(&own, None);
        assert!(!external.is_external("chalk", None, true));
        assert!(!external.is_external("node:fs", Some("src/index.ts"), true));
        assert!(!external.is_external("vscode", None, true));
    }

    #[test]
    fn test_builtins_and_editor_host() {
        let external = ExternalPredicate::new(Vec::new());
        assert!(external.is_external("node:fs", None, false));
        assert!(external.is_external("node:path/posix", None, false));
        assert!(external.is_external("vscode", None, false));
        assert!(!external.is_external("vscode-languageclient", None, false));
        assert!(!external.is_external("./local", None, false));
    }

    #[test]
    fn test_dependency_membership() {
        let own = manifest(json!({"dependencies": {"chalk": "*"}}));
        let parent = manifest(json!({"dependencies": {"@rollup/plugin-terser": "*"}}));
        let external = resolve_external(&own, Some(&parent));
        assert!(external.is_external("chalk", None, false));
        assert!(external.is_external("@rollup/plugin-terser", None, false));
        assert!(!external.is_external("yaml", None, false));
    }

    #[test]
    fn test_patterns() {
        let external = ExternalPredicate::new(vec!["chalk".to_string()]);
        assert_eq!(external.patterns(), ["node:*", "vscode", "chalk"]);
        assert_eq!(external.dependencies(), ["chalk"]);
    }

    #[test]
    fn test_patterns_agree_with_predicate_on_subpaths() {
        let external = ExternalPredicate::new(vec!["chalk".to_string(), "@scope/pkg".to_string()]);
        let specifiers = [
            "chalk",
            "chalk/ansi",
            "chalk-extra",
            "@scope/pkg",
            "@scope/pkg/deep/file.js",
            "node:fs",
            "node:path/posix",
            "vscode",
            "vscode/sub",
        ];

        for source in specifiers {
            let by_pattern = external
                .patterns()
                .iter()
                .any(|pattern| matches_pattern(pattern, source));
            assert_eq!(external.is_external(source, None, false), by_pattern, "{}", source);
        }

        assert!(!external.is_external("chalk/ansi", None, false));
        assert!(!external.is_external("@scope/pkg/deep/file.js", None, false));
        assert!(external.is_external("node:path/posix", None, false));
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("node:*", "node:fs"));
        assert!(!matches_pattern("node:*", "fs"));
        assert!(matches_pattern("chalk", "chalk"));
        assert!(!matches_pattern("chalk", "chalk/ansi"));
    }
}
