//! Package name syntax check.
//!
//! Mirrors the npm registry naming rules closely enough to filter the keys
//! of a `dependencies` table. This is a syntactic filter only; no registry
//! lookup happens here.

use std::sync::LazyLock;

use regex::Regex;

/// Unscoped names, or `@scope/name` with exactly one slash.
const PACKAGE_NAME_PATTERN: &str =
    r"^(?:(?:@(?:[a-z0-9\-*~][a-z0-9\-*._~]*)?/[a-z0-9\-._~])|[a-z0-9\-~])[a-z0-9\-._~]*$";

// Compiled once; matching is stateless.
static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PACKAGE_NAME_PATTERN).expect("package name pattern is valid"));

/// Check whether `name` is a syntactically valid package name.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_unscoped() {
        assert!(is_valid_package_name("chalk"));
        assert!(is_valid_package_name("pkg-b"));
        assert!(is_valid_package_name("lodash.merge"));
        assert!(is_valid_package_name("~tilde"));
    }

    #[test]
    fn test_accepts_scoped() {
        assert!(is_valid_package_name("@scope/name"));
        assert!(is_valid_package_name("@rollup/plugin-typescript"));
        assert!(is_valid_package_name("@types/node"));
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(!is_valid_package_name("@scope/name/extra"));
        assert!(!is_valid_package_name("name@bad"));
        assert!(!is_valid_package_name("UPPER"));
        assert!(!is_valid_package_name("@invalid.format"));
        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name(".hidden"));
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        // A matcher that kept a cursor would fail every other call.
        for _ in 0..4 {
            assert!(is_valid_package_name("@drawidgets/demo"));
        }
    }
}
