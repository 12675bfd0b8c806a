//! GN visibility patterns to Bazel visibility labels.
//!
//! GN patterns:
//! - `*` - everyone
//! - `//foo:*` - every target in package `//foo`
//! - `//foo/*` - every target in `//foo` and below
//! - `//foo:bar` - one target
//! - `//.:*` - the root package

use crate::translate::locations::unique;

/// Visible to every package.
pub const PUBLIC: &str = "//visibility:public";

/// Visible to the defining package only.
pub const PRIVATE: &str = "//visibility:private";

const WILDCARD: &str = "*";
const RECURSIVE_WILDCARD: &str = "//*";
const ROOT_WILDCARD: &str = "//.:*";
const SELF_PACKAGE_PREFIX: &str = "//.:";
const ROOT_PACKAGE_PREFIX: &str = "//:";

/// Translate GN visibility patterns.
pub fn to_bazel_visibility<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    match patterns {
        [] => return vec![PRIVATE.to_string()],
        [only] if only.as_ref() == WILDCARD => return vec![PUBLIC.to_string()],
        [only] if only.as_ref() == ROOT_WILDCARD => return vec![PRIVATE.to_string()],
        _ => {}
    }

    let mut visibility = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let pattern = match pattern.strip_prefix(SELF_PACKAGE_PREFIX) {
            Some(rest) => format!("{}{}", ROOT_PACKAGE_PREFIX, rest),
            None => pattern.to_string(),
        };

        if pattern == WILDCARD || pattern == RECURSIVE_WILDCARD {
            return vec![PUBLIC.to_string()];
        }

        if let Some(package) = pattern.strip_suffix(":*") {
            visibility.push(format!("{}:__pkg__", package));
        } else if let Some(package) = pattern.strip_suffix("/*") {
            visibility.push(format!("{}:__subpackages__", package));
        } else {
            visibility.push(pattern);
        }
    }

    unique(visibility)
}
