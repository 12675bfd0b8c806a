//! GN labels: `//path/to/package:name`, optionally followed by a
//! `(//toolchain:label)` qualifier.

use std::fmt;

use crate::core::graph::GraphError;

/// Marker that roots a label at the top of the checkout.
pub const ROOT_MARKER: &str = "//";

/// Separator between a label's package and its short name.
pub const SEPARATOR: char = ':';

/// A parsed target identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label {
    package: String,
    name: String,
    toolchain: Option<String>,
}

impl Label {
    /// Parse a target identity.
    ///
    /// The package is everything before the last `:` (ignoring any toolchain
    /// qualifier), the name everything after it.
    pub fn parse(identity: &str) -> Result<Self, GraphError> {
        let (base, toolchain) = split_toolchain(identity);

        let (package, name) =
            base.rsplit_once(SEPARATOR)
                .ok_or_else(|| GraphError::MissingSeparator {
                    identity: identity.to_string(),
                })?;

        Ok(Label {
            package: package.to_string(),
            name: name.to_string(),
            toolchain: toolchain.map(str::to_string),
        })
    }

    /// The package part, e.g. `//foo/bar`, or `//` for the root package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The short name, e.g. `bar` for `//foo:bar`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package as a checkout-relative directory (`foo/bar`, or empty for
    /// the root package).
    pub fn package_dir(&self) -> &str {
        package_dir(&self.package)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.package, SEPARATOR, self.name)?;
        if let Some(ref toolchain) = self.toolchain {
            write!(f, "({})", toolchain)?;
        }
        Ok(())
    }
}

/// Strip the root marker and any trailing `/` from a package name.
pub fn package_dir(package: &str) -> &str {
    package
        .strip_prefix(ROOT_MARKER)
        .unwrap_or(package)
        .trim_end_matches('/')
}

/// Drop a `(//toolchain:label)` qualifier, leaving the plain label.
pub fn strip_toolchain(label: &str) -> &str {
    split_toolchain(label).0
}

fn split_toolchain(identity: &str) -> (&str, Option<&str>) {
    if let Some(stripped) = identity.strip_suffix(')') {
        if let Some((base, toolchain)) = stripped.split_once('(') {
            return (base, Some(toolchain));
        }
    }
    (identity, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        let label = Label::parse("//foo/bar:baz").unwrap();
        assert_eq!(label.package(), "//foo/bar");
        assert_eq!(label.name(), "baz");
        assert_eq!(label.package_dir(), "foo/bar");
        assert_eq!(label.to_string(), "//foo/bar:baz");
    }

    #[test]
    fn test_parse_root_label() {
        let label = Label::parse("//:all").unwrap();
        assert_eq!(label.package(), "//");
        assert_eq!(label.package_dir(), "");
    }

    #[test]
    fn test_parse_toolchain_qualified_label() {
        let label = Label::parse("//foo:bar(//build/toolchain:host)").unwrap();
        assert_eq!(label.package(), "//foo");
        assert_eq!(label.name(), "bar");
        assert_eq!(label.to_string(), "//foo:bar(//build/toolchain:host)");
    }

    #[test]
    fn test_strip_toolchain() {
        assert_eq!(strip_toolchain("//base:base(//build/toolchain:host)"), "//base:base");
        assert_eq!(strip_toolchain("//base:base"), "//base:base");
    }

    #[test]
    fn test_parse_missing_separator() {
        let err = Label::parse("//foo/bar").unwrap_err();
        assert!(matches!(err, GraphError::MissingSeparator { ref identity } if identity == "//foo/bar"));
    }
}
