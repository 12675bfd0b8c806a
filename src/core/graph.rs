//! The decoded GN build graph.
//!
//! A `TargetGraph` is built once from the output of `gn desc` and never
//! mutated afterwards. Every identity, and every dependency edge, is checked
//! for a `:` separator while the graph is built, so a malformed description
//! stops the run before anything is written.

use std::collections::BTreeMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::label::Label;
use crate::core::target::Target;

/// Error while loading the build graph.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to decode `gn desc` output")]
    #[diagnostic(
        code(gn2bazel::graph::decode),
        help("`gn desc --format=json` output must map target labels to objects with a known `type`")
    )]
    Decode(#[from] serde_json::Error),

    #[error("invalid target name `{identity}`: missing `:` separator")]
    #[diagnostic(
        code(gn2bazel::graph::missing_separator),
        help("target labels have the form `//path/to/package:name`")
    )]
    MissingSeparator { identity: String },

    #[error("target `{target}` has an invalid dependency `{dep}`: missing `:` separator")]
    #[diagnostic(
        code(gn2bazel::graph::invalid_dependency),
        help("dependency labels have the form `//path/to/package:name`")
    )]
    InvalidDependency { target: String, dep: String },
}

/// A target together with its parsed identity.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parsed identity
    pub label: Label,

    /// Target metadata
    pub target: Target,
}

/// Validated mapping from target identity to target.
#[derive(Debug, Clone, Default)]
pub struct TargetGraph {
    nodes: BTreeMap<String, Node>,
}

impl TargetGraph {
    /// Decode `gn desc --format=json` output.
    pub fn from_json(json: &[u8]) -> Result<Self, GraphError> {
        let targets: BTreeMap<String, Target> = serde_json::from_slice(json)?;
        Self::from_targets(targets)
    }

    /// Build a graph from already-decoded targets.
    pub fn from_targets(
        targets: impl IntoIterator<Item = (String, Target)>,
    ) -> Result<Self, GraphError> {
        let mut nodes = BTreeMap::new();

        for (identity, target) in targets {
            let label = Label::parse(&identity)?;

            for dep in &target.deps {
                if Label::parse(dep).is_err() {
                    return Err(GraphError::InvalidDependency {
                        target: identity,
                        dep: dep.clone(),
                    });
                }
            }

            nodes.insert(identity, Node { label, target });
        }

        tracing::debug!("loaded {} targets", nodes.len());
        Ok(TargetGraph { nodes })
    }

    /// Look up a target by identity.
    pub fn get(&self, identity: &str) -> Option<&Target> {
        self.nodes.get(identity).map(|n| &n.target)
    }

    /// Look up a node by identity.
    pub fn node(&self, identity: &str) -> Option<&Node> {
        self.nodes.get(identity)
    }

    /// Iterate over `(identity, node)` pairs in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> + '_ {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// Number of targets in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no targets.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::TargetType;

    #[test]
    fn test_from_json() {
        let graph = TargetGraph::from_json(
            br#"{
                "//foo:bar": {"type": "static_library", "sources": ["//foo/bar.cc"]},
                "//foo:gen": {"type": "action", "script": "//foo/gen.py"}
            }"#,
        )
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("//foo:bar").unwrap().kind, TargetType::StaticLibrary);
        assert_eq!(graph.node("//foo:gen").unwrap().label.name(), "gen");
        assert!(graph.get("//foo:missing").is_none());

        let ids: Vec<_> = graph.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["//foo:bar", "//foo:gen"]);
    }

    #[test]
    fn test_missing_separator_is_fatal() {
        let err = TargetGraph::from_json(
            br#"{
                "//foo:bar": {"type": "static_library"},
                "//foo/baz": {"type": "group"}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::MissingSeparator { ref identity } if identity == "//foo/baz"));
    }

    #[test]
    fn test_invalid_dependency_is_fatal() {
        let err = TargetGraph::from_targets([(
            "//foo:bar".to_string(),
            Target::new(TargetType::Executable).with_deps(["//base"]),
        )])
        .unwrap_err();
        assert!(matches!(err, GraphError::InvalidDependency { ref dep, .. } if dep == "//base"));
    }

    #[test]
    fn test_dangling_dependency_is_allowed() {
        let graph = TargetGraph::from_targets([(
            "//foo:bar".to_string(),
            Target::new(TargetType::Executable).with_deps(["//third_party:absent"]),
        )])
        .unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_decode_error() {
        let err = TargetGraph::from_json(br#"{"//foo:bar": {"type": 7}}"#).unwrap_err();
        assert!(matches!(err, GraphError::Decode(_)));

        let err = TargetGraph::from_json(b"not json").unwrap_err();
        assert!(matches!(err, GraphError::Decode(_)));
    }
}
