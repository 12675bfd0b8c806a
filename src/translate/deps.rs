//! Splitting dependency edges into build and data dependencies.

use std::fmt;
use std::str::FromStr;

use crate::core::graph::TargetGraph;
use crate::core::target::{Target, TargetType};

/// Which target types only contribute runtime files to their dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataPolicy {
    /// Only `copy` targets are data
    CopyOnly,

    /// `copy` and `action` targets are data
    #[default]
    CopyAndAction,
}

impl DataPolicy {
    /// Check if a dependency of the given type is a data dependency.
    pub fn is_data(&self, kind: TargetType) -> bool {
        match self {
            DataPolicy::CopyOnly => kind == TargetType::Copy,
            DataPolicy::CopyAndAction => {
                matches!(kind, TargetType::Copy | TargetType::Action)
            }
        }
    }

    /// The name used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataPolicy::CopyOnly => "copy",
            DataPolicy::CopyAndAction => "copy-and-action",
        }
    }
}

impl fmt::Display for DataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" | "copy-only" => Ok(DataPolicy::CopyOnly),
            "copy-and-action" => Ok(DataPolicy::CopyAndAction),
            _ => Err(format!(
                "unknown data dependency policy `{}` (expected `copy` or `copy-and-action`)",
                s
            )),
        }
    }
}

/// A target's dependencies, split by how Bazel consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedDeps {
    /// Needed at compile or link time
    pub build: Vec<String>,

    /// Needed only at runtime
    pub data: Vec<String>,
}

/// Partition `target.deps` into build and data dependencies.
///
/// The partition is stable. Dependencies missing from the graph are build
/// dependencies.
pub fn classify(target: &Target, graph: &TargetGraph, policy: DataPolicy) -> ClassifiedDeps {
    let mut classified = ClassifiedDeps::default();

    for dep in &target.deps {
        match graph.get(dep) {
            Some(dep_target) if policy.is_data(dep_target.kind) => {
                classified.data.push(dep.clone());
            }
            Some(_) => classified.build.push(dep.clone()),
            None => {
                tracing::debug!("dependency `{}` is not in the graph, treating as build dep", dep);
                classified.build.push(dep.clone());
            }
        }
    }

    classified
}
