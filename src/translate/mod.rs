//! Translation of GN targets into Bazel rules.
//!
//! For each target: classify its dependencies, resolve every path and label
//! relative to its package, translate visibility, then render the rule.

pub mod deps;
pub mod errors;
pub mod locations;
pub mod render;
pub mod rules;
pub mod visibility;

pub use deps::{classify, ClassifiedDeps, DataPolicy};
pub use errors::TranslateError;
pub use locations::{resolve_locations, ResolveContext};
pub use render::{AttrValue, Rule};
pub use rules::{RuleInput, RuleKind, RuleRegistry};

use crate::core::graph::{Node, TargetGraph};

/// Settings and renderers shared by every target in a run.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    registry: RuleRegistry,
    policy: DataPolicy,
    ctx: ResolveContext,
}

impl Translator {
    /// Create a translator with the built-in renderers.
    pub fn new(policy: DataPolicy, ctx: ResolveContext) -> Self {
        Translator {
            registry: RuleRegistry::builtin(),
            policy,
            ctx,
        }
    }

    /// Translate one target.
    ///
    /// Returns `Ok(None)` when the target type has no Bazel rule.
    pub fn translate(&self, node: &Node, graph: &TargetGraph) -> Result<Option<Rule>, TranslateError> {
        let deps = classify(&node.target, graph, self.policy);
        tracing::debug!(
            "{}: {} build deps, {} data deps",
            node.label,
            deps.build.len(),
            deps.data.len()
        );

        let input = RuleInput {
            label: &node.label,
            target: &node.target,
            deps: &deps,
            ctx: &self.ctx,
        };
        self.registry.render(&input)
    }
}
