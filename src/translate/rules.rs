//! Rule synthesis - one GN target to one Bazel rule.
//!
//! Each GN output type maps to exactly one [`RuleKind`]. The renderers live in
//! a [`RuleRegistry`] that is built once and never changes afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::core::label::Label;
use crate::core::target::{Target, TargetType};
use crate::translate::deps::ClassifiedDeps;
use crate::translate::errors::TranslateError;
use crate::translate::locations::{resolve_location, resolve_locations, ResolveContext};
use crate::translate::render::Rule;
use crate::translate::visibility::to_bazel_visibility;

/// The kind of Bazel rule emitted for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Runs a command to produce files
    Genrule,
    /// A named set of files
    Filegroup,
    /// C/C++ executable
    CcBinary,
    /// C/C++ library
    CcLibrary,
    /// C/C++ test
    CcTest,
}

impl RuleKind {
    /// All rule kinds.
    pub const ALL: [RuleKind; 5] = [
        RuleKind::Genrule,
        RuleKind::Filegroup,
        RuleKind::CcBinary,
        RuleKind::CcLibrary,
        RuleKind::CcTest,
    ];

    /// The rule kind for a GN output type.
    ///
    /// Returns `None` for `group`, which has no Bazel counterpart yet.
    pub fn for_type(kind: TargetType) -> Option<RuleKind> {
        match kind {
            TargetType::Action => Some(RuleKind::Genrule),
            TargetType::Copy => Some(RuleKind::Filegroup),
            TargetType::Executable => Some(RuleKind::CcBinary),
            TargetType::StaticLibrary | TargetType::SourceSet => Some(RuleKind::CcLibrary),
            TargetType::Test => Some(RuleKind::CcTest),
            TargetType::Group => None,
        }
    }

    /// The Bazel rule name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Genrule => "genrule",
            RuleKind::Filegroup => "filegroup",
            RuleKind::CcBinary => "cc_binary",
            RuleKind::CcLibrary => "cc_library",
            RuleKind::CcTest => "cc_test",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer needs to know about one target.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The target's identity
    pub label: &'a Label,
    /// The target itself
    pub target: &'a Target,
    /// Its classified dependencies
    pub deps: &'a ClassifiedDeps,
    /// Resolution settings
    pub ctx: &'a ResolveContext,
}

impl RuleInput<'_> {
    fn package(&self) -> &str {
        self.label.package()
    }

    fn resolve<I, S>(&self, locations: I) -> Result<Vec<String>, TranslateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resolve_locations(locations, self.package(), self.ctx)
    }

    fn visibility(&self) -> Vec<String> {
        to_bazel_visibility(&self.target.visibility)
    }
}

/// A renderer turns one target into one rule.
pub type RenderFn = fn(&RuleInput<'_>) -> Result<Rule, TranslateError>;

/// Immutable table from rule kind to renderer.
#[derive(Clone)]
pub struct RuleRegistry {
    renderers: HashMap<RuleKind, RenderFn>,
}

impl RuleRegistry {
    /// Start an empty registry.
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder {
            renderers: HashMap::new(),
        }
    }

    /// A registry with every built-in renderer.
    pub fn builtin() -> Self {
        RuleRegistry::builder()
            .register(RuleKind::Genrule, render_genrule)
            .register(RuleKind::Filegroup, render_filegroup)
            .register(RuleKind::CcBinary, render_cc_binary)
            .register(RuleKind::CcLibrary, render_cc_library)
            .register(RuleKind::CcTest, render_cc_test)
            .build()
    }

    /// Get the renderer for a rule kind.
    pub fn get(&self, kind: RuleKind) -> Option<RenderFn> {
        self.renderers.get(&kind).copied()
    }

    /// Check if a renderer is registered.
    pub fn contains(&self, kind: RuleKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Render a target.
    ///
    /// Returns `Ok(None)` for target types that have no rule kind.
    pub fn render(&self, input: &RuleInput<'_>) -> Result<Option<Rule>, TranslateError> {
        let Some(kind) = RuleKind::for_type(input.target.kind) else {
            return Ok(None);
        };
        let render = self
            .get(kind)
            .ok_or(TranslateError::MissingRenderer { kind })?;
        render(input).map(Some)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.renderers.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("RuleRegistry").field("kinds", &kinds).finish()
    }
}

/// Builder for [`RuleRegistry`].
pub struct RuleRegistryBuilder {
    renderers: HashMap<RuleKind, RenderFn>,
}

impl RuleRegistryBuilder {
    /// Register a renderer, replacing any previous one for the same kind.
    pub fn register(mut self, kind: RuleKind, render: RenderFn) -> Self {
        self.renderers.insert(kind, render);
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> RuleRegistry {
        RuleRegistry {
            renderers: self.renderers,
        }
    }
}

/// action -> genrule
fn render_genrule(input: &RuleInput<'_>) -> Result<Rule, TranslateError> {
    let target = input.target;

    // A script outside the source tree (an interpreter on PATH) is not a src.
    let script = target
        .script
        .starts_with("//")
        .then_some(target.script.as_str());
    let srcs = input.resolve(
        script
            .into_iter()
            .chain(target.inputs.iter().map(String::as_str))
            .chain(target.sources.iter().map(String::as_str))
            .chain(input.deps.build.iter().map(String::as_str))
            .chain(input.deps.data.iter().map(String::as_str)),
    )?;

    Ok(Rule::new(RuleKind::Genrule, input.label.name())
        .list("srcs", srcs)
        .list("outs", input.resolve(&target.outputs)?)
        .string("cmd", format_cmd(input)?)
        .list("visibility", input.visibility())
        .boolean("testonly", target.testonly))
}

/// copy -> filegroup
fn render_filegroup(input: &RuleInput<'_>) -> Result<Rule, TranslateError> {
    Ok(Rule::new(RuleKind::Filegroup, input.label.name())
        .list("srcs", input.resolve(&input.target.sources)?)
        .list("data", input.resolve(&input.deps.data)?)
        .list("visibility", input.visibility())
        .boolean("testonly", input.target.testonly))
}

/// executable -> cc_binary
fn render_cc_binary(input: &RuleInput<'_>) -> Result<Rule, TranslateError> {
    let target = input.target;

    let rule = Rule::new(RuleKind::CcBinary, input.label.name())
        .list("deps", input.resolve(&input.deps.build)?)
        .list("srcs", input.resolve(&target.sources)?)
        .list("data", input.resolve(&input.deps.data)?);

    Ok(with_compile_flags(rule, target)
        .list("linkopts", link_flags(target))
        .list("visibility", input.visibility())
        .boolean("testonly", target.testonly))
}

/// static_library, source_set -> cc_library
fn render_cc_library(input: &RuleInput<'_>) -> Result<Rule, TranslateError> {
    let target = input.target;
    let (srcs, hdrs) = split_headers(input)?;

    let rule = Rule::new(RuleKind::CcLibrary, input.label.name())
        .list("deps", input.resolve(&input.deps.build)?)
        .list("srcs", srcs)
        .list("data", input.resolve(&input.deps.data)?)
        .list("hdrs", hdrs);

    Ok(with_compile_flags(rule, target)
        .list("linkopts", link_flags(target))
        .list("visibility", input.visibility())
        .boolean("testonly", target.testonly))
}

/// test -> cc_test
fn render_cc_test(input: &RuleInput<'_>) -> Result<Rule, TranslateError> {
    let target = input.target;
    let (srcs, hdrs) = split_headers(input)?;

    let rule = Rule::new(RuleKind::CcTest, input.label.name())
        .list("deps", input.resolve(&input.deps.build)?)
        .list("srcs", srcs)
        .list("data", input.resolve(&input.deps.data)?)
        .list("hdrs", hdrs);

    Ok(with_compile_flags(rule, target)
        .list("visibility", input.visibility())
        .boolean("testonly", target.testonly))
}

/// Resolve sources and public headers, keeping headers out of `srcs`.
fn split_headers(input: &RuleInput<'_>) -> Result<(Vec<String>, Vec<String>), TranslateError> {
    let hdrs = input.resolve(input.target.public_headers())?;
    let srcs = input
        .resolve(&input.target.sources)?
        .into_iter()
        .filter(|s| !hdrs.contains(s))
        .collect();
    Ok((srcs, hdrs))
}

fn with_compile_flags(rule: Rule, target: &Target) -> Rule {
    let copts = target
        .cflags
        .iter()
        .chain(&target.asmflags)
        .cloned()
        .collect();

    rule.list("copts", copts)
        .list_if_any("conlyopts", target.cflags_c.clone())
        .list_if_any("cxxopts", target.cflags_cc.clone())
        .list("defines", target.defines.clone())
        .list("includes", target.include_dirs.clone())
}

fn link_flags(target: &Target) -> Vec<String> {
    target
        .arflags
        .iter()
        .chain(&target.ldflags)
        .cloned()
        .collect()
}

/// Build the genrule command line.
///
/// A source-absolute script is referenced through `$(location ...)` so
/// Bazel substitutes its path. Arguments are appended as-is; GN placeholders
/// such as `{{source}}` or `$target_gen_dir` are not expanded.
pub fn format_cmd(input: &RuleInput<'_>) -> Result<String, TranslateError> {
    let target = input.target;
    let mut cmd = String::new();

    if target.script.starts_with("//") {
        match resolve_location(&target.script, input.package(), input.ctx)? {
            Some(script) => cmd.push_str(&format!("$(location {})", script)),
            None => cmd.push_str(&target.script),
        }
    } else {
        cmd.push_str(&target.script);
    }

    for arg in &target.args {
        if !cmd.is_empty() {
            cmd.push(' ');
        }
        cmd.push_str(arg);
    }

    Ok(cmd)
}
