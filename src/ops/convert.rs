//! Implementation of `gn2bazel convert`.
//!
//! Targets are grouped by package, each package is translated in identity
//! order and written to its own `BUILD` file.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::graph::{Node, TargetGraph};
use crate::core::label::package_dir;
use crate::ops::markers::MARKER_FILE;
use crate::translate::Translator;
use crate::util::fs;

/// Options for converting a graph.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory that receives the generated BUILD files
    pub out_root: PathBuf,

    /// Targets whose identity matches are left out
    pub exclude: Option<Regex>,

    /// Translation settings
    pub translator: Translator,
}

impl ConvertOptions {
    /// Convert into `out_root` with default translation settings.
    pub fn new(out_root: impl Into<PathBuf>) -> Self {
        ConvertOptions {
            out_root: out_root.into(),
            exclude: None,
            translator: Translator::default(),
        }
    }

    /// Check whether a target identity is excluded.
    pub fn is_excluded(&self, identity: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|re| re.is_match(identity))
    }
}

/// What a conversion produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// BUILD files written
    pub packages: usize,

    /// Rules emitted
    pub rules: usize,

    /// Targets matched by the exclusion pattern
    pub excluded: usize,

    /// Targets with no Bazel counterpart (groups)
    pub skipped: usize,
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rules in {} packages ({} excluded, {} skipped)",
            self.rules, self.packages, self.excluded, self.skipped
        )
    }
}

/// Group the graph's targets by package.
///
/// Excluded targets are dropped first. Packages and the targets inside each
/// package come out in identity order.
pub fn group_by_package<'g>(
    graph: &'g TargetGraph,
    opts: &ConvertOptions,
) -> (BTreeMap<&'g str, Vec<&'g Node>>, usize) {
    let mut packages: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
    let mut excluded = 0;

    // Graph iteration is in identity order, so each package's list is sorted.
    for (identity, node) in graph.iter() {
        if opts.is_excluded(identity) {
            tracing::debug!("excluding {}", identity);
            excluded += 1;
            continue;
        }
        packages.entry(node.label.package()).or_default().push(node);
    }

    (packages, excluded)
}

/// Where a package's BUILD file goes.
pub fn build_file_path(out_root: &Path, package: &str) -> PathBuf {
    let dir = package_dir(package);
    if dir.is_empty() {
        out_root.join(MARKER_FILE)
    } else {
        out_root.join(dir).join(MARKER_FILE)
    }
}

/// Per-package counts returned by [`write_package`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageSummary {
    /// Rules emitted
    pub rules: usize,

    /// Targets with no rule
    pub skipped: usize,
}

/// Translate the targets of one package and write them to `out`.
///
/// Every rule is preceded by a `# <type> <identity>` comment and rules are
/// separated by one blank line.
pub fn write_package<W: Write>(
    out: &mut W,
    nodes: &[&Node],
    graph: &TargetGraph,
    translator: &Translator,
) -> Result<PackageSummary> {
    let mut summary = PackageSummary::default();

    for node in nodes {
        let rule = translator
            .translate(node, graph)
            .with_context(|| format!("failed to translate `{}`", node.label))?;

        let Some(rule) = rule else {
            tracing::warn!(
                "skipping {} `{}`: no matching Bazel rule",
                node.target.kind,
                node.label
            );
            summary.skipped += 1;
            continue;
        };

        if summary.rules > 0 {
            writeln!(out)?;
        }
        writeln!(out, "# {} {}", node.target.kind, node.label)?;
        write!(out, "{}", rule)?;
        summary.rules += 1;
    }

    Ok(summary)
}

/// Convert a graph into BUILD files under `opts.out_root`.
///
/// Stops at the first error. Files written before the error are left in
/// place.
pub fn convert(graph: &TargetGraph, opts: &ConvertOptions) -> Result<ConvertSummary> {
    convert_with(graph, opts, |_, _| {})
}

/// Like [`convert`], calling `on_package` after each BUILD file is written.
pub fn convert_with<F>(
    graph: &TargetGraph,
    opts: &ConvertOptions,
    mut on_package: F,
) -> Result<ConvertSummary>
where
    F: FnMut(&Path, &PackageSummary),
{
    if graph.is_empty() {
        tracing::warn!("the build graph has no targets; nothing to convert");
    }

    let (packages, excluded) = group_by_package(graph, opts);
    let mut summary = ConvertSummary {
        excluded,
        ..ConvertSummary::default()
    };

    tracing::info!(
        "Converting {} targets in {} packages",
        graph.len() - excluded,
        packages.len()
    );

    for (package, nodes) in &packages {
        let path = build_file_path(&opts.out_root, package);
        tracing::debug!("writing {} ({} targets)", path.display(), nodes.len());

        let mut writer = fs::create_buffered(&path)?;
        let written = write_package(&mut writer, nodes, graph, &opts.translator)
            .with_context(|| format!("failed to write package `{}`", package))?;
        fs::finish_buffered(writer, &path)?;

        tracing::debug!("wrote {} ({} rules)", path.display(), written.rules);
        on_package(&path, &written);
        summary.packages += 1;
        summary.rules += written.rules;
        summary.skipped += written.skipped;
    }

    Ok(summary)
}
