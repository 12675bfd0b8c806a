//! Rewriting GN paths and labels into Bazel labels.
//!
//! GN refers to files with source-absolute paths (`//foo/bar.cc`) and to
//! generated files through the build directory (`//out.gn/x64/gen/x.h`).
//! Bazel wants package-relative file names for files in the rule's own
//! package, `//dir:file` labels for files elsewhere, and output-root-relative
//! paths for generated files.

use std::collections::HashSet;

use crate::core::label::{package_dir, strip_toolchain, ROOT_MARKER, SEPARATOR};
use crate::translate::errors::TranslateError;

/// Build directory used when none is configured.
pub const DEFAULT_GENERATED_ROOT: &str = "out.gn";

/// Files GN generates for its own bookkeeping. Bazel has no use for them.
pub const GENERATED_DENYLIST: &[&str] =
    &["build.ninja", "build.ninja.d", "args.gn", "toolchain.ninja"];

const STAMP_EXTENSION: &str = ".stamp";

/// Settings shared by every resolution in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    generated_root: String,
}

impl ResolveContext {
    /// Create a context for the given build directory, e.g. `out.gn/x64`.
    pub fn new(generated_root: impl AsRef<str>) -> Self {
        let root = generated_root.as_ref();
        let root = root.strip_prefix(ROOT_MARKER).unwrap_or(root);
        ResolveContext {
            generated_root: root.trim_matches('/').to_string(),
        }
    }

    /// The build directory, relative to the checkout.
    pub fn generated_root(&self) -> &str {
        &self.generated_root
    }

    /// Strip the build directory from a path below it.
    fn strip_generated<'a>(&self, location: &'a str) -> Option<&'a str> {
        if self.generated_root.is_empty() {
            return None;
        }
        location
            .strip_prefix(ROOT_MARKER)?
            .strip_prefix(self.generated_root.as_str())?
            .strip_prefix('/')
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        ResolveContext::new(DEFAULT_GENERATED_ROOT)
    }
}

/// Resolve one path or label relative to `package`.
///
/// Returns `None` for files on the generated-file denylist.
pub fn resolve_location(
    location: &str,
    package: &str,
    ctx: &ResolveContext,
) -> Result<Option<String>, TranslateError> {
    if let Some(generated) = ctx.strip_generated(location) {
        if generated.contains(SEPARATOR) {
            return Ok(Some(strip_toolchain(generated).to_string()));
        }
        if generated.is_empty() {
            return Err(TranslateError::malformed(
                location,
                package,
                "names the build directory itself",
            ));
        }
        return Ok(filter_denied(generated));
    }

    // Bazel labels have no toolchain qualifier; the plain label is kept.
    if location.contains(SEPARATOR) {
        return Ok(Some(strip_toolchain(location).to_string()));
    }

    let (rooted, path) = match location.strip_prefix(ROOT_MARKER) {
        Some(path) => (true, path),
        None => (false, location),
    };

    if path.is_empty() {
        return Err(TranslateError::malformed(location, package, "empty path"));
    }
    if path.starts_with('/') {
        return Err(TranslateError::malformed(
            location,
            package,
            "system-absolute paths cannot be expressed as labels",
        ));
    }
    if path.ends_with('/') {
        return Err(TranslateError::malformed(
            location,
            package,
            "names a directory, not a file",
        ));
    }
    if is_denied(path) {
        return Ok(None);
    }

    let dir = package_dir(package);
    if dir.is_empty() {
        return Ok(Some(path.to_string()));
    }

    if let Some(relative) = path.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
        return Ok(Some(relative.to_string()));
    }

    match path.rsplit_once('/') {
        Some((dir, file)) => Ok(Some(format!("{}{}{}{}", ROOT_MARKER, dir, SEPARATOR, file))),
        None if rooted => Ok(Some(format!("{}{}{}", ROOT_MARKER, SEPARATOR, path))),
        None => Err(TranslateError::malformed(
            location,
            package,
            "no directory component",
        )),
    }
}

/// Resolve every location relative to `package`, dropping denied files and
/// duplicates. The first occurrence of each label wins.
pub fn resolve_locations<I, S>(
    locations: I,
    package: &str,
    ctx: &ResolveContext,
) -> Result<Vec<String>, TranslateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut resolved = Vec::new();
    for location in locations {
        if let Some(label) = resolve_location(location.as_ref(), package, ctx)? {
            resolved.push(label);
        }
    }
    Ok(unique(resolved))
}

/// Remove duplicates, keeping first-seen order.
pub fn unique(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn filter_denied(path: &str) -> Option<String> {
    if is_denied(path) {
        None
    } else {
        Some(path.to_string())
    }
}

fn is_denied(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    GENERATED_DENYLIST.contains(&file) || file.ends_with(STAMP_EXTENSION)
}
