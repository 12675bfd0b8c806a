//! Loading the build graph from `gn desc`.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use anyhow::{bail, Context, Result};

use crate::core::graph::TargetGraph;
use crate::util::fs;
use crate::util::process::{find_executable, ProcessBuilder};

/// Default gn executable name.
pub const GN_PROGRAM: &str = "gn";

/// Directory that holds bare out-dir names such as `x64.release`.
pub const DEFAULT_OUT_PARENT: &str = "out.gn";

/// Place a bare out-dir name under [`DEFAULT_OUT_PARENT`].
///
/// `x64.release` becomes `out.gn/x64.release`; anything that already has a
/// path separator is kept as given.
pub fn normalize_out_dir(out_dir: &str) -> String {
    if out_dir.contains('/') || out_dir.contains(MAIN_SEPARATOR) {
        out_dir.to_string()
    } else {
        format!("{}/{}", DEFAULT_OUT_PARENT, out_dir)
    }
}

/// An invocation of `gn desc --format=json <out_dir> *`.
#[derive(Debug, Clone)]
pub struct GnDesc {
    program: String,
    dir: PathBuf,
    out_dir: String,
}

impl GnDesc {
    /// Describe every target of `out_dir`, running gn inside `dir`.
    pub fn new(dir: impl Into<PathBuf>, out_dir: &str) -> Self {
        GnDesc {
            program: GN_PROGRAM.to_string(),
            dir: dir.into(),
            out_dir: normalize_out_dir(out_dir),
        }
    }

    /// Use a different gn executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The normalized out dir, relative to the checkout.
    pub fn out_dir(&self) -> &str {
        &self.out_dir
    }

    /// The checkout gn runs in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The command that will be run.
    pub fn command(&self) -> Result<ProcessBuilder> {
        let program = find_executable(&self.program).with_context(|| {
            format!(
                "`{}` not found in PATH; install gn or pass --gn <PROGRAM>",
                self.program
            )
        })?;

        Ok(ProcessBuilder::new(program)
            .args(["desc", "--format=json", self.out_dir.as_str(), "*"])
            .cwd(&self.dir))
    }

    /// Run gn and return its raw JSON output.
    pub fn run(&self) -> Result<Vec<u8>> {
        if !self.dir.is_dir() {
            bail!("checkout directory does not exist: {}", self.dir.display());
        }

        let cmd = self.command()?;
        tracing::info!("Running {}", cmd.display_command());
        let output = cmd.exec_and_check()?;
        tracing::debug!("gn desc produced {} bytes", output.stdout.len());

        Ok(output.stdout)
    }

    /// Run gn and decode its output into a graph.
    pub fn load(&self) -> Result<TargetGraph> {
        let json = self.run()?;
        TargetGraph::from_json(&json).context("invalid build graph from `gn desc`")
    }
}

/// Decode a previously captured `gn desc --format=json` file.
pub fn load_file(path: &Path) -> Result<TargetGraph> {
    let json = fs::read(path)?;
    TargetGraph::from_json(&json)
        .with_context(|| format!("invalid build graph in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::GraphError;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_out_dir() {
        assert_eq!(normalize_out_dir("x64.release"), "out.gn/x64.release");
        assert_eq!(normalize_out_dir("out/Default"), "out/Default");
        assert_eq!(normalize_out_dir("out.gn/arm64"), "out.gn/arm64");
    }

    #[test]
    fn test_gn_desc_settings() {
        let desc = GnDesc::new("/src/v8", "x64").with_program("/opt/gn");
        assert_eq!(desc.out_dir(), "out.gn/x64");
        assert_eq!(desc.dir(), Path::new("/src/v8"));
    }

    #[test]
    fn test_missing_gn_program() {
        let tmp = TempDir::new().unwrap();
        let err = GnDesc::new(tmp.path(), "x64")
            .with_program("gn-does-not-exist-anywhere")
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));
    }

    #[test]
    fn test_load_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("desc.json");
        std::fs::write(
            &path,
            r#"{"//foo:bar": {"type": "static_library", "sources": ["//foo/bar.cc"]}}"#,
        )
        .unwrap();

        let graph = load_file(&path).unwrap();
        assert_eq!(graph.len(), 1);
        assert!(graph.get("//foo:bar").is_some());
    }

    #[test]
    fn test_load_file_missing_separator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("desc.json");
        std::fs::write(&path, r#"{"//foo/bar": {"type": "group"}}"#).unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::MissingSeparator { .. })
        ));
    }
}
