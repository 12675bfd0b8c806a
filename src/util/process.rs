//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use thiserror::Error;

/// A subprocess exited unsuccessfully.
#[derive(Debug, Error)]
#[error("`{command}` failed with exit code {}{}", display_code(.code), display_stderr(.stderr))]
pub struct ProcessError {
    /// The command line that was run
    pub command: String,

    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,

    /// Everything the process wrote to stderr
    pub stderr: String,
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

fn display_stderr(stderr: &str) -> String {
    let stderr = stderr.trim_end_matches('\n');
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n\t{}", stderr.replace('\n', "\n\t"))
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion, capturing stdout and
    /// stderr.
    pub fn exec(&self) -> Result<Output> {
        let output = self
            .build_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.display_command()))?;

        Ok(output)
    }

    /// Execute and require success.
    ///
    /// A non-zero exit is reported as a [`ProcessError`] carrying the captured
    /// stderr.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            return Err(ProcessError {
                command: self.display_command(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("gn").args(["desc", "--format=json", "out.gn/x64", "*"]);

        assert_eq!(pb.display_command(), "gn desc --format=json out.gn/x64 *");
        assert_eq!(pb.args.len(), 4);
        assert!(pb.cwd.is_none());
    }

    #[test]
    fn test_process_error_display() {
        let err = ProcessError {
            command: "gn desc out *".to_string(),
            code: Some(1),
            stderr: "ERROR at //BUILD.gn:3:1\nbad thing\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`gn desc out *` failed with exit code 1:\n\tERROR at //BUILD.gn:3:1\n\tbad thing"
        );

        let err = ProcessError {
            command: "gn".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "`gn` failed with exit code none (terminated by signal)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_and_check_captures_stderr() {
        let err = ProcessBuilder::new("sh")
            .args(["-c", "echo oops >&2; exit 3"])
            .exec_and_check()
            .unwrap_err();

        let err = err.downcast::<ProcessError>().unwrap();
        assert_eq!(err.code, Some(3));
        assert_eq!(err.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_and_check_success() {
        let output = ProcessBuilder::new("echo").arg("hello").exec_and_check().unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }
}
