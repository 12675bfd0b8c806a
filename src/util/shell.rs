//! Shell output for the gn2bazel CLI.
//!
//! Status lines are right-aligned to a fixed width the way cargo prints them.
//! Package progress is drawn with indicatif and disappears when stderr is not
//! a terminal or when `--quiet`/`--verbose` is in effect.

use std::env;
use std::fmt::Display;
use std::io::{self, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: debug logging, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Never use ANSI colors.
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Created,
    Finished,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Finished => "Finished",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // Success: bold green
            Status::Created | Status::Finished => "\x1b[1;32m",
        }
    }
}

/// Width status words are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug, Default)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal() && env::var_os("NO_COLOR").is_none(),
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags. `--quiet` wins over `--verbose`.
    pub fn from_flags(quiet: bool, verbose: bool, no_color: bool) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let color = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };

        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an error with an optional `help:` line under it.
    ///
    /// Errors are printed even in quiet mode.
    pub fn error(&self, msg: impl Display, help: Option<&str>) {
        let (error, help_prefix) = if self.use_color {
            ("\x1b[1;31merror\x1b[0m", "\x1b[1;32mhelp\x1b[0m")
        } else {
            ("error", "help")
        };

        eprintln!("{}: {}", error, msg);
        if let Some(help) = help {
            eprintln!("{}: {}", help_prefix, help);
        }
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Create a progress bar over `total` items.
    ///
    /// Quiet and verbose shells get a bar that draws nothing.
    pub fn progress(&self, total: u64, msg: impl Display) -> Progress {
        Progress::new(self, total, msg.to_string())
    }
}

/// Progress bar wrapper that respects the shell's verbosity.
pub struct Progress {
    pb: Option<ProgressBar>,
}

impl Progress {
    fn new(shell: &Shell, total: u64, message: String) -> Self {
        let pb = if shell.is_quiet() || shell.is_verbose() || total <= 1 {
            None
        } else {
            // Draws to stderr and stays hidden when it is not a terminal.
            let pb = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message);
            Some(pb)
        };

        Progress { pb }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }

    #[cfg(test)]
    fn is_drawn(&self) -> bool {
        self.pb.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, true);
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());

        assert!(Shell::from_flags(false, true, true).is_verbose());

        // Quiet wins
        let shell = Shell::from_flags(true, true, true);
        assert!(shell.is_quiet());
        assert!(!shell.is_verbose());
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, ColorChoice::Never);

        let formatted = shell.format_status(Status::Finished);
        assert_eq!(formatted, "    Finished");
        assert_eq!(shell.format_status(Status::Created).trim(), "Created");
    }

    #[test]
    fn test_progress_is_hidden_when_quiet_or_verbose() {
        let quiet = Shell::new(Verbosity::Quiet, ColorChoice::Never);
        assert!(!quiet.progress(10, "Writing").is_drawn());

        let verbose = Shell::new(Verbosity::Verbose, ColorChoice::Never);
        assert!(!verbose.progress(10, "Writing").is_drawn());

        let normal = Shell::new(Verbosity::Normal, ColorChoice::Never);
        assert!(!normal.progress(1, "Writing").is_drawn());

        let progress = normal.progress(10, "Writing");
        assert!(progress.is_drawn());
        progress.inc(3);
        progress.finish();
    }
}
