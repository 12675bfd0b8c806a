//! gn2bazel CLI - translate a GN build graph into Bazel BUILD files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gn2bazel::util::diagnostic;
use gn2bazel::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
}

fn main() {
    let cli = Cli::parse();
    let global_opts = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.no_color),
    };

    if let Err(e) = run(cli, &global_opts) {
        let help = diagnostic::help(&e);
        global_opts.shell.error(format!("{:#}", e), help.as_deref());
        std::process::exit(1);
    }
}

fn run(cli: Cli, global_opts: &GlobalOptions) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("gn2bazel=error")
    } else if cli.verbose {
        EnvFilter::new("gn2bazel=debug")
    } else {
        EnvFilter::new("gn2bazel=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => commands::convert::execute(args, global_opts),
        Commands::Markers(args) => commands::markers::execute(args, global_opts),
        Commands::Desc(args) => commands::desc::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
