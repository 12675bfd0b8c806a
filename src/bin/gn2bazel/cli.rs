//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gn2bazel - translate a GN build graph into Bazel BUILD files
#[derive(Parser)]
#[command(name = "gn2bazel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every target of a GN out dir into BUILD files
    Convert(ConvertArgs),

    /// Write placeholder BUILD files into every directory of a checkout
    Markers(MarkersArgs),

    /// Print the raw `gn desc --format=json` output
    Desc(DescArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// GN out dir to describe (a bare name is looked up under out.gn/)
    pub out_dir: String,

    /// Checkout directory gn runs in
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Directory to write BUILD files into (defaults to the checkout)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip targets whose label matches this regex
    #[arg(long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Read a captured `gn desc` JSON file instead of running gn
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// gn executable to run
    #[arg(long, value_name = "PROGRAM", env = "GN2BAZEL_GN")]
    pub gn: Option<String>,

    /// Dependency types that become `data` (copy, copy-and-action)
    #[arg(long, value_name = "POLICY")]
    pub data_deps: Option<String>,

    /// Don't write placeholder BUILD files into the checkout
    #[arg(long)]
    pub skip_markers: bool,
}

#[derive(Args)]
pub struct MarkersArgs {
    /// Checkout directory
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Directory names to leave alone (repeatable)
    #[arg(long, value_name = "NAME", default_value = "out.gn")]
    pub skip: Vec<String>,
}

#[derive(Args)]
pub struct DescArgs {
    /// GN out dir to describe (a bare name is looked up under out.gn/)
    pub out_dir: String,

    /// Checkout directory gn runs in
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// gn executable to run
    #[arg(long, value_name = "PROGRAM", env = "GN2BAZEL_GN")]
    pub gn: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
