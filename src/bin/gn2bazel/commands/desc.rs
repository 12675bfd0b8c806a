//! `gn2bazel desc` command
//!
//! Captures the graph so it can be converted later with `convert --input`.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::DescArgs;
use gn2bazel::sources::GnDesc;
use gn2bazel::util::config::{global_config_path, load_config, project_config_path};

pub fn execute(args: DescArgs) -> Result<()> {
    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&args.dir),
    );

    let mut desc = GnDesc::new(&args.dir, &args.out_dir);
    if let Some(gn) = args.gn.or(config.convert.gn) {
        desc = desc.with_program(gn);
    }

    let json = desc.run()?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&json)
        .and_then(|_| stdout.flush())
        .context("failed to write to stdout")?;

    Ok(())
}
