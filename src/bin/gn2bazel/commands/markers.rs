//! `gn2bazel markers` command

use anyhow::Result;

use crate::cli::MarkersArgs;
use crate::GlobalOptions;
use gn2bazel::ops::write_markers;
use gn2bazel::util::Status;

pub fn execute(args: MarkersArgs, global_opts: &GlobalOptions) -> Result<()> {
    let written = write_markers(&args.dir, &args.skip)?;
    global_opts
        .shell
        .status(Status::Created, format!("{} package markers", written));
    Ok(())
}
