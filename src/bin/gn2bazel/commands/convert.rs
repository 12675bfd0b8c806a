//! `gn2bazel convert` command

use std::path::{Component, Path};

use anyhow::{Context, Result};
use regex::Regex;

use crate::cli::ConvertArgs;
use crate::GlobalOptions;
use gn2bazel::ops::{convert_with, group_by_package, write_markers, ConvertOptions};
use gn2bazel::sources::{load_file, normalize_out_dir, GnDesc};
use gn2bazel::translate::{DataPolicy, ResolveContext, Translator};
use gn2bazel::util::config::{global_config_path, load_config, project_config_path};
use gn2bazel::util::Status;

pub fn execute(args: ConvertArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&args.dir),
    );

    let exclude = args
        .exclude
        .or(config.convert.exclude.clone())
        .map(|pattern| {
            Regex::new(&pattern).with_context(|| format!("invalid --exclude pattern `{}`", pattern))
        })
        .transpose()?;

    let policy = match args.data_deps {
        Some(ref policy) => policy
            .parse::<DataPolicy>()
            .map_err(anyhow::Error::msg)
            .context("invalid --data-deps")?,
        None => config.data_policy()?.unwrap_or_default(),
    };

    let out_dir = normalize_out_dir(&args.out_dir);
    let out_root = match args.out {
        Some(out) => out,
        None => match config.convert.out {
            Some(ref out) => args.dir.join(out),
            None => args.dir.clone(),
        },
    };

    // The whole graph is decoded and validated before anything is written.
    let graph = match args.input {
        Some(ref input) => load_file(input)?,
        None => {
            let mut desc = GnDesc::new(&args.dir, &out_dir);
            if let Some(gn) = args.gn.or(config.convert.gn.clone()) {
                desc = desc.with_program(gn);
            }
            desc.load()?
        }
    };

    if !(args.skip_markers || config.convert.skip_markers.unwrap_or(false)) {
        let skip = marker_skip_list(&out_dir, &args.dir, &out_root);
        let written = write_markers(&args.dir, &skip)?;
        shell.status(Status::Created, format!("{} package markers", written));
    }

    let opts = ConvertOptions {
        out_root,
        exclude,
        translator: Translator::new(policy, ResolveContext::new(&out_dir)),
    };
    tracing::debug!("data deps policy: {}", policy);

    let (packages, _) = group_by_package(&graph, &opts);
    let progress = shell.progress(packages.len() as u64, "Writing BUILD files");
    let summary = convert_with(&graph, &opts, |_, _| progress.inc(1));
    progress.finish();

    shell.status(
        Status::Finished,
        format!("{} in {}", summary?, opts.out_root.display()),
    );

    Ok(())
}

/// Directory names the markers walk must not enter: the GN build directory
/// and the BUILD output directory when it lives inside the checkout.
fn marker_skip_list(out_dir: &str, dir: &Path, out_root: &Path) -> Vec<String> {
    let mut skip = Vec::new();

    if let Some(first) = first_component(Path::new(out_dir)) {
        skip.push(first);
    }

    if let Ok(relative) = out_root.strip_prefix(dir) {
        if let Some(first) = first_component(relative) {
            if !skip.contains(&first) {
                skip.push(first);
            }
        }
    }

    skip
}

fn first_component(path: &Path) -> Option<String> {
    path.components().find_map(|c| match c {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_skip_list() {
        let dir = Path::new("/src/v8");

        assert_eq!(
            marker_skip_list("out.gn/x64", dir, dir),
            vec!["out.gn".to_string()]
        );
        assert_eq!(
            marker_skip_list("out/Default", dir, &dir.join("bazel/build")),
            vec!["out".to_string(), "bazel".to_string()]
        );
        assert_eq!(
            marker_skip_list("out.gn/x64", dir, Path::new("/elsewhere")),
            vec!["out.gn".to_string()]
        );
    }
}
