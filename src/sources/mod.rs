//! Graph sources.
//!
//! A build graph comes either from running `gn desc` in a checkout or from a
//! JSON file captured earlier with `gn2bazel desc`.

pub mod gn;

pub use gn::{load_file, normalize_out_dir, GnDesc};
