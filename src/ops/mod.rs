//! High-level operations.
//!
//! This module contains the implementation of gn2bazel commands.

pub mod convert;
pub mod markers;

pub use convert::{convert, convert_with, group_by_package, ConvertOptions, ConvertSummary};
pub use markers::{write_markers, MARKER_CONTENTS, MARKER_FILE};
