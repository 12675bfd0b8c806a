//! gn2bazel - translate a GN build graph into Bazel BUILD files
//!
//! This crate provides the library behind the `gn2bazel` tool: decoding
//! `gn desc --format=json` output, translating each target into a Bazel
//! rule and writing one BUILD file per package.

pub mod core;
pub mod ops;
pub mod sources;
pub mod translate;
pub mod util;

pub use crate::core::{GraphError, Label, Public, Target, TargetGraph, TargetType};
pub use crate::translate::{DataPolicy, ResolveContext, Rule, RuleKind, RuleRegistry, Translator};
