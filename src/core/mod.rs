//! Core data structures for gn2bazel.
//!
//! This module contains the types decoded from `gn desc`:
//! - Labels (target identities and packages)
//! - Targets and their GN output types
//! - The validated target graph

pub mod graph;
pub mod label;
pub mod target;

pub use graph::{GraphError, Node, TargetGraph};
pub use label::Label;
pub use target::{Public, Target, TargetType};
