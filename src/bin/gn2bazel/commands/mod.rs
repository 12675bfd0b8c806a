//! Command implementations

pub mod completions;
pub mod convert;
pub mod desc;
pub mod markers;
