//! Translation error types.

use miette::Diagnostic;
use thiserror::Error;

use crate::translate::rules::RuleKind;

/// Error while translating a target into a Bazel rule.
#[derive(Debug, Error, Diagnostic)]
pub enum TranslateError {
    #[error("cannot resolve `{path}` in package `{package}`: {reason}")]
    #[diagnostic(
        code(gn2bazel::translate::malformed_path),
        help("paths in `gn desc` output are expected to be source-absolute (`//dir/file`)")
    )]
    MalformedPath {
        path: String,
        package: String,
        reason: &'static str,
    },

    #[error("no renderer registered for `{kind}` rules")]
    #[diagnostic(code(gn2bazel::translate::missing_renderer))]
    MissingRenderer { kind: RuleKind },
}

impl TranslateError {
    pub(crate) fn malformed(path: &str, package: &str, reason: &'static str) -> Self {
        TranslateError::MalformedPath {
            path: path.to_string(),
            package: package.to_string(),
            reason,
        }
    }
}
