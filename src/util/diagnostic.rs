//! Help text for errors reported by the CLI.

use miette::Diagnostic;

use crate::core::graph::GraphError;
use crate::translate::TranslateError;

/// Find the help text of the first diagnostic in an error chain.
pub fn help(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(diag) = cause.downcast_ref::<GraphError>() {
            return diag.help().map(|h| h.to_string());
        }
        cause
            .downcast_ref::<TranslateError>()
            .and_then(|diag| diag.help())
            .map(|h| h.to_string())
    })
}
