//! CLI error types.

use std::error::Error;
use std::fmt::Write as _;

use mdpush_config::ConfigError;
use mdpush_jcr::{SyncError, TransportError};
use mdpush_renderer::RenderError;

/// Run-fatal CLI error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid files pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("no files match {pattern:?}")]
    NoFiles { pattern: String },

    #[error("cannot create repository client")]
    Client(#[from] TransportError),

    #[error("render failed")]
    Render(#[from] RenderError),

    #[error("cannot encode frontmatter as JSON")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    BaseUrl(String),

    #[error("{failed} of {total} document(s) failed")]
    Failed { failed: usize, total: usize },
}

/// Error confined to one document of a run.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DocumentError {
    #[error("cannot read file")]
    Read(#[from] std::io::Error),

    #[error("{0}")]
    BaseUrl(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Format an error with all of its sources, separated by `: `.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(message, ": {cause}");
        source = cause.source();
    }
    message
}
