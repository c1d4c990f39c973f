//! Error types for document sync.

use mdpush_renderer::RenderError;

use crate::error::{SchemaError, TransportError, UpsertError};

/// Error that ends the sync of one document.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Rendering failed (malformed frontmatter, unknown directive).
    #[error("render error")]
    Render(#[from] RenderError),

    /// The frontmatter matches no document shape.
    #[error("frontmatter error")]
    Schema(#[from] SchemaError),

    /// Upserting a node failed.
    #[error("upsert of {path} failed")]
    Upsert {
        /// Node path.
        path: String,
        #[source]
        source: UpsertError,
    },

    /// The edit-mode render of a page failed.
    #[error("edit-mode render of {path} ({language}) failed")]
    RenderPrime {
        /// Page path.
        path: String,
        /// Rendered language.
        language: String,
        #[source]
        source: TransportError,
    },
}
