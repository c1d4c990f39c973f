//! Remote repository abstraction.

use crate::error::TransportError;
use crate::types::{CreateNode, UpdateNode};

/// Result of looking up a node by path.
///
/// Transports classify their failures into these three cases once, so the
/// upsert protocol never inspects transport error shapes.
#[derive(Debug)]
pub enum Probe {
    /// No node exists at the path.
    NotFound,
    /// A node exists with this primary type.
    Found(String),
    /// The lookup failed for any other reason.
    Other(TransportError),
}

/// Path-addressed content repository.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait Repository: Send + Sync {
    /// Look up the primary type of the node at `path`.
    fn probe(&self, path: &str) -> Probe;

    /// Create a node, publishing it in the same request when asked to.
    fn create(&self, node: &CreateNode<'_>) -> Result<(), TransportError>;

    /// Replace a node's properties for one language, publishing in the
    /// same request when asked to.
    fn update(&self, node: &UpdateNode<'_>) -> Result<(), TransportError>;

    /// Request the edit-mode rendering of a page. The output is discarded.
    fn render_probe(&self, path: &str, language: &str) -> Result<(), TransportError>;
}
