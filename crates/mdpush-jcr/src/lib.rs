//! Markdown document sync into a JCR content repository.
//!
//! This crate provides:
//! - [`resolve_frontmatter`] validating document metadata against the two
//!   supported shapes (content-only, page-and-content)
//! - [`upsert_node`], the create-or-update protocol run against any
//!   [`Repository`]
//! - [`JcrClient`], a [`Repository`] speaking the JCR GraphQL API over HTTP
//! - [`DocumentSync`], the per-document workflow (render, resolve, upsert)
//! - [`MockRepository`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mdpush_jcr::{DocumentSync, JcrClient, SyncDefaults};
//! use url::Url;
//!
//! let client = JcrClient::new(
//!     "https://cms.example.com/modules/graphql",
//!     Some("Basic cm9vdDpyb290"),
//!     30,
//! )?;
//! let defaults = SyncDefaults {
//!     language: "en".to_owned(),
//!     publish: false,
//! };
//! let sync = DocumentSync::new(&client, defaults);
//!
//! let text = "---\ncontent:\n  path: /sites/foo/home\n---\n# Hi\n";
//! let base = Url::parse("https://example.com/docs/home.md")?;
//! let report = sync.sync(text, &base)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod frontmatter;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod properties;
mod repository;
mod sync;
mod types;
mod upsert;

pub use client::JcrClient;
pub use error::{SchemaError, TransportError, UpsertError};
pub use frontmatter::{
    ContentTarget, DEFAULT_BODY_PROPERTY, DEFAULT_CONTENT_TYPE, DEFAULT_PAGE_TYPE, PageTarget,
    ResolvedFrontmatter, resolve_frontmatter,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockNode, MockRepository, Mutation};
pub use properties::prepare_properties;
pub use repository::{Probe, Repository};
pub use sync::{
    DocumentSync, PlannedNode, SyncDefaults, SyncError, SyncPlan, SyncReport, SyncStep,
};
pub use types::{CreateNode, Property, UpdateNode};
pub use upsert::{NodeSpec, UpsertOutcome, split_node_path, upsert_node};
