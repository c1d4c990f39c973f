//! Per-document sync workflow.
//!
//! This module provides the [`DocumentSync`] struct that runs the whole
//! workflow for one markdown document:
//!
//! 1. Render the document to HTML and extract its frontmatter
//! 2. Resolve the frontmatter into page and content targets
//! 3. Upsert the page, if there is one, then request its edit-mode
//!    rendering so its areas exist
//! 4. Upsert the content node with the rendered HTML
//!
//! Steps run strictly in order and the first failure ends the document.
//! [`SyncPlan::build`] performs steps 1 and 2 without any remote call, which
//! is what a dry run shows.

mod error;
mod executor;

pub use error::SyncError;
pub use executor::DocumentSync;

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use crate::frontmatter::resolve_frontmatter;
use crate::upsert::UpsertOutcome;

/// Fallback values for fields a document's frontmatter leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDefaults {
    pub language: String,
    pub publish: bool,
}

/// A node to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub path: String,
    pub primary_type: String,
    pub properties: BTreeMap<String, Value>,
}

/// One remote operation of a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStep {
    Upsert(PlannedNode),
    /// Edit-mode render of a page, priming its areas.
    PrimeRender { path: String },
}

/// Everything needed to sync one document, computed without remote calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// Rendered HTML of the document body.
    pub html: String,
    pub language: String,
    pub publish: bool,
    /// Remote operations, in execution order.
    pub steps: Vec<SyncStep>,
}

impl SyncPlan {
    /// Render a document and resolve its frontmatter into a plan.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Render`] or [`SyncError::Schema`].
    pub fn build(text: &str, base_url: &Url, defaults: &SyncDefaults) -> Result<Self, SyncError> {
        let rendered = mdpush_renderer::render(text, base_url)?;
        let resolved = resolve_frontmatter(&rendered.metadata, defaults)?;

        let mut steps = Vec::with_capacity(3);
        if let Some(page) = resolved.page {
            let path = page.path.clone();
            steps.push(SyncStep::Upsert(PlannedNode {
                path: page.path,
                primary_type: page.primary_type,
                properties: page.properties,
            }));
            steps.push(SyncStep::PrimeRender { path });
        }
        steps.push(SyncStep::Upsert(PlannedNode {
            properties: resolved.content.properties(&rendered.html),
            path: resolved.content.path,
            primary_type: resolved.content.primary_type,
        }));

        Ok(Self {
            html: rendered.html,
            language: resolved.language,
            publish: resolved.publish,
            steps,
        })
    }
}

/// Outcome of a synced document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Upserted node paths with the branch taken, in order.
    pub nodes: Vec<(String, UpsertOutcome)>,
}
