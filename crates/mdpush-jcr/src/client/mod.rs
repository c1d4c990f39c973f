//! JCR GraphQL API client.
//!
//! Provides a sync HTTP client for the content repository's GraphQL
//! endpoint, plus the edit-mode render request used to prime pages.

mod graphql;
mod nodes;
mod render;

use std::time::Duration;

use ureq::Agent;
use url::Url;

use crate::error::TransportError;
use crate::repository::{Probe, Repository};
use crate::types::{CreateNode, UpdateNode};

/// JCR GraphQL API client.
pub struct JcrClient {
    agent: Agent,
    endpoint: Url,
    authorization: Option<String>,
}

impl JcrClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `endpoint` - GraphQL endpoint URL
    /// * `authorization` - Full `Authorization` header value, if any
    /// * `timeout_secs` - Global timeout applied to every request
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the endpoint cannot be parsed.
    pub fn new(
        endpoint: &str,
        authorization: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint)?;

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            endpoint,
            authorization: authorization.map(str::to_owned),
        })
    }

    /// The GraphQL endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Read a non-success response body into an error.
fn response_error(status: u16, response: ureq::http::Response<ureq::Body>) -> TransportError {
    let body = response
        .into_body()
        .read_to_string()
        .unwrap_or_else(|_| "(unable to read error body)".to_owned());
    TransportError::HttpResponse { status, body }
}

impl Repository for JcrClient {
    fn probe(&self, path: &str) -> Probe {
        nodes::classify_probe(self.fetch_primary_type(path))
    }

    fn create(&self, node: &CreateNode<'_>) -> Result<(), TransportError> {
        self.add_node(node)
    }

    fn update(&self, node: &UpdateNode<'_>) -> Result<(), TransportError> {
        self.set_properties(node)
    }

    fn render_probe(&self, path: &str, language: &str) -> Result<(), TransportError> {
        self.render_edit_frame(path, language)
    }
}
