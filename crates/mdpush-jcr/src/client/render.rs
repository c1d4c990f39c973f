//! Edit-mode page rendering.

use tracing::info;
use url::Url;

use super::{JcrClient, response_error};
use crate::error::TransportError;

/// Edit frame URL for a page in a language, on the endpoint's host.
fn edit_frame_url(endpoint: &Url, path: &str, language: &str) -> Result<Url, TransportError> {
    let page = format!("/cms/editframe/default/{language}{path}.html");
    Ok(endpoint.join(&page)?)
}

impl JcrClient {
    /// Request the edit-mode rendering of a page and discard the output.
    ///
    /// Rendering a page in edit mode creates its nested areas, which content
    /// nodes are then attached to.
    pub(super) fn render_edit_frame(
        &self,
        path: &str,
        language: &str,
    ) -> Result<(), TransportError> {
        let url = edit_frame_url(&self.endpoint, path, language)?;
        info!("Rendering page {} ({})", path, language);

        let mut request = self.agent.get(url.as_str()).header("Accept", "text/html");
        if let Some(authorization) = &self.authorization {
            request = request.header("Authorization", authorization.as_str());
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(response_error(status, response));
        }
        Ok(())
    }
}
