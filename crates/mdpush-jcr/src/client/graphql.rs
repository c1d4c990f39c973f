//! GraphQL request execution.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{JcrClient, response_error};
use crate::error::TransportError;

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

/// A decoded GraphQL response: data and errors may both be present.
#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Error messages in response order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Data, or the response's errors.
    pub fn into_result(self) -> Result<Option<T>, TransportError> {
        if self.errors.is_empty() {
            Ok(self.data)
        } else {
            Err(TransportError::GraphQl {
                messages: self.messages(),
            })
        }
    }
}

impl JcrClient {
    /// POST a GraphQL document and decode the response envelope.
    ///
    /// GraphQL errors are returned inside the envelope, not as `Err`.
    pub(super) fn execute<V: Serialize, T: DeserializeOwned>(
        &self,
        query: &str,
        variables: V,
    ) -> Result<GraphQlResponse<T>, TransportError> {
        debug!(endpoint = %self.endpoint, "executing GraphQL request");

        let mut request = self
            .agent
            .post(self.endpoint.as_str())
            .header("Accept", "application/json");
        if let Some(authorization) = &self.authorization {
            request = request.header("Authorization", authorization.as_str());
        }

        let response = request.send_json(GraphQlRequest { query, variables })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(response_error(status, response));
        }

        let body = response.into_body().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}
