//! Node lookup and mutation.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::info;

use super::JcrClient;
use super::graphql::GraphQlResponse;
use crate::error::TransportError;
use crate::repository::Probe;
use crate::types::{CreateNode, UpdateNode};

/// Substring identifying a missing node in GraphQL error messages.
const PATH_NOT_FOUND: &str = "PathNotFoundException";

const PROBE_QUERY: &str = r"
query ($path: String!) {
  jcr {
    nodeByPath(path: $path) {
      primaryNodeType {
        name
      }
    }
  }
}
";

const CREATE_MUTATION: &str = r"
mutation (
  $parent: String!
  $name: String!
  $path: String!
  $type: String!
  $properties: [InputJCRProperty!]!
  $publish: Boolean!
  $language: String!
) {
  jcr {
    addNode(
      parentPathOrId: $parent
      name: $name
      primaryNodeType: $type
      properties: $properties
    ) {
      __typename
    }
  }
  publish: jcr @include(if: $publish) {
    mutateNode(pathOrId: $path) {
      publish(languages: [$language])
    }
  }
}
";

const UPDATE_MUTATION: &str = r"
mutation (
  $path: String!
  $properties: [InputJCRProperty!]!
  $publish: Boolean!
  $language: String!
) {
  jcr {
    mutateNode(pathOrId: $path) {
      setPropertiesBatch(properties: $properties) {
        __typename
      }
    }
  }
  publish: jcr @include(if: $publish) {
    mutateNode(pathOrId: $path) {
      publish(languages: [$language])
    }
  }
}
";

#[derive(Debug, Deserialize)]
pub(super) struct ProbeData {
    jcr: Option<ProbeJcr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbeJcr {
    node_by_path: Option<ProbeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbeNode {
    primary_node_type: Option<NodeTypeName>,
}

#[derive(Debug, Deserialize)]
struct NodeTypeName {
    name: Option<String>,
}

impl ProbeData {
    fn primary_type(self) -> Option<String> {
        self.jcr?.node_by_path?.primary_node_type?.name
    }
}

/// Map a probe response onto the three probe states.
///
/// Any GraphQL error mentioning `PathNotFoundException` means the node does
/// not exist. A successful response must name the node's primary type.
pub(super) fn classify_probe(
    response: Result<GraphQlResponse<ProbeData>, TransportError>,
) -> Probe {
    let response = match response {
        Ok(response) => response,
        Err(err) => return Probe::Other(err),
    };

    if response
        .errors
        .iter()
        .any(|e| e.message.contains(PATH_NOT_FOUND))
    {
        return Probe::NotFound;
    }

    match response.into_result() {
        Ok(data) => match data.and_then(ProbeData::primary_type) {
            Some(name) => Probe::Found(name),
            None => Probe::Other(TransportError::Malformed(
                "node has no primary node type".to_owned(),
            )),
        },
        Err(err) => Probe::Other(err),
    }
}

impl JcrClient {
    /// Query the primary type of the node at `path`.
    pub(super) fn fetch_primary_type(
        &self,
        path: &str,
    ) -> Result<GraphQlResponse<ProbeData>, TransportError> {
        info!("Probing node {}", path);
        self.execute(PROBE_QUERY, json!({ "path": path }))
    }

    /// Create a node, publishing it in the same request if asked to.
    pub(super) fn add_node(&self, node: &CreateNode<'_>) -> Result<(), TransportError> {
        info!("Creating node {}/{}", node.parent, node.name);
        self.execute::<_, IgnoredAny>(CREATE_MUTATION, node)?
            .into_result()?;
        Ok(())
    }

    /// Replace a node's properties, publishing it in the same request if
    /// asked to.
    pub(super) fn set_properties(&self, node: &UpdateNode<'_>) -> Result<(), TransportError> {
        info!("Updating node {}", node.path);
        self.execute::<_, IgnoredAny>(UPDATE_MUTATION, node)?
            .into_result()?;
        Ok(())
    }
}
