//! Wire types for repository mutations.

use serde::Serialize;

/// A node property as sent to the repository.
///
/// Only string properties are supported; `type` is always `STRING`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub language: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Property {
    /// Property type tag for string values.
    pub const STRING: &'static str = "STRING";

    /// Create a string property for a language.
    #[must_use]
    pub fn string(
        name: impl Into<String>,
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            language: language.into(),
            kind: Self::STRING,
        }
    }
}

/// Create a node under `parent` and optionally publish it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreateNode<'a> {
    /// Parent node path.
    pub parent: &'a str,
    /// Name of the new node (last path segment).
    pub name: &'a str,
    /// Full path of the new node, used for publishing.
    pub path: &'a str,
    /// Primary node type.
    #[serde(rename = "type")]
    pub primary_type: &'a str,
    pub properties: &'a [Property],
    /// Publish in `language` as part of the same request.
    pub publish: bool,
    pub language: &'a str,
}

/// Replace the property set of an existing node and optionally publish it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateNode<'a> {
    pub path: &'a str,
    pub properties: &'a [Property],
    pub publish: bool,
    pub language: &'a str,
}
