//! Error types for repository access and document resolution.

/// Failure talking to the remote repository.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The GraphQL response carried errors.
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl {
        /// Error messages in response order.
        messages: Vec<String>,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// The response decoded but lacked a required field.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The endpoint or a derived URL is not valid.
    #[error("invalid URL")]
    InvalidUrl(#[from] url::ParseError),
}

/// Error from the create-or-update protocol.
///
/// No mutation is attempted when any of these is returned, except for
/// [`UpsertError::Remote`] raised by the create or update call itself.
#[derive(Debug, thiserror::Error)]
pub enum UpsertError {
    /// The existing node has a different primary type than declared.
    #[error("node at {path} has type {actual}, expected {expected}")]
    TypeMismatch {
        /// Node path.
        path: String,
        /// Declared primary type.
        expected: String,
        /// Primary type found in the repository.
        actual: String,
    },

    /// A property value is not a string.
    #[error("property \"{name}\" must be a string")]
    PropertyType {
        /// Property name.
        name: String,
    },

    /// Probe or mutation failed.
    #[error("remote repository error")]
    Remote(#[from] TransportError),
}

/// Document metadata matches no supported shape.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Neither the content-only nor the page-and-content shape validated.
    #[error(
        "frontmatter matches no document shape (content-only: {content_only}; page-and-content: {page_and_content})"
    )]
    NoMatchingShape {
        /// Why the content-only shape was rejected.
        content_only: String,
        /// Why the page-and-content shape was rejected.
        page_and_content: String,
    },

    /// A field outside the two shapes has an invalid value.
    #[error("invalid frontmatter field `{field}`: {message}")]
    InvalidField {
        /// Dotted field name.
        field: &'static str,
        /// Validation message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_display_joins_messages() {
        let err = TransportError::GraphQl {
            messages: vec!["first".to_owned(), "second".to_owned()],
        };
        assert_eq!(err.to_string(), "GraphQL error: first; second");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = UpsertError::TypeMismatch {
            path: "/sites/foo/home".to_owned(),
            expected: "jnt:bigText".to_owned(),
            actual: "jnt:page".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "node at /sites/foo/home has type jnt:page, expected jnt:bigText"
        );
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransportError>();
        assert_send_sync::<UpsertError>();
        assert_send_sync::<SchemaError>();
    }
}
