//! Idempotent create-or-update of a single node.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use crate::error::UpsertError;
use crate::properties::prepare_properties;
use crate::repository::{Probe, Repository};
use crate::types::{CreateNode, UpdateNode};

/// Desired state of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec<'a> {
    pub path: &'a str,
    pub primary_type: &'a str,
    /// Full property set for `language`; values must be strings.
    pub properties: &'a BTreeMap<String, Value>,
    pub language: &'a str,
    pub publish: bool,
}

/// Which branch of the protocol ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Bring the node at `spec.path` to the desired state.
///
/// 1. Probe the node's current primary type.
/// 2. Not found: create it under its parent path with the full property
///    set, publishing in the same request if asked to.
/// 3. Found with the declared type: replace its property set for the
///    language (batch replace, not merge), publishing likewise.
/// 4. Found with another type: fail without mutating.
///
/// Calling this twice with the same arguments succeeds both times and
/// leaves the same final state.
///
/// # Errors
///
/// - [`UpsertError::PropertyType`] if a property value is not a string
///   (checked before any remote call)
/// - [`UpsertError::TypeMismatch`] if the node exists with another type
/// - [`UpsertError::Remote`] if the probe or the mutation fails
pub fn upsert_node<R: Repository + ?Sized>(
    repo: &R,
    spec: &NodeSpec<'_>,
) -> Result<UpsertOutcome, UpsertError> {
    let properties = prepare_properties(spec.properties, spec.language)?;

    match repo.probe(spec.path) {
        Probe::NotFound => {
            let (parent, name) = split_node_path(spec.path);
            info!(
                path = spec.path,
                primary_type = spec.primary_type,
                language = spec.language,
                publish = spec.publish,
                "creating node"
            );
            repo.create(&CreateNode {
                parent,
                name,
                path: spec.path,
                primary_type: spec.primary_type,
                properties: &properties,
                publish: spec.publish,
                language: spec.language,
            })?;
            Ok(UpsertOutcome::Created)
        }
        Probe::Found(actual) if actual != spec.primary_type => Err(UpsertError::TypeMismatch {
            path: spec.path.to_owned(),
            expected: spec.primary_type.to_owned(),
            actual,
        }),
        Probe::Found(_) => {
            info!(
                path = spec.path,
                language = spec.language,
                publish = spec.publish,
                "updating node"
            );
            repo.update(&UpdateNode {
                path: spec.path,
                properties: &properties,
                publish: spec.publish,
                language: spec.language,
            })?;
            Ok(UpsertOutcome::Updated)
        }
        Probe::Other(err) => Err(UpsertError::Remote(err)),
    }
}

/// Split a POSIX-style node path into parent path and last segment.
///
/// Trailing slashes are ignored. `/home` has parent `/`; a path without
/// any slash has parent `.`.
#[must_use]
pub fn split_node_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return ("/", "");
    }
    match trimmed.rsplit_once('/') {
        Some((parent, name)) => {
            let parent = parent.trim_end_matches('/');
            (if parent.is_empty() { "/" } else { parent }, name)
        }
        None => (".", trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mock::{MockRepository, Mutation};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn props(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn spec<'a>(
        path: &'a str,
        primary_type: &'a str,
        properties: &'a BTreeMap<String, Value>,
    ) -> NodeSpec<'a> {
        NodeSpec {
            path,
            primary_type,
            properties,
            language: "en",
            publish: false,
        }
    }

    #[test]
    fn test_split_node_path() {
        assert_eq!(split_node_path("/sites/foo/home"), ("/sites/foo", "home"));
        assert_eq!(split_node_path("/home"), ("/", "home"));
        assert_eq!(split_node_path("/sites/foo/"), ("/sites", "foo"));
        assert_eq!(split_node_path("home"), (".", "home"));
        assert_eq!(split_node_path("/"), ("/", ""));
    }

    #[test]
    fn test_not_found_creates_under_parent() {
        let repo = MockRepository::new();
        let properties = props(json!({"text": "<h1>Hi</h1>"}));
        let outcome = upsert_node(
            &repo,
            &NodeSpec {
                publish: true,
                language: "fr",
                ..spec("/sites/foo/home", "bigText", &properties)
            },
        )
        .unwrap();

        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(
            repo.mutations(),
            vec![Mutation::Create {
                parent: "/sites/foo".to_owned(),
                name: "home".to_owned(),
                primary_type: "bigText".to_owned(),
                language: "fr".to_owned(),
                publish: true,
            }]
        );
        let node = repo.node("/sites/foo/home").unwrap();
        assert_eq!(node.primary_type, "bigText");
        assert_eq!(
            node.properties_for("fr"),
            BTreeMap::from([("text".to_owned(), "<h1>Hi</h1>".to_owned())])
        );
        assert!(node.published.contains("fr"));
    }

    #[test]
    fn test_found_with_same_type_updates() {
        let repo = MockRepository::new().with_node("/sites/foo/home", "jnt:bigText");
        let properties = props(json!({"text": "x"}));
        let outcome =
            upsert_node(&repo, &spec("/sites/foo/home", "jnt:bigText", &properties)).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert!(matches!(repo.mutations()[0], Mutation::Update { .. }));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let repo = MockRepository::new();
        let properties = props(json!({"text": "<p>same</p>", "jcr:title": "Home"}));
        let node = spec("/sites/foo/home", "jnt:bigText", &properties);

        let first = upsert_node(&repo, &node).unwrap();
        let after_first = repo.nodes();
        let second = upsert_node(&repo, &node).unwrap();

        assert_eq!(first, UpsertOutcome::Created);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(repo.nodes(), after_first);
    }

    #[test]
    fn test_type_mismatch_does_not_mutate() {
        let repo = MockRepository::new().with_node("/sites/foo/home", "jnt:page");
        let properties = props(json!({"text": "x"}));
        let err =
            upsert_node(&repo, &spec("/sites/foo/home", "jnt:bigText", &properties)).unwrap_err();

        match err {
            UpsertError::TypeMismatch {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "/sites/foo/home");
                assert_eq!(expected, "jnt:bigText");
                assert_eq!(actual, "jnt:page");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn test_probe_failure_is_remote_error_without_mutation() {
        let repo = MockRepository::new().with_probe_failure("/a", "Permission denied");
        let properties = BTreeMap::new();
        let err = upsert_node(&repo, &spec("/a", "jnt:page", &properties)).unwrap_err();
        assert!(matches!(
            err,
            UpsertError::Remote(TransportError::GraphQl { .. })
        ));
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn test_non_string_property_fails_before_probe() {
        let repo = MockRepository::new().with_probe_failure("/a", "should not be probed");
        let properties = props(json!({"order": 1}));
        let err = upsert_node(&repo, &spec("/a", "jnt:page", &properties)).unwrap_err();
        assert!(matches!(err, UpsertError::PropertyType { name } if name == "order"));
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn test_failed_mutation_is_remote_error() {
        // Node appears between probe and create: the mock rejects the create.
        struct Racy(MockRepository);
        impl Repository for Racy {
            fn probe(&self, _path: &str) -> Probe {
                Probe::NotFound
            }
            fn create(&self, node: &CreateNode<'_>) -> Result<(), TransportError> {
                self.0.create(node)
            }
            fn update(&self, node: &UpdateNode<'_>) -> Result<(), TransportError> {
                self.0.update(node)
            }
            fn render_probe(&self, path: &str, language: &str) -> Result<(), TransportError> {
                self.0.render_probe(path, language)
            }
        }

        let repo = Racy(MockRepository::new().with_node("/a", "jnt:page"));
        let properties = BTreeMap::new();
        let err = upsert_node(&repo, &spec("/a", "jnt:page", &properties)).unwrap_err();
        assert!(matches!(err, UpsertError::Remote(_)));
    }
}
