//! Mock repository implementation for testing.
//!
//! Provides [`MockRepository`] for unit testing without a remote server.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::error::TransportError;
use crate::repository::{Probe, Repository};
use crate::types::{CreateNode, Property, UpdateNode};

/// A node held by [`MockRepository`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockNode {
    pub primary_type: String,
    /// Properties by language, then by name.
    pub properties: BTreeMap<String, BTreeMap<String, String>>,
    /// Languages the node is published in.
    pub published: BTreeSet<String>,
}

impl MockNode {
    /// Properties stored for `language`, empty if none.
    #[must_use]
    pub fn properties_for(&self, language: &str) -> BTreeMap<String, String> {
        self.properties.get(language).cloned().unwrap_or_default()
    }
}

/// A mutation received by [`MockRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create {
        parent: String,
        name: String,
        primary_type: String,
        language: String,
        publish: bool,
    },
    Update {
        path: String,
        language: String,
        publish: bool,
    },
}

/// Mock repository for testing.
///
/// Holds nodes in memory and records every mutation and render request.
/// Use the builder methods to seed nodes and inject failures.
///
/// Parent nodes are not required to exist for a create to succeed.
///
/// # Example
///
/// Compiled with the `mock` feature:
///
/// ```
/// use mdpush_jcr::{MockRepository, Probe, Repository};
///
/// let repo = MockRepository::new()
///     .with_node("/sites/foo/home", "jnt:page")
///     .with_render_failure("/sites/foo/broken");
/// assert!(matches!(repo.probe("/sites/foo/home"), Probe::Found(ref t) if t == "jnt:page"));
/// assert!(matches!(repo.probe("/sites/foo/missing"), Probe::NotFound));
/// assert!(repo.render_probe("/sites/foo/broken", "en").is_err());
/// assert!(repo.mutations().is_empty());
/// assert_eq!(repo.render_requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockRepository {
    nodes: RwLock<BTreeMap<String, MockNode>>,
    mutations: RwLock<Vec<Mutation>>,
    renders: RwLock<Vec<(String, String)>>,
    probe_failures: RwLock<BTreeMap<String, String>>,
    render_failures: RwLock<BTreeSet<String>>,
}

impl MockRepository {
    /// Create an empty mock repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing node with no properties.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_node(self, path: impl Into<String>, primary_type: impl Into<String>) -> Self {
        self.nodes.write().unwrap().insert(
            path.into(),
            MockNode {
                primary_type: primary_type.into(),
                ..MockNode::default()
            },
        );
        self
    }

    /// Make probing `path` fail with a GraphQL error carrying `message`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_probe_failure(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.probe_failures
            .write()
            .unwrap()
            .insert(path.into(), message.into());
        self
    }

    /// Make render requests for `path` fail with HTTP 500.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_render_failure(self, path: impl Into<String>) -> Self {
        self.render_failures.write().unwrap().insert(path.into());
        self
    }

    /// Snapshot of the node at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<MockNode> {
        self.nodes.read().unwrap().get(path).cloned()
    }

    /// Snapshot of all nodes.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn nodes(&self) -> BTreeMap<String, MockNode> {
        self.nodes.read().unwrap().clone()
    }

    /// Mutations received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.read().unwrap().clone()
    }

    /// Render requests received so far, as `(path, language)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn render_requests(&self) -> Vec<(String, String)> {
        self.renders.read().unwrap().clone()
    }

    fn store(node: &mut MockNode, properties: &[Property], language: &str, publish: bool) {
        let values = properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect();
        node.properties.insert(language.to_owned(), values);
        if publish {
            node.published.insert(language.to_owned());
        }
    }
}

fn graphql_error(message: String) -> TransportError {
    TransportError::GraphQl {
        messages: vec![message],
    }
}

impl Repository for MockRepository {
    fn probe(&self, path: &str) -> Probe {
        if let Some(message) = self.probe_failures.read().unwrap().get(path) {
            return Probe::Other(graphql_error(message.clone()));
        }
        match self.nodes.read().unwrap().get(path) {
            Some(node) => Probe::Found(node.primary_type.clone()),
            None => Probe::NotFound,
        }
    }

    fn create(&self, node: &CreateNode<'_>) -> Result<(), TransportError> {
        self.mutations.write().unwrap().push(Mutation::Create {
            parent: node.parent.to_owned(),
            name: node.name.to_owned(),
            primary_type: node.primary_type.to_owned(),
            language: node.language.to_owned(),
            publish: node.publish,
        });

        let mut nodes = self.nodes.write().unwrap();
        if nodes.contains_key(node.path) {
            return Err(graphql_error(format!(
                "javax.jcr.ItemExistsException: {}",
                node.path
            )));
        }
        let mut created = MockNode {
            primary_type: node.primary_type.to_owned(),
            ..MockNode::default()
        };
        Self::store(&mut created, node.properties, node.language, node.publish);
        nodes.insert(node.path.to_owned(), created);
        Ok(())
    }

    fn update(&self, node: &UpdateNode<'_>) -> Result<(), TransportError> {
        self.mutations.write().unwrap().push(Mutation::Update {
            path: node.path.to_owned(),
            language: node.language.to_owned(),
            publish: node.publish,
        });

        let mut nodes = self.nodes.write().unwrap();
        let Some(existing) = nodes.get_mut(node.path) else {
            return Err(graphql_error(format!(
                "javax.jcr.PathNotFoundException: {}",
                node.path
            )));
        };
        Self::store(existing, node.properties, node.language, node.publish);
        Ok(())
    }

    fn render_probe(&self, path: &str, language: &str) -> Result<(), TransportError> {
        self.renders
            .write()
            .unwrap()
            .push((path.to_owned(), language.to_owned()));
        if self.render_failures.read().unwrap().contains(path) {
            return Err(TransportError::HttpResponse {
                status: 500,
                body: "render failed".to_owned(),
            });
        }
        Ok(())
    }
}
