//! Document sync implementation.

use tracing::info;
use url::Url;

use crate::repository::Repository;
use crate::upsert::{NodeSpec, upsert_node};

use super::error::SyncError;
use super::{SyncDefaults, SyncPlan, SyncReport, SyncStep};

/// Syncs markdown documents into a repository.
pub struct DocumentSync<'a, R: Repository + ?Sized> {
    repo: &'a R,
    defaults: SyncDefaults,
}

impl<'a, R: Repository + ?Sized> DocumentSync<'a, R> {
    /// Create a new document sync.
    #[must_use]
    pub fn new(repo: &'a R, defaults: SyncDefaults) -> Self {
        Self { repo, defaults }
    }

    /// Compute the plan for a document without touching the repository.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Render`] or [`SyncError::Schema`].
    pub fn plan(&self, text: &str, base_url: &Url) -> Result<SyncPlan, SyncError> {
        SyncPlan::build(text, base_url, &self.defaults)
    }

    /// Render a document and bring the repository in line with it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the document does not render or its frontmatter does not resolve
    /// - a page or content upsert fails
    /// - the page's edit-mode render fails
    pub fn sync(&self, text: &str, base_url: &Url) -> Result<SyncReport, SyncError> {
        let plan = self.plan(text, base_url)?;
        self.execute(&plan)
    }

    /// Run a plan's steps in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Upsert`] or [`SyncError::RenderPrime`].
    pub fn execute(&self, plan: &SyncPlan) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();

        for step in &plan.steps {
            match step {
                SyncStep::Upsert(node) => {
                    let spec = NodeSpec {
                        path: &node.path,
                        primary_type: &node.primary_type,
                        properties: &node.properties,
                        language: &plan.language,
                        publish: plan.publish,
                    };
                    let outcome =
                        upsert_node(self.repo, &spec).map_err(|source| SyncError::Upsert {
                            path: node.path.clone(),
                            source,
                        })?;
                    info!(path = %node.path, ?outcome, "node synced");
                    report.nodes.push((node.path.clone(), outcome));
                }
                SyncStep::PrimeRender { path } => {
                    self.repo
                        .render_probe(path, &plan.language)
                        .map_err(|source| SyncError::RenderPrime {
                            path: path.clone(),
                            language: plan.language.clone(),
                            source,
                        })?;
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::UpsertError;
    use crate::mock::{MockRepository, Mutation};
    use crate::upsert::UpsertOutcome;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com/docs/home.md").unwrap()
    }

    fn defaults() -> SyncDefaults {
        SyncDefaults {
            language: "en".to_owned(),
            publish: false,
        }
    }

    const PAGE_DOC: &str = "---\nlanguage: fr\npage:\n  path: /sites/foo/home\n  jcr:title: Accueil\ncontent:\n  subpath: main/intro\n---\nBonjour\n";

    #[test]
    fn test_content_only_end_to_end() {
        let repo = MockRepository::new();
        let sync = DocumentSync::new(&repo, defaults());
        let text =
            "---\ncontent:\n  path: /sites/foo/home\n  type: bigText\n  html: text\n---\n# Hi\n";

        let report = sync.sync(text, &base()).unwrap();

        assert_eq!(
            report.nodes,
            vec![("/sites/foo/home".to_owned(), UpsertOutcome::Created)]
        );
        let node = repo.node("/sites/foo/home").unwrap();
        assert_eq!(node.primary_type, "bigText");
        assert_eq!(
            node.properties_for("en"),
            BTreeMap::from([("text".to_owned(), "<h1>Hi</h1>".to_owned())])
        );
        assert!(repo.render_requests().is_empty());
    }

    #[test]
    fn test_page_and_content_flow() {
        let repo = MockRepository::new();
        let sync = DocumentSync::new(&repo, defaults());

        let report = sync.sync(PAGE_DOC, &base()).unwrap();

        assert_eq!(
            report.nodes,
            vec![
                ("/sites/foo/home".to_owned(), UpsertOutcome::Created),
                ("/sites/foo/home/main/intro".to_owned(), UpsertOutcome::Created),
            ]
        );
        assert_eq!(
            repo.render_requests(),
            vec![("/sites/foo/home".to_owned(), "fr".to_owned())]
        );
        let page = repo.node("/sites/foo/home").unwrap();
        assert_eq!(page.primary_type, "jnt:page");
        assert_eq!(
            page.properties_for("fr"),
            BTreeMap::from([("jcr:title".to_owned(), "Accueil".to_owned())])
        );
        let content = repo.node("/sites/foo/home/main/intro").unwrap();
        assert_eq!(
            content.properties_for("fr").get("text").map(String::as_str),
            Some("<p>Bonjour</p>")
        );
    }

    #[test]
    fn test_page_path_trailing_slash_targets_same_node() {
        let repo = MockRepository::new().with_node("/sites/foo/home", "jnt:page");
        let sync = DocumentSync::new(&repo, defaults());
        let text = PAGE_DOC.replace("path: /sites/foo/home\n", "path: /sites/foo/home/\n");

        let report = sync.sync(&text, &base()).unwrap();

        assert_eq!(
            report.nodes,
            vec![
                ("/sites/foo/home".to_owned(), UpsertOutcome::Updated),
                ("/sites/foo/home/main/intro".to_owned(), UpsertOutcome::Created),
            ]
        );
        assert_eq!(
            repo.render_requests(),
            vec![("/sites/foo/home".to_owned(), "fr".to_owned())]
        );
    }

    #[test]
    fn test_resync_updates_in_place() {
        let repo = MockRepository::new();
        let sync = DocumentSync::new(&repo, defaults());

        sync.sync(PAGE_DOC, &base()).unwrap();
        let after_first = repo.nodes();
        let report = sync.sync(PAGE_DOC, &base()).unwrap();

        assert!(report
            .nodes
            .iter()
            .all(|(_, outcome)| *outcome == UpsertOutcome::Updated));
        assert_eq!(repo.nodes(), after_first);
    }

    #[test]
    fn test_render_prime_failure_stops_before_content() {
        let repo = MockRepository::new().with_render_failure("/sites/foo/home");
        let sync = DocumentSync::new(&repo, defaults());

        let err = sync.sync(PAGE_DOC, &base()).unwrap_err();

        match err {
            SyncError::RenderPrime { path, language, .. } => {
                assert_eq!(path, "/sites/foo/home");
                assert_eq!(language, "fr");
            }
            other => panic!("expected RenderPrime, got {other:?}"),
        }
        assert!(repo.node("/sites/foo/home").is_some());
        assert!(repo.node("/sites/foo/home/main/intro").is_none());
    }

    #[test]
    fn test_page_type_mismatch_stops_document() {
        let repo = MockRepository::new().with_node("/sites/foo/home", "jnt:folder");
        let sync = DocumentSync::new(&repo, defaults());

        let err = sync.sync(PAGE_DOC, &base()).unwrap_err();

        assert!(matches!(
            err,
            SyncError::Upsert {
                source: UpsertError::TypeMismatch { .. },
                ..
            }
        ));
        assert!(repo.mutations().is_empty());
        assert!(repo.render_requests().is_empty());
    }

    #[test]
    fn test_non_string_extra_is_property_error() {
        let repo = MockRepository::new();
        let sync = DocumentSync::new(&repo, defaults());
        let text = "---\ncontent:\n  path: /a\n  weight: 3\n---\nx\n";

        let err = sync.sync(text, &base()).unwrap_err();

        assert!(matches!(
            err,
            SyncError::Upsert {
                source: UpsertError::PropertyType { .. },
                ..
            }
        ));
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn test_publish_default_is_forwarded() {
        let repo = MockRepository::new();
        let sync = DocumentSync::new(
            &repo,
            SyncDefaults {
                language: "de".to_owned(),
                publish: true,
            },
        );
        sync.sync("---\ncontent:\n  path: /a\n---\nx\n", &base())
            .unwrap();

        assert!(matches!(
            &repo.mutations()[0],
            Mutation::Create { language, publish: true, .. } if language == "de"
        ));
    }
}
