//! Frontmatter schema resolution.
//!
//! Two document shapes are supported:
//!
//! ```yaml
//! # content-only: the content node has an absolute path
//! content:
//!   path: /sites/foo/home/area/intro
//!   type: jnt:bigText        # optional
//!   html: text               # optional body property (alias: bodyPropertyName)
//!   jcr:title: Intro         # any other key is a property
//!
//! # page-and-content: the content node lives below a page
//! page:
//!   path: /sites/foo/home
//!   type: jnt:page
//! content:
//!   subpath: area/intro
//! ```
//!
//! Both accept top-level `language` and `publish`, falling back to the
//! caller's defaults. Other top-level keys are ignored. Extra property values
//! are carried through unchecked; non-string values fail at upsert time.

use std::collections::BTreeMap;

use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_yaml::Mapping;

use crate::error::SchemaError;
use crate::sync::SyncDefaults;

/// Content node type used when `content.type` is absent.
pub const DEFAULT_CONTENT_TYPE: &str = "jnt:bigText";

/// Page node type used when `page.type` is absent.
pub const DEFAULT_PAGE_TYPE: &str = "jnt:page";

/// Property receiving the rendered HTML when `content.html` is absent.
pub const DEFAULT_BODY_PROPERTY: &str = "text";

/// Validated frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrontmatter {
    /// Page to upsert before the content, for page-and-content documents.
    pub page: Option<PageTarget>,
    pub content: ContentTarget,
    pub language: String,
    pub publish: bool,
}

/// Page node declared by a page-and-content document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTarget {
    pub path: String,
    pub primary_type: String,
    pub properties: BTreeMap<String, Value>,
}

/// Content node receiving the rendered HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTarget {
    /// Absolute path, already joined with the page path if there is one.
    pub path: String,
    pub primary_type: String,
    /// Name of the property holding the rendered HTML.
    pub body_property: String,
    /// Extra properties, carried through from the frontmatter.
    pub extra: BTreeMap<String, Value>,
}

impl ContentTarget {
    /// Full property set: the extras plus the body property.
    ///
    /// The body property wins over an extra with the same name.
    #[must_use]
    pub fn properties(&self, html: &str) -> BTreeMap<String, Value> {
        let mut properties = self.extra.clone();
        properties.insert(self.body_property.clone(), Value::String(html.to_owned()));
        properties
    }
}

#[derive(Deserialize)]
struct ContentOnlyShape {
    content: AbsoluteContent,
    page: Option<IgnoredAny>,
}

#[derive(Deserialize)]
struct AbsoluteContent {
    path: String,
    #[serde(rename = "type")]
    primary_type: Option<String>,
    #[serde(alias = "bodyPropertyName")]
    html: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct PageAndContentShape {
    page: PageSection,
    content: RelativeContent,
}

#[derive(Deserialize)]
struct PageSection {
    path: String,
    #[serde(rename = "type")]
    primary_type: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RelativeContent {
    subpath: String,
    #[serde(rename = "type")]
    primary_type: Option<String>,
    #[serde(alias = "bodyPropertyName")]
    html: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct SharedFields {
    language: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    publish: Option<bool>,
}

/// Accept `true`/`false` as YAML booleans or strings.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(value)) => Ok(Some(value)),
        Some(Flag::Text(text)) => match text.trim() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("expected true or false, found {other:?}"))),
        },
    }
}

/// Validate raw frontmatter against the supported document shapes.
///
/// The content-only shape is tried first; a document with a `page` section
/// never matches it.
///
/// # Errors
///
/// Returns [`SchemaError::NoMatchingShape`] when neither shape validates and
/// [`SchemaError::InvalidField`] for bad `language`/`publish` values or
/// paths that are not absolute.
pub fn resolve_frontmatter(
    metadata: &Mapping,
    defaults: &SyncDefaults,
) -> Result<ResolvedFrontmatter, SchemaError> {
    let value = serde_yaml::Value::Mapping(metadata.clone());

    let shared: SharedFields =
        serde_yaml::from_value(value.clone()).map_err(|err| SchemaError::InvalidField {
            field: "language/publish",
            message: err.to_string(),
        })?;
    let language = shared
        .language
        .unwrap_or_else(|| defaults.language.clone());
    if language.trim().is_empty() {
        return Err(SchemaError::InvalidField {
            field: "language",
            message: "must not be empty".to_owned(),
        });
    }
    let publish = shared.publish.unwrap_or(defaults.publish);

    let (page, content) = match content_only(&value) {
        Ok(content) => (None, content),
        Err(content_only) => match page_and_content(&value) {
            Ok((page, content)) => (Some(page), content),
            Err(page_and_content) => {
                return Err(SchemaError::NoMatchingShape {
                    content_only,
                    page_and_content,
                });
            }
        },
    };

    if let Some(page) = &page {
        require_absolute("page.path", &page.path)?;
    } else {
        require_absolute("content.path", &content.path)?;
    }

    Ok(ResolvedFrontmatter {
        page,
        content,
        language,
        publish,
    })
}

fn content_only(value: &serde_yaml::Value) -> Result<ContentTarget, String> {
    let shape: ContentOnlyShape = serde_yaml::from_value(value.clone()).map_err(|e| e.to_string())?;
    if shape.page.is_some() {
        return Err("a `page` section is present".to_owned());
    }
    let content = shape.content;
    Ok(ContentTarget {
        path: trim_node_path(&content.path),
        primary_type: content
            .primary_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
        body_property: content
            .html
            .unwrap_or_else(|| DEFAULT_BODY_PROPERTY.to_owned()),
        extra: content.extra,
    })
}

fn page_and_content(value: &serde_yaml::Value) -> Result<(PageTarget, ContentTarget), String> {
    let shape: PageAndContentShape =
        serde_yaml::from_value(value.clone()).map_err(|e| e.to_string())?;

    let subpath = shape.content.subpath.trim_matches('/');
    if subpath.is_empty() {
        return Err("content.subpath must not be empty".to_owned());
    }

    let page_path = trim_node_path(&shape.page.path);
    let content = ContentTarget {
        path: join_node_path(&page_path, subpath),
        primary_type: shape
            .content
            .primary_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
        body_property: shape
            .content
            .html
            .unwrap_or_else(|| DEFAULT_BODY_PROPERTY.to_owned()),
        extra: shape.content.extra,
    };
    let page = PageTarget {
        path: page_path,
        primary_type: shape
            .page
            .primary_type
            .unwrap_or_else(|| DEFAULT_PAGE_TYPE.to_owned()),
        properties: shape.page.extra,
    };
    Ok((page, content))
}

/// Drop trailing slashes from a node path, keeping the root as `/`.
fn trim_node_path(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" if path.starts_with('/') => "/".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

/// Join a node path and a relative subpath with exactly one `/`.
fn join_node_path(base: &str, subpath: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        subpath.trim_matches('/')
    )
}

fn require_absolute(field: &'static str, path: &str) -> Result<(), SchemaError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(SchemaError::InvalidField {
            field,
            message: format!("path must be absolute, got {path:?}"),
        })
    }
}
