//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod sync;

pub(crate) use render::RenderArgs;
pub(crate) use sync::SyncArgs;

use std::path::{Component, Path};

use url::Url;

/// Base URL of a document, used to resolve its relative image sources.
///
/// With a prefix, the document's relative path is joined onto it (a missing
/// trailing `/` is added). Without one, the document's absolute `file://`
/// URL is used.
pub(crate) fn document_base_url(prefix: Option<&str>, path: &Path) -> Result<Url, String> {
    match prefix {
        Some(prefix) => {
            let mut prefix = prefix.to_owned();
            if !prefix.ends_with('/') {
                prefix.push('/');
            }
            let base =
                Url::parse(&prefix).map_err(|e| format!("invalid base URL {prefix:?}: {e}"))?;
            base.join(&url_path(path))
                .map_err(|e| format!("cannot join {} onto {prefix}: {e}", path.display()))
        }
        None => {
            let absolute = std::path::absolute(path)
                .map_err(|e| format!("cannot resolve {}: {e}", path.display()))?;
            Url::from_file_path(&absolute)
                .map_err(|()| format!("cannot build file URL for {}", absolute.display()))
        }
    }
}

/// Relative path with `/` separators, skipping `.` components.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
