//! Markdown to CMS-ready HTML rendering.
//!
//! A document is rendered in stages:
//!
//! 1. The leading YAML frontmatter block is split from the body.
//! 2. Container directives (`:::info` ... `:::`) are resolved to alert
//!    containers; an unknown directive name fails the whole document.
//! 3. The body is rendered with pulldown-cmark and the result, including any
//!    embedded raw HTML, is parsed into an output tree.
//! 4. The [`Rewriter`] applies its ordered rules (image resolution, lightbox
//!    promotion, code normalization, link placeholders, alert spacing).
//! 5. The tree is serialized back to HTML.
//!
//! # Example
//!
//! ```
//! use url::Url;
//!
//! let base = Url::parse("http://example.com/docs/page.md").unwrap();
//! let rendered = mdpush_renderer::render("---\nok: true\n---\n# Hi\n", &base).unwrap();
//! assert_eq!(rendered.html, "<h1>Hi</h1>");
//! assert!(rendered.metadata.contains_key("ok"));
//! ```

mod convert;
pub mod directive;
mod error;
mod frontmatter;
pub mod rewrite;
mod serialize;
mod tree;

use serde_yaml::Mapping;
use tracing::debug;
use url::Url;

pub use directive::DirectiveResolver;
pub use error::RenderError;
pub use rewrite::{Rewrite, Rewriter, Rule, RuleContext};
pub use serialize::to_html;
pub use tree::{Element, Node};

/// Output of rendering one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Serialized HTML body, with top-level blocks separated by newlines.
    pub html: String,
    /// Raw frontmatter mapping, not validated.
    pub metadata: Mapping,
}

/// Render a document with the standard directives and rewrite rules.
///
/// `base_url` is the location of the source document; relative image
/// sources are resolved against it.
pub fn render(text: &str, base_url: &Url) -> Result<Rendered, RenderError> {
    Renderer::default().render(text, base_url)
}

/// Configurable rendering pipeline.
#[derive(Default)]
pub struct Renderer {
    directives: DirectiveResolver,
    rewriter: Rewriter,
}

impl Renderer {
    /// Replace the directive resolver.
    #[must_use]
    pub fn with_directives(mut self, directives: DirectiveResolver) -> Self {
        self.directives = directives;
        self
    }

    /// Replace the rewrite rule set.
    #[must_use]
    pub fn with_rewriter(mut self, rewriter: Rewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Render a document.
    ///
    /// No HTML is produced when any stage fails.
    pub fn render(&self, text: &str, base_url: &Url) -> Result<Rendered, RenderError> {
        let document = frontmatter::split(text)?;
        let resolved = self
            .directives
            .resolve(document.body, document.body_offset)?;

        let html = convert::markdown_to_html(&resolved);
        let tree = convert::html_to_tree(&html);
        let tree = self.rewriter.rewrite(tree, base_url);
        let html = serialize::to_html(&tree.children).trim().to_owned();

        debug!(base = %base_url, bytes = html.len(), "rendered document");
        Ok(Rendered {
            html,
            metadata: document.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    fn base() -> Url {
        Url::parse("http://example.com/path/to/file.md").unwrap()
    }

    const FEATURES: &str = r#"---
ok: true
---

# Hello World!

Relative image path: ![alt text](relative.png)

![lone images will be lightboxed](lightbox.png)

```tsx
// Code blocks are trimmed
// tsx is changed to js
```

CMS links are un-escaped: [nice page](/cms/{mode}/{lang}/whatever)

<details><summary>Raw HTML</summary>

I'm hidden right?

</details>

<p>Test raw HTML processing <img src="/absolute.png" alt="" /></p>

:::success
I'm green
:::
:::danger
I'm red
:::
:::warning
I'm orange
:::
:::info
I'm blue
:::

Ensure some directives are NOT processed:

Open localhost:8080.

::ignore
"#;

    #[test]
    fn test_all_custom_features() {
        let rendered = render(FEATURES, &base()).unwrap();
        let html = rendered.html;

        assert_eq!(rendered.metadata.get("ok"), Some(&Value::Bool(true)));
        assert!(html.starts_with("<h1>Hello World!</h1>\n"), "{html}");
        assert!(html.contains(
            r#"<p>Relative image path: <img src="http://example.com/path/to/relative.png" alt="alt text"></p>"#
        ));
        assert!(html.contains(concat!(
            r#"<figure class="figure"><a href="http://example.com/path/to/lightbox.png" data-toggle="lightbox" data-gallery="doc-images">"#,
            r#"<img src="http://example.com/path/to/lightbox.png" alt="lone images will be lightboxed" class="figure-img img-fluid rounded shadow">"#,
            "</a></figure>"
        )));
        assert!(html.contains(
            "<pre><code class=\"language-js\">// Code blocks are trimmed\n// tsx is changed to js</code></pre>"
        ));
        assert!(html.contains(
            r#"<p>CMS links are un-escaped: <a href="/cms/{mode}/{lang}/whatever">nice page</a></p>"#
        ));
        assert!(html.contains("<details><summary>Raw HTML</summary>"));
        assert!(html.contains("<p>I'm hidden right?</p>\n</details>"));
        assert!(html.contains(
            r#"<p>Test raw HTML processing <img src="http://example.com/absolute.png" alt=""></p>"#
        ));
        for (kind, text) in [
            ("success", "I'm green"),
            ("danger", "I'm red"),
            ("warning", "I'm orange"),
            ("info", "I'm blue"),
        ] {
            assert!(
                html.contains(&format!(
                    "<div class=\"alert alert-{kind}\"><p style=\"margin-bottom: 0\">{text}</p></div>"
                )),
                "{kind}: {html}"
            );
        }
        assert!(html.contains("<p>Ensure some directives are NOT processed:</p>"));
        assert!(html.contains("<p>Open localhost:8080.</p>"));
        assert!(html.ends_with("<p>::ignore</p>"));
    }

    #[test]
    fn test_heading_only() {
        let rendered = render("# Hi", &base()).unwrap();
        assert_eq!(rendered.html, "<h1>Hi</h1>");
        assert!(rendered.metadata.is_empty());
    }

    #[test]
    fn test_unknown_directive_fails_document() {
        let err = render("---\nok: true\n---\n\n:::tip\nx\n:::\n", &base()).unwrap_err();
        match err {
            RenderError::UnknownDirective { name, line } => {
                assert_eq!(name, "tip");
                assert_eq!(line, 5);
            }
            other => panic!("expected UnknownDirective, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_frontmatter_fails_document() {
        let err = render("---\ntitle: x\n", &base()).unwrap_err();
        assert!(matches!(err, RenderError::UnterminatedFrontmatter));
    }

    #[test]
    fn test_custom_rewriter() {
        let renderer = Renderer::default().with_rewriter(Rewriter::new());
        let rendered = renderer.render("![a](a.png)", &base()).unwrap();
        assert_eq!(rendered.html, r#"<p><img src="a.png" alt="a"></p>"#);
    }

    #[test]
    fn test_custom_directives() {
        let renderer = Renderer::default().with_directives(DirectiveResolver::new());
        assert!(renderer.render(":::info\nx\n:::", &base()).is_err());
    }

    #[test]
    fn test_alert_with_two_paragraphs() {
        let rendered = render(":::warning\nFirst\n\nSecond\n:::\n", &base()).unwrap();
        assert_eq!(
            rendered.html,
            "<div class=\"alert alert-warning\"><p>First</p><p style=\"margin-bottom: 0\">Second</p></div>"
        );
    }

    #[test]
    fn test_alert_ending_with_lone_image() {
        let rendered = render(":::info\nText\n\n![a](a.png)\n:::\n", &base()).unwrap();
        assert_eq!(
            rendered.html,
            concat!(
                r#"<div class="alert alert-info"><p style="margin-bottom: 0">Text</p>"#,
                r#"<figure class="figure"><a href="http://example.com/path/to/a.png" data-toggle="lightbox" data-gallery="doc-images">"#,
                r#"<img src="http://example.com/path/to/a.png" alt="a" class="figure-img img-fluid rounded shadow">"#,
                "</a></figure></div>"
            )
        );
    }

    #[test]
    fn test_directive_example_in_indented_code() {
        let rendered =
            render("Example syntax:\n\n    :::tip\n    text\n    :::\n", &base()).unwrap();
        assert_eq!(
            rendered.html,
            "<p>Example syntax:</p>\n<pre><code>:::tip\ntext\n:::</code></pre>"
        );
    }

    #[test]
    fn test_directive_in_html_comment() {
        let rendered = render("<!--\n:::todo\nlater\n:::\n-->\n\nBody\n", &base()).unwrap();
        assert!(rendered.html.starts_with("<!--\n:::todo\nlater\n:::\n-->"));
        assert!(rendered.html.ends_with("<p>Body</p>"));
    }

    #[test]
    fn test_unknown_directive_in_blockquote_fails_document() {
        let err = render("> :::tip\n> x\n> :::\n", &base()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnknownDirective { ref name, line: 1 } if name == "tip"
        ));
    }

    #[test]
    fn test_alert_in_blockquote() {
        let html = render("> :::info\n> x\n> :::\n", &base()).unwrap().html;
        let quote = html.find("<blockquote>").unwrap();
        let alert = html
            .find(r#"<div class="alert alert-info"><p style="margin-bottom: 0">x</p></div>"#)
            .unwrap();
        assert!(quote < alert && alert < html.find("</blockquote>").unwrap(), "{html}");
    }

    #[test]
    fn test_alert_in_list_item_keeps_list() {
        let html = render("- item\n\n  :::info\n  inside\n  :::\n\n- next\n", &base())
            .unwrap()
            .html;
        assert_eq!(html.matches("<ul>").count(), 1, "{html}");
        let alert = html.find(r#"<div class="alert alert-info">"#).unwrap();
        assert!(alert < html.find("</li>").unwrap(), "{html}");
        assert!(html.contains("<p>next</p>"));
    }
}
