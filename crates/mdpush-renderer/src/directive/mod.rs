//! Container directives: `:::name` ... `:::`.
//!
//! Directives are resolved on the markdown source before it is rendered.
//! Markers are located through pulldown-cmark's block structure: only the
//! start of a paragraph line counts, so examples inside code blocks, HTML
//! blocks and comments are left alone, and markers inside blockquotes and
//! list items are honored. Each recognized directive is replaced by the
//! opening and closing tags of its [`RenderHint`], written behind the same
//! container prefix and padded with blank lines so the enclosed lines are
//! still parsed as markdown blocks.
//!
//! An opening line with a name that has no registered handler aborts the
//! document. Lines that do not satisfy the full container grammar (for
//! example `::ignore` with only two colons) are left untouched.
//!
//! # Example
//!
//! ```
//! use mdpush_renderer::directive::DirectiveResolver;
//!
//! let resolver = DirectiveResolver::default();
//! let markdown = resolver.resolve(":::info\nHeads up\n:::\n", 0).unwrap();
//! assert!(markdown.contains(r#"<div class="alert alert-info">"#));
//! assert!(resolver.resolve(":::note\nNope\n:::\n", 0).is_err());
//! ```

mod alert;
mod parser;
mod resolver;
mod scan;

pub use alert::{AlertDirective, AlertKind};
pub use resolver::DirectiveResolver;

/// How a resolved directive is rendered: a block element with classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderHint {
    /// Element name of the container.
    pub tag: &'static str,
    /// Class list of the container.
    pub classes: Vec<String>,
}

impl RenderHint {
    /// Opening tag, e.g. `<div class="alert alert-info">`.
    #[must_use]
    pub fn open_tag(&self) -> String {
        if self.classes.is_empty() {
            return format!("<{}>", self.tag);
        }
        let classes = self.classes.join(" ");
        format!(
            r#"<{} class="{}">"#,
            self.tag,
            html_escape::encode_double_quoted_attribute(&classes)
        )
    }

    /// Closing tag, e.g. `</div>`.
    #[must_use]
    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Handler for one container directive name.
///
/// Handlers are stateless: the resolver owns nesting and line tracking.
pub trait ContainerDirective: Send + Sync {
    /// Directive name matched against `:::name`.
    fn name(&self) -> &str;

    /// Rendering hint for the container element.
    fn hint(&self) -> RenderHint;
}
