//! Container directive resolution.

use tracing::debug;

use crate::RenderError;

use super::parser::ParsedDirective;
use super::scan::{MarkerLine, marker_lines};
use super::{AlertDirective, AlertKind, ContainerDirective, RenderHint};

/// A container whose closing marker has not been seen yet.
struct OpenContainer {
    hint: RenderHint,
    colon_count: usize,
}

/// Replaces container directives in markdown source with their rendering
/// hints.
///
/// [`DirectiveResolver::default`] registers the four alert directives.
pub struct DirectiveResolver {
    handlers: Vec<Box<dyn ContainerDirective>>,
}

impl Default for DirectiveResolver {
    fn default() -> Self {
        AlertKind::ALL
            .into_iter()
            .fold(Self::new(), |resolver, kind| {
                resolver.with_container(AlertDirective::new(kind))
            })
    }
}

impl DirectiveResolver {
    /// Create a resolver with no registered directives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a container directive handler.
    #[must_use]
    pub fn with_container<D: ContainerDirective + 'static>(mut self, handler: D) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Resolve all container directives in `body`.
    ///
    /// `line_offset` is the number of source lines preceding `body` (the
    /// frontmatter block) and only affects reported line numbers.
    ///
    /// Markers are only recognized at the start of a line of paragraph
    /// text, including paragraphs inside blockquotes and list items.
    /// Containers still open at the end of the body are closed implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownDirective`] for an opening marker whose
    /// name has no handler.
    pub fn resolve(&self, body: &str, line_offset: usize) -> Result<String, RenderError> {
        let mut output = String::with_capacity(body.len() + 64);
        let mut cursor = 0;
        let mut open: Vec<OpenContainer> = Vec::new();

        for marker in marker_lines(body) {
            let tag = match &marker.directive {
                ParsedDirective::ContainerStart { name, colon_count } => {
                    let line_num =
                        line_offset + body[..marker.line.start].matches('\n').count() + 1;
                    let handler = self
                        .handlers
                        .iter()
                        .find(|h| h.name() == name)
                        .ok_or_else(|| RenderError::UnknownDirective {
                            name: name.clone(),
                            line: line_num,
                        })?;
                    let hint = handler.hint();
                    debug!(directive = %name, line = line_num, "resolved container directive");

                    let tag = hint.open_tag();
                    open.push(OpenContainer {
                        hint,
                        colon_count: *colon_count,
                    });
                    tag
                }
                ParsedDirective::ContainerEnd { colon_count } => {
                    match open.pop_if(|top| *colon_count >= top.colon_count) {
                        Some(top) => top.hint.close_tag(),
                        None => continue,
                    }
                }
            };

            output.push_str(&body[cursor..marker.line.start]);
            push_block_tag(&mut output, &marker, &tag);
            cursor = marker.line.end;
        }
        output.push_str(&body[cursor..]);

        if !open.is_empty() && !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        while let Some(top) = open.pop() {
            output.push('\n');
            output.push_str(&top.hint.close_tag());
            output.push_str("\n\n");
        }

        Ok(output)
    }
}

/// Emit a tag in place of a marker line, behind the marker's container
/// prefix and surrounded by blank lines so the neighbouring markdown is
/// parsed as separate blocks.
fn push_block_tag(output: &mut String, marker: &MarkerLine<'_>, tag: &str) {
    let continuation = marker.continuation();
    let blank = continuation.trim_end();
    if !marker.opens_paragraph {
        output.push_str(blank);
        output.push('\n');
    }
    output.push_str(marker.prefix);
    output.push_str(tag);
    output.push('\n');
    output.push_str(blank);
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alert_is_replaced_by_container() {
        let output = DirectiveResolver::default()
            .resolve(":::success\nI'm green\n:::\n", 0)
            .unwrap();
        assert_eq!(
            output,
            "<div class=\"alert alert-success\">\n\nI'm green\n\n</div>\n\n"
        );
    }

    #[test]
    fn test_unknown_directive_is_an_error_with_line() {
        let err = DirectiveResolver::default()
            .resolve("Intro\n\n:::tip\nText\n:::\n", 4)
            .unwrap_err();
        match err {
            RenderError::UnknownDirective { name, line } => {
                assert_eq!(name, "tip");
                assert_eq!(line, 7);
            }
            other => panic!("expected UnknownDirective, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_resolver_rejects_alerts() {
        let result = DirectiveResolver::new().resolve(":::info\nx\n:::\n", 0);
        assert!(matches!(result, Err(RenderError::UnknownDirective { .. })));
    }

    #[test]
    fn test_near_miss_passes_through() {
        let input =
            "Ensure some directives are NOT processed:\n\nOpen localhost:8080.\n\n::ignore\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_directives_in_code_fence_are_ignored() {
        let input = "```md\n:::nonsense\n:::\n```\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_stray_closing_marker_passes_through() {
        let output = DirectiveResolver::default().resolve(":::\n", 0).unwrap();
        assert_eq!(output, ":::\n");
    }

    #[test]
    fn test_nested_containers() {
        let input = "::::warning\nOuter\n:::info\nInner\n:::\n::::\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        let outer_open = output.find("alert-warning").unwrap();
        let inner_open = output.find("alert-info").unwrap();
        assert!(outer_open < inner_open);
        assert_eq!(output.matches("</div>").count(), 2);
    }

    #[test]
    fn test_short_closing_marker_does_not_close_longer_opening() {
        let input = "::::info\nText\n:::\nMore\n::::\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        assert!(output.contains("Text\n:::\nMore"));
        assert_eq!(output.matches("</div>").count(), 1);
    }

    #[test]
    fn test_indented_code_example_is_not_resolved() {
        let input = "Example syntax:\n\n    :::tip\n    text\n    :::\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_html_comment_is_not_resolved() {
        let input = "<!--\n:::todo\nlater\n:::\n-->\n\nBody\n";
        let output = DirectiveResolver::default().resolve(input, 0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_unknown_directive_in_blockquote_is_an_error() {
        let err = DirectiveResolver::default()
            .resolve("> quoted\n>\n> :::tip\n> x\n> :::\n", 0)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnknownDirective { ref name, line: 3 } if name == "tip"
        ));
    }

    #[test]
    fn test_blockquote_container_keeps_quote_markers() {
        let output = DirectiveResolver::default()
            .resolve("> :::info\n> x\n> :::\n", 0)
            .unwrap();
        assert_eq!(
            output,
            "> <div class=\"alert alert-info\">\n>\n> x\n>\n> </div>\n>\n"
        );
    }

    #[test]
    fn test_list_item_container_is_indented() {
        let output = DirectiveResolver::default()
            .resolve("- item\n\n  :::info\n  inside\n  :::\n\n- next\n", 0)
            .unwrap();
        assert_eq!(
            output,
            "- item\n\n  <div class=\"alert alert-info\">\n\n  inside\n\n  </div>\n\n\n- next\n"
        );
    }

    #[test]
    fn test_unclosed_container_is_closed_at_end() {
        let output = DirectiveResolver::default()
            .resolve(":::danger\nRunaway", 0)
            .unwrap();
        assert!(output.ends_with("</div>\n\n"));
    }
}
