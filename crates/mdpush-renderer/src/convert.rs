//! Markdown to output tree conversion.
//!
//! pulldown-cmark renders the directive-resolved markdown to HTML with raw
//! markup passed through untouched. The result is then parsed by an HTML5
//! parser, so raw tags spanning several markdown blocks (`<details>` around
//! paragraphs, for instance) become real elements instead of escaped text.

use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{NodeData, NodeRef};
use pulldown_cmark::{Options, Parser};

use crate::tree::{Element, Node};

/// Parser options: GitHub Flavored Markdown.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Render markdown to HTML, passing embedded raw HTML through verbatim.
pub(crate) fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut html = String::with_capacity(markdown.len() + markdown.len() / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Parse an HTML fragment into a tree rooted at a synthetic `body` element.
pub(crate) fn html_to_tree(html: &str) -> Element {
    // A full document shell keeps head-only tags (`<style>`, `<meta>`) and
    // leading comments inside body.
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let document = kuchikikiki::parse_html().one(wrapped.as_str());

    let mut root = Element::new("body");
    let body = document.descendants().find(|node| {
        node.as_element()
            .is_some_and(|el| &*el.name.local == "body")
    });
    if let Some(body) = body {
        root.children = convert_children(&body);
    }
    root
}

fn convert_children(node: &NodeRef) -> Vec<Node> {
    node.children().filter_map(|child| convert_node(&child)).collect()
}

fn convert_node(node: &NodeRef) -> Option<Node> {
    match node.data() {
        NodeData::Element(el) => {
            let attrs = el
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attr)| {
                    let key = match &attr.prefix {
                        Some(prefix) => format!("{prefix}:{}", name.local),
                        None => name.local.to_string(),
                    };
                    (key, attr.value.clone())
                })
                .collect();
            let children = match &el.template_contents {
                Some(contents) => convert_children(contents),
                None => convert_children(node),
            };
            Some(Node::Element(Element {
                tag: el.name.local.to_string(),
                attrs,
                children,
            }))
        }
        NodeData::Text(text) => Some(Node::Text(text.borrow().clone())),
        NodeData::Comment(text) => Some(Node::Raw(format!("<!--{}-->", text.borrow()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markdown_to_html_keeps_raw_html() {
        let html = markdown_to_html("<details><summary>More</summary>\n\nHidden\n\n</details>\n");
        assert!(html.contains("<details><summary>More</summary>"));
        assert!(html.contains("<p>Hidden</p>"));
    }

    #[test]
    fn test_markdown_to_html_code_language_class() {
        let html = markdown_to_html("```tsx\nconst a = 1;\n```\n");
        assert!(html.contains(r#"<code class="language-tsx">"#));
    }

    #[test]
    fn test_html_to_tree_heading() {
        let root = html_to_tree("<h1>Hi</h1>\n");
        assert_eq!(root.tag, "body");
        assert_eq!(
            root.children,
            vec![
                Node::Element(Element::new("h1").with_child(Node::Text("Hi".to_owned()))),
                Node::Text("\n".to_owned()),
            ]
        );
    }

    #[test]
    fn test_raw_block_spanning_markdown_becomes_element() {
        let html = markdown_to_html("<details><summary>More</summary>\n\nHidden\n\n</details>\n");
        let root = html_to_tree(&html);
        let details = root.element_children().next().unwrap();
        assert_eq!(details.tag, "details");
        let tags: Vec<&str> = details.element_children().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, vec!["summary", "p"]);
    }

    #[test]
    fn test_attributes_and_comments() {
        let root = html_to_tree(r#"<!-- note --><img src="a.png" alt="">"#);
        assert_eq!(root.children[0], Node::Raw("<!-- note -->".to_owned()));
        let img = root.children[1].as_element().unwrap();
        assert_eq!(img.attr("src"), Some("a.png"));
        assert_eq!(img.attr("alt"), Some(""));
    }
}
