//! Locating directive markers through the markdown block structure.
//!
//! The source is parsed once with the same options used for rendering. A
//! marker is only recognized at the start of a line of paragraph text, so
//! `:::` inside code blocks, HTML blocks, comments, headings or tables is
//! ignored, while markers nested in blockquotes and list items are found
//! together with the container prefix they sit behind.

use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::parser::{ParsedDirective, parse_container_line};
use crate::convert::parser_options;

/// A directive marker found at the start of a paragraph line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkerLine<'a> {
    /// Byte range of the whole source line, newline included.
    pub line: Range<usize>,
    /// Source text between the line start and the marker: blockquote
    /// markers, list markers and indentation.
    pub prefix: &'a str,
    /// Whether the marker is on the first line of its paragraph.
    pub opens_paragraph: bool,
    pub directive: ParsedDirective,
}

impl MarkerLine<'_> {
    /// Prefix that continues the enclosing containers on a following line:
    /// blockquote markers are kept, list markers become indentation.
    pub fn continuation(&self) -> String {
        self.prefix
            .chars()
            .map(|c| if c == '>' || c.is_whitespace() { c } else { ' ' })
            .collect()
    }
}

/// Scan `body` for directive marker lines, in source order.
pub(crate) fn marker_lines(body: &str) -> Vec<MarkerLine<'_>> {
    let mut markers = Vec::new();
    let mut line_start = false;
    let mut first_line = false;
    let mut inline_depth = 0usize;

    for (event, range) in Parser::new_ext(body, parser_options()).into_offset_iter() {
        match event {
            // Tight list items carry their text without a paragraph.
            Event::Start(Tag::Paragraph | Tag::Item) => {
                line_start = true;
                first_line = true;
                inline_depth = 0;
            }
            Event::Start(tag) if is_inline(&tag) => {
                if std::mem::take(&mut line_start) {
                    markers.extend(marker_at(body, range.start, first_line));
                }
                inline_depth += 1;
            }
            Event::End(end) if is_inline_end(end) => {
                inline_depth = inline_depth.saturating_sub(1);
            }
            Event::Start(_) | Event::End(_) | Event::Html(_) => line_start = false,
            Event::SoftBreak | Event::HardBreak => {
                if inline_depth == 0 {
                    line_start = true;
                    first_line = false;
                }
            }
            _ => {
                if std::mem::take(&mut line_start) {
                    markers.extend(marker_at(body, range.start, first_line));
                }
            }
        }
    }
    markers
}

fn is_inline(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(end: TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

/// Parse the rest of the source line starting at `offset` as a marker.
fn marker_at(body: &str, offset: usize, opens_paragraph: bool) -> Option<MarkerLine<'_>> {
    let start = body[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = body[offset..]
        .find('\n')
        .map_or(body.len(), |i| offset + i + 1);
    let directive = parse_container_line(&body[offset..end])?;
    Some(MarkerLine {
        line: start..end,
        prefix: &body[start..offset],
        opens_paragraph,
        directive,
    })
}
