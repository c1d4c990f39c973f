//! Leading YAML metadata block extraction.
//!
//! A document may start with a `---` line, followed by YAML, followed by a
//! closing `---` (or `...`) line. Everything after the closing line is the
//! markdown body. The metadata is returned unvalidated.

use serde_yaml::{Mapping, Value};

use crate::RenderError;

/// A document split into its metadata block and markdown body.
#[derive(Debug)]
pub(crate) struct SplitDocument<'a> {
    /// Parsed metadata (empty when the document has no frontmatter).
    pub metadata: Mapping,
    /// Markdown body following the metadata block.
    pub body: &'a str,
    /// Number of source lines consumed by the metadata block.
    pub body_offset: usize,
}

/// Separate the leading metadata block from the body.
pub(crate) fn split(text: &str) -> Result<SplitDocument<'_>, RenderError> {
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(no_frontmatter(text));
    };
    if first.trim_end() != "---" {
        return Ok(no_frontmatter(text));
    }

    let yaml_start = first.len();
    let mut consumed = first.len();
    let mut line_count = 1;

    for line in lines {
        line_count += 1;
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            let yaml = &text[yaml_start..consumed];
            return Ok(SplitDocument {
                metadata: parse_metadata(yaml)?,
                body: &text[consumed + line.len()..],
                body_offset: line_count,
            });
        }
        consumed += line.len();
    }

    Err(RenderError::UnterminatedFrontmatter)
}

fn no_frontmatter(text: &str) -> SplitDocument<'_> {
    SplitDocument {
        metadata: Mapping::new(),
        body: text,
        body_offset: 0,
    }
}

fn parse_metadata(yaml: &str) -> Result<Mapping, RenderError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        // A block holding only comments parses as null.
        Value::Null => Ok(Mapping::new()),
        other => Err(RenderError::FrontmatterNotMapping {
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
