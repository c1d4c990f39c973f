//! Container directive line grammar.
//!
//! - opening: three or more colons, a name, optional `[label]`, optional
//!   `{attributes}`, then nothing but whitespace
//! - closing: three or more colons alone on the line
//!
//! Names start with an ASCII letter and continue with letters, digits,
//! `-` or `_`. Labels and attributes are accepted for grammar purposes but
//! not interpreted.

/// Parsed container directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedDirective {
    /// Opening marker: `:::name[label]{attrs}`
    ContainerStart { name: String, colon_count: usize },
    /// Closing marker: `:::`
    ContainerEnd { colon_count: usize },
}

/// Parse a whole line as a container directive marker.
///
/// Returns `None` for anything that does not satisfy the grammar; such lines
/// are ordinary markdown.
pub(crate) fn parse_container_line(line: &str) -> Option<ParsedDirective> {
    let trimmed = line.trim();

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    if colon_count < 3 {
        return None;
    }

    let after_colons = trimmed[colon_count..].trim_start();
    if after_colons.is_empty() {
        return Some(ParsedDirective::ContainerEnd { colon_count });
    }

    let name_end = after_colons
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let rest = &after_colons[name_end..];
    let rest = skip_balanced(rest, '[', ']')?;
    let rest = skip_balanced(rest, '{', '}')?;
    if !rest.trim().is_empty() {
        return None;
    }

    Some(ParsedDirective::ContainerStart {
        name: name.to_owned(),
        colon_count,
    })
}

/// Skip an optional balanced `open ... close` group at the start of `s`.
///
/// Returns the remainder, or `None` if the group is opened but never closed.
fn skip_balanced(s: &str, open: char, close: char) -> Option<&str> {
    if !s.starts_with(open) {
        return Some(s);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&s[i + c.len_utf8()..]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, colon_count: usize) -> Option<ParsedDirective> {
        Some(ParsedDirective::ContainerStart {
            name: name.to_owned(),
            colon_count,
        })
    }

    #[test]
    fn test_container_start() {
        assert_eq!(parse_container_line(":::success"), start("success", 3));
        assert_eq!(parse_container_line("::: info  "), start("info", 3));
        assert_eq!(parse_container_line("::::warning"), start("warning", 4));
    }

    #[test]
    fn test_container_start_with_label_and_attrs() {
        assert_eq!(
            parse_container_line(r#":::info[Read this [first]]{#tip .wide title="x"}"#),
            start("info", 3)
        );
    }

    #[test]
    fn test_container_end() {
        assert_eq!(
            parse_container_line(":::"),
            Some(ParsedDirective::ContainerEnd { colon_count: 3 })
        );
        assert_eq!(
            parse_container_line("  :::::  "),
            Some(ParsedDirective::ContainerEnd { colon_count: 5 })
        );
    }

    #[test]
    fn test_two_colons_is_not_a_container() {
        assert_eq!(parse_container_line("::ignore"), None);
        assert_eq!(parse_container_line("::"), None);
    }

    #[test]
    fn test_trailing_text_is_not_a_container() {
        assert_eq!(parse_container_line(":::info and some prose"), None);
        assert_eq!(parse_container_line(":::info[unclosed label"), None);
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(parse_container_line(":::1st"), None);
        assert_eq!(parse_container_line(":::-dash"), None);
        assert_eq!(parse_container_line(":::[label]"), None);
        assert_eq!(parse_container_line(":::foo@bar"), None);
    }

    #[test]
    fn test_not_a_directive() {
        assert_eq!(parse_container_line("Open localhost:8080."), None);
        assert_eq!(parse_container_line(""), None);
    }
}
