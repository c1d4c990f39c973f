//! The standard rewrite rules.

use tracing::warn;
use url::Url;

use super::{Rewrite, RuleContext};
use crate::tree::{Element, Node};

/// Classes added to a promoted lightbox image.
const FIGURE_IMAGE_CLASSES: [&str; 4] = ["figure-img", "img-fluid", "rounded", "shadow"];

/// Template tokens the destination resolves at render time.
const PLACEHOLDER_TOKENS: [&str; 2] = ["mode", "lang"];

/// Resolve a relative `img` source against the document base URL.
///
/// Sources carrying a scheme or a host (`https://...`, `data:...`,
/// `//cdn...`) are left alone, as are empty ones.
pub fn resolve_image_source(node: &Node, ctx: &RuleContext<'_>) -> Rewrite {
    let Some(img) = node.as_element().filter(|el| el.tag == "img") else {
        return Rewrite::Keep;
    };
    let Some(src) = img.attr("src") else {
        return Rewrite::Keep;
    };
    if src.trim().is_empty() || src.starts_with("//") || Url::parse(src).is_ok() {
        return Rewrite::Keep;
    }

    match ctx.base_url.join(src) {
        Ok(resolved) => {
            let mut img = img.clone();
            img.set_attr("src", resolved.as_str());
            Rewrite::Replace(img.into())
        }
        Err(err) => {
            warn!(src, base = %ctx.base_url, error = %err, "cannot resolve image source");
            Rewrite::Keep
        }
    }
}

/// Promote a paragraph holding nothing but an image to a lightbox figure.
///
/// ```text
/// <p><img src=S></p>
///   => <figure class="figure"><a href=S data-toggle="lightbox" data-gallery="doc-images">
///        <img src=S class="figure-img img-fluid rounded shadow"></a></figure>
/// ```
pub fn promote_lightbox(node: &Node, _ctx: &RuleContext<'_>) -> Rewrite {
    let Some(p) = node.as_element().filter(|el| el.tag == "p" && el.attrs.is_empty()) else {
        return Rewrite::Keep;
    };
    let [Node::Element(img)] = p.children.as_slice() else {
        return Rewrite::Keep;
    };
    if img.tag != "img" {
        return Rewrite::Keep;
    }
    let Some(src) = img.attr("src") else {
        return Rewrite::Keep;
    };

    let mut img = img.clone();
    let classes: Vec<String> = img
        .classes()
        .chain(FIGURE_IMAGE_CLASSES)
        .map(str::to_owned)
        .collect();
    img.set_classes(classes);

    let link = Element::new("a")
        .with_attr("href", src)
        .with_attr("data-toggle", "lightbox")
        .with_attr("data-gallery", "doc-images")
        .with_child(img);
    let figure = Element::new("figure")
        .with_attr("class", "figure")
        .with_child(link);
    Rewrite::Replace(figure.into())
}

/// Trim a `code` element's sole text child and map TypeScript language
/// classes to `language-js`.
pub fn normalize_code(node: &Node, _ctx: &RuleContext<'_>) -> Rewrite {
    let Some(code) = node.as_element().filter(|el| el.tag == "code") else {
        return Rewrite::Keep;
    };

    let mut updated = code.clone();
    let mut changed = false;

    if let [Node::Text(text)] = updated.children.as_mut_slice() {
        let trimmed = text.trim().to_owned();
        if trimmed.len() != text.len() {
            *text = trimmed;
            changed = true;
        }
    }

    if code
        .classes()
        .any(|c| c == "language-ts" || c == "language-tsx")
    {
        let classes: Vec<&str> = code
            .classes()
            .map(|c| match c {
                "language-ts" | "language-tsx" => "language-js",
                other => other,
            })
            .collect();
        updated.set_classes(classes);
        changed = true;
    }

    if changed {
        Rewrite::Replace(updated.into())
    } else {
        Rewrite::Keep
    }
}

/// Decode percent-encoded `{mode}` and `{lang}` tokens in link targets.
pub fn restore_link_placeholders(node: &Node, _ctx: &RuleContext<'_>) -> Rewrite {
    let Some(link) = node.as_element().filter(|el| el.tag == "a") else {
        return Rewrite::Keep;
    };
    let Some(restored) = link.attr("href").and_then(decode_placeholders) else {
        return Rewrite::Keep;
    };

    let mut link = link.clone();
    link.set_attr("href", restored);
    Rewrite::Replace(link.into())
}

/// Tighten an alert container: drop whitespace-only text between its
/// children and give its last paragraph a zero bottom margin.
///
/// The rule fires on the container, after its children were rewritten, so a
/// paragraph already promoted to a lightbox figure no longer counts as a
/// paragraph.
pub fn fix_alert_spacing(node: &Node, _ctx: &RuleContext<'_>) -> Rewrite {
    let Some(original) = node
        .as_element()
        .filter(|el| el.tag == "div" && el.has_class("alert"))
    else {
        return Rewrite::Keep;
    };

    let mut alert = original.clone();
    alert
        .children
        .retain(|child| !matches!(child, Node::Text(text) if text.trim().is_empty()));

    let last_paragraph = alert.children.iter_mut().rev().find_map(|child| match child {
        Node::Element(el) if el.tag == "p" => Some(el),
        _ => None,
    });
    if let Some(p) = last_paragraph {
        let style = match p.attr("style").map(str::trim) {
            Some(existing) if !existing.is_empty() => {
                format!("{}; margin-bottom: 0", existing.trim_end_matches(';'))
            }
            _ => "margin-bottom: 0".to_owned(),
        };
        p.set_attr("style", style);
    }

    if alert == *original {
        Rewrite::Keep
    } else {
        Rewrite::Replace(alert.into())
    }
}

/// Replace `%7Btoken%7D` (hex digits in either case) with `{token}`.
///
/// Returns `None` when the input holds no encoded placeholder.
fn decode_placeholders(href: &str) -> Option<String> {
    let mut out = String::with_capacity(href.len());
    let mut rest = href;
    let mut changed = false;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        match match_placeholder(tail) {
            Some((token, consumed)) => {
                out.push('{');
                out.push_str(token);
                out.push('}');
                rest = &tail[consumed..];
                changed = true;
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    changed.then_some(out)
}

/// Match an encoded placeholder at the start of `tail`, returning the token
/// and the number of bytes it spans.
fn match_placeholder(tail: &str) -> Option<(&'static str, usize)> {
    let inner = strip_prefix_ignore_case(tail, "%7B")?;
    PLACEHOLDER_TOKENS.into_iter().find_map(|token| {
        let after = inner.strip_prefix(token)?;
        let end = strip_prefix_ignore_case(after, "%7D")?;
        Some((token, tail.len() - end.len()))
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
