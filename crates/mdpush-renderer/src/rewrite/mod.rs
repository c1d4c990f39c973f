//! Post-render rewriting of the output tree.
//!
//! Rules are pure functions from a node and its surroundings to either
//! [`Rewrite::Keep`] or a replacement subtree. The [`Rewriter`] walks the
//! tree once, descendants first, so a rule looking at an element sees its
//! children already rewritten. For each node the rules run in order and each
//! one sees the output of the rules before it.
//!
//! Resolution-before-lightbox falls out of the walk order: an image's
//! source is rewritten while its paragraph's children are processed, before
//! the paragraph itself reaches the lightbox rule.

mod rules;

use tracing::debug;
use url::Url;

use crate::tree::{Element, Node};

pub use rules::{
    fix_alert_spacing, normalize_code, promote_lightbox, resolve_image_source,
    restore_link_placeholders,
};

/// Outcome of applying one rule to one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Leave the node as it is.
    Keep,
    /// Replace the node with a new subtree.
    Replace(Node),
}

/// Where a node sits while rules are applied to it.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Parent element, with children as they were before this sibling pass.
    pub parent: &'a Element,
    /// Index of the node in `parent.children`.
    pub position: usize,
    /// Base URL of the document being rendered.
    pub base_url: &'a Url,
}

/// A rewrite rule.
pub type Rule = fn(&Node, &RuleContext<'_>) -> Rewrite;

/// Ordered list of named rewrite rules.
pub struct Rewriter {
    rules: Vec<(&'static str, Rule)>,
}

impl Default for Rewriter {
    /// The standard rule set, in application order.
    fn default() -> Self {
        Self::new()
            .with_rule("resolve-image-source", resolve_image_source)
            .with_rule("promote-lightbox", promote_lightbox)
            .with_rule("normalize-code", normalize_code)
            .with_rule("restore-link-placeholders", restore_link_placeholders)
            .with_rule("fix-alert-spacing", fix_alert_spacing)
    }
}

impl Rewriter {
    /// Create a rewriter with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules run in the order they are added.
    #[must_use]
    pub fn with_rule(mut self, name: &'static str, rule: Rule) -> Self {
        self.rules.push((name, rule));
        self
    }

    /// Rewrite every descendant of `root`. The root itself is not matched.
    #[must_use]
    pub fn rewrite(&self, root: Element, base_url: &Url) -> Element {
        self.rewrite_element(root, base_url)
    }

    fn rewrite_element(&self, mut el: Element, base_url: &Url) -> Element {
        el.children = el
            .children
            .into_iter()
            .map(|child| match child {
                Node::Element(child) => Node::Element(self.rewrite_element(child, base_url)),
                other => other,
            })
            .collect();

        let replacements: Vec<Option<Node>> = (0..el.children.len())
            .map(|position| {
                let ctx = RuleContext {
                    parent: &el,
                    position,
                    base_url,
                };
                self.apply(&el.children[position], &ctx)
            })
            .collect();

        for (slot, replacement) in el.children.iter_mut().zip(replacements) {
            if let Some(node) = replacement {
                *slot = node;
            }
        }
        el
    }

    /// Run all rules over one node. Returns `None` when nothing changed.
    fn apply(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Node> {
        let mut current: Option<Node> = None;
        for (name, rule) in &self.rules {
            let target = current.as_ref().unwrap_or(node);
            if let Rewrite::Replace(next) = rule(target, ctx) {
                debug!(
                    rule = *name,
                    parent = %ctx.parent.tag,
                    position = ctx.position,
                    "rewrote node"
                );
                current = Some(next);
            }
        }
        current
    }
}
