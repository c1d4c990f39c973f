//! Error types for document rendering.

/// Error that aborts rendering of a whole document.
///
/// No partial HTML is produced when any of these occur.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The frontmatter opening `---` has no closing delimiter.
    #[error("frontmatter block opened on line 1 is never closed")]
    UnterminatedFrontmatter,

    /// The frontmatter block is not valid YAML.
    #[error("invalid frontmatter YAML: {0}")]
    FrontmatterYaml(#[from] serde_yaml::Error),

    /// The frontmatter block is valid YAML but not a key-value mapping.
    #[error("frontmatter must be a mapping, found {found}")]
    FrontmatterNotMapping {
        /// Kind of YAML value found instead.
        found: &'static str,
    },

    /// A container directive uses a name with no registered handler.
    #[error("unknown container directive :::{name} on line {line}")]
    UnknownDirective {
        /// Directive name as written.
        name: String,
        /// Line number in the source document (1-indexed).
        line: usize,
    },
}
