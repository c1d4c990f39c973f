//! `mdpush render` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdpush_config::{CliSettings, Config};

use super::document_base_url;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Base URL prefix the file path is joined onto (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Path to configuration file (default: auto-discover mdpush.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// Prints the HTML, then the raw frontmatter as JSON, to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rendered.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_url: self.base_url.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let text = std::fs::read_to_string(&self.file)?;
        let base_url = document_base_url(config.source.base_url.as_deref(), &self.file)
            .map_err(CliError::BaseUrl)?;
        output.detail(&format!("Base URL: {base_url}"));

        let rendered = mdpush_renderer::render(&text, &base_url)?;
        output.print(&rendered.html);
        output.print(&serde_json::to_string_pretty(&rendered.metadata)?);

        Ok(())
    }
}
