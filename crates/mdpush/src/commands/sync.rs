//! `mdpush sync` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdpush_config::{CliSettings, Config};
use mdpush_jcr::{
    DocumentSync, JcrClient, Repository, SyncDefaults, SyncPlan, SyncReport, SyncStep,
    UpsertOutcome,
};
use tracing::warn;

use super::document_base_url;
use crate::error::{CliError, DocumentError, error_chain};
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Glob of markdown files to sync (overrides config).
    files: Option<String>,

    /// Path to configuration file (default: auto-discover mdpush.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL prefix file paths are joined onto (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Default content language (overrides config).
    #[arg(long)]
    language: Option<String>,

    /// Publish documents that do not set `publish` themselves.
    #[arg(long)]
    publish: bool,

    /// Do not publish documents that do not set `publish` themselves.
    #[arg(long, conflicts_with = "publish")]
    no_publish: bool,

    /// GraphQL endpoint URL (overrides config).
    #[arg(long, env = "MDPUSH_ENDPOINT")]
    endpoint: Option<String>,

    /// Render and resolve documents without contacting the repository.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Per-run counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    total: usize,
    failed: usize,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or file discovery fails, or if any
    /// document failed to sync.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            endpoint: self.endpoint.clone(),
            files: self.files.clone(),
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            publish: self.resolve_publish(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let files = discover_files(&config.source.files)?;
        output.info(&format!(
            "Found {} markdown file(s) from glob: \"{}\".",
            files.len(),
            config.source.files
        ));

        let defaults = SyncDefaults {
            language: config.defaults.language.clone(),
            publish: config.defaults.publish,
        };
        let base_url = config.source.base_url.as_deref();

        let summary = if self.dry_run {
            dry_run_documents(&files, base_url, &defaults, &output)
        } else {
            let remote = config.require_remote()?;
            let client = JcrClient::new(
                &remote.endpoint,
                remote.authorization.as_deref(),
                remote.timeout_secs,
            )?;
            let sync = DocumentSync::new(&client, defaults);
            sync_documents(&sync, &files, base_url, &output)
        };

        print_summary(&output, &summary);
        if summary.failed > 0 {
            return Err(CliError::Failed {
                failed: summary.failed,
                total: summary.total,
            });
        }
        Ok(())
    }

    fn resolve_publish(&self) -> Option<bool> {
        if self.publish {
            Some(true)
        } else if self.no_publish {
            Some(false)
        } else {
            None
        }
    }
}

/// Expand the files glob, skipping unreadable entries and directories.
fn discover_files(pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "skipping unreadable glob entry"),
        }
    }
    if files.is_empty() {
        return Err(CliError::NoFiles {
            pattern: pattern.to_owned(),
        });
    }
    Ok(files)
}

/// Sync documents one after another. A failing document is reported and
/// the run moves on to the next one.
fn sync_documents<R: Repository + ?Sized>(
    sync: &DocumentSync<'_, R>,
    files: &[PathBuf],
    base_url: Option<&str>,
    output: &Output,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for file in files {
        summary.total += 1;
        match sync_document(sync, file, base_url) {
            Ok(report) => print_report(output, file, &report),
            Err(err) => {
                summary.failed += 1;
                output.error(&format!(
                    "Failed to process file \"{}\": {}",
                    file.display(),
                    error_chain(&err)
                ));
            }
        }
    }
    summary
}

fn sync_document<R: Repository + ?Sized>(
    sync: &DocumentSync<'_, R>,
    file: &Path,
    base_url: Option<&str>,
) -> Result<SyncReport, DocumentError> {
    let text = std::fs::read_to_string(file)?;
    let base_url = document_base_url(base_url, file).map_err(DocumentError::BaseUrl)?;
    Ok(sync.sync(&text, &base_url)?)
}

fn dry_run_documents(
    files: &[PathBuf],
    base_url: Option<&str>,
    defaults: &SyncDefaults,
    output: &Output,
) -> RunSummary {
    output.highlight("[DRY RUN] No changes will be made.");

    let mut summary = RunSummary::default();
    for file in files {
        summary.total += 1;
        match plan_document(file, base_url, defaults) {
            Ok(plan) => print_plan(output, file, &plan),
            Err(err) => {
                summary.failed += 1;
                output.error(&format!(
                    "Failed to process file \"{}\": {}",
                    file.display(),
                    error_chain(&err)
                ));
            }
        }
    }
    summary
}

fn plan_document(
    file: &Path,
    base_url: Option<&str>,
    defaults: &SyncDefaults,
) -> Result<SyncPlan, DocumentError> {
    let text = std::fs::read_to_string(file)?;
    let base_url = document_base_url(base_url, file).map_err(DocumentError::BaseUrl)?;
    Ok(SyncPlan::build(&text, &base_url, defaults)?)
}

fn print_report(output: &Output, file: &Path, report: &SyncReport) {
    output.success(&format!("Processed file: \"{}\"", file.display()));
    for (path, outcome) in &report.nodes {
        let verb = match outcome {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Updated => "updated",
        };
        output.detail(&format!("  {verb} {path}"));
    }
}

fn print_plan(output: &Output, file: &Path, plan: &SyncPlan) {
    output.success(&format!("Processed file: \"{}\"", file.display()));
    output.detail(&format!(
        "  language: {}, publish: {}",
        plan.language, plan.publish
    ));
    for step in &plan.steps {
        match step {
            SyncStep::Upsert(node) => {
                let names: Vec<&str> = node.properties.keys().map(String::as_str).collect();
                output.detail(&format!(
                    "  upsert {} ({}) properties: {}",
                    node.path,
                    node.primary_type,
                    names.join(", ")
                ));
            }
            SyncStep::PrimeRender { path } => {
                output.detail(&format!("  render {path}"));
            }
        }
    }
}

fn print_summary(output: &Output, summary: &RunSummary) {
    output.separator();
    let succeeded = summary.total - summary.failed;
    let line = format!(
        "Processed {} file(s): {succeeded} succeeded, {} failed",
        summary.total, summary.failed
    );
    if summary.failed == 0 {
        output.success(&line);
    } else {
        output.warning(&line);
    }
}
