//! Materialize command

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use runstage_archive::ArchiveExtractor;
use runstage_core::{HierarchicalConfigLoader, MetadataDocument, RuntimeConfig, Workspace};
use runstage_fetch::HttpFetcher;
use runstage_materialize::{MaterializeSummary, Materializer, ReportWriter, Sha256Hasher};
use tracing::{debug, info};

use crate::commands::compare::check_regression;
use crate::output;

#[derive(Args, Debug)]
pub struct MaterializeArgs {
    /// Run metadata document
    #[arg(long, value_name = "FILE")]
    pub json: Utf8PathBuf,

    /// Local file to import into the run's outputs
    #[arg(long, value_name = "FILE")]
    pub outputs: Option<Utf8PathBuf>,

    /// Reference report to compare the new report against
    #[arg(long, value_name = "FILE")]
    pub test: Option<Utf8PathBuf>,

    /// Record a SHA-256 digest for every materialized file
    #[arg(long)]
    pub hash: bool,

    /// Working directory (overrides Metadata.workdir)
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<Utf8PathBuf>,

    /// HTTP timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Disable download spinners
    #[arg(long)]
    pub no_progress: bool,
}

pub async fn run(args: MaterializeArgs, quiet: bool) -> Result<()> {
    let mut config = HierarchicalConfigLoader::new()
        .context("Failed to locate the runstage config directory")?
        .load_runtime_config()
        .context("Failed to load runtime config")?;
    apply_overrides(&mut config, &args, quiet);
    debug!("Runtime config: {:?}", config);

    let mut document = MetadataDocument::from_path(args.json.as_std_path())
        .with_context(|| format!("Failed to load run metadata from {}", args.json))?;
    if let Some(workdir) = &args.workdir {
        document.metadata.workdir = workdir.to_string();
    }
    let workspace = Workspace::new(&document.metadata.workdir);
    info!(
        "Materializing {} into {}",
        args.json,
        workspace.root().display()
    );

    let fetcher = HttpFetcher::new(&config.network)
        .context("Failed to create HTTP client")?
        .with_progress(config.display.progress);
    let mut materializer = Materializer::new(
        workspace.clone(),
        Box::new(fetcher),
        ArchiveExtractor::from_config(&config.archive),
    );
    if let Some(local) = &args.outputs {
        materializer = materializer.with_local_outputs(local.as_std_path());
    }
    if args.hash {
        materializer = materializer.with_hasher(Box::new(Sha256Hasher));
    }

    let summary = materializer
        .materialize(&mut document.metadata)
        .await
        .with_context(|| format!("Failed to materialize {}", args.json))?;

    let report = ReportWriter::from_config(&config.report)
        .write(&document, &workspace)
        .context("Failed to write report")?;

    if !quiet {
        print_summary(&summary);
    }

    if !report.is_file() {
        bail!("Report was not created at {}", report.display());
    }
    if !quiet {
        output::success(&format!("report created: {}", report.display()));
    }

    if let Some(reference) = &args.test {
        info!("Checking {} against {}", report.display(), reference);
        check_regression(&report, reference.as_std_path())?;
    }

    Ok(())
}

/// CLI flags take precedence over every config layer
fn apply_overrides(config: &mut RuntimeConfig, args: &MaterializeArgs, quiet: bool) {
    if let Some(timeout) = args.timeout {
        config.network.http_timeout_secs = Some(timeout);
    }
    if args.no_progress || quiet {
        config.display.progress = false;
    }
}

fn print_summary(summary: &MaterializeSummary) {
    output::header("Materialized");
    output::kv("workflow files", &summary.workflow_fetched.to_string());

    let mut failures = 0;
    for (section, counts) in &summary.sections {
        failures += counts.fetch_failures + counts.extraction_failures;
        output::kv(
            section.name(),
            &format!(
                "{} fetched, {} extracted, {} discovered, {} archives pruned",
                counts.fetched, counts.extracted, counts.discovered, counts.pruned
            ),
        );
    }
    if summary.hashed > 0 {
        output::kv("hashed", &summary.hashed.to_string());
    }

    if failures > 0 {
        output::warning(&format!(
            "{} download or extraction failures, see log for details",
            failures
        ));
    }
}
