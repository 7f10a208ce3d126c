use anyhow::{Context, Result};
use clap::Parser;
use liquid_preview::{discover_sample_files, PreviewConfig, ProcessingOutcome, Processor};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

const USAGE_NOTES: &str = "\
Directory layout:
  <root>/liquid/             Liquid templates (*.liquid)
  <root>/src/sample-data/    Sample data files (*.json, menus.json is shared)
  <root>/html/               Rendered output (default)

Each sample data file names its template with \"liquid_file\". Items of
Target.Items that set \"detail_liquid_file\" and \"RoutePath\" also get their
own page, written to <RoutePath>.html.";

/// Liquid Template Preview
/// Renders Liquid templates against JSON sample data into static HTML
#[derive(Parser)]
#[command(author, version, about, long_about = None, after_help = USAGE_NOTES)]
struct Cli {
    /// Sample data file to render. Renders every sample data file when omitted
    #[arg(value_name = "SAMPLE DATA PATH")]
    sample_data: Option<PathBuf>,

    /// Output directory for rendered HTML files
    #[arg(short, long, value_name = "OUTPUT DIRECTORY PATH")]
    output: Option<PathBuf>,

    /// Render every sample data file in the sample data directory
    #[arg(short, long)]
    all: bool,

    /// Enable verbose output for detailed rendering information
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with appropriate level
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let working_dir = std::env::current_dir().context("Failed to read the working directory")?;
    let config = PreviewConfig::discover(&working_dir, cli.output.clone());
    config.validate().context("Invalid project layout")?;

    info!("Templates: {}", config.templates_dir.display());
    info!("Output: {}", config.output_dir.display());

    let files = match (&cli.sample_data, cli.all) {
        (Some(path), false) => {
            let path = working_dir.join(path);
            if !path.is_file() {
                anyhow::bail!("Sample data file not found: {}", path.display());
            }
            return render_single(&config, &path).await;
        }
        (Some(_), true) => {
            warn!("Ignoring the sample data path because --all was given");
            discover_sample_files(&config.sample_data_dir)
        }
        (None, _) => discover_sample_files(&config.sample_data_dir),
    }
    .context("Failed to find sample data files")?;

    render_all(&config, &files).await
}

async fn processor(config: &PreviewConfig) -> Result<Processor> {
    Processor::new(&config.templates_dir, &config.output_dir)
        .await
        .context("Failed to initialize processor")
}

async fn render_single(config: &PreviewConfig, sample_data: &Path) -> Result<()> {
    let processor = processor(config).await?;

    info!("Rendering {}", sample_data.display());
    let report = match processor.render_file(sample_data).await {
        Ok(report) => report,
        Err(e) => {
            e.report();
            anyhow::bail!("Failed to render {}", sample_data.display());
        }
    };

    if let ProcessingOutcome::SuccessWithWarnings(warnings) = report.outcome() {
        warn!("Rendered with {} warning(s)", warnings.len());
    }
    info!(
        "Rendering completed successfully: {} page(s) written",
        1 + report.detail_outputs.len()
    );
    Ok(())
}

async fn render_all(config: &PreviewConfig, files: &[PathBuf]) -> Result<()> {
    let processor = processor(config).await?;

    let summary = processor.render_batch(files).await;
    if !summary.is_success() {
        for failure in &summary.failures {
            warn!("Failed: {}", failure.sample_data.display());
        }
        anyhow::bail!("Rendering finished with {} failure(s)", summary.failed());
    }

    info!("Rendering completed successfully");
    Ok(())
}
