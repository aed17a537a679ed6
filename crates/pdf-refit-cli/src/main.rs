//! PDF Refit CLI - Command line tool for rescaling PDF documents.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_refit_core::{
    AppConfig, Error, PDF_MEDIA_TYPE, PdfRefitter, SourceFile, SourceRole, util,
};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-refit")]
#[command(author, version, about = "Rescale a PDF's pages to another document's page size", long_about = None)]
struct Args {
    /// Content PDF whose pages are rescaled
    #[arg(required = true)]
    content: PathBuf,

    /// Style PDF whose first page supplies the target size
    #[arg(required = true)]
    style: PathBuf,

    /// Output PDF file (default: resultado_<date>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum accepted input size in bytes (overrides config)
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Reject a path by declared type or on-disk size before reading any bytes.
fn preflight(path: &Path, role: SourceRole, max_bytes: u64) -> Result<(), Error> {
    let media_type = mime_guess::from_path(path).first_raw().unwrap_or("");
    if media_type != PDF_MEDIA_TYPE {
        return Err(Error::InvalidSource {
            role,
            reason: format!(
                "expected {PDF_MEDIA_TYPE}, got {}",
                if media_type.is_empty() {
                    "no media type"
                } else {
                    media_type
                }
            ),
        });
    }

    let len = std::fs::metadata(path)
        .map_err(|e| Error::read(role, format!("{}: {e}", path.display())))?
        .len();
    if len > max_bytes {
        return Err(Error::InvalidSource {
            role,
            reason: format!("file is {len} bytes, limit is {max_bytes} bytes"),
        });
    }

    Ok(())
}

/// Read a validated input into a `SourceFile`, classifying read failures.
fn read_source(path: &Path, role: SourceRole) -> Result<SourceFile, Error> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::read(role, format!("{}: {e}", path.display())))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    Ok(SourceFile::new(name, PDF_MEDIA_TYPE, bytes))
}

fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    if let Some(max_bytes) = args.max_bytes {
        config.max_source_bytes = max_bytes;
    }

    // Validate both inputs before reading a single byte
    preflight(&args.content, SourceRole::Content, config.max_source_bytes)?;
    preflight(&args.style, SourceRole::Style, config.max_source_bytes)?;

    info!("Loading content PDF: {}", args.content.display());
    let content = read_source(&args.content, SourceRole::Content)?;
    info!("Loading style PDF: {}", args.style.display());
    let style = read_source(&args.style, SourceRole::Style)?;

    // Determine output path
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(util::output_filename(&config.output_prefix)));

    let refitter = PdfRefitter::new(config);

    // Setup progress bar
    let pb = ProgressBar::new(0);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("#>-"),
    );

    #[allow(clippy::cast_possible_truncation)]
    let progress = |done: usize, total: usize| {
        if pb.length() != Some(total as u64) {
            pb.set_length(total as u64);
        }
        pb.set_position(done as u64);
    };

    let output = refitter
        .refit_with_progress(&content, &style, Some(&progress))
        .context("Failed to refit PDF")?;

    pb.finish_with_message("Refit complete");

    // Save output
    std::fs::write(&output_path, output.bytes)
        .context(format!("Failed to write output: {}", output_path.display()))?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("Refitted PDF saved to: {}", output_path.display());
    }

    Ok(())
}
