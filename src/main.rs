// Command-line entry point: optimize a set of images and save the results.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use image_optimizer_lib::core::{OptimizerConfig, ProgressType};
use image_optimizer_lib::processing::{BatchExecutor, Encoder, JpegReencoder};
use image_optimizer_lib::utils::{format_savings, format_size};
use image_optimizer_lib::{AppState, add_images, download_all, optimize_images};

/// Re-encode images as JPEG at a chosen quality.
#[derive(Parser, Debug)]
#[command(name = "image-optimizer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image files to optimize; files that are not images are ignored
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// JPEG quality (1-100, higher = larger files)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Directory the optimized files are written to
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every step
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<OptimizerConfig> {
    let config = match &args.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    let mut config = config.with_env()?;

    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = load_config(&args).context("invalid configuration")?;
    debug!("Using {:?}", config);

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let encoder: std::sync::Arc<dyn Encoder> = std::sync::Arc::new(JpegReencoder::new());
    let executor = BatchExecutor::new(encoder).with_progress(progress_tx);
    let state = AppState::with_executor(config.clone(), executor);

    let progress_log = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            match progress.progress_type {
                ProgressType::Error => warn!(
                    "[{}/{}] {}",
                    progress.completed_tasks,
                    progress.total_tasks,
                    progress.error.unwrap_or_default()
                ),
                _ => debug!(
                    "[{}/{}] {}% {}",
                    progress.completed_tasks,
                    progress.total_tasks,
                    progress.progress_percentage,
                    progress.status
                ),
            }
        }
    });

    let intake = add_images(&state, &args.files).await;
    if intake.added.is_empty() {
        warn!("No images to optimize");
        return Ok(ExitCode::FAILURE);
    }

    info!("Optimizing {} images at quality {}", intake.added.len(), config.quality);
    let report = optimize_images(&state, None).await?;

    for result in &report.results {
        if result.success {
            info!(
                "{}: {} → {} ({})",
                result.file_name,
                format_size(result.original_size),
                format_size(result.optimized_size),
                format_savings(result.compression_ratio)
            );
        } else {
            warn!(
                "{}: failed ({})",
                result.file_name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let written = download_all(&state, &config.output_dir)
        .await
        .with_context(|| format!("failed to save into {}", config.output_dir.display()))?;
    info!("Saved {} files to {}", written.len(), config.output_dir.display());

    // Dropping the state closes the progress channel.
    drop(state);
    let _ = progress_log.await;

    if report.succeeded() == 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("=== Image Optimizer ===");
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
