//! Host-facing handlers for intake, optimization and removal.

use std::path::PathBuf;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::core::{AppState, BatchReport, EntryId};
use crate::utils::{OptimizerResult, read_raw_file};

/// Outcome of adding files from disk.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeReport {
    /// Ids of the new entries, in input order
    pub added: Vec<EntryId>,
    /// Files that could not be read, with the reason
    pub unreadable: Vec<(PathBuf, String)>,
}

/// Reads `paths` and adds every image among them.
///
/// A file that cannot be read is reported and skipped; the others are still
/// added. Files that are not images are dropped silently.
pub async fn add_images(state: &AppState, paths: &[PathBuf]) -> IntakeReport {
    let mut report = IntakeReport::default();
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        match read_raw_file(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.unreadable.push((path.clone(), e.to_string()));
            }
        }
    }

    report.added = state.add_files(files).await;
    debug!("Added {} of {} files", report.added.len(), paths.len());
    report
}

/// Optimizes every image currently tracked.
///
/// # Arguments
/// * `state` - Application state holding the registry and executor
/// * `quality` - JPEG quality (1-100); the configured quality when `None`
///
/// # Returns
/// One result per image, in collection order. Per-image failures are part of
/// the report; only an invalid quality fails the call.
pub async fn optimize_images(state: &AppState, quality: Option<u32>) -> OptimizerResult<BatchReport> {
    let report = state.optimize_all(quality).await?;
    info!(
        "Optimized {} images ({} failed)",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}

/// Stops tracking one image. Unknown ids are ignored.
pub async fn remove_image(state: &AppState, id: EntryId) -> bool {
    state.remove(id).await
}

/// Stops tracking every image.
pub async fn clear_images(state: &AppState) -> usize {
    state.clear().await
}
