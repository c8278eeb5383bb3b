//! Saving optimized images.

use std::path::{Path, PathBuf};
use tracing::debug;
use crate::core::{AppState, Download, EntryId};
use crate::utils::{OptimizerResult, create_dir_all, write_file};

/// Saves one optimized image into `dir` as `<prefix><original name>`.
///
/// Returns `None` when the entry does not exist or has no optimized result.
pub async fn download_image(
    state: &AppState,
    id: EntryId,
    dir: impl AsRef<Path>,
) -> OptimizerResult<Option<PathBuf>> {
    let download = state
        .registry()
        .lock()
        .await
        .download(id, &state.config().prefix);

    match download {
        Some(download) => save(dir.as_ref(), &download).await.map(Some),
        None => Ok(None),
    }
}

/// Saves every optimized image into `dir`, one file per entry.
pub async fn download_all(state: &AppState, dir: impl AsRef<Path>) -> OptimizerResult<Vec<PathBuf>> {
    let downloads = state
        .registry()
        .lock()
        .await
        .downloads(&state.config().prefix);

    let mut written = Vec::with_capacity(downloads.len());
    for download in &downloads {
        written.push(save(dir.as_ref(), download).await?);
    }
    Ok(written)
}

async fn save(dir: &Path, download: &Download) -> OptimizerResult<PathBuf> {
    create_dir_all(dir).await?;
    let path = write_file(dir, &download.file_name, &download.bytes).await?;
    debug!(
        "Saved {} ({}, {} bytes)",
        path.display(),
        download.media_type,
        download.bytes.len()
    );
    Ok(path)
}
