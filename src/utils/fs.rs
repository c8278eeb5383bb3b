use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use crate::core::RawFile;
use crate::utils::{OptimizerError, OptimizerResult, media_type_from_path, validate_input_path};

/// Reads a file from disk into a [`RawFile`], tagging it with a media type
/// derived from its extension.
pub async fn read_raw_file(path: impl AsRef<Path>) -> OptimizerResult<RawFile> {
    let path = path.as_ref();
    validate_input_path(path)?;

    let data = fs::read(path)
        .await
        .map_err(|e| OptimizerError::read(format!("Failed to read {}: {}", path.display(), e)))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!("Read {} ({} bytes)", name, data.len());
    Ok(RawFile::new(name, media_type_from_path(path), data))
}

/// Creates `dir` and all of its parents.
pub async fn create_dir_all(dir: impl AsRef<Path>) -> OptimizerResult<()> {
    fs::create_dir_all(dir.as_ref())
        .await
        .map_err(|e| OptimizerError::io(format!(
            "Failed to create directory {}: {}", dir.as_ref().display(), e
        )))
}

/// Writes `bytes` to `dir/file_name`, returning the written path.
pub async fn write_file(dir: impl AsRef<Path>, file_name: &str, bytes: &[u8]) -> OptimizerResult<PathBuf> {
    let path = dir.as_ref().join(file_name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| OptimizerError::io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}
