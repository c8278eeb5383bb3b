//! Shared application state.

use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use crate::core::{
    BatchReport, EntryId, EntrySummary, ImageRegistry, OptimizerConfig, RawFile, RegistryEvent,
};
use crate::processing::{BatchExecutor, Encoder, JpegReencoder};
use crate::utils::OptimizerResult;

/// Application state shared between the host and background work.
///
/// The registry is locked only while it is read or mutated; encoding runs
/// with the lock released so entries can be removed mid-run.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Mutex<ImageRegistry>>,
    executor: BatchExecutor,
    config: Arc<OptimizerConfig>,
}

impl AppState {
    /// Creates state that encodes with the built-in JPEG re-encoder.
    pub fn new(config: OptimizerConfig) -> Self {
        let encoder: Arc<dyn Encoder> = Arc::new(JpegReencoder::new());
        Self::with_executor(config, BatchExecutor::new(encoder))
    }

    pub fn with_executor(config: OptimizerConfig, executor: BatchExecutor) -> Self {
        Self {
            registry: Arc::new(Mutex::new(ImageRegistry::new())),
            executor,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Direct access to the registry for reads.
    pub fn registry(&self) -> &Arc<Mutex<ImageRegistry>> {
        &self.registry
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.registry.lock().await.subscribe()
    }

    pub async fn add_files(&self, files: Vec<RawFile>) -> Vec<EntryId> {
        self.registry.lock().await.add(files)
    }

    pub async fn remove(&self, id: EntryId) -> bool {
        self.registry.lock().await.remove(id)
    }

    pub async fn clear(&self) -> usize {
        self.registry.lock().await.clear()
    }

    pub async fn summaries(&self) -> Vec<EntrySummary> {
        self.registry
            .lock()
            .await
            .entries()
            .iter()
            .map(|e| e.summary())
            .collect()
    }

    /// Optimizes every entry at `quality`, or at the configured quality.
    pub async fn optimize_all(&self, quality: Option<u32>) -> OptimizerResult<BatchReport> {
        let quality = quality.unwrap_or(self.config.quality);

        let job = self.registry.lock().await.begin_optimize(quality)?;
        debug!("Optimizing {} images at quality {}", job.len(), quality);

        let outcomes = self.executor.execute(job).await;
        Ok(self.registry.lock().await.commit(outcomes))
    }
}
