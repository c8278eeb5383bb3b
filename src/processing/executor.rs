//! Batch executor for optimize-all runs.
//!
//! Every task is encoded inside `tokio::task::spawn_blocking`, all tasks are
//! in flight at once, and the run finishes only after every task has settled.
//! One failed or panicked encode never stops the others.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::{EncodeOutcome, OptimizeJob, Progress, ProgressType};
use crate::utils::OptimizerError;

use super::Encoder;

/// Runs encode jobs and reports progress.
#[derive(Clone)]
pub struct BatchExecutor {
    encoder: Arc<dyn Encoder>,
    progress: Option<UnboundedSender<Progress>>,
}

impl BatchExecutor {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self {
            encoder,
            progress: None,
        }
    }

    /// Sends a [`Progress`] for the start, every settled task, and the end of each run.
    pub fn with_progress(mut self, progress: UnboundedSender<Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Encodes every task of `job`, returning one outcome per task in job order.
    pub async fn execute(&self, job: OptimizeJob) -> Vec<EncodeOutcome> {
        let total = job.len();
        if total == 0 {
            return Vec::new();
        }

        self.emit(Progress::new(ProgressType::Start, 0, total, "processing"));

        let generation = job.generation();
        let tasks = job.into_tasks();
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        let mut slots: Vec<Option<EncodeOutcome>> = vec![None; total];
        let mut set = JoinSet::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let encoder = Arc::clone(&self.encoder);
            set.spawn(async move {
                let id = task.id;
                let result = tokio::task::spawn_blocking(move || {
                    encoder.encode(&task.source, task.quality)
                })
                .await
                .unwrap_or_else(|e| Err(OptimizerError::encode(format!("Encode task panicked: {e}"))));
                (index, EncodeOutcome { id, generation, result })
            });
        }

        let mut completed = 0;
        while let Some(joined) = set.join_next().await {
            let (index, outcome) = match joined {
                Ok(settled) => settled,
                Err(e) => {
                    warn!("Encode task was lost: {}", e);
                    continue;
                }
            };

            completed += 1;
            let progress = match &outcome.result {
                Ok(encoded) => {
                    debug!("Task {} settled: {} bytes", outcome.id, encoded.size());
                    Progress::new(ProgressType::Progress, completed, total, "processing")
                        .for_task(outcome.id)
                }
                Err(e) => Progress::new(ProgressType::Error, completed, total, "error")
                    .for_task(outcome.id)
                    .with_error(e.to_string()),
            };
            self.emit(progress);
            slots[index] = Some(outcome);
        }

        self.emit(Progress::new(ProgressType::Complete, total, total, "complete"));

        slots
            .into_iter()
            .zip(ids)
            .map(|(slot, id)| {
                slot.unwrap_or_else(|| EncodeOutcome {
                    id,
                    generation,
                    result: Err(OptimizerError::encode("Encode task did not settle")),
                })
            })
            .collect()
    }

    fn emit(&self, progress: Progress) {
        if let Some(tx) = &self.progress {
            // The receiver going away only means nobody is watching.
            let _ = tx.send(progress);
        }
    }
}
