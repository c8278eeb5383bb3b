//! Optimization task definitions.

use crate::core::{EncodedImage, EntryId, RawFile};
use crate::utils::OptimizerResult;

/// Represents a single image optimization task.
///
/// Carries a snapshot of the entry's source so encoding can run without
/// access to the registry.
#[derive(Debug, Clone)]
pub struct OptimizeTask {
    /// Entry the result is applied to
    pub id: EntryId,
    /// Source image to re-encode
    pub source: RawFile,
    /// JPEG quality (1-100)
    pub quality: u8,
}

/// All tasks of one optimize-all run, in collection order.
#[derive(Debug, Clone, Default)]
pub struct OptimizeJob {
    generation: u64,
    tasks: Vec<OptimizeTask>,
}

impl OptimizeJob {
    pub(crate) fn new(generation: u64, tasks: Vec<OptimizeTask>) -> Self {
        Self { generation, tasks }
    }

    /// Order in which the job was started; later jobs have higher generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tasks(&self) -> &[OptimizeTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_tasks(self) -> Vec<OptimizeTask> {
        self.tasks
    }
}

/// Settled result of one task.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    pub id: EntryId,
    /// Generation of the job the task belonged to
    pub generation: u64,
    pub result: OptimizerResult<EncodedImage>,
}
