use serde::{Deserialize, Serialize};
use crate::core::EntryId;

/// Progress message type
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
    Error,
}

/// Progress of an optimize-all run, emitted by the batch executor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete, error)
    pub progress_type: ProgressType,
    /// Number of settled tasks
    pub completed_tasks: usize,
    /// Total number of tasks
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// Current status message
    pub status: String,
    /// Entry of the task that just settled
    pub task_id: Option<EntryId>,
    /// Error message when that task failed
    pub error: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(
        progress_type: ProgressType,
        completed_tasks: usize,
        total_tasks: usize,
        status: &str,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            progress_type,
            completed_tasks,
            total_tasks,
            progress_percentage,
            status: status.to_string(),
            task_id: None,
            error: None,
        }
    }

    /// Attach the entry whose task settled
    pub fn for_task(mut self, id: EntryId) -> Self {
        self.task_id = Some(id);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// "Processing..." while running, matching the optimize button label
    pub fn is_processing(&self) -> bool {
        !matches!(self.progress_type, ProgressType::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_floored_and_safe_for_empty_runs() {
        assert_eq!(Progress::new(ProgressType::Progress, 1, 3, "processing").progress_percentage, 33);
        assert_eq!(Progress::new(ProgressType::Start, 0, 0, "processing").progress_percentage, 0);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(Progress::new(ProgressType::Complete, 2, 2, "complete")).unwrap();
        assert_eq!(json["progressType"], "complete");
        assert_eq!(json["progressPercentage"], 100);
        assert!(json["taskId"].is_null());
    }
}
