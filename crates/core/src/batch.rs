//! Batch results
//!
//! A [`BatchResult`] is the value returned by every broker call that runs
//! tasks. It is built once, after the scheduler has joined every task.

use serde::Serialize;

use crate::task::{FailureKind, Operation, TransferTask};

/// Overall outcome of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// No tasks were produced
    Empty,
    /// Every task succeeded
    Success,
    /// Some tasks succeeded, some failed
    Partial,
    /// Every task failed
    Failed,
}

/// Aggregated outcome of one broker call
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    operation: Operation,
    status: BatchStatus,
    succeeded_count: usize,
    failed_count: usize,
    tasks: Vec<TransferTask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unmatched_patterns: Vec<String>,
}

impl BatchResult {
    /// Build a result from terminal tasks in submission order
    pub(crate) fn new(
        operation: Operation,
        tasks: Vec<TransferTask>,
        unmatched_patterns: Vec<String>,
    ) -> Self {
        debug_assert!(tasks.iter().all(TransferTask::is_terminal));

        let succeeded_count = tasks.iter().filter(|t| t.succeeded()).count();
        let failed_count = tasks.len() - succeeded_count;
        let status = match (succeeded_count, failed_count) {
            (0, 0) => BatchStatus::Empty,
            (_, 0) => BatchStatus::Success,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::Partial,
        };

        Self {
            operation,
            status,
            succeeded_count,
            failed_count,
            tasks,
            unmatched_patterns,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// All tasks in submission order
    pub fn tasks(&self) -> &[TransferTask] {
        &self.tasks
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Patterns that matched no remote key
    pub fn unmatched_patterns(&self) -> &[String] {
        &self.unmatched_patterns
    }

    /// True when no task failed (an empty batch counts as success)
    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TransferTask> {
        self.tasks.iter().filter(|t| t.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TransferTask> {
        self.tasks.iter().filter(|t| !t.succeeded())
    }

    /// Whether any task failed because the operation deadline passed
    pub fn timed_out(&self) -> bool {
        self.failed()
            .filter_map(TransferTask::failure)
            .any(|f| f.kind == FailureKind::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskFailure;

    fn done(key: &str) -> TransferTask {
        let mut task = TransferTask::delete("bucket", key);
        task.mark_succeeded();
        task
    }

    fn failed(key: &str, kind: FailureKind) -> TransferTask {
        TransferTask::delete("bucket", key).failed_with(TaskFailure::new(kind, "nope"))
    }

    #[test]
    fn test_counts_and_status() {
        let result = BatchResult::new(
            Operation::Delete,
            vec![done("a"), failed("b", FailureKind::Transfer), done("c")],
            vec![],
        );
        assert_eq!(result.succeeded_count(), 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.status(), BatchStatus::Partial);
        assert!(!result.is_success());
        assert!(!result.timed_out());

        let keys: Vec<_> = result.tasks().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_batch() {
        let result = BatchResult::new(Operation::Download, vec![], vec!["*.csv".into()]);
        assert_eq!(result.status(), BatchStatus::Empty);
        assert!(result.is_success());
        assert!(result.is_empty());
        assert_eq!(result.unmatched_patterns(), ["*.csv".to_string()]);
    }

    #[test]
    fn test_all_failed_and_timed_out() {
        let result = BatchResult::new(
            Operation::Delete,
            vec![failed("a", FailureKind::Timeout), failed("b", FailureKind::NotFound)],
            vec![],
        );
        assert_eq!(result.status(), BatchStatus::Failed);
        assert!(result.timed_out());
        assert_eq!(result.failed().count(), 2);
        assert_eq!(result.succeeded().count(), 0);
    }

    #[test]
    fn test_serialize() {
        let result = BatchResult::new(Operation::Delete, vec![done("a")], vec![]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["operation"], "delete");
        assert_eq!(json["status"], "success");
        assert_eq!(json["succeeded_count"], 1);
        assert!(json.get("unmatched_patterns").is_none());
    }
}
