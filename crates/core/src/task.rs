//! Transfer tasks
//!
//! A [`TransferTask`] describes one object's operation within a batch. The
//! broker creates it in the `Pending` state (or directly `Failed` when the
//! request is invalid locally); only the scheduler moves it forward.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;

/// Kind of operation a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Upload,
    Download,
    Delete,
    List,
}

impl Operation {
    /// Verb used in progress and summary output
    pub const fn verb(self) -> &'static str {
        match self {
            Operation::Upload => "upload",
            Operation::Download => "download",
            Operation::Delete => "delete",
            Operation::List => "list",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Succeeded and Failed are final
    pub const fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// Category of a task failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Remote key absent
    NotFound,
    /// Network or provider failure
    Transfer,
    /// Local file missing or destination unwritable
    LocalIo,
    /// Operation deadline exceeded
    Timeout,
    /// Anything else, including panics inside the task
    Other,
}

/// Error detail captured when a task fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TaskFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "operation timed out")
    }
}

impl From<&Error> for TaskFailure {
    fn from(err: &Error) -> Self {
        let kind = match err {
            Error::NotFound(_) => FailureKind::NotFound,
            Error::Transfer(_) => FailureKind::Transfer,
            Error::LocalIo(_) | Error::Io(_) => FailureKind::LocalIo,
            Error::Timeout(_) => FailureKind::Timeout,
            _ => FailureKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<Error> for TaskFailure {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One object's unit of work within a batch
#[derive(Debug, Clone, Serialize)]
pub struct TransferTask {
    pub operation: Operation,
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<TaskFailure>,
}

impl TransferTask {
    fn new(
        operation: Operation,
        bucket: impl Into<String>,
        key: impl Into<String>,
        local_path: Option<PathBuf>,
    ) -> Self {
        Self {
            operation,
            bucket: bucket.into(),
            key: key.into(),
            local_path,
            status: TaskStatus::Pending,
            failure: None,
        }
    }

    /// Upload `local_path` to `bucket/key`
    pub fn upload(
        bucket: impl Into<String>,
        key: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(Operation::Upload, bucket, key, Some(local_path.into()))
    }

    /// Download `bucket/key` into `local_path`
    pub fn download(
        bucket: impl Into<String>,
        key: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(Operation::Download, bucket, key, Some(local_path.into()))
    }

    /// Delete `bucket/key`
    pub fn delete(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(Operation::Delete, bucket, key, None)
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        self.failure.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    /// Display form used in output: the local path when there is one
    pub fn display_name(&self) -> String {
        match &self.local_path {
            Some(path) => path.display().to_string(),
            None => format!("{}/{}", self.bucket, self.key),
        }
    }

    pub(crate) fn mark_running(&mut self) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::Running;
        }
    }

    pub(crate) fn mark_succeeded(&mut self) {
        if !self.is_terminal() {
            self.status = TaskStatus::Succeeded;
        }
    }

    pub(crate) fn mark_failed(&mut self, failure: TaskFailure) {
        if !self.is_terminal() {
            self.status = TaskStatus::Failed;
            self.failure = Some(failure);
        }
    }

    /// Build a task that failed before it could be scheduled
    pub(crate) fn failed_with(mut self, failure: TaskFailure) -> Self {
        self.mark_failed(failure);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = TransferTask::delete("bucket", "a.txt");
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(task.failure().is_none());
        assert!(task.local_path.is_none());
    }

    #[test]
    fn test_lifecycle() {
        let mut task = TransferTask::upload("bucket", "a.txt", "/tmp/a.txt");
        task.mark_running();
        assert_eq!(task.status(), TaskStatus::Running);
        task.mark_succeeded();
        assert!(task.succeeded());
        assert!(task.is_terminal());
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut task = TransferTask::download("bucket", "a.txt", "/tmp/a.txt");
        task.mark_failed(TaskFailure::new(FailureKind::NotFound, "gone"));
        task.mark_succeeded();
        task.mark_running();
        assert_eq!(task.status(), TaskStatus::Failed);
        assert_eq!(task.failure().unwrap().kind, FailureKind::NotFound);

        let mut task = TransferTask::delete("bucket", "a.txt");
        task.mark_succeeded();
        task.mark_failed(TaskFailure::timeout());
        assert!(task.succeeded());
        assert!(task.failure().is_none());
    }

    #[test]
    fn test_failure_from_error() {
        let failure = TaskFailure::from(Error::NotFound("bucket/a.txt".into()));
        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.message, "Not found: bucket/a.txt");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(TaskFailure::from(Error::Io(io)).kind, FailureKind::LocalIo);
        assert_eq!(
            TaskFailure::from(Error::Transfer("reset".into())).kind,
            FailureKind::Transfer
        );
        assert_eq!(
            TaskFailure::from(Error::InvalidKey("../x".into())).kind,
            FailureKind::Other
        );
    }

    #[test]
    fn test_display_name() {
        let task = TransferTask::delete("bucket", "dir/a.txt");
        assert_eq!(task.display_name(), "bucket/dir/a.txt");

        let task = TransferTask::upload("bucket", "a.txt", "local/a.txt");
        assert_eq!(task.display_name(), "local/a.txt");
    }

    #[test]
    fn test_serialize_task() {
        let task = TransferTask::delete("bucket", "a.txt")
            .failed_with(TaskFailure::new(FailureKind::Transfer, "boom"));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["operation"], "delete");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failure"]["kind"], "transfer");
        assert!(json.get("local_path").is_none());
    }
}
