//! File broker
//!
//! [`FileBroker`] is the entry point for batch operations. It turns user
//! requests into [`TransferTask`]s, hands them to the [`Scheduler`] and
//! collects the outcome into a [`BatchResult`]. Only configuration problems
//! and the listing that precedes wildcard resolution fail a call outright;
//! everything else is recorded on the task it happened to.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use tokio::time::Instant;
use tokio_util::io::ReaderStream;
use tracing::{Instrument, debug, info, info_span};

use crate::batch::BatchResult;
use crate::config::TransferSettings;
use crate::error::{Error, Result};
use crate::path::{key_to_relative, strip_prefix, upload_key};
use crate::pattern::{Resolution, resolve_patterns};
use crate::scheduler::Scheduler;
use crate::staging::StagedFile;
use crate::task::{FailureKind, Operation, TaskFailure, TransferTask};
use crate::traits::{ByteStream, ObjectInfo, StorageProvider, TransferObserver};

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Prepended to upload keys; restricts and is stripped from downloads
    pub prefix: Option<String>,
}

impl TransferOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }
}

/// Batch push/pull/delete/list over a single storage provider
pub struct FileBroker {
    provider: Arc<dyn StorageProvider>,
    scheduler: Scheduler,
    timeout: Option<Duration>,
}

impl FileBroker {
    pub fn new(provider: Arc<dyn StorageProvider>, settings: &TransferSettings) -> Self {
        Self {
            provider,
            scheduler: Scheduler::new(settings.concurrency),
            timeout: settings.timeout,
        }
    }

    /// Report every task as it finishes
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.scheduler = self.scheduler.with_observer(observer);
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn concurrency(&self) -> usize {
        self.scheduler.concurrency()
    }

    /// Upload local files, each keyed by its file name
    pub async fn push<P: AsRef<Path>>(&self, bucket: &str, local_paths: &[P]) -> Result<BatchResult> {
        self.push_with(bucket, local_paths, &TransferOptions::default())
            .await
    }

    pub async fn push_with<P: AsRef<Path>>(
        &self,
        bucket: &str,
        local_paths: &[P],
        options: &TransferOptions,
    ) -> Result<BatchResult> {
        let deadline = self.deadline();
        let mut tasks = Vec::with_capacity(local_paths.len());
        for path in local_paths {
            tasks.push(upload_task(bucket, path.as_ref(), options.prefix.as_deref()).await);
        }

        info!(bucket, count = tasks.len(), provider = self.provider.name(), "Pushing files");
        let provider = Arc::clone(&self.provider);
        let tasks = self
            .scheduler
            .run(tasks, move |task| upload(Arc::clone(&provider), task), deadline)
            .await;

        Ok(BatchResult::new(Operation::Upload, tasks, Vec::new()))
    }

    /// Download every key matching `patterns` into `destination`
    pub async fn pull<S: AsRef<str>>(
        &self,
        bucket: &str,
        destination: &Path,
        patterns: &[S],
    ) -> Result<BatchResult> {
        self.pull_with(bucket, destination, patterns, &TransferOptions::default())
            .await
    }

    pub async fn pull_with<S: AsRef<str>>(
        &self,
        bucket: &str,
        destination: &Path,
        patterns: &[S],
        options: &TransferOptions,
    ) -> Result<BatchResult> {
        let deadline = self.deadline();
        let prefix = options.prefix();
        let Resolution { keys, unmatched } = self.resolve(bucket, prefix, patterns, deadline).await?;

        let destination_ok = tokio::fs::metadata(destination)
            .await
            .is_ok_and(|meta| meta.is_dir());

        let tasks = keys
            .into_iter()
            .map(|key| {
                let relative = strip_prefix(&key, prefix).to_string();
                let task = TransferTask::download(bucket, key, destination.join(&relative));
                if !destination_ok {
                    return task.failed_with(TaskFailure::new(
                        FailureKind::LocalIo,
                        format!("destination {} is not a directory", destination.display()),
                    ));
                }
                match key_to_relative(&relative) {
                    Ok(_) => task,
                    Err(e) => task.failed_with(e.into()),
                }
            })
            .collect::<Vec<_>>();

        info!(bucket, count = tasks.len(), destination = %destination.display(), "Pulling files");
        let provider = Arc::clone(&self.provider);
        let tasks = self
            .scheduler
            .run(tasks, move |task| download(Arc::clone(&provider), task), deadline)
            .await;

        Ok(BatchResult::new(Operation::Download, tasks, unmatched))
    }

    /// Delete every key matching `patterns`
    pub async fn delete<S: AsRef<str>>(&self, bucket: &str, patterns: &[S]) -> Result<BatchResult> {
        let deadline = self.deadline();
        let Resolution { keys, unmatched } = self.resolve(bucket, "", patterns, deadline).await?;

        let tasks = keys
            .into_iter()
            .map(|key| TransferTask::delete(bucket, key))
            .collect::<Vec<_>>();

        info!(bucket, count = tasks.len(), "Deleting objects");
        let provider = Arc::clone(&self.provider);
        let tasks = self
            .scheduler
            .run(
                tasks,
                move |task| {
                    let provider = Arc::clone(&provider);
                    async move { provider.delete_object(&task.bucket, &task.key).await }
                },
                deadline,
            )
            .await;

        Ok(BatchResult::new(Operation::Delete, tasks, unmatched))
    }

    /// List every object in a bucket
    pub async fn list(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        self.list_with(bucket, &TransferOptions::default()).await
    }

    /// List objects whose key starts with the options' prefix
    pub async fn list_with(&self, bucket: &str, options: &TransferOptions) -> Result<Vec<ObjectInfo>> {
        self.list_until(bucket, options.prefix(), self.deadline())
            .await
    }

    /// Download any of `local_paths` that do not exist yet
    ///
    /// Each missing path is fetched from the key equal to its file name and
    /// written in place; paths that already exist are left alone.
    pub async fn sync_local_files<P: AsRef<Path>>(
        &self,
        bucket: &str,
        local_paths: &[P],
    ) -> Result<BatchResult> {
        let deadline = self.deadline();
        let mut tasks = Vec::new();
        for path in local_paths.iter().map(AsRef::as_ref) {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                debug!(path = %path.display(), "Already present, skipping");
                continue;
            }
            tasks.push(match upload_key(path, None) {
                Ok(key) => TransferTask::download(bucket, key, path),
                Err(e) => TransferTask::download(bucket, "", path).failed_with(e.into()),
            });
        }

        info!(bucket, count = tasks.len(), "Syncing local files");
        let provider = Arc::clone(&self.provider);
        let tasks = self
            .scheduler
            .run(tasks, move |task| download(Arc::clone(&provider), task), deadline)
            .await;

        Ok(BatchResult::new(Operation::Download, tasks, Vec::new()))
    }

    /// Release the provider's resources
    pub async fn close(self) -> Result<()> {
        debug!(provider = self.provider.name(), "Closing broker");
        self.provider.close().await
    }

    /// A timeout too large to represent means no deadline
    fn deadline(&self) -> Option<Instant> {
        self.timeout.and_then(|timeout| Instant::now().checked_add(timeout))
    }

    async fn resolve<S: AsRef<str>>(
        &self,
        bucket: &str,
        prefix: &str,
        patterns: &[S],
        deadline: Option<Instant>,
    ) -> Result<Resolution> {
        let objects = self.list_until(bucket, prefix, deadline).await?;
        let resolution = resolve_patterns(patterns, &objects);
        for pattern in &resolution.unmatched {
            info!(bucket, pattern = %pattern, "No remote keys match pattern");
        }
        Ok(resolution)
    }

    async fn list_until(
        &self,
        bucket: &str,
        prefix: &str,
        deadline: Option<Instant>,
    ) -> Result<Vec<ObjectInfo>> {
        let span = info_span!("transfer", operation = %Operation::List, bucket, prefix);
        let objects = within(deadline, self.provider.list_objects(bucket, prefix))
            .instrument(span)
            .await?;
        debug!(bucket, prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }
}

async fn within<T>(deadline: Option<Instant>, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| Error::Timeout("listing did not finish before the deadline".into()))?,
        None => fut.await,
    }
}

async fn upload_task(bucket: &str, path: &Path, prefix: Option<&str>) -> TransferTask {
    let key = match upload_key(path, prefix) {
        Ok(key) => key,
        Err(e) => return TransferTask::upload(bucket, "", path).failed_with(e.into()),
    };
    let task = TransferTask::upload(bucket, key, path);

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => task,
        Ok(_) => task.failed_with(TaskFailure::new(
            FailureKind::LocalIo,
            format!("{}: not a regular file", path.display()),
        )),
        Err(e) => task.failed_with(local_io(path, e).into()),
    }
}

async fn upload(provider: Arc<dyn StorageProvider>, task: TransferTask) -> Result<()> {
    let path = local_path(&task)?.to_path_buf();
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| local_io(&path, e))?;
    let size = file.metadata().await.map_err(|e| local_io(&path, e))?.len();

    let body: ByteStream = ReaderStream::new(file)
        .map_err(move |e| local_io(&path, e))
        .boxed();
    provider
        .put_object(&task.bucket, &task.key, body, Some(size))
        .await
}

async fn download(provider: Arc<dyn StorageProvider>, task: TransferTask) -> Result<()> {
    let path = local_path(&task)?;
    let mut body = provider.get_object(&task.bucket, &task.key).await?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| local_io(parent, e))?;
    }

    let mut staged = StagedFile::create(path)
        .await
        .map_err(|e| local_io(path, e))?;
    while let Some(chunk) = body.try_next().await? {
        staged.write_all(&chunk).await.map_err(|e| local_io(path, e))?;
    }
    staged.commit().await.map_err(|e| local_io(path, e))
}

fn local_path(task: &TransferTask) -> Result<&Path> {
    task.local_path
        .as_deref()
        .ok_or_else(|| Error::LocalIo(format!("{} has no local path", task.key)))
}

fn local_io(path: &Path, err: std::io::Error) -> Error {
    Error::LocalIo(format!("{}: {err}", path.display()))
}
