//! Local directory provider
//!
//! Each bucket is a directory under the configured root and keys are paths
//! relative to it. Useful offline and for end-to-end tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tokio::fs;
use tokio_util::io::ReaderStream;

use csutil_core::path::key_to_relative;
use csutil_core::staging::{PART_SUFFIX, StagedFile};
use csutil_core::{ByteStream, Error, ObjectInfo, Result, StorageProvider};

#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Bucket directory, which must already exist
    async fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(Error::InvalidKey(format!("bucket name '{bucket}'")));
        }
        let dir = self.root.join(bucket);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            _ => Err(Error::NotFound(format!("bucket {bucket}"))),
        }
    }

    /// Convert a key to a file path, rejecting keys that leave the bucket
    async fn key_to_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = key_to_relative(key)?;
        Ok(self.bucket_dir(bucket).await?.join(relative))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> Error {
    Error::Transfer(format!("{}: {err}", path.display()))
}

fn relative_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[async_trait]
impl StorageProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let bucket_dir = self.bucket_dir(bucket).await?;
        let mut items = Vec::new();
        let mut pending = vec![bucket_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| io_error(&dir, e))?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
                let path = entry.path();
                let meta = entry.metadata().await.map_err(|e| io_error(&path, e))?;
                if meta.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(key) = relative_key(&bucket_dir, &path) else {
                    continue;
                };
                if key.ends_with(PART_SUFFIX) || !key.starts_with(prefix) {
                    continue;
                }

                let mut info = ObjectInfo::file(key, meta.len());
                info.last_modified = meta
                    .modified()
                    .ok()
                    .and_then(|time| jiff::Timestamp::try_from(time).ok());
                items.push(info);
            }
        }

        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        let path = self.key_to_path(bucket, key).await?;
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("{bucket}/{key}")));
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        Ok(ReaderStream::new(file)
            .map_err(move |e| io_error(&path, e))
            .boxed())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        mut body: ByteStream,
        _size_hint: Option<u64>,
    ) -> Result<()> {
        let path = self.key_to_path(bucket, key).await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        // The previous version stays in place until the new one is complete
        let mut staged = StagedFile::create(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        while let Some(chunk) = body.try_next().await? {
            staged.write_all(&chunk).await.map_err(|e| io_error(&path, e))?;
        }
        staged.commit().await.map_err(|e| io_error(&path, e))?;

        tracing::debug!(path = %path.display(), "Stored object");
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let path = self.key_to_path(bucket, key).await?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
