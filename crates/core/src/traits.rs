//! StorageProvider trait definition
//!
//! This trait defines the capability every cloud backend must offer.
//! It keeps the broker and scheduler decoupled from any specific SDK.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::task::TransferTask;

/// Stream of object content chunks
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Metadata for a remote object
///
/// A snapshot taken at list time. It may be stale by the time a pull or
/// delete acts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for a key with known size
    pub fn file(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            last_modified: None,
            etag: None,
        }
    }

    /// Create a new ObjectInfo carrying only the key
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
            etag: None,
        }
    }

    /// Human-readable size, if known
    pub fn size_human(&self) -> Option<String> {
        self.size_bytes
            .map(|size| humansize::format_size(size, humansize::BINARY))
    }
}

/// Capability implemented by each cloud storage backend
///
/// Implementations must be safe to call concurrently from many tasks and
/// keep no state across calls beyond connection pools and clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Short provider name used in logs and output
    fn name(&self) -> &'static str;

    /// List every object in a bucket whose key starts with `prefix`
    ///
    /// An empty prefix lists the whole bucket. Provider-side pagination is
    /// drained before returning.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Open an object's content; fails with `Error::NotFound` when absent
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream>;

    /// Upload content to a key, replacing any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        size_hint: Option<u64>,
    ) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Release connections held by the provider
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Receives each task once it reaches a terminal state
///
/// Called from the scheduler loop, so implementations should return quickly.
pub trait TransferObserver: Send + Sync {
    /// Called once per task after it succeeded or failed
    fn task_finished(&self, task: &TransferTask);
}
