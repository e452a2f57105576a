//! csutil-core: Core library for the csutil cloud storage utility
//!
//! This crate provides the provider-independent parts of csutil:
//! - Configuration resolution
//! - The `StorageProvider` trait every backend implements
//! - Wildcard resolution of remote keys
//! - The bounded-parallelism task scheduler
//! - The `FileBroker` batch API (push, pull, delete, list)
//!
//! Concrete backends live in `csutil-providers`, so the broker and scheduler
//! can be tested against in-memory providers.

pub mod batch;
pub mod broker;
pub mod config;
pub mod error;
pub mod path;
pub mod pattern;
pub mod scheduler;
pub mod staging;
pub mod task;
pub mod traits;

pub use batch::{BatchResult, BatchStatus};
pub use broker::{FileBroker, TransferOptions};
pub use config::{
    AzureAuth, AzureConfig, CloudConfiguration, ConfigManager, IbmConfig, LocalConfig, Overrides,
    Platform, ProviderConfig, TransferSettings,
};
pub use error::{Error, Result};
pub use pattern::{KeyPattern, Resolution, resolve_patterns};
pub use scheduler::{DEFAULT_CONCURRENCY, Scheduler};
pub use task::{FailureKind, Operation, TaskFailure, TaskStatus, TransferTask};
pub use traits::{ByteStream, ObjectInfo, StorageProvider, TransferObserver};
