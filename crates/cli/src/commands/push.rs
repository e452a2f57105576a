//! push command - Upload local files
//!
//! Each argument is expanded as a local glob. An argument that matches no
//! file is passed through literally so the missing file is reported as a
//! failed item instead of being silently dropped.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use csutil_core::{Overrides, TransferObserver, TransferOptions};

use super::{close, connect};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, TransferProgress};

/// Upload local files to a bucket
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Destination bucket
    pub bucket: String,

    /// Local files or glob patterns (e.g. "reports/*.csv")
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Prepended to each object key
    #[arg(short, long)]
    pub prefix: Option<String>,
}

/// Execute the push command
pub async fn execute(args: PushArgs, overrides: &Overrides, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let files = expand_local_patterns(&args.paths);

    let progress = Arc::new(TransferProgress::new(
        formatter.config(),
        "Uploading",
        Some(files.len() as u64),
    ));
    let observer: Arc<dyn TransferObserver> = progress.clone();
    let broker = match connect(overrides, &formatter, Some(observer)).await {
        Ok(broker) => broker,
        Err(code) => return code,
    };

    let options = TransferOptions {
        prefix: args.prefix.clone(),
    };
    let result = broker.push_with(&args.bucket, &files, &options).await;
    progress.finish_and_clear();
    close(broker).await;

    match result {
        Ok(result) => {
            formatter.batch(&result);
            ExitCode::from_batch(&result)
        }
        Err(e) => {
            formatter.error(&format!("Push failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

/// Expand local glob patterns into regular files
///
/// Directories are skipped. A pattern that yields no file is kept as-is.
pub(crate) fn expand_local_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns.iter().map(|p| p.trim()) {
        let matched: Vec<PathBuf> = match glob::glob(pattern) {
            Ok(paths) => paths
                .filter_map(Result::ok)
                .filter(|path| path.is_file())
                .collect(),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "Not a valid glob, using literally");
                Vec::new()
            }
        };

        if matched.is_empty() {
            files.push(PathBuf::from(pattern));
        } else {
            files.extend(matched);
        }
    }
    files
}
