//! delete command - Remove objects matching patterns
//!
//! Deletion is irreversible and never retried.

use std::sync::Arc;

use clap::Args;

use csutil_core::{Overrides, TransferObserver};

use super::{close, connect};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, TransferProgress};

/// Delete objects from a bucket
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Bucket to delete from
    pub bucket: String,

    /// Object keys or wildcards (quote them, e.g. 'tmp/*')
    #[arg(required = true)]
    pub patterns: Vec<String>,
}

/// Execute the delete command
pub async fn execute(
    args: DeleteArgs,
    overrides: &Overrides,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let progress = Arc::new(TransferProgress::new(formatter.config(), "Deleting", None));
    let observer: Arc<dyn TransferObserver> = progress.clone();
    let broker = match connect(overrides, &formatter, Some(observer)).await {
        Ok(broker) => broker,
        Err(code) => return code,
    };

    let result = broker.delete(&args.bucket, &args.patterns).await;
    progress.finish_and_clear();
    close(broker).await;

    match result {
        Ok(result) => {
            formatter.batch(&result);
            ExitCode::from_batch(&result)
        }
        Err(e) => {
            formatter.error(&format!("Failed to list bucket {}: {e}", args.bucket));
            ExitCode::from_error(&e)
        }
    }
}
