//! pull command - Download objects matching patterns

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use csutil_core::{Overrides, TransferObserver, TransferOptions};

use super::{close, connect};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, TransferProgress};

/// Download objects from a bucket
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Source bucket
    pub bucket: String,

    /// Local directory to download into
    pub destination: PathBuf,

    /// Object keys or wildcards (quote them, e.g. '*.csv')
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Only consider keys under this prefix; it is stripped from file names
    #[arg(short, long)]
    pub prefix: Option<String>,
}

/// Execute the pull command
pub async fn execute(args: PullArgs, overrides: &Overrides, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let progress = Arc::new(TransferProgress::new(formatter.config(), "Downloading", None));
    let observer: Arc<dyn TransferObserver> = progress.clone();
    let broker = match connect(overrides, &formatter, Some(observer)).await {
        Ok(broker) => broker,
        Err(code) => return code,
    };

    let options = TransferOptions {
        prefix: args.prefix.clone(),
    };
    let result = broker
        .pull_with(&args.bucket, &args.destination, &args.patterns, &options)
        .await;
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
