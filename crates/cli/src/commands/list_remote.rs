//! list-remote command - List objects in a bucket

use clap::Args;
use serde::Serialize;

use csutil_core::{ObjectInfo, Overrides, TransferOptions};

use super::{close, connect};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List objects in a bucket
#[derive(Args, Debug)]
pub struct ListRemoteArgs {
    /// Bucket to list
    pub bucket: String,

    /// Only list keys starting with this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for list-remote (JSON format)
#[derive(Debug, Serialize)]
struct ListOutput {
    items: Vec<ObjectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_objects: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn of(items: &[ObjectInfo]) -> Self {
        let total_size_bytes: u64 = items.iter().filter_map(|i| i.size_bytes).sum();
        Self {
            total_objects: items.len(),
            total_size_bytes,
            total_size_human: humansize::format_size(total_size_bytes, humansize::BINARY),
        }
    }
}

/// Execute the list-remote command
pub async fn execute(
    args: ListRemoteArgs,
    overrides: &Overrides,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let broker = match connect(overrides, &formatter, None).await {
        Ok(broker) => broker,
        Err(code) => return code,
    };

    let options = TransferOptions {
        prefix: args.prefix.clone(),
    };
    let result = broker.list_with(&args.bucket, &options).await;
    close(broker).await;

    let items = match result {
        Ok(items) => items,
        Err(e) => {
            formatter.error(&format!("Failed to list bucket {}: {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        let summary = args.summarize.then(|| Summary::of(&items));
        formatter.json(&ListOutput { items, summary });
        return ExitCode::Success;
    }

    for item in &items {
        formatter.println(&format_line(item));
    }
    if args.summarize {
        let summary = Summary::of(&items);
        formatter.println(&format!(
            "\nTotal: {} objects, {}",
            summary.total_objects, summary.total_size_human
        ));
    }

    ExitCode::Success
}

fn format_line(item: &ObjectInfo) -> String {
    let date = item
        .last_modified
        .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| " ".repeat(19));
    let size = item.size_human().unwrap_or_else(|| "-".to_string());
    format!("[{date}] {size:>10} {}", item.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let items = vec![ObjectInfo::file("a", 1024), ObjectInfo::file("b", 1024)];
        let summary = Summary::of(&items);
        assert_eq!(summary.total_objects, 2);
        assert_eq!(summary.total_size_bytes, 2048);
        assert_eq!(summary.total_size_human, "2 KiB");
    }

    #[test]
    fn test_format_line() {
        let mut item = ObjectInfo::file("logs/app.log", 1024);
        item.last_modified = Some("2024-03-01T12:30:00Z".parse().unwrap());
        assert_eq!(
            format_line(&item),
            "[2024-03-01 12:30:00]      1 KiB logs/app.log"
        );

        let line = format_line(&ObjectInfo::key_only("x"));
        assert!(line.ends_with("- x"));
    }
}
