//! CLI command definitions and execution
//!
//! Each command builds a [`FileBroker`] from the resolved configuration,
//! runs one batch and maps the result to an exit code.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use csutil_core::{CloudConfiguration, FileBroker, Overrides, Platform, TransferObserver};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod delete;
mod list_remote;
mod pull;
mod push;

/// csutil - cloud storage utility
///
/// Push, pull, list and delete files in IBM Cloud Object Storage, Azure
/// Blob Storage or a local directory, many files at a time.
#[derive(Parser, Debug)]
#[command(name = "csutil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Storage platform: ibm, azure or local
    #[arg(long, global = true, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Maximum number of transfers running at once
    #[arg(long, global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Deadline for the whole operation, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload local files to a bucket
    Push(push::PushArgs),

    /// Download objects matching patterns into a directory
    Pull(pull::PullArgs),

    /// Delete objects matching patterns
    Delete(delete::DeleteArgs),

    /// List objects in a bucket
    ListRemote(list_remote::ListRemoteArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse().map_err(|e: csutil_core::Error| e.to_string())
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let overrides = Overrides {
        platform: cli.platform,
        concurrency: cli.concurrency,
        timeout_secs: cli.timeout,
    };

    match cli.command {
        Commands::Push(args) => push::execute(args, &overrides, output_config).await,
        Commands::Pull(args) => pull::execute(args, &overrides, output_config).await,
        Commands::Delete(args) => delete::execute(args, &overrides, output_config).await,
        Commands::ListRemote(args) => list_remote::execute(args, &overrides, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve configuration and connect to the selected provider
///
/// Errors are reported through `formatter` and returned as the exit code.
async fn connect(
    overrides: &Overrides,
    formatter: &Formatter,
    observer: Option<Arc<dyn TransferObserver>>,
) -> Result<FileBroker, ExitCode> {
    let config = CloudConfiguration::load(overrides).map_err(|e| {
        formatter.error(&e.to_string());
        ExitCode::from_error(&e)
    })?;

    let provider = csutil_providers::connect(&config).await.map_err(|e| {
        formatter.error(&format!("Failed to connect to {}: {e}", config.platform()));
        ExitCode::from_error(&e)
    })?;

    tracing::debug!(
        platform = %config.platform(),
        concurrency = config.transfer.concurrency,
        timeout = ?config.transfer.timeout,
        "Configuration resolved"
    );

    let broker = FileBroker::new(provider, &config.transfer);
    Ok(match observer {
        Some(observer) => broker.with_observer(observer),
        None => broker,
    })
}

/// Release the broker, logging rather than failing on close errors
async fn close(broker: FileBroker) {
    if let Err(e) = broker.close().await {
        tracing::warn!(error = %e, "Failed to close storage provider");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "csutil",
            "push",
            "bucket",
            "a.txt",
            "--platform",
            "local",
            "--concurrency",
            "4",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.platform, Some(Platform::Local));
        assert_eq!(cli.concurrency, Some(4));
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Push(_)));
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = Cli::try_parse_from(["csutil", "--platform", "gcp", "list-remote", "b"])
            .unwrap_err();
        assert!(err.to_string().contains("gcp"));
    }

    #[test]
    fn test_pull_requires_pattern() {
        assert!(Cli::try_parse_from(["csutil", "pull", "bucket", "/tmp"]).is_err());
    }
}
