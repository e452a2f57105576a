//! csutil - cloud storage utility
//!
//! Batch push, pull, list and delete against IBM Cloud Object Storage,
//! Azure Blob Storage or a local directory.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use csutil::commands::{self, Cli};
use csutil::exit_code::ExitCode;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Credentials may live in a .env file next to the invocation
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: could not read .env file: {e}");
    }

    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = tokio::select! {
        code = commands::execute(cli) => code,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            ExitCode::Interrupted
        }
    };

    // Return instead of exiting so runtime shutdown drops aborted transfers
    // and their partial files are removed
    exit_code.into()
}
