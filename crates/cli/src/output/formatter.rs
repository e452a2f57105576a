//! Output formatter for human-readable and JSON output
//!
//! Ensures consistent output formatting across all commands.

use console::style;
use serde::Serialize;

use csutil_core::BatchResult;

use super::OutputConfig;

/// Formatter for CLI output
///
/// When JSON mode is enabled, all output is strict JSON without colors or progress.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        if config.no_color || config.json {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{} {message}", self.paint_green("✓"));
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            eprintln!("{} {message}", self.paint_red("✗"));
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", self.paint_yellow("⚠"));
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }

    /// Report a finished batch: the whole result in JSON mode, otherwise
    /// one line per item and a summary
    pub fn batch(&self, result: &BatchResult) {
        if self.config.json {
            self.json(result);
            return;
        }

        for pattern in result.unmatched_patterns() {
            self.warning(&format!("No remote keys match '{pattern}'"));
        }

        let verb = result.operation().verb();
        let done = past_tense(verb);
        for task in result.succeeded() {
            self.println(&format!("{done}: {}", task.display_name()));
        }
        for task in result.failed() {
            let reason = task
                .failure()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown error".to_string());
            self.error(&format!("Failed to {verb} {}: {reason}", task.display_name()));
        }

        if result.is_empty() {
            self.println(&format!("Nothing to {verb}."));
        } else if result.is_success() {
            self.success(&format!("{done} {} item(s).", result.succeeded_count()));
        } else {
            self.warning(&format!(
                "{done} {} of {} item(s); {} failed.",
                result.succeeded_count(),
                result.tasks().len(),
                result.failed_count()
            ));
        }
    }

    fn paint_green(&self, s: &str) -> String {
        if self.colors_enabled() {
            style(s).green().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.colors_enabled() {
            style(s).red().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_yellow(&self, s: &str) -> String {
        if self.colors_enabled() {
            style(s).yellow().to_string()
        } else {
            s.to_string()
        }
    }
}

fn past_tense(verb: &str) -> String {
    match verb {
        "upload" => "Uploaded".into(),
        "download" => "Downloaded".into(),
        "delete" => "Deleted".into(),
        other => format!("{other}ed"),
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
