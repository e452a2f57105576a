//! Progress display for batch operations
//!
//! [`TransferProgress`] is attached to the broker as a task observer and
//! advances once per finished task.

use std::sync::atomic::{AtomicU64, Ordering};

use csutil_core::{TransferObserver, TransferTask};

use super::OutputConfig;

/// Per-task progress bar
///
/// In quiet, JSON or `--no-progress` mode nothing is drawn, but finished
/// tasks are still counted.
#[derive(Debug)]
pub struct TransferProgress {
    bar: Option<indicatif::ProgressBar>,
    finished: AtomicU64,
    failed: AtomicU64,
}

impl TransferProgress {
    /// Create a bar for `total` tasks, or a counting spinner when the total
    /// is not known before the batch starts
    pub fn new(config: &OutputConfig, label: &str, total: Option<u64>) -> Self {
        let bar = config.show_progress().then(|| {
            let (bar, template) = match total {
                Some(total) => (
                    indicatif::ProgressBar::new(total),
                    "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}",
                ),
                None => (
                    indicatif::ProgressBar::new_spinner(),
                    "{spinner:.green} {prefix} {pos} done {wide_msg}",
                ),
            };
            if let Ok(style) = indicatif::ProgressStyle::default_bar().template(template) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            bar
        });

        Self {
            bar,
            finished: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Number of tasks reported so far
    pub fn finished(&self) -> u64 {
        self.finished.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

impl TransferObserver for TransferProgress {
    fn task_finished(&self, task: &TransferTask) {
        self.finished.fetch_add(1, Ordering::Relaxed);
        if !task.succeeded() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(bar) = &self.bar {
            bar.set_message(task.display_name());
            bar.inc(1);
        }
    }
}
