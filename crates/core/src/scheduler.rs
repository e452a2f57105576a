//! Bounded-parallelism task scheduler
//!
//! The scheduler admits pending tasks in submission order and keeps at most
//! `concurrency` of them running. As soon as one reaches a terminal state the
//! next pending task is admitted. A failing or panicking task is recorded as
//! `Failed` and never affects its siblings. [`Scheduler::run`] returns only
//! once every task is terminal.
//!
//! Workers receive a copy of their task; status transitions happen only
//! here, in the scheduler loop, so no task is ever mutated from two places.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};
use tokio::time::Instant;
use tracing::{Instrument, debug, warn};

use crate::error::Result;
use crate::task::{FailureKind, TaskFailure, TransferTask};
use crate::traits::TransferObserver;

/// Default number of tasks that may run at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Executes transfer tasks with bounded parallelism
#[derive(Clone)]
pub struct Scheduler {
    concurrency: usize,
    observer: Option<Arc<dyn TransferObserver>>,
}

impl Scheduler {
    /// Create a scheduler running at most `concurrency` tasks at once
    ///
    /// A concurrency of zero is raised to one.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            observer: None,
        }
    }

    /// Attach an observer notified after every terminal transition
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every task to completion and return them in submission order
    ///
    /// `work` is called once per admitted task with a copy of it. Tasks that
    /// are already terminal pass through untouched. When `deadline` passes,
    /// in-flight work is aborted and every non-terminal task fails with
    /// `FailureKind::Timeout`.
    pub async fn run<F, Fut>(
        &self,
        tasks: Vec<TransferTask>,
        work: F,
        deadline: Option<Instant>,
    ) -> Vec<TransferTask>
    where
        F: Fn(TransferTask) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut slots = tasks;
        let mut pending: VecDeque<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, task)| !task.is_terminal())
            .map(|(index, _)| index)
            .collect();

        for task in slots.iter().filter(|t| t.is_terminal()) {
            self.notify(task);
        }

        let mut running: JoinSet<Result<()>> = JoinSet::new();
        let mut in_flight: HashMap<Id, usize> = HashMap::new();

        debug!(
            total = slots.len(),
            pending = pending.len(),
            concurrency = self.concurrency,
            "Starting batch"
        );

        loop {
            while running.len() < self.concurrency {
                let Some(index) = pending.pop_front() else {
                    break;
                };
                let task = &mut slots[index];
                task.mark_running();

                let span = tracing::info_span!(
                    "transfer",
                    operation = %task.operation,
                    bucket = %task.bucket,
                    key = %task.key,
                );
                debug!(parent: &span, "Admitting task");

                let handle = running.spawn(work(task.clone()).instrument(span));
                in_flight.insert(handle.id(), index);
            }

            if running.is_empty() {
                break;
            }

            let joined = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, running.join_next_with_id()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            self.expire(&mut slots, &mut running, &mut in_flight, pending)
                                .await;
                            return slots;
                        }
                    }
                }
                None => running.join_next_with_id().await,
            };

            let Some(joined) = joined else {
                break;
            };
            self.record(&mut slots, &mut in_flight, joined);
        }

        slots
    }

    /// Abort in-flight work and fail every task that has not finished
    async fn expire(
        &self,
        slots: &mut [TransferTask],
        running: &mut JoinSet<Result<()>>,
        in_flight: &mut HashMap<Id, usize>,
        pending: VecDeque<usize>,
    ) {
        warn!(
            running = running.len(),
            pending = pending.len(),
            "Operation deadline reached, failing unfinished tasks"
        );
        running.abort_all();

        // Tasks that finished before the abort landed keep their real outcome.
        while let Some(joined) = running.join_next_with_id().await {
            self.record(slots, in_flight, joined);
        }

        for index in pending {
            let task = &mut slots[index];
            task.mark_failed(TaskFailure::timeout());
            self.notify(task);
        }
    }

    fn record(
        &self,
        slots: &mut [TransferTask],
        in_flight: &mut HashMap<Id, usize>,
        joined: std::result::Result<(Id, Result<()>), tokio::task::JoinError>,
    ) {
        let (id, outcome) = match joined {
            Ok((id, result)) => (id, result.map_err(TaskFailure::from)),
            Err(join_error) => {
                let failure = if join_error.is_cancelled() {
                    TaskFailure::timeout()
                } else {
                    TaskFailure::new(FailureKind::Other, "task panicked")
                };
                (join_error.id(), Err(failure))
            }
        };

        let Some(index) = in_flight.remove(&id) else {
            return;
        };
        let task = &mut slots[index];

        match outcome {
            Ok(()) => {
                debug!(key = %task.key, operation = %task.operation, "Task succeeded");
                task.mark_succeeded();
            }
            Err(failure) => {
                warn!(
                    key = %task.key,
                    operation = %task.operation,
                    error = %failure,
                    "Task failed"
                );
                task.mark_failed(failure);
            }
        }
        self.notify(task);
    }

    fn notify(&self, task: &TransferTask) {
        if let Some(observer) = &self.observer {
            observer.task_finished(task);
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("concurrency", &self.concurrency)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
