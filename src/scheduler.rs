//! Daily digest scheduler for pressdigest.
//!
//! Wakes up once a day at a fixed local time, fetches all feeds once and
//! runs the pipeline for every stored task.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, TimeZone};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::pipeline::{DigestPipeline, RunOutcome};
use crate::task::TaskStore;

/// Outcome of one task in a cycle.
#[derive(Debug, Clone)]
pub struct TaskRun {
    /// Task name.
    pub task: String,
    /// Pipeline outcome for the task.
    pub outcome: RunOutcome,
}

/// Summary of one scheduler cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Number of items collected across all sources.
    pub collected: usize,
    /// Per-task outcomes, in task name order.
    pub runs: Vec<TaskRun>,
}

impl CycleReport {
    /// Number of tasks that succeeded.
    pub fn succeeded(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.success).count()
    }
}

/// Daily digest scheduler.
pub struct DigestScheduler {
    pipeline: Arc<DigestPipeline>,
    store: TaskStore,
    at: NaiveTime,
}

impl DigestScheduler {
    /// Create a scheduler firing daily at `at` in the pipeline's timezone.
    pub fn new(pipeline: Arc<DigestPipeline>, store: TaskStore, at: NaiveTime) -> Self {
        Self {
            pipeline,
            store,
            at,
        }
    }

    /// Daily fire time.
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// Run the scheduler loop.
    ///
    /// This method runs indefinitely.
    pub async fn run(&self) {
        info!(
            "Digest scheduler started (daily at {} {})",
            self.at.format("%H:%M"),
            self.pipeline.tz().name()
        );

        loop {
            let now = self.pipeline.now();
            let next = next_fire_time(now, self.at);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next = %next, "Waiting for next digest cycle");
            sleep(wait).await;

            self.run_cycle(self.pipeline.now()).await;
        }
    }

    /// Run one cycle at `now`: fetch once, then every stored task.
    pub async fn run_cycle(&self, now: DateTime<Tz>) -> CycleReport {
        info!(at = %now, "Digest cycle started");

        let items = self.pipeline.collect().await;
        if items.is_empty() {
            error!("Digest cycle aborted: no items collected");
            return CycleReport::default();
        }

        let tasks = match self.store.list() {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("Failed to load task settings: {}", e);
                return CycleReport {
                    collected: items.len(),
                    runs: Vec::new(),
                };
            }
        };

        if tasks.is_empty() {
            warn!(dir = %self.store.dir().display(), "No task settings to run");
        }

        let mut runs = Vec::with_capacity(tasks.len());
        for task in tasks {
            info!(task = %task.setting_name, "Running task");
            let outcome = self.pipeline.run_with_items(now, &items, Some(&task)).await;
            if outcome.success {
                info!(task = %task.setting_name, stage = ?outcome.stage, "Task finished");
            } else {
                error!(
                    task = %task.setting_name,
                    stage = ?outcome.stage,
                    "Task failed: {}",
                    outcome.message
                );
            }
            runs.push(TaskRun {
                task: task.setting_name,
                outcome,
            });
        }

        let report = CycleReport {
            collected: items.len(),
            runs,
        };
        info!(
            collected = report.collected,
            tasks = report.runs.len(),
            succeeded = report.succeeded(),
            "Digest cycle finished"
        );
        report
    }
}

/// Next instant strictly after `now` whose local time is `at`.
///
/// A local time skipped by a DST transition fires at the first valid
/// instant after the gap on that day.
pub fn next_fire_time(now: DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();

    for _ in 0..3 {
        if let Some(candidate) = localize_forward(&tz, date.and_time(at)) {
            if candidate > now {
                return candidate;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    now + ChronoDuration::days(1)
}

fn localize_forward(tz: &Tz, local: chrono::NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=2).find_map(|hours| {
        tz.from_local_datetime(&(local + ChronoDuration::hours(hours)))
            .earliest()
    })
}

/// Start the scheduler as a background task.
pub fn start_scheduler(scheduler: DigestScheduler) -> JoinHandle<()> {
    tokio::spawn(async move {
        scheduler.run().await;
    })
}
