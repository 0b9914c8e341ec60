//! Background job processor implementation
//!
//! Each scheduled job runs on its own interval task. The first run happens
//! immediately; missed ticks are skipped rather than bunched up. A failing
//! or panicking run is logged and the schedule keeps going.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::types::{BackgroundJob, JobError, JobResult};

const TRACING_TARGET: &str = "polar_service::jobs";

/// Trait for handling different types of background jobs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobHandler: Send + Sync {
	/// Handle a background job
	async fn handle(&self, job: BackgroundJob) -> JobResult;
}

/// Outcome of the most recent run of a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
	/// Scheduled but not run yet
	Pending,
	Completed,
	Failed { error: String },
}

/// A recurring job and its last outcome
#[derive(Debug, Clone)]
pub struct ScheduledJob {
	pub id: String,
	pub job: BackgroundJob,
	pub description: String,
	pub interval: Duration,
	pub runs: u64,
	pub last_run: Option<DateTime<Utc>>,
	pub last_status: JobStatus,
}

struct Schedule {
	info: Arc<RwLock<ScheduledJob>>,
	handle: JoinHandle<()>,
}

/// Runs background jobs on fixed intervals
pub struct JobProcessor {
	handler: Arc<dyn JobHandler>,
	schedules: RwLock<HashMap<String, Schedule>>,
}

impl std::fmt::Debug for JobProcessor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JobProcessor").finish_non_exhaustive()
	}
}

impl JobProcessor {
	pub fn new(handler: Arc<dyn JobHandler>) -> Self {
		Self {
			handler,
			schedules: RwLock::new(HashMap::new()),
		}
	}

	/// Run a job once, now, outside any schedule
	pub async fn run_now(&self, job: BackgroundJob) -> JobResult {
		run_guarded(self.handler.as_ref(), job).await
	}

	/// Schedule a job to run at the specified interval
	///
	/// Returns the schedule id.
	pub async fn schedule_job(
		&self,
		interval_duration: Duration,
		job: BackgroundJob,
		description: impl Into<String>,
	) -> JobResult<String> {
		if interval_duration.is_zero() {
			return Err(JobError::InvalidConfig(format!(
				"interval for '{}' must be greater than zero",
				job.description()
			)));
		}

		let id = Uuid::new_v4().to_string();
		let info = Arc::new(RwLock::new(ScheduledJob {
			id: id.clone(),
			job,
			description: description.into(),
			interval: interval_duration,
			runs: 0,
			last_run: None,
			last_status: JobStatus::Pending,
		}));

		let handler = Arc::clone(&self.handler);
		let task_info = Arc::clone(&info);
		let handle = tokio::spawn(async move {
			let mut ticker = interval(interval_duration);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
			loop {
				ticker.tick().await;
				let status = match run_guarded(handler.as_ref(), job).await {
					Ok(()) => JobStatus::Completed,
					Err(e) => {
						warn!(target: TRACING_TARGET, job = job.description(), error = %e, "Job run failed");
						JobStatus::Failed {
							error: e.to_string(),
						}
					},
				};
				let mut info = task_info.write().await;
				info.runs += 1;
				info.last_run = Some(Utc::now());
				info.last_status = status;
			}
		});

		info!(
			target: TRACING_TARGET,
			schedule_id = %id,
			job = job.description(),
			interval_secs = interval_duration.as_secs(),
			"Scheduled recurring job"
		);
		self.schedules
			.write()
			.await
			.insert(id.clone(), Schedule { info, handle });
		Ok(id)
	}

	/// Stop a recurring job
	pub async fn unschedule_job(&self, schedule_id: &str) -> Result<(), String> {
		match self.schedules.write().await.remove(schedule_id) {
			Some(schedule) => {
				schedule.handle.abort();
				info!(target: TRACING_TARGET, schedule_id, "Unscheduled job");
				Ok(())
			},
			None => Err(format!("Scheduled job '{}' not found", schedule_id)),
		}
	}

	pub async fn get_scheduled_jobs(&self) -> Vec<ScheduledJob> {
		let schedules = self.schedules.read().await;
		let mut jobs = Vec::with_capacity(schedules.len());
		for schedule in schedules.values() {
			jobs.push(schedule.info.read().await.clone());
		}
		jobs
	}

	pub async fn get_scheduled_job(&self, schedule_id: &str) -> Option<ScheduledJob> {
		let schedules = self.schedules.read().await;
		match schedules.get(schedule_id) {
			Some(schedule) => Some(schedule.info.read().await.clone()),
			None => None,
		}
	}

	/// Stop every schedule
	pub async fn shutdown(&self) {
		info!(target: TRACING_TARGET, "Shutting down job processor...");
		for (id, schedule) in self.schedules.write().await.drain() {
			debug!(target: TRACING_TARGET, schedule_id = %id, "Cancelling schedule");
			schedule.handle.abort();
		}
		info!(target: TRACING_TARGET, "Job processor shutdown complete");
	}
}

impl Drop for JobProcessor {
	fn drop(&mut self) {
		for schedule in self.schedules.get_mut().values() {
			schedule.handle.abort();
		}
	}
}

async fn run_guarded(handler: &dyn JobHandler, job: BackgroundJob) -> JobResult {
	debug!(target: TRACING_TARGET, job = job.description(), "Running job");
	match AssertUnwindSafe(handler.handle(job)).catch_unwind().await {
		Ok(result) => result,
		Err(_) => {
			error!(target: TRACING_TARGET, job = job.description(), "Job panicked");
			Err(JobError::ProcessingFailed {
				message: format!("{} panicked", job.description()),
			})
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Default)]
	struct CountingHandler {
		calls: AtomicUsize,
		fail: bool,
	}

	#[async_trait]
	impl JobHandler for CountingHandler {
		async fn handle(&self, _job: BackgroundJob) -> JobResult {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.fail {
				Err(JobError::Adapter("indexer unavailable".to_string()))
			} else {
				Ok(())
			}
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_schedule_runs_immediately_then_on_interval() {
		let handler = Arc::new(CountingHandler::default());
		let processor = JobProcessor::new(handler.clone());
		let id = processor
			.schedule_job(
				Duration::from_secs(60),
				BackgroundJob::RefreshBridgeStatus,
				"status",
			)
			.await
			.unwrap();

		tokio::time::sleep(Duration::from_millis(10)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 1);

		tokio::time::sleep(Duration::from_secs(125)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 3);

		let job = processor.get_scheduled_job(&id).await.unwrap();
		assert_eq!(job.runs, 3);
		assert_eq!(job.last_status, JobStatus::Completed);
		assert!(job.last_run.is_some());
	}

	#[tokio::test(start_paused = true)]
	async fn test_failures_keep_schedule_alive() {
		let handler = Arc::new(CountingHandler {
			calls: AtomicUsize::new(0),
			fail: true,
		});
		let processor = JobProcessor::new(handler.clone());
		let id = processor
			.schedule_job(
				Duration::from_secs(300),
				BackgroundJob::RefreshTransferHistory,
				"history",
			)
			.await
			.unwrap();

		tokio::time::sleep(Duration::from_secs(301)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
		assert!(matches!(
			processor.get_scheduled_job(&id).await.unwrap().last_status,
			JobStatus::Failed { .. }
		));
	}

	#[tokio::test(start_paused = true)]
	async fn test_unschedule_and_shutdown_stop_runs() {
		let handler = Arc::new(CountingHandler::default());
		let processor = JobProcessor::new(handler.clone());
		let status = processor
			.schedule_job(Duration::from_secs(60), BackgroundJob::RefreshBridgeStatus, "status")
			.await
			.unwrap();
		processor
			.schedule_job(Duration::from_secs(60), BackgroundJob::RefreshTransferHistory, "history")
			.await
			.unwrap();
		tokio::time::sleep(Duration::from_millis(10)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 2);

		processor.unschedule_job(&status).await.unwrap();
		assert!(processor.unschedule_job(&status).await.is_err());
		tokio::time::sleep(Duration::from_secs(61)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 3);

		processor.shutdown().await;
		assert!(processor.get_scheduled_jobs().await.is_empty());
		tokio::time::sleep(Duration::from_secs(120)).await;
		assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn test_zero_interval_rejected() {
		let processor = JobProcessor::new(Arc::new(CountingHandler::default()));
		let result = processor
			.schedule_job(Duration::ZERO, BackgroundJob::RefreshBridgeStatus, "status")
			.await;
		assert!(matches!(result, Err(JobError::InvalidConfig(_))));
	}

	#[tokio::test]
	async fn test_run_now_uses_handler() {
		let mut handler = MockJobHandler::new();
		handler
			.expect_handle()
			.withf(|job| *job == BackgroundJob::RefreshTransferHistory)
			.times(1)
			.returning(|_| Ok(()));
		let processor = JobProcessor::new(Arc::new(handler));
		assert!(processor
			.run_now(BackgroundJob::RefreshTransferHistory)
			.await
			.is_ok());
	}
}
