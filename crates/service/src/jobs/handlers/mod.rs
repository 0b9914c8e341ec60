//! Job handler implementations organized by functionality

use async_trait::async_trait;
use std::sync::Arc;

use super::processor::JobHandler;
use super::types::{BackgroundJob, JobResult};
use crate::{history::HistoryService, status::BridgeStatusService, status::StatusCache};

pub mod history_refresh;
pub mod status_refresh;

pub use history_refresh::HistoryRefreshHandler;
pub use status_refresh::StatusRefreshHandler;

/// Dispatches background jobs to their handlers
pub struct BackgroundJobHandler {
	status_refresh: StatusRefreshHandler,
	history_refresh: HistoryRefreshHandler,
}

impl BackgroundJobHandler {
	pub fn new(
		status_service: Arc<BridgeStatusService>,
		status_cache: Arc<StatusCache>,
		history_service: Arc<HistoryService>,
	) -> Self {
		Self {
			status_refresh: StatusRefreshHandler::new(status_service, status_cache),
			history_refresh: HistoryRefreshHandler::new(history_service),
		}
	}
}

#[async_trait]
impl JobHandler for BackgroundJobHandler {
	async fn handle(&self, job: BackgroundJob) -> JobResult {
		match job {
			BackgroundJob::RefreshBridgeStatus => self.status_refresh.handle().await,
			BackgroundJob::RefreshTransferHistory => self.history_refresh.handle().await,
		}
	}
}
