//! Bridge status refresh job handler

use std::sync::Arc;
use tracing::debug;

use crate::jobs::types::JobResult;
use crate::status::{BridgeStatusService, StatusCache};

/// Replaces the cached status report; a failed fetch keeps the previous one
pub struct StatusRefreshHandler {
	service: Arc<BridgeStatusService>,
	cache: Arc<StatusCache>,
}

impl StatusRefreshHandler {
	pub fn new(service: Arc<BridgeStatusService>, cache: Arc<StatusCache>) -> Self {
		Self { service, cache }
	}

	pub async fn handle(&self) -> JobResult {
		let status = self.service.fetch_status().await?;
		debug!(
			target: "polar_service::jobs",
			overall = ?status.summary.overall_status,
			"Bridge status cache updated"
		);
		self.cache.set(status).await;
		Ok(())
	}
}
