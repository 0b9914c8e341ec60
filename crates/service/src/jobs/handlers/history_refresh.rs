//! Transfer history refresh job handler

use std::sync::Arc;

use crate::history::HistoryService;
use crate::jobs::types::JobResult;

pub struct HistoryRefreshHandler {
	service: Arc<HistoryService>,
}

impl HistoryRefreshHandler {
	pub fn new(service: Arc<HistoryService>) -> Self {
		Self { service }
	}

	pub async fn handle(&self) -> JobResult {
		self.service.refresh().await?;
		Ok(())
	}
}
