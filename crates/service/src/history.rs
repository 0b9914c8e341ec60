//! Transfer history refresh

use chrono::{DateTime, Utc};
use polar_types::{HistoryIndexer, HistoryWindow, Transfer};
use std::sync::Arc;
use tracing::debug;

use crate::{context::with_timeout, error::ServiceResult, reconciler::TransferReconciler};

const TRACING_TARGET: &str = "polar_service::history";

/// Pulls history from the indexer and hands it to the reconciler
#[derive(Debug)]
pub struct HistoryService {
	indexer: Arc<dyn HistoryIndexer>,
	reconciler: Arc<TransferReconciler>,
	window: chrono::Duration,
	timeout_ms: u64,
}

impl HistoryService {
	pub fn new(
		indexer: Arc<dyn HistoryIndexer>,
		reconciler: Arc<TransferReconciler>,
		window: std::time::Duration,
		timeout_ms: u64,
	) -> Self {
		Self {
			indexer,
			reconciler,
			window: chrono::Duration::from_std(window).unwrap_or(chrono::Duration::weeks(2)),
			timeout_ms,
		}
	}

	pub fn reconciler(&self) -> &Arc<TransferReconciler> {
		&self.reconciler
	}

	/// Transfers within the window ending at `now`, newest first
	pub async fn fetch(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Transfer>> {
		let window = HistoryWindow::ending_at(now, self.window);
		let mut transfers = with_timeout(self.timeout_ms, self.indexer.fetch_history(&window)).await?;
		transfers.retain(|transfer| window.contains(transfer.when()));
		transfers.sort_by(|a, b| b.when().cmp(&a.when()));
		Ok(transfers)
	}

	/// Fetch and reconcile; returns how many pending transfers were resolved.
	/// Pending transfers older than the window are dropped.
	pub async fn refresh(&self) -> ServiceResult<usize> {
		let now = Utc::now();
		let transfers = self.fetch(now).await?;
		let count = transfers.len();
		let resolved = self.reconciler.reconcile(transfers).await;
		let expired = self.reconciler.expire_before(now - self.window);
		debug!(target: TRACING_TARGET, count, resolved, expired, "Refreshed transfer history");
		Ok(resolved)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ServiceError;
	use polar_types::{test_utils::*, TransferStatus};
	use std::time::Duration;

	fn service(indexer: Arc<MockHistoryIndexer>) -> HistoryService {
		HistoryService::new(
			indexer,
			Arc::new(TransferReconciler::new()),
			Duration::from_secs(1_209_600),
			1_000,
		)
	}

	#[tokio::test]
	async fn test_fetch_sorts_and_bounds_to_window() {
		let indexer = Arc::new(MockHistoryIndexer::with_transfers(vec![
			sample_transfer("0xold", timestamp(0), TransferStatus::Complete),
			sample_transfer("0xnew", timestamp(90), TransferStatus::Pending),
			sample_transfer("0xmid", timestamp(45), TransferStatus::Complete),
		]));
		let service = service(indexer.clone());
		let now = timestamp(120);

		let ids: Vec<_> = service
			.fetch(now)
			.await
			.unwrap()
			.into_iter()
			.map(|t| t.id)
			.collect();
		assert_eq!(ids, vec!["0xnew", "0xmid", "0xold"]);

		let window = indexer.last_window.lock().unwrap().unwrap();
		assert_eq!(window.to, now);
		assert_eq!(window.to - window.from, chrono::Duration::days(14));
	}

	#[tokio::test]
	async fn test_refresh_reconciles_pending() {
		let indexer = Arc::new(MockHistoryIndexer::with_transfers(vec![sample_transfer(
			"0xabc",
			Utc::now() - chrono::Duration::minutes(5),
			TransferStatus::Complete,
		)]));
		let service = service(indexer);
		service.reconciler().add(sample_transfer(
			"0xabc",
			Utc::now() - chrono::Duration::minutes(5),
			TransferStatus::Pending,
		));

		assert_eq!(service.refresh().await.unwrap(), 1);
		assert!(service.reconciler().pending().is_empty());
		assert_eq!(service.reconciler().merged_view().await.len(), 1);
	}

	#[tokio::test]
	async fn test_refresh_failure_keeps_previous_snapshot() {
		let indexer = Arc::new(MockHistoryIndexer::with_transfers(vec![sample_transfer(
			"0xabc",
			Utc::now(),
			TransferStatus::Complete,
		)]));
		let service = service(indexer.clone());
		service.refresh().await.unwrap();

		indexer.set_failing(true);
		assert!(matches!(service.refresh().await, Err(ServiceError::Adapter(_))));
		assert_eq!(service.reconciler().merged_view().await.len(), 1);
	}

	#[tokio::test]
	async fn test_refresh_expires_pending_outside_window() {
		let service = service(Arc::new(MockHistoryIndexer::default()));
		service.reconciler().add(sample_transfer(
			"0xunindexed",
			Utc::now() - chrono::Duration::days(15),
			TransferStatus::Pending,
		));
		service.reconciler().add(sample_transfer(
			"0xrecent",
			Utc::now() - chrono::Duration::hours(1),
			TransferStatus::Pending,
		));

		assert_eq!(service.refresh().await.unwrap(), 0);
		assert!(!service.reconciler().is_pending("0xunindexed"));
		assert!(service.reconciler().is_pending("0xrecent"));
		assert_eq!(service.reconciler().merged_view().await.len(), 1);
	}
}
