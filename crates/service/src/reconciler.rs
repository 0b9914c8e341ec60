//! Pending-transfer reconciler
//!
//! Transfers submitted locally stay pending until the history indexer
//! reports them. The merged view shows both, newest first.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use polar_types::Transfer;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

const TRACING_TARGET: &str = "polar_service::reconciler";

/// Last history fetched from the indexer
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
	pub transfers: Vec<Transfer>,
	pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct TransferReconciler {
	pending: DashMap<String, Transfer>,
	history: RwLock<Option<HistorySnapshot>>,
}

impl TransferReconciler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a pending transfer by its key
	pub fn add(&self, transfer: Transfer) {
		debug!(target: TRACING_TARGET, key = transfer.key(), "Tracking pending transfer");
		self.pending.insert(transfer.key().to_string(), transfer);
	}

	/// Store fresh history and drop the pending transfers it now contains
	///
	/// Returns how many pending transfers were resolved.
	pub async fn reconcile(&self, mut history: Vec<Transfer>) -> usize {
		let keys: HashSet<String> = history.iter().map(|t| t.key().to_string()).collect();
		let before = self.pending.len();
		self.pending.retain(|key, _| !keys.contains(key));
		let resolved = before.saturating_sub(self.pending.len());

		sort_newest_first(&mut history);
		*self.history.write().await = Some(HistorySnapshot {
			transfers: history,
			fetched_at: Utc::now(),
		});

		if resolved > 0 {
			debug!(target: TRACING_TARGET, resolved, "Pending transfers found in history");
		}
		resolved
	}

	/// Drop pending transfers submitted before `cutoff`
	///
	/// Entries the indexer never reports under the same key, or reports only
	/// after they leave the history window, would otherwise stay forever.
	pub fn expire_before(&self, cutoff: DateTime<Utc>) -> usize {
		let before = self.pending.len();
		self.pending.retain(|_, transfer| transfer.when() >= cutoff);
		let expired = before.saturating_sub(self.pending.len());
		if expired > 0 {
			debug!(target: TRACING_TARGET, expired, %cutoff, "Expired pending transfers");
		}
		expired
	}

	/// History plus still-pending transfers, newest first
	pub async fn merged_view(&self) -> Vec<Transfer> {
		let history = self.history.read().await;
		let mut merged: Vec<Transfer> = history
			.as_ref()
			.map(|snapshot| snapshot.transfers.clone())
			.unwrap_or_default();
		let known: HashSet<String> = merged.iter().map(|t| t.key().to_string()).collect();
		drop(history);

		let mut pending = self.pending();
		pending.retain(|transfer| !known.contains(transfer.key()));
		merged.extend(pending);
		sort_newest_first(&mut merged);
		merged
	}

	/// Pending transfers, newest first
	pub fn pending(&self) -> Vec<Transfer> {
		let mut pending: Vec<Transfer> = self
			.pending
			.iter()
			.map(|entry| entry.value().clone())
			.collect();
		sort_newest_first(&mut pending);
		pending
	}

	pub fn is_pending(&self, key: &str) -> bool {
		self.pending.contains_key(key)
	}

	pub async fn history(&self) -> Option<HistorySnapshot> {
		self.history.read().await.clone()
	}
}

/// Stable: equal timestamps keep their relative order
fn sort_newest_first(transfers: &mut [Transfer]) {
	transfers.sort_by(|a, b| b.when().cmp(&a.when()));
}

#[cfg(test)]
mod tests {
	use super::*;
	use polar_types::{test_utils::*, TransferStatus};

	#[tokio::test]
	async fn test_history_supersedes_pending() {
		let reconciler = TransferReconciler::new();
		reconciler.add(sample_transfer("0xabc", timestamp(5), TransferStatus::Pending));
		assert!(reconciler.is_pending("0xabc"));

		let resolved = reconciler
			.reconcile(vec![sample_transfer("0xabc", timestamp(5), TransferStatus::Complete)])
			.await;

		assert_eq!(resolved, 1);
		assert!(!reconciler.is_pending("0xabc"));
		let merged = reconciler.merged_view().await;
		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].status, TransferStatus::Complete);
	}

	#[tokio::test]
	async fn test_merged_view_sorted_newest_first() {
		let reconciler = TransferReconciler::new();
		reconciler.add(sample_transfer("0xpending", timestamp(30), TransferStatus::Pending));
		reconciler
			.reconcile(vec![
				sample_transfer("0xold", timestamp(0), TransferStatus::Complete),
				sample_transfer("0xnew", timestamp(60), TransferStatus::Complete),
			])
			.await;

		let ids: Vec<_> = reconciler
			.merged_view()
			.await
			.into_iter()
			.map(|t| t.id)
			.collect();
		assert_eq!(ids, vec!["0xnew", "0xpending", "0xold"]);
	}

	#[tokio::test]
	async fn test_add_replaces_by_key() {
		let reconciler = TransferReconciler::new();
		reconciler.add(sample_transfer("0xabc", timestamp(0), TransferStatus::Pending));
		reconciler.add(sample_transfer("0xabc", timestamp(1), TransferStatus::Failed));

		let pending = reconciler.pending();
		assert_eq!(pending.len(), 1);
		assert_eq!(pending[0].status, TransferStatus::Failed);
	}

	#[tokio::test]
	async fn test_pending_added_after_history_is_not_duplicated() {
		let reconciler = TransferReconciler::new();
		reconciler
			.reconcile(vec![sample_transfer("0xabc", timestamp(0), TransferStatus::Complete)])
			.await;
		reconciler.add(sample_transfer("0xabc", timestamp(0), TransferStatus::Pending));

		assert_eq!(reconciler.merged_view().await.len(), 1);
	}

	#[tokio::test]
	async fn test_transfer_without_id_keyed_by_transaction_hash() {
		let reconciler = TransferReconciler::new();
		let mut transfer = sample_transfer("", timestamp(0), TransferStatus::Pending);
		transfer.submitted = ethereum_receipt("0xtxhash");
		reconciler.add(transfer);
		assert!(reconciler.is_pending("0xtxhash"));
		assert!(reconciler.history().await.is_none());
	}

	#[tokio::test]
	async fn test_pending_older_than_cutoff_expires() {
		let reconciler = TransferReconciler::new();
		reconciler.add(sample_transfer("0xstale", timestamp(0), TransferStatus::Pending));
		reconciler.add(sample_transfer("0xedge", timestamp(60), TransferStatus::Pending));
		reconciler.add(sample_transfer("0xfresh", timestamp(90), TransferStatus::Pending));

		assert_eq!(reconciler.expire_before(timestamp(60)), 1);
		assert!(!reconciler.is_pending("0xstale"));
		assert!(reconciler.is_pending("0xedge"));
		assert!(reconciler.is_pending("0xfresh"));

		let ids: Vec<_> = reconciler
			.merged_view()
			.await
			.into_iter()
			.map(|t| t.id)
			.collect();
		assert_eq!(ids, vec!["0xfresh", "0xedge"]);
		assert_eq!(reconciler.expire_before(timestamp(60)), 0);
	}
}
