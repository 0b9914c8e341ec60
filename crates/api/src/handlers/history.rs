//! Transfer history handler

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use polar_types::Transfer;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
	/// Indexed history merged with still-pending local transfers, newest first
	pub transfers: Vec<Transfer>,
	pub pending: usize,
	/// When the indexed part was fetched; absent before the first refresh
	pub fetched_at: Option<DateTime<Utc>>,
}

/// GET /api/v1/history
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
	let transfers = state.reconciler.merged_view().await;
	let fetched_at = state
		.reconciler
		.history()
		.await
		.map(|snapshot| snapshot.fetched_at);
	Json(HistoryResponse {
		pending: state.reconciler.pending().len(),
		transfers,
		fetched_at,
	})
}
