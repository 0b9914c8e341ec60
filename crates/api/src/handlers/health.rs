use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	pub status: &'static str,
	pub environment: String,
	/// Whether a bridge status report has been fetched yet
	pub status_available: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "healthy",
		environment: state.environment.name().to_string(),
		status_available: state.status_cache.get().await.is_some(),
	})
}
