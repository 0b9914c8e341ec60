//! Bridge status handler

use axum::{extract::State, http::StatusCode, response::Json};
use polar_types::BridgeStatus;
use tracing::debug;

use crate::handlers::common::{api_error, ApiError};
use crate::state::AppState;

/// GET /api/v1/status - Latest cached bridge status report
///
/// 503 until the first successful refresh.
pub async fn get_status(State(state): State<AppState>) -> Result<Json<BridgeStatus>, ApiError> {
	match state.status_cache.get().await {
		Some(status) => Ok(Json(BridgeStatus::clone(&status))),
		None => {
			debug!("Bridge status requested before first refresh");
			Err(api_error(
				StatusCode::SERVICE_UNAVAILABLE,
				"STATUS_UNAVAILABLE",
				"Bridge status has not been fetched yet",
			))
		},
	}
}
