use std::sync::Arc;

use polar_service::{StatusCache, TransferReconciler};
use polar_types::Environment;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub environment: Arc<Environment>,
	pub status_cache: Arc<StatusCache>,
	pub reconciler: Arc<TransferReconciler>,
}
