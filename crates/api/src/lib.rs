//! Polar Path API
//!
//! Axum-based read API over the cached bridge status, the merged transfer
//! history and the location registry.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
