//! Error types for collaborator calls

use thiserror::Error;

/// Result type for collaborator calls
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors raised by chain clients, the bridge SDK, indexers and screeners
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("RPC error from {chain}: {reason}")]
	RpcError { chain: String, reason: String },

	#[error("Connection to {chain} lost")]
	Disconnected { chain: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Unsupported operation: {operation} on {client}")]
	UnsupportedOperation { operation: String, client: String },
}

impl AdapterError {
	pub fn rpc(chain: impl Into<String>, reason: impl Into<String>) -> Self {
		AdapterError::RpcError {
			chain: chain.into(),
			reason: reason.into(),
		}
	}

	pub fn is_timeout(&self) -> bool {
		match self {
			AdapterError::Timeout { .. } => true,
			AdapterError::HttpError(e) => e.is_timeout(),
			_ => false,
		}
	}
}
