//! Background job types and definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ServiceError;

/// Errors that can occur during job processing
#[derive(Debug, Error)]
pub enum JobError {
	#[error("Job processing failed: {message}")]
	ProcessingFailed { message: String },

	#[error("Bridge context is not ready")]
	NotReady,

	#[error("Adapter error: {0}")]
	Adapter(String),

	#[error("Invalid job configuration: {0}")]
	InvalidConfig(String),
}

impl From<ServiceError> for JobError {
	fn from(error: ServiceError) -> Self {
		match error {
			ServiceError::NotReady => JobError::NotReady,
			ServiceError::Adapter(e) => JobError::Adapter(e.to_string()),
		}
	}
}

/// Result type for job operations
pub type JobResult<T = ()> = Result<T, JobError>;

/// Background job types that can be processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundJob {
	/// Fetch bridge status and replace the cached report
	RefreshBridgeStatus,

	/// Fetch transfer history and reconcile pending transfers
	RefreshTransferHistory,
}

impl BackgroundJob {
	/// Get a human-readable description of the job
	pub fn description(&self) -> &'static str {
		match self {
			BackgroundJob::RefreshBridgeStatus => "Refresh bridge status",
			BackgroundJob::RefreshTransferHistory => "Refresh transfer history",
		}
	}
}
