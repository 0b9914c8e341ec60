//! Errors raised by the background services

use polar_types::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("Bridge context is not ready")]
	NotReady,

	#[error("Collaborator error: {0}")]
	Adapter(#[from] AdapterError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
