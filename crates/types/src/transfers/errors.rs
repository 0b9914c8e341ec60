//! Transfer error taxonomy

use serde::Serialize;
use thiserror::Error;

use super::{Pathway, PathwayFamily};
use crate::{plan::PlanError, validation::ValidationIssue, AdapterError};

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// The selected locations have no pathway between them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
	#[error("No transfer pathway from '{source_id}' to '{destination_id}'")]
	UnsupportedPair {
		source_id: String,
		destination_id: String,
	},
}

/// The bridge SDK rejected the transfer during preflight
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transfer plan rejected with {} error(s)", .errors.len())]
pub struct PlanFailure {
	pub pathway: Pathway,
	pub errors: Vec<PlanError>,
}

/// Wallet signing did not produce a signed instruction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
	#[error("No wallet account connected")]
	SignerMissing,

	#[error("Wallet unavailable: {reason}")]
	WalletUnavailable { reason: String },

	#[error("Signature request rejected by user")]
	Rejected,
}

/// Broadcast or finalization failed on chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
	#[error("Broadcast failed: {reason}")]
	BroadcastFailed { reason: String },

	#[error("Extrinsic {extrinsic_hash} failed: {reason}")]
	ExtrinsicFailed {
		extrinsic_hash: String,
		reason: String,
	},

	#[error("Chain reported an error: {reason}")]
	ChainError { reason: String },

	#[error("Submission status stream closed before finalization")]
	StreamClosed,
}

/// Anything that can stop a transfer from going through
#[derive(Error, Debug)]
pub enum TransferError {
	#[error("Bridge context is not ready")]
	ContextNotReady,

	#[error("A submission is already in flight")]
	AlreadyInFlight,

	#[error("Unknown location: {id}")]
	UnknownLocation { id: String },

	#[error("Invalid form state: {reason}")]
	InvalidRequest { reason: String },

	#[error("No chain client for location '{location}'")]
	ChainClientMissing { location: String },

	#[error(transparent)]
	Routing(#[from] RoutingError),

	#[error("Validation failed with {} issue(s)", .0.len())]
	Validation(Vec<ValidationIssue>),

	#[error(transparent)]
	Plan(#[from] PlanFailure),

	#[error(transparent)]
	Signing(#[from] SigningError),

	#[error(transparent)]
	Submission(#[from] SubmissionError),

	#[error("Submission cancelled")]
	Cancelled,

	#[error("Collaborator error: {0}")]
	Adapter(#[from] AdapterError),

	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition {
		from: super::SubmissionState,
		to: super::SubmissionState,
	},
}

impl TransferError {
	/// Whether the user may simply try again
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			TransferError::Validation(_)
				| TransferError::Signing(_)
				| TransferError::Submission(_)
				| TransferError::Cancelled
				| TransferError::Adapter(_)
				| TransferError::AlreadyInFlight
				| TransferError::ContextNotReady
		)
	}

	/// Convert into the error object shown to the user
	pub fn to_user_facing(&self, family: Option<PathwayFamily>) -> UserFacingError {
		match self {
			TransferError::Plan(failure) => UserFacingError {
				title: "Send Plan Failed".to_string(),
				description: "Some preflight checks failed when planning the transfer.".to_string(),
				errors: failure
					.errors
					.iter()
					.map(|error| UserFacingIssue {
						kind: Some(failure.pathway.family()),
						message: error.message.clone(),
					})
					.collect(),
			},
			TransferError::Validation(issues) => UserFacingError {
				title: "Transfer Validation Failed".to_string(),
				description: "The transfer cannot be submitted until these problems are fixed."
					.to_string(),
				errors: issues
					.iter()
					.map(|issue| UserFacingIssue {
						kind: Some(issue.kind),
						message: issue.failure.to_string(),
					})
					.collect(),
			},
			TransferError::Routing(error) => UserFacingError {
				title: "Unsupported Transfer".to_string(),
				description: error.to_string(),
				errors: Vec::new(),
			},
			TransferError::Signing(SigningError::SignerMissing) => UserFacingError {
				title: "Account not found".to_string(),
				description: "The account used to sign the transaction was not provided."
					.to_string(),
				errors: Vec::new(),
			},
			TransferError::ContextNotReady => UserFacingError {
				title: "Bridge Not Connected".to_string(),
				description: "Context not configured.".to_string(),
				errors: Vec::new(),
			},
			other => UserFacingError {
				title: "Send Error".to_string(),
				description: "Error occurred while trying to send transaction.".to_string(),
				errors: vec![UserFacingIssue {
					kind: family,
					message: other.to_string(),
				}],
			},
		}
	}
}

/// A single line item in a user-facing error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFacingIssue {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub kind: Option<PathwayFamily>,
	pub message: String,
}

/// Error object presented in a dismissible dialog
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{title}: {description}")]
pub struct UserFacingError {
	pub title: String,
	pub description: String,
	pub errors: Vec<UserFacingIssue>,
}
