//! Submission state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a single submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
	Idle,
	Planning,
	PlanFailed,
	Ready,
	AwaitingSignature,
	Submitted,
	Confirmed,
	Failed,
	/// Signing abandoned by the caller before anything was broadcast
	Cancelled,
}

impl SubmissionState {
	/// States an attempt never leaves
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			SubmissionState::PlanFailed
				| SubmissionState::Confirmed
				| SubmissionState::Failed
				| SubmissionState::Cancelled
		)
	}

	/// States in which a wallet prompt or broadcast is outstanding
	pub fn is_in_flight(&self) -> bool {
		matches!(
			self,
			SubmissionState::Planning
				| SubmissionState::Ready
				| SubmissionState::AwaitingSignature
		)
	}

	/// Whether a new attempt may begin from this state.
	///
	/// `Submitted` ends an attempt on the bridge pathways, where finality is
	/// observed later through the history indexer.
	pub fn accepts_new_attempt(&self) -> bool {
		self.is_terminal() || matches!(self, SubmissionState::Idle | SubmissionState::Submitted)
	}

	/// Where an attempt lands when its driver goes away mid-flight.
	///
	/// A dropped wallet prompt counts as cancelled; earlier phases fail.
	/// `None` for states that need no settling.
	pub fn abandoned(&self) -> Option<SubmissionState> {
		match self {
			SubmissionState::Planning | SubmissionState::Ready => Some(SubmissionState::Failed),
			SubmissionState::AwaitingSignature => Some(SubmissionState::Cancelled),
			_ => None,
		}
	}

	/// Allowed moves. `Planning -> Failed` covers form, routing and
	/// validation errors raised before a plan is requested.
	pub fn can_transition_to(&self, next: SubmissionState) -> bool {
		use SubmissionState::*;
		match (self, next) {
			(current, Planning) => current.accepts_new_attempt(),
			(Planning, PlanFailed | Ready | Failed) => true,
			(Ready, AwaitingSignature) => true,
			(AwaitingSignature, Submitted | Failed | Cancelled) => true,
			(Submitted, Confirmed | Failed) => true,
			_ => false,
		}
	}
}

impl Default for SubmissionState {
	fn default() -> Self {
		SubmissionState::Idle
	}
}

impl fmt::Display for SubmissionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SubmissionState::Idle => "idle",
			SubmissionState::Planning => "planning",
			SubmissionState::PlanFailed => "planFailed",
			SubmissionState::Ready => "ready",
			SubmissionState::AwaitingSignature => "awaitingSignature",
			SubmissionState::Submitted => "submitted",
			SubmissionState::Confirmed => "confirmed",
			SubmissionState::Failed => "failed",
			SubmissionState::Cancelled => "cancelled",
		};
		f.write_str(name)
	}
}
