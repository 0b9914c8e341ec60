//! Data exchanged with chain clients and the history indexer

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Extrinsic that reached finality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedExtrinsic {
	pub block_hash: String,
	pub block_number: u64,
	pub extrinsic_hash: String,
	pub extrinsic_index: u32,
	/// Id of the XCM message the extrinsic sent, when one was emitted
	#[serde(default)]
	pub message_id: Option<String>,
	/// Dispatch error when the extrinsic was included but failed
	#[serde(default)]
	pub dispatch_error: Option<String>,
}

/// Progress of a submitted extrinsic as reported by the chain client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ExtrinsicEvent {
	InBlock {
		block_hash: String,
		extrinsic_hash: String,
	},
	Finalized(FinalizedExtrinsic),
	Error {
		reason: String,
	},
}

/// Time range of a history query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
	pub from: DateTime<Utc>,
	pub to: DateTime<Utc>,
}

impl HistoryWindow {
	/// Window of the given length ending at `now`
	pub fn ending_at(now: DateTime<Utc>, length: Duration) -> Self {
		Self {
			from: now - length,
			to: now,
		}
	}

	pub fn contains(&self, when: DateTime<Utc>) -> bool {
		when >= self.from && when <= self.to
	}
}
