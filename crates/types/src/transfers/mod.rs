//! Transfer domain models
//!
//! A [`Transfer`] is the canonical record of one submission, whichever of the
//! four [`Pathway`]s carried it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod errors;
pub mod state;

pub use errors::{
	PlanFailure, RoutingError, SigningError, SubmissionError, TransferError, TransferResult,
	UserFacingError, UserFacingIssue,
};
pub use state::SubmissionState;

/// Route a transfer takes between two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pathway {
	EthereumToAssetHub,
	AssetHubToEthereum,
	AssetHubToParachain,
	ParachainToAssetHub,
}

impl Pathway {
	pub const ALL: [Pathway; 4] = [
		Pathway::EthereumToAssetHub,
		Pathway::AssetHubToEthereum,
		Pathway::AssetHubToParachain,
		Pathway::ParachainToAssetHub,
	];

	/// Family used to tag validation and plan errors
	pub fn family(&self) -> PathwayFamily {
		match self {
			Pathway::AssetHubToEthereum => PathwayFamily::ToEthereum,
			Pathway::EthereumToAssetHub
			| Pathway::AssetHubToParachain
			| Pathway::ParachainToAssetHub => PathwayFamily::ToPolkadot,
		}
	}

	/// Whether the bridge SDK plans and sends this pathway
	pub fn uses_bridge(&self) -> bool {
		matches!(
			self,
			Pathway::EthereumToAssetHub | Pathway::AssetHubToEthereum
		)
	}

	/// Whether a parachain sits on either end
	pub fn involves_parachain(&self) -> bool {
		!self.uses_bridge()
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Pathway::EthereumToAssetHub => "ethereumToAssetHub",
			Pathway::AssetHubToEthereum => "assetHubToEthereum",
			Pathway::AssetHubToParachain => "assetHubToParachain",
			Pathway::ParachainToAssetHub => "parachainToAssetHub",
		}
	}
}

impl fmt::Display for Pathway {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Coarse direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathwayFamily {
	ToEthereum,
	ToPolkadot,
}

impl fmt::Display for PathwayFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PathwayFamily::ToEthereum => f.write_str("toEthereum"),
			PathwayFamily::ToPolkadot => f.write_str("toPolkadot"),
		}
	}
}

/// Lifecycle of an indexed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
	Pending,
	Complete,
	Failed,
}

/// A fully formed request to move funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
	pub source: String,
	pub destination: String,
	pub source_account: String,
	pub beneficiary: String,
	/// Token address as listed in the destination's receivable tokens
	pub token: String,
	#[serde(with = "crate::amount")]
	pub amount: u128,
}

/// Descriptive part of a transfer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInfo {
	pub when: DateTime<Utc>,
	pub source_address: String,
	pub beneficiary_address: String,
	pub token_address: String,
	#[serde(with = "crate::amount")]
	pub amount: u128,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pathway: Option<Pathway>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub destination_location: Option<String>,
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		with = "crate::amount::option"
	)]
	pub destination_fee: Option<u128>,
}

/// Receipt of an extrinsic submitted on a substrate ledger and bridged to Ethereum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateReceipt {
	pub block_hash: String,
	pub block_number: u64,
	pub extrinsic_hash: String,
	/// `<block number>-<extrinsic index>`
	pub extrinsic_index: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relay_block_hash: Option<String>,
	pub account_id: String,
	pub success: bool,
}

/// Receipt of a gateway transaction on Ethereum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumReceipt {
	pub block_hash: String,
	pub block_number: u64,
	pub transaction_hash: String,
	pub channel_id: String,
	pub log_index: u64,
	pub nonce: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_beacon_slot: Option<u64>,
}

/// Receipt of an XCM extrinsic between the Asset Hub and a parachain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcmReceipt {
	pub block_hash: String,
	pub block_number: u64,
	pub extrinsic_hash: String,
	pub extrinsic_index: String,
	pub account_id: String,
	pub success: bool,
}

/// Pathway-specific submission receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmissionReceipt {
	ToEthereum(SubstrateReceipt),
	ToPolkadot(EthereumReceipt),
	Xcm(XcmReceipt),
}

impl SubmissionReceipt {
	/// Hash identifying the submitted transaction or extrinsic
	pub fn transaction_hash(&self) -> &str {
		match self {
			SubmissionReceipt::ToEthereum(receipt) => &receipt.extrinsic_hash,
			SubmissionReceipt::ToPolkadot(receipt) => &receipt.transaction_hash,
			SubmissionReceipt::Xcm(receipt) => &receipt.extrinsic_hash,
		}
	}

	pub fn block_hash(&self) -> &str {
		match self {
			SubmissionReceipt::ToEthereum(receipt) => &receipt.block_hash,
			SubmissionReceipt::ToPolkadot(receipt) => &receipt.block_hash,
			SubmissionReceipt::Xcm(receipt) => &receipt.block_hash,
		}
	}
}

/// Canonical record of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
	/// Bridge message id, empty until the chain assigns one
	pub id: String,
	pub status: TransferStatus,
	pub info: TransferInfo,
	pub submitted: SubmissionReceipt,
	#[serde(default)]
	pub is_wallet_transaction: bool,
}

impl Transfer {
	/// Reconciliation key: the message id, or the transaction hash while no id is known
	pub fn key(&self) -> &str {
		if self.id.is_empty() {
			self.submitted.transaction_hash()
		} else {
			&self.id
		}
	}

	pub fn when(&self) -> DateTime<Utc> {
		self.info.when
	}

	/// Link to the transfer in the history view
	pub fn history_url(&self) -> String {
		format!("/history#{}", self.key())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn transfer(id: &str) -> Transfer {
		Transfer {
			id: id.to_string(),
			status: TransferStatus::Pending,
			info: TransferInfo {
				when: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
				source_address: "0xsource".to_string(),
				beneficiary_address: "5Beneficiary".to_string(),
				token_address: "0xc02a".to_string(),
				amount: 1_000_000_000_000_000_000,
				pathway: Some(Pathway::EthereumToAssetHub),
				source_location: Some("ethereum".to_string()),
				destination_location: Some("assethub".to_string()),
				destination_fee: None,
			},
			submitted: SubmissionReceipt::ToPolkadot(EthereumReceipt {
				block_hash: "0xblock".to_string(),
				block_number: 21_000_000,
				transaction_hash: "0xtx".to_string(),
				channel_id: "0xchannel".to_string(),
				log_index: 3,
				nonce: 77,
				parent_beacon_slot: Some(10_000),
			}),
			is_wallet_transaction: true,
		}
	}

	#[test]
	fn test_pathway_families() {
		assert_eq!(
			Pathway::AssetHubToEthereum.family(),
			PathwayFamily::ToEthereum
		);
		assert_eq!(
			Pathway::EthereumToAssetHub.family(),
			PathwayFamily::ToPolkadot
		);
		assert!(Pathway::EthereumToAssetHub.uses_bridge());
		assert!(Pathway::AssetHubToEthereum.uses_bridge());
		assert!(Pathway::ParachainToAssetHub.involves_parachain());
		assert!(Pathway::AssetHubToParachain.involves_parachain());
	}

	#[test]
	fn test_key_falls_back_to_transaction_hash() {
		assert_eq!(transfer("0xabc").key(), "0xabc");
		assert_eq!(transfer("").key(), "0xtx");
		assert_eq!(transfer("").history_url(), "/history#0xtx");
	}

	#[test]
	fn test_transfer_serde_shape() {
		let json = serde_json::to_value(transfer("0xabc")).unwrap();
		assert_eq!(json["status"], "Pending");
		assert_eq!(json["info"]["amount"], "1000000000000000000");
		assert_eq!(json["submitted"]["kind"], "toPolkadot");
		assert_eq!(json["submitted"]["transactionHash"], "0xtx");
		assert_eq!(json["isWalletTransaction"], true);

		let back: Transfer = serde_json::from_value(json).unwrap();
		assert_eq!(back, transfer("0xabc"));
	}
}
