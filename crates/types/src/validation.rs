//! Validation failures and the account data they are judged on

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transfers::PathwayFamily;

/// Verdict of the sanctions screening service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreeningVerdict {
	Allowed,
	Blocked,
}

/// On-chain account data relevant to transfer validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
	#[serde(with = "crate::amount")]
	pub free: u128,
	pub sufficients: u32,
	pub providers: u32,
	pub consumers: u32,
}

impl AccountData {
	/// An account exists on chain when it holds a sufficient asset or has a provider
	pub fn is_sufficient(&self) -> bool {
		self.sufficients > 0 || self.providers > 0
	}
}

/// XCM execution fee and the asset it is charged in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcmFee {
	pub asset_id: String,
	#[serde(with = "crate::amount")]
	pub amount: u128,
}

/// A single unmet precondition
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum ValidationFailure {
	#[error("Amount must be greater than 0.")]
	ZeroAmount,

	#[error("Cannot send less than minimum value of {minimum}.")]
	BelowMinimum {
		#[serde(with = "crate::amount")]
		minimum: u128,
		#[serde(with = "crate::amount")]
		amount: u128,
	},

	#[error("Address {address} is blocked by sanctions screening.")]
	SanctionedAddress { address: String },

	#[error("Sanctions screening unavailable for {address}: {reason}")]
	ScreeningUnavailable { address: String, reason: String },

	#[error("Beneficiary account on {chain} holds no sufficient asset or provider.")]
	InsufficientDestinationAccount { chain: String },

	#[error("Unable to retrieve sufficients on {chain}: {reason}")]
	AccountQueryFailed { chain: String, reason: String },

	#[error("XCM fee of {fee} exceeds fee asset balance of {balance}.")]
	XcmFeeUnaffordable {
		#[serde(with = "crate::amount")]
		fee: u128,
		#[serde(with = "crate::amount")]
		balance: u128,
	},

	#[error("Unable to retrieve XCM fee balance: {reason}")]
	XcmFeeQueryFailed { reason: String },
}

/// A validation failure tagged with the direction of travel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
	pub kind: PathwayFamily,
	pub failure: ValidationFailure,
}

impl ValidationIssue {
	pub fn new(kind: PathwayFamily, failure: ValidationFailure) -> Self {
		Self { kind, failure }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sufficiency_requires_either_counter() {
		let empty = AccountData::default();
		assert!(!empty.is_sufficient());

		let with_sufficient = AccountData {
			sufficients: 1,
			..AccountData::default()
		};
		assert!(with_sufficient.is_sufficient());

		let with_provider = AccountData {
			providers: 2,
			..AccountData::default()
		};
		assert!(with_provider.is_sufficient());
	}

	#[test]
	fn test_failure_messages() {
		assert_eq!(
			ValidationFailure::BelowMinimum {
				minimum: 10_000_000_000,
				amount: 5
			}
			.to_string(),
			"Cannot send less than minimum value of 10000000000."
		);

		let issue = ValidationIssue::new(
			PathwayFamily::ToEthereum,
			ValidationFailure::SanctionedAddress {
				address: "0xbad".to_string(),
			},
		);
		let json = serde_json::to_value(&issue).unwrap();
		assert_eq!(json["kind"], "toEthereum");
		assert_eq!(json["failure"]["code"], "sanctionedAddress");
	}

	#[test]
	fn test_failure_reason_serialized_alongside_code() {
		let failure = ValidationFailure::ScreeningUnavailable {
			address: "0xabc".to_string(),
			reason: "timeout".to_string(),
		};
		let json = serde_json::to_value(&failure).unwrap();
		assert_eq!(json["code"], "screeningUnavailable");
		assert_eq!(json["reason"], "timeout");
		assert_eq!(json["address"], "0xabc");
	}
}
