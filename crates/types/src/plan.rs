//! Transfer plans and the instructions they carry
//!
//! A [`TransferPlan`] is produced during preflight and never persisted. On
//! success it carries the exact [`PreparedInstruction`] presented to the wallet.

use serde::{Deserialize, Serialize};

use crate::transfers::{Pathway, SubmissionReceipt};

/// Options forwarded to the bridge SDK when planning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
	#[serde(default, skip_serializing_if = "Option::is_none", with = "crate::amount::option")]
	pub destination_fee: Option<u128>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_consumers: Option<u32>,
	#[serde(default)]
	pub skip_existential_deposit_check: bool,
}

/// Preflight request for the two bridge pathways
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
	pub pathway: Pathway,
	pub source_account: String,
	pub beneficiary: String,
	pub token: String,
	#[serde(with = "crate::amount")]
	pub amount: u128,
	/// Para id of the substrate end of the transfer
	pub para_id: u32,
	#[serde(default)]
	pub options: SendOptions,
}

/// A typed preflight error reported by the bridge SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanError {
	pub code: String,
	pub message: String,
}

impl PlanError {
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			message: message.into(),
		}
	}
}

/// Instruction prepared by the bridge SDK, opaque to this crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeInstruction {
	pub pathway: Pathway,
	pub source_account: String,
	pub payload: serde_json::Value,
}

/// XCM call issued between the Asset Hub and a parachain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum XcmCall {
	/// Asset Hub reserve transfer into a parachain
	TransferAssetsUsingTypeAndThen {
		dest_para_id: u32,
		asset: String,
		#[serde(with = "crate::amount")]
		amount: u128,
		beneficiary: String,
	},
	/// Parachain asset switch pool back to the Asset Hub
	Switch {
		pallet: String,
		#[serde(with = "crate::amount")]
		amount: u128,
		beneficiary: String,
	},
}

/// Instruction built locally for the parachain pathways
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcmInstruction {
	pub pathway: Pathway,
	/// Location id of the chain the extrinsic is submitted on
	pub submit_on: String,
	pub source_account: String,
	pub call: XcmCall,
}

/// Instruction ready for signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PreparedInstruction {
	Bridge(BridgeInstruction),
	Xcm(XcmInstruction),
}

impl PreparedInstruction {
	pub fn pathway(&self) -> Pathway {
		match self {
			PreparedInstruction::Bridge(instruction) => instruction.pathway,
			PreparedInstruction::Xcm(instruction) => instruction.pathway,
		}
	}

	pub fn source_account(&self) -> &str {
		match self {
			PreparedInstruction::Bridge(instruction) => &instruction.source_account,
			PreparedInstruction::Xcm(instruction) => &instruction.source_account,
		}
	}
}

/// Outcome of preflight validation by the bridge SDK
#[derive(Debug, Clone, PartialEq)]
pub enum TransferPlan {
	Success(PreparedInstruction),
	Failure(Vec<PlanError>),
}

impl TransferPlan {
	pub fn is_success(&self) -> bool {
		matches!(self, TransferPlan::Success(_))
	}
}

/// Instruction signed by the wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInstruction {
	pub signer: String,
	pub instruction: PreparedInstruction,
	pub signature: String,
}

/// What the bridge SDK reports once a bridge transaction is first included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
	pub message_id: String,
	pub receipt: SubmissionReceipt,
}
