//! Bridge status models
//!
//! Raw signals come from the bridge SDK; [`BridgeStatusSummary`] is derived from
//! them on every poll and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locations::LocationKind;

/// Light-client latency above which a direction is reported as delayed: 8 hours
pub const ACCEPTABLE_BRIDGE_LATENCY_SECONDS: u64 = 28_800;

/// Chain-reported flag gating message processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingMode {
	Normal,
	RejectingOutboundMessages,
	Halted,
}

impl OperatingMode {
	pub fn is_normal(&self) -> bool {
		matches!(self, OperatingMode::Normal)
	}
}

/// Raw signals for messages travelling from Ethereum to Polkadot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToPolkadotStatusInfo {
	pub outbound: OperatingMode,
	pub beacon: OperatingMode,
	pub latency_seconds: u64,
	pub latest_beacon_slot_attested: u64,
	pub latest_beacon_slot_finalized: u64,
}

/// Raw signals for messages travelling from Polkadot to Ethereum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToEthereumStatusInfo {
	pub outbound: OperatingMode,
	pub latency_seconds: u64,
	pub latest_polkadot_block: u64,
	pub latest_beefy_block: u64,
}

/// Global bridge status as reported by the bridge SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStatusInfo {
	pub to_ethereum: ToEthereumStatusInfo,
	pub to_polkadot: ToPolkadotStatusInfo,
}

/// Per-direction operating mode of one message channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDirectionInfo {
	pub outbound: OperatingMode,
	pub outbound_nonce: u64,
	pub inbound_nonce: u64,
}

/// Status of one message channel in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatusInfo {
	pub channel_id: String,
	pub to_ethereum: ChannelDirectionInfo,
	pub to_polkadot: ChannelDirectionInfo,
}

/// Everything the aggregator reduces into a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBridgeSignals {
	pub status_info: BridgeStatusInfo,
	pub asset_hub_channel: ChannelStatusInfo,
	pub primary_governance_channel: ChannelStatusInfo,
	pub secondary_governance_channel: ChannelStatusInfo,
}

/// Three-valued health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusValue {
	Normal,
	Delayed,
	Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToPolkadotSummary {
	pub bridge_operational: bool,
	pub channel_operational: bool,
	pub light_client_latency_is_acceptable: bool,
	pub light_client_latency_seconds: u64,
	pub status: StatusValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToEthereumSummary {
	pub bridge_operational: bool,
	pub light_client_latency_is_acceptable: bool,
	pub light_client_latency_seconds: u64,
	pub status: StatusValue,
}

/// Derived health summary for both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStatusSummary {
	pub to_polkadot: ToPolkadotSummary,
	pub to_ethereum: ToEthereumSummary,
	pub overall_status: StatusValue,
}

/// Account whose balance is reported with the bridge status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredAccount {
	pub name: String,
	pub account: String,
	#[serde(rename = "type")]
	pub kind: LocationKind,
	#[serde(with = "crate::amount")]
	pub balance: u128,
}

/// A bridge-owned account to monitor, as reported by the bridge SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAccount {
	pub name: String,
	pub account: String,
	#[serde(rename = "type")]
	pub kind: LocationKind,
}

/// Channel status with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedChannelStatus {
	pub name: String,
	pub status: ChannelStatusInfo,
}

/// Full bridge status report served to the status display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStatus {
	pub status_info: BridgeStatusInfo,
	pub channel_status_infos: Vec<NamedChannelStatus>,
	pub asset_hub_channel: ChannelStatusInfo,
	pub relayers: Vec<MonitoredAccount>,
	pub accounts: Vec<MonitoredAccount>,
	pub summary: BridgeStatusSummary,
	pub fetched_at: DateTime<Utc>,
}
