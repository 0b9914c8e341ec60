//! Location registry models
//!
//! A [`Location`] describes one ledger a transfer can start from or land on:
//! the Ethereum execution chain, the Asset Hub, or a satellite parachain.

use serde::{Deserialize, Serialize};

/// Default minimum transfer amount when a token does not configure one
pub const DEFAULT_MINIMUM_TRANSFER_AMOUNT: u128 = 1;

/// Kind of ledger a location represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
	Ethereum,
	Substrate,
}

/// Account address encoding accepted by a substrate ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
	#[serde(rename = "20byte")]
	Bytes20,
	#[serde(rename = "32byte")]
	Bytes32,
	#[serde(rename = "both")]
	Both,
}

impl Default for AddressType {
	fn default() -> Self {
		Self::Bytes32
	}
}

/// Token a location accepts as the destination of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableToken {
	pub id: String,
	/// ERC-20 address or asset id, compared case-insensitively
	pub address: String,
	#[serde(default, with = "crate::amount::option")]
	pub minimum_transfer_amount: Option<u128>,
}

impl ReceivableToken {
	pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			address: address.into(),
			minimum_transfer_amount: None,
		}
	}

	pub fn with_minimum(mut self, minimum: u128) -> Self {
		self.minimum_transfer_amount = Some(minimum);
		self
	}

	/// Economic floor for transfers of this token
	pub fn minimum(&self) -> u128 {
		self.minimum_transfer_amount
			.unwrap_or(DEFAULT_MINIMUM_TRANSFER_AMOUNT)
	}

	pub fn matches_address(&self, address: &str) -> bool {
		self.address.eq_ignore_ascii_case(address)
	}
}

/// Substrate-specific metadata for Asset Hub and parachains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParachainInfo {
	pub para_id: u32,
	pub decimals: u8,
	#[serde(default)]
	pub address_type: AddressType,
	#[serde(default, with = "crate::amount")]
	pub destination_fee: u128,
	#[serde(default)]
	pub skip_existential_deposit_check: bool,
	pub max_consumers: u32,
	/// Pallet exposing the asset switch pool, for parachains bridged through one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub switch_pallet: Option<String>,
}

impl ParachainInfo {
	pub fn new(para_id: u32, decimals: u8) -> Self {
		Self {
			para_id,
			decimals,
			address_type: AddressType::default(),
			destination_fee: 0,
			skip_existential_deposit_check: false,
			max_consumers: 16,
			switch_pallet: None,
		}
	}
}

/// A ledger participating in transfers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: LocationKind,
	#[serde(default)]
	pub destination_ids: Vec<String>,
	#[serde(default)]
	pub receivable_tokens: Vec<ReceivableToken>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub para_info: Option<ParachainInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub eth_chain_id: Option<u64>,
}

impl Location {
	pub fn ethereum(id: impl Into<String>, name: impl Into<String>, chain_id: u64) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: LocationKind::Ethereum,
			destination_ids: Vec::new(),
			receivable_tokens: Vec::new(),
			para_info: None,
			eth_chain_id: Some(chain_id),
		}
	}

	pub fn substrate(id: impl Into<String>, name: impl Into<String>, para_info: ParachainInfo) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: LocationKind::Substrate,
			destination_ids: Vec::new(),
			receivable_tokens: Vec::new(),
			para_info: Some(para_info),
			eth_chain_id: None,
		}
	}

	pub fn with_destination(mut self, destination_id: impl Into<String>) -> Self {
		self.destination_ids.push(destination_id.into());
		self
	}

	pub fn with_token(mut self, token: ReceivableToken) -> Self {
		self.receivable_tokens.push(token);
		self
	}

	pub fn para_id(&self) -> Option<u32> {
		self.para_info.as_ref().map(|info| info.para_id)
	}

	pub fn is_ethereum(&self) -> bool {
		self.kind == LocationKind::Ethereum
	}

	pub fn is_substrate(&self) -> bool {
		self.kind == LocationKind::Substrate
	}

	pub fn can_reach(&self, destination_id: &str) -> bool {
		self.destination_ids.iter().any(|id| id == destination_id)
	}

	/// Look up a receivable token by address, ignoring case
	pub fn receivable_token(&self, address: &str) -> Option<&ReceivableToken> {
		self.receivable_tokens
			.iter()
			.find(|token| token.matches_address(address))
	}

	/// Minimum amount this location accepts for the given token
	pub fn minimum_transfer_amount(&self, token_address: &str) -> u128 {
		self.receivable_token(token_address)
			.map(ReceivableToken::minimum)
			.unwrap_or(DEFAULT_MINIMUM_TRANSFER_AMOUNT)
	}
}
