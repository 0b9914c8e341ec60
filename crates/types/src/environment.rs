//! Deployment environment
//!
//! An [`Environment`] bundles every [`Location`] of one deployment together with
//! its endpoints, contracts, channels and relayers. It is assembled once through
//! [`EnvironmentBuilder`], validated, and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::locations::{Location, LocationKind, ReceivableToken};

/// Errors raised while assembling an environment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvironmentError {
	#[error("Duplicate location id: {id}")]
	DuplicateLocation { id: String },

	#[error("No location with para id {para_id} is registered as the Asset Hub")]
	MissingAssetHub { para_id: u32 },

	#[error("More than one location claims the Asset Hub para id {para_id}")]
	AmbiguousAssetHub { para_id: u32 },

	#[error("Location '{location}' references unknown destination '{destination}'")]
	UnknownDestination {
		location: String,
		destination: String,
	},

	#[error("Location '{location}' cannot reach the Asset Hub")]
	HubUnreachable { location: String },

	#[error("Substrate location '{location}' is missing parachain metadata")]
	MissingParachainInfo { location: String },
}

/// RPC endpoints of one deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEndpoints {
	pub ethereum: String,
	pub relay_chain: String,
	pub asset_hub: String,
	pub bridge_hub: String,
	/// Parachain endpoints keyed by para id
	#[serde(default)]
	pub parachains: BTreeMap<u32, String>,
}

/// Bridge contract addresses on the Ethereum side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeContracts {
	pub gateway: String,
	pub beefy_client: String,
}

/// Message channels whose operating mode is monitored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIds {
	pub asset_hub: String,
	pub primary_governance: String,
	pub secondary_governance: String,
}

/// Relayer account whose balance is reported in the bridge status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relayer {
	pub name: String,
	pub account: String,
	#[serde(rename = "type")]
	pub kind: LocationKind,
}

/// A parachain offered to an environment at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ParachainRegistration {
	/// Name of the environment this parachain belongs to
	pub environment: String,
	pub endpoint: String,
	pub location: Location,
}

/// Immutable deployment description shared by every component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
	name: String,
	asset_hub_para_id: u32,
	bridge_hub_para_id: u32,
	eth_chain_id: u64,
	endpoints: ChainEndpoints,
	contracts: BridgeContracts,
	channels: ChannelIds,
	relayers: Vec<Relayer>,
	locations: Vec<Location>,
}

impl Environment {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn asset_hub_para_id(&self) -> u32 {
		self.asset_hub_para_id
	}

	pub fn bridge_hub_para_id(&self) -> u32 {
		self.bridge_hub_para_id
	}

	pub fn eth_chain_id(&self) -> u64 {
		self.eth_chain_id
	}

	pub fn endpoints(&self) -> &ChainEndpoints {
		&self.endpoints
	}

	pub fn contracts(&self) -> &BridgeContracts {
		&self.contracts
	}

	pub fn channels(&self) -> &ChannelIds {
		&self.channels
	}

	pub fn relayers(&self) -> &[Relayer] {
		&self.relayers
	}

	pub fn locations(&self) -> &[Location] {
		&self.locations
	}

	pub fn location(&self, id: &str) -> Option<&Location> {
		self.locations.iter().find(|location| location.id == id)
	}

	/// A location is the Asset Hub when its para id matches the configured one.
	/// Ids and names are ignored so renamed or duplicated entries cannot pose as the hub.
	pub fn is_asset_hub(&self, location: &Location) -> bool {
		location.is_substrate() && location.para_id() == Some(self.asset_hub_para_id)
	}

	pub fn asset_hub(&self) -> Option<&Location> {
		self.locations.iter().find(|location| self.is_asset_hub(location))
	}

	/// Substrate locations other than the Asset Hub
	pub fn parachains(&self) -> impl Iterator<Item = &Location> {
		self.locations
			.iter()
			.filter(move |location| location.is_substrate() && !self.is_asset_hub(location))
	}

	pub fn parachain_endpoint(&self, para_id: u32) -> Option<&str> {
		self.endpoints.parachains.get(&para_id).map(String::as_str)
	}
}

/// Builder assembling and validating an [`Environment`]
#[derive(Debug, Clone)]
pub struct EnvironmentBuilder {
	name: String,
	asset_hub_para_id: u32,
	bridge_hub_para_id: u32,
	eth_chain_id: u64,
	endpoints: ChainEndpoints,
	contracts: BridgeContracts,
	channels: ChannelIds,
	relayers: Vec<Relayer>,
	locations: Vec<Location>,
}

impl EnvironmentBuilder {
	pub fn new(
		name: impl Into<String>,
		asset_hub_para_id: u32,
		bridge_hub_para_id: u32,
		eth_chain_id: u64,
	) -> Self {
		Self {
			name: name.into(),
			asset_hub_para_id,
			bridge_hub_para_id,
			eth_chain_id,
			endpoints: ChainEndpoints::default(),
			contracts: BridgeContracts::default(),
			channels: ChannelIds::default(),
			relayers: Vec::new(),
			locations: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn with_endpoints(mut self, endpoints: ChainEndpoints) -> Self {
		self.endpoints = endpoints;
		self
	}

	pub fn with_contracts(mut self, contracts: BridgeContracts) -> Self {
		self.contracts = contracts;
		self
	}

	pub fn with_channels(mut self, channels: ChannelIds) -> Self {
		self.channels = channels;
		self
	}

	pub fn with_relayer(mut self, relayer: Relayer) -> Self {
		self.relayers.push(relayer);
		self
	}

	pub fn with_location(mut self, location: Location) -> Self {
		self.locations.push(location);
		self
	}

	/// Append a parachain to the environment.
	///
	/// Registrations targeting another environment are ignored, as are
	/// parachains the Asset Hub already lists as a destination or whose id is
	/// taken. An accepted parachain becomes a destination of the Asset Hub, its
	/// tokens become receivable there, and its endpoint joins the parachain
	/// endpoint list.
	pub fn with_parachain(mut self, registration: ParachainRegistration) -> Self {
		if registration.environment != self.name {
			return self;
		}
		let ParachainRegistration {
			endpoint, location, ..
		} = registration;
		if self.locations.iter().any(|existing| existing.id == location.id) {
			return self;
		}
		let asset_hub_para_id = self.asset_hub_para_id;
		let Some(hub) = self
			.locations
			.iter_mut()
			.find(|l| l.is_substrate() && l.para_id() == Some(asset_hub_para_id))
		else {
			return self;
		};
		if hub.can_reach(&location.id) {
			return self;
		}

		hub.destination_ids.push(location.id.clone());
		for token in &location.receivable_tokens {
			if hub.receivable_token(&token.address).is_none() {
				hub.receivable_tokens.push(ReceivableToken::clone(token));
			}
		}
		if let Some(para_id) = location.para_id() {
			self.endpoints.parachains.entry(para_id).or_insert(endpoint);
		}
		self.locations.push(location);
		self
	}

	pub fn build(self) -> Result<Environment, EnvironmentError> {
		let mut seen = HashSet::new();
		for location in &self.locations {
			if !seen.insert(location.id.as_str()) {
				return Err(EnvironmentError::DuplicateLocation {
					id: location.id.clone(),
				});
			}
			if location.is_substrate() && location.para_info.is_none() {
				return Err(EnvironmentError::MissingParachainInfo {
					location: location.id.clone(),
				});
			}
		}

		let hubs: Vec<&Location> = self
			.locations
			.iter()
			.filter(|l| l.is_substrate() && l.para_id() == Some(self.asset_hub_para_id))
			.collect();
		let hub_id = match hubs.as_slice() {
			[] => {
				return Err(EnvironmentError::MissingAssetHub {
					para_id: self.asset_hub_para_id,
				})
			},
			[hub] => hub.id.clone(),
			_ => {
				return Err(EnvironmentError::AmbiguousAssetHub {
					para_id: self.asset_hub_para_id,
				})
			},
		};

		for location in &self.locations {
			for destination in &location.destination_ids {
				if !seen.contains(destination.as_str()) {
					return Err(EnvironmentError::UnknownDestination {
						location: location.id.clone(),
						destination: destination.clone(),
					});
				}
			}
			if location.id != hub_id && !location.can_reach(&hub_id) {
				return Err(EnvironmentError::HubUnreachable {
					location: location.id.clone(),
				});
			}
		}

		Ok(Environment {
			name: self.name,
			asset_hub_para_id: self.asset_hub_para_id,
			bridge_hub_para_id: self.bridge_hub_para_id,
			eth_chain_id: self.eth_chain_id,
			endpoints: self.endpoints,
			contracts: self.contracts,
			channels: self.channels,
			relayers: self.relayers,
			locations: self.locations,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::locations::ParachainInfo;

	fn base() -> EnvironmentBuilder {
		EnvironmentBuilder::new("polkadot_mainnet", 1000, 1002, 1)
			.with_location(
				Location::ethereum("ethereum", "Ethereum", 1)
					.with_destination("assethub")
					.with_token(ReceivableToken::new("WETH", "0xc02a")),
			)
			.with_location(
				Location::substrate("assethub", "Asset Hub", ParachainInfo::new(1000, 10))
					.with_destination("ethereum")
					.with_token(ReceivableToken::new("WETH", "0xc02a")),
			)
	}

	fn kilt_registration(environment: &str) -> ParachainRegistration {
		ParachainRegistration {
			environment: environment.to_string(),
			endpoint: "wss://kilt.dotters.network".to_string(),
			location: Location::substrate("kilt", "KILT", ParachainInfo::new(2086, 15))
				.with_destination("assethub")
				.with_token(
					ReceivableToken::new("KILT", "0xadd76ee7fb5b3d2d774b5fed4ac20b87f830db91")
						.with_minimum(10_000_000_000),
				),
		}
	}

	#[test]
	fn test_build_valid_environment() {
		let env = base().build().unwrap();
		assert_eq!(env.name(), "polkadot_mainnet");
		assert_eq!(env.asset_hub().map(|l| l.id.as_str()), Some("assethub"));
		assert_eq!(env.parachains().count(), 0);
	}

	#[test]
	fn test_asset_hub_detected_by_para_id_not_id() {
		let env = base()
			.with_location(
				Location::substrate("assethub-copy", "Asset Hub", ParachainInfo::new(3000, 10))
					.with_destination("assethub"),
			)
			.build()
			.unwrap();

		let copy = env.location("assethub-copy").unwrap();
		assert!(!env.is_asset_hub(copy));
		assert!(env.is_asset_hub(env.location("assethub").unwrap()));
	}

	#[test]
	fn test_registered_parachain_joins_hub() {
		let env = base()
			.with_parachain(kilt_registration("polkadot_mainnet"))
			.build()
			.unwrap();

		let hub = env.asset_hub().unwrap();
		assert!(hub.can_reach("kilt"));
		assert_eq!(
			hub.minimum_transfer_amount("0xADD76EE7FB5B3D2D774B5FED4AC20B87F830DB91"),
			10_000_000_000
		);
		assert_eq!(env.parachain_endpoint(2086), Some("wss://kilt.dotters.network"));
		assert_eq!(env.parachains().count(), 1);
	}

	#[test]
	fn test_parachain_for_other_environment_ignored() {
		let env = base()
			.with_parachain(kilt_registration("rococo_sepolia"))
			.build()
			.unwrap();
		assert!(env.location("kilt").is_none());
		assert!(!env.asset_hub().unwrap().can_reach("kilt"));
	}

	#[test]
	fn test_parachain_registered_once() {
		let mut second = kilt_registration("polkadot_mainnet");
		second.endpoint = "wss://other.endpoint".to_string();
		second.location.name = "Renamed".to_string();

		let env = base()
			.with_parachain(kilt_registration("polkadot_mainnet"))
			.with_parachain(second)
			.build()
			.unwrap();

		assert_eq!(env.location("kilt").unwrap().name, "KILT");
		assert_eq!(env.parachain_endpoint(2086), Some("wss://kilt.dotters.network"));
		assert_eq!(
			env.asset_hub()
				.unwrap()
				.destination_ids
				.iter()
				.filter(|id| *id == "kilt")
				.count(),
			1
		);
	}

	#[test]
	fn test_unknown_destination_rejected() {
		let result = base()
			.with_location(
				Location::substrate("mythos", "Mythos", ParachainInfo::new(3369, 18))
					.with_destination("assethub")
					.with_destination("moonbeam"),
			)
			.build();
		assert!(matches!(
			result,
			Err(EnvironmentError::UnknownDestination { ref destination, .. }) if destination == "moonbeam"
		));
	}

	#[test]
	fn test_hub_must_be_reachable() {
		let result = base()
			.with_location(Location::substrate(
				"island",
				"Island",
				ParachainInfo::new(4000, 12),
			))
			.build();
		assert_eq!(
			result,
			Err(EnvironmentError::HubUnreachable {
				location: "island".to_string()
			})
		);
	}

	#[test]
	fn test_missing_and_ambiguous_hub() {
		let missing = EnvironmentBuilder::new("x", 1000, 1002, 1)
			.with_location(Location::ethereum("ethereum", "Ethereum", 1))
			.build();
		assert_eq!(missing, Err(EnvironmentError::MissingAssetHub { para_id: 1000 }));

		let ambiguous = base()
			.with_location(
				Location::substrate("hub2", "Hub 2", ParachainInfo::new(1000, 10))
					.with_destination("assethub"),
			)
			.build();
		assert_eq!(
			ambiguous,
			Err(EnvironmentError::AmbiguousAssetHub { para_id: 1000 })
		);
	}

	#[test]
	fn test_duplicate_location_rejected() {
		let result = base()
			.with_location(Location::ethereum("ethereum", "Ethereum 2", 1).with_destination("assethub"))
			.build();
		assert_eq!(
			result,
			Err(EnvironmentError::DuplicateLocation {
				id: "ethereum".to_string()
			})
		);
	}
}
