//! Configuration settings structures
//!
//! Field names are snake_case throughout so the same structures can be filled
//! from config files and from `POLAR__`-prefixed environment variables.

use polar_types::{
	AddressType, BridgeContracts, ChainEndpoints, ChannelIds, Environment, EnvironmentBuilder,
	EnvironmentError, Location, LocationKind, ParachainInfo, ParachainRegistration,
	ReceivableToken, Relayer, SecretString,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::{configurable_value::ConfigurableValue, ConfigurableValueError};

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	#[serde(default)]
	pub server: ServerSettings,
	/// Name of the active environment
	pub environment: String,
	#[serde(default)]
	pub environments: HashMap<String, EnvironmentSettings>,
	/// Parachains offered to the environments at startup
	#[serde(default)]
	pub parachains: Vec<ParachainSettings>,
	#[serde(default)]
	pub polling: PollingSettings,
	#[serde(default)]
	pub timeouts: TimeoutSettings,
	#[serde(default)]
	pub logging: LoggingSettings,
	#[serde(default)]
	pub sanctions: Option<ServiceEndpointSettings>,
	#[serde(default)]
	pub indexer: Option<ServiceEndpointSettings>,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

/// One deployment: chain ids, endpoints, contracts, channels, relayers and locations
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnvironmentSettings {
	pub asset_hub_para_id: u32,
	pub bridge_hub_para_id: u32,
	pub eth_chain_id: u64,
	pub endpoints: EndpointSettings,
	pub contracts: ContractSettings,
	pub channels: ChannelSettings,
	#[serde(default)]
	pub relayers: Vec<RelayerSettings>,
	pub locations: Vec<LocationSettings>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointSettings {
	pub ethereum: String,
	pub relay_chain: String,
	pub asset_hub: String,
	pub bridge_hub: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContractSettings {
	pub gateway: String,
	pub beefy_client: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChannelSettings {
	pub asset_hub: String,
	pub primary_governance: String,
	pub secondary_governance: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RelayerSettings {
	pub name: String,
	pub account: String,
	pub kind: LocationKind,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenSettings {
	pub id: String,
	pub address: String,
	#[serde(default, with = "polar_types::amount::option")]
	pub minimum_transfer_amount: Option<u128>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParachainInfoSettings {
	pub para_id: u32,
	pub decimals: u8,
	#[serde(default)]
	pub address_type: AddressType,
	#[serde(default, with = "polar_types::amount")]
	pub destination_fee: u128,
	#[serde(default)]
	pub skip_existential_deposit_check: bool,
	#[serde(default = "default_max_consumers")]
	pub max_consumers: u32,
	#[serde(default)]
	pub switch_pallet: Option<String>,
}

fn default_max_consumers() -> u32 {
	16
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocationSettings {
	pub id: String,
	pub name: String,
	pub kind: LocationKind,
	#[serde(default)]
	pub destination_ids: Vec<String>,
	#[serde(default)]
	pub tokens: Vec<TokenSettings>,
	#[serde(default)]
	pub parachain: Option<ParachainInfoSettings>,
	#[serde(default)]
	pub eth_chain_id: Option<u64>,
}

/// A parachain registered into an environment at startup
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParachainSettings {
	/// Environment the parachain belongs to
	pub environment: String,
	pub endpoint: String,
	pub location: LocationSettings,
}

/// Polling cadence for the status and history refresh jobs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollingSettings {
	pub status_interval_secs: u64,
	pub history_interval_secs: u64,
	/// How far back history is fetched: two weeks by default
	pub history_window_secs: u64,
}

impl Default for PollingSettings {
	fn default() -> Self {
		Self {
			status_interval_secs: 60,
			history_interval_secs: 300,
			history_window_secs: 1_209_600,
		}
	}
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Bound on every chain RPC and bridge SDK read
	pub rpc_ms: u64,
	/// Bound on waiting for a parachain extrinsic to finalize
	pub finalization_ms: u64,
	/// Request timeout for the HTTP collaborators
	pub http_ms: u64,
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			rpc_ms: 30_000,
			finalization_ms: 120_000,
			http_ms: 10_000,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// HTTP collaborator endpoint with an optional API key
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceEndpointSettings {
	pub endpoint: String,
	#[serde(default)]
	pub api_key: Option<ConfigurableValue>,
}

impl ServiceEndpointSettings {
	pub fn resolve_api_key(&self) -> Result<Option<SecretString>, ConfigurableValueError> {
		self.api_key
			.as_ref()
			.map(ConfigurableValue::resolve_secret)
			.transpose()
	}
}

/// Errors found while validating settings
#[derive(Error, Debug)]
pub enum ConfigValidationError {
	#[error("Unknown environment '{name}'")]
	UnknownEnvironment { name: String },

	#[error("Invalid value for {field}: {reason}")]
	InvalidValue { field: String, reason: String },

	#[error("Invalid URL for {field}: {reason}")]
	InvalidUrl { field: String, reason: String },

	#[error("Invalid environment: {0}")]
	Environment(#[from] EnvironmentError),

	#[error(transparent)]
	Value(#[from] ConfigurableValueError),
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings::default(),
			environment: "polkadot_mainnet".to_string(),
			environments: HashMap::new(),
			parachains: Vec::new(),
			polling: PollingSettings::default(),
			timeouts: TimeoutSettings::default(),
			logging: LoggingSettings::default(),
			sanctions: None,
			indexer: None,
		}
	}
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	pub fn status_interval(&self) -> Duration {
		Duration::from_secs(self.polling.status_interval_secs)
	}

	pub fn history_interval(&self) -> Duration {
		Duration::from_secs(self.polling.history_interval_secs)
	}

	pub fn history_window(&self) -> Duration {
		Duration::from_secs(self.polling.history_window_secs)
	}

	pub fn active_environment(&self) -> Result<&EnvironmentSettings, ConfigValidationError> {
		self.environments
			.get(&self.environment)
			.ok_or_else(|| ConfigValidationError::UnknownEnvironment {
				name: self.environment.clone(),
			})
	}

	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let positive = [
			("polling.status_interval_secs", self.polling.status_interval_secs),
			("polling.history_interval_secs", self.polling.history_interval_secs),
			("polling.history_window_secs", self.polling.history_window_secs),
			("timeouts.rpc_ms", self.timeouts.rpc_ms),
			("timeouts.finalization_ms", self.timeouts.finalization_ms),
			("timeouts.http_ms", self.timeouts.http_ms),
		];
		for (field, value) in positive {
			if value == 0 {
				return Err(ConfigValidationError::InvalidValue {
					field: field.to_string(),
					reason: "must be greater than zero".to_string(),
				});
			}
		}

		self.active_environment()?;

		for (field, service) in [("sanctions", &self.sanctions), ("indexer", &self.indexer)] {
			if let Some(service) = service {
				Url::parse(&service.endpoint).map_err(|e| ConfigValidationError::InvalidUrl {
					field: format!("{}.endpoint", field),
					reason: e.to_string(),
				})?;
			}
		}

		Ok(())
	}

	/// Assemble the active environment, registering matching parachains
	pub fn build_environment(&self) -> Result<Environment, ConfigValidationError> {
		let settings = self.active_environment()?;

		let mut builder = EnvironmentBuilder::new(
			&self.environment,
			settings.asset_hub_para_id,
			settings.bridge_hub_para_id,
			settings.eth_chain_id,
		)
		.with_endpoints(ChainEndpoints {
			ethereum: settings.endpoints.ethereum.clone(),
			relay_chain: settings.endpoints.relay_chain.clone(),
			asset_hub: settings.endpoints.asset_hub.clone(),
			bridge_hub: settings.endpoints.bridge_hub.clone(),
			parachains: BTreeMap::new(),
		})
		.with_contracts(BridgeContracts {
			gateway: settings.contracts.gateway.clone(),
			beefy_client: settings.contracts.beefy_client.clone(),
		})
		.with_channels(ChannelIds {
			asset_hub: settings.channels.asset_hub.clone(),
			primary_governance: settings.channels.primary_governance.clone(),
			secondary_governance: settings.channels.secondary_governance.clone(),
		});

		for relayer in &settings.relayers {
			builder = builder.with_relayer(Relayer {
				name: relayer.name.clone(),
				account: relayer.account.clone(),
				kind: relayer.kind,
			});
		}
		for location in &settings.locations {
			builder = builder.with_location(location.to_location());
		}
		for parachain in &self.parachains {
			builder = builder.with_parachain(ParachainRegistration {
				environment: parachain.environment.clone(),
				endpoint: parachain.endpoint.clone(),
				location: parachain.location.to_location(),
			});
		}

		Ok(builder.build()?)
	}
}

impl LocationSettings {
	pub fn to_location(&self) -> Location {
		Location {
			id: self.id.clone(),
			name: self.name.clone(),
			kind: self.kind,
			destination_ids: self.destination_ids.clone(),
			receivable_tokens: self
				.tokens
				.iter()
				.map(|token| ReceivableToken {
					id: token.id.clone(),
					address: token.address.clone(),
					minimum_transfer_amount: token.minimum_transfer_amount,
				})
				.collect(),
			para_info: self.parachain.as_ref().map(|info| ParachainInfo {
				para_id: info.para_id,
				decimals: info.decimals,
				address_type: info.address_type,
				destination_fee: info.destination_fee,
				skip_existential_deposit_check: info.skip_existential_deposit_check,
				max_consumers: info.max_consumers,
				switch_pallet: info.switch_pallet.clone(),
			}),
			eth_chain_id: self.eth_chain_id,
		}
	}
}
