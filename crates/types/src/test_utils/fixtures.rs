//! Fixture data shared by unit and integration tests

use chrono::{DateTime, TimeZone, Utc};

use crate::{
	environment::{
		BridgeContracts, ChainEndpoints, ChannelIds, Environment, EnvironmentBuilder,
		ParachainRegistration, Relayer,
	},
	locations::{Location, LocationKind, ParachainInfo, ReceivableToken},
	status::{
		BridgeStatusInfo, ChannelDirectionInfo, ChannelStatusInfo, OperatingMode, RawBridgeSignals,
		ToEthereumStatusInfo, ToPolkadotStatusInfo,
	},
	transfers::{
		EthereumReceipt, Pathway, SubmissionReceipt, Transfer, TransferInfo, TransferRequest,
		TransferStatus,
	},
};

pub const ENVIRONMENT_NAME: &str = "polkadot_mainnet";
pub const ASSET_HUB_PARA_ID: u32 = 1000;
pub const KILT_PARA_ID: u32 = 2086;
pub const HYDRATION_PARA_ID: u32 = 2034;

pub const WETH_TOKEN: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const KILT_TOKEN: &str = "0xadd76ee7fb5b3d2d774b5fed4ac20b87f830db91";
pub const KILT_MINIMUM: u128 = 10_000_000_000;

pub const ETH_ACCOUNT: &str = "0x90a987b944cb1dcce5564e5fdecd7a54d3de27fe";
pub const SUBSTRATE_ACCOUNT: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const SUBSTRATE_BENEFICIARY: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

pub const ASSET_HUB_CHANNEL: &str =
	"0xc173fac324158e77fb5840738a1a541f633cbec8884c6a601c567d2b376a0539";
pub const PRIMARY_GOVERNANCE_CHANNEL: &str =
	"0x0000000000000000000000000000000000000000000000000000000000000001";
pub const SECONDARY_GOVERNANCE_CHANNEL: &str =
	"0x0000000000000000000000000000000000000000000000000000000000000002";

pub fn kilt_registration() -> ParachainRegistration {
	let mut info = ParachainInfo::new(KILT_PARA_ID, 15);
	info.switch_pallet = Some("assetSwitchPool1".to_string());
	ParachainRegistration {
		environment: ENVIRONMENT_NAME.to_string(),
		endpoint: "wss://kilt.dotters.network".to_string(),
		location: Location::substrate("kilt", "KILT", info)
			.with_destination("assethub")
			.with_token(ReceivableToken::new("KILT", KILT_TOKEN).with_minimum(KILT_MINIMUM)),
	}
}

pub fn hydration_registration() -> ParachainRegistration {
	ParachainRegistration {
		environment: ENVIRONMENT_NAME.to_string(),
		endpoint: "wss://hydration.dotters.network".to_string(),
		location: Location::substrate(
			"hydration",
			"Hydration",
			ParachainInfo::new(HYDRATION_PARA_ID, 12),
		)
		.with_destination("assethub"),
	}
}

/// Builder for the standard test environment, before parachains are added
pub fn environment_builder() -> EnvironmentBuilder {
	EnvironmentBuilder::new(ENVIRONMENT_NAME, ASSET_HUB_PARA_ID, 1002, 1)
		.with_endpoints(ChainEndpoints {
			ethereum: "https://ethereum.example".to_string(),
			relay_chain: "wss://polkadot.example".to_string(),
			asset_hub: "wss://asset-hub.example".to_string(),
			bridge_hub: "wss://bridge-hub.example".to_string(),
			parachains: Default::default(),
		})
		.with_contracts(BridgeContracts {
			gateway: "0x27ca963c279c93801941e1eb8799c23f407d68e7".to_string(),
			beefy_client: "0x6ed05ee80ba6a1f4c0a4b0aea0a46e1a0b2b1b5f".to_string(),
		})
		.with_channels(ChannelIds {
			asset_hub: ASSET_HUB_CHANNEL.to_string(),
			primary_governance: PRIMARY_GOVERNANCE_CHANNEL.to_string(),
			secondary_governance: SECONDARY_GOVERNANCE_CHANNEL.to_string(),
		})
		.with_relayer(Relayer {
			name: "Beacon".to_string(),
			account: "13Dbqvh6nLCRckyfsBr8wEJzxbi34KELwdYQFKKchN4NedGh".to_string(),
			kind: LocationKind::Substrate,
		})
		.with_relayer(Relayer {
			name: "Parachain Relay".to_string(),
			account: "0x1f1819c3c68f9533adbb8e51c8e8428a818d693e".to_string(),
			kind: LocationKind::Ethereum,
		})
		.with_location(
			Location::ethereum("ethereum", "Ethereum", 1)
				.with_destination("assethub")
				.with_token(ReceivableToken::new("WETH", WETH_TOKEN)),
		)
		.with_location(
			Location::substrate(
				"assethub",
				"Asset Hub",
				ParachainInfo::new(ASSET_HUB_PARA_ID, 10),
			)
			.with_destination("ethereum")
			.with_token(ReceivableToken::new("WETH", WETH_TOKEN)),
		)
}

/// Ethereum, Asset Hub, KILT and Hydration
pub fn test_environment() -> Environment {
	environment_builder()
		.with_parachain(kilt_registration())
		.with_parachain(hydration_registration())
		.build()
		.expect("test environment is valid")
}

pub fn timestamp(minutes: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
		.single()
		.expect("valid timestamp")
		+ chrono::Duration::minutes(minutes as i64)
}

pub fn ethereum_receipt(transaction_hash: &str) -> SubmissionReceipt {
	SubmissionReceipt::ToPolkadot(EthereumReceipt {
		block_hash: format!("0xblock{}", transaction_hash.trim_start_matches("0x")),
		block_number: 21_000_000,
		transaction_hash: transaction_hash.to_string(),
		channel_id: ASSET_HUB_CHANNEL.to_string(),
		log_index: 0,
		nonce: 1,
		parent_beacon_slot: None,
	})
}

/// A transfer record with the given message id and timestamp
pub fn sample_transfer(id: &str, when: DateTime<Utc>, status: TransferStatus) -> Transfer {
	Transfer {
		id: id.to_string(),
		status,
		info: TransferInfo {
			when,
			source_address: ETH_ACCOUNT.to_string(),
			beneficiary_address: SUBSTRATE_BENEFICIARY.to_string(),
			token_address: WETH_TOKEN.to_string(),
			amount: 1_000_000_000_000_000,
			pathway: Some(Pathway::EthereumToAssetHub),
			source_location: Some("ethereum".to_string()),
			destination_location: Some("assethub".to_string()),
			destination_fee: None,
		},
		submitted: ethereum_receipt(&format!("0xtx{}", id.trim_start_matches("0x"))),
		is_wallet_transaction: false,
	}
}

pub fn transfer_request(source: &str, destination: &str, token: &str, amount: u128) -> TransferRequest {
	let source_account = if source == "ethereum" {
		ETH_ACCOUNT
	} else {
		SUBSTRATE_ACCOUNT
	};
	let beneficiary = if destination == "ethereum" {
		ETH_ACCOUNT
	} else {
		SUBSTRATE_BENEFICIARY
	};
	TransferRequest {
		source: source.to_string(),
		destination: destination.to_string(),
		source_account: source_account.to_string(),
		beneficiary: beneficiary.to_string(),
		token: token.to_string(),
		amount,
	}
}

pub fn channel_status(channel_id: &str, to_polkadot: OperatingMode) -> ChannelStatusInfo {
	ChannelStatusInfo {
		channel_id: channel_id.to_string(),
		to_ethereum: ChannelDirectionInfo {
			outbound: OperatingMode::Normal,
			outbound_nonce: 10,
			inbound_nonce: 10,
		},
		to_polkadot: ChannelDirectionInfo {
			outbound: to_polkadot,
			outbound_nonce: 20,
			inbound_nonce: 20,
		},
	}
}

pub fn status_info(
	to_ethereum_outbound: OperatingMode,
	to_ethereum_latency: u64,
	to_polkadot_outbound: OperatingMode,
	beacon: OperatingMode,
	to_polkadot_latency: u64,
) -> BridgeStatusInfo {
	BridgeStatusInfo {
		to_ethereum: ToEthereumStatusInfo {
			outbound: to_ethereum_outbound,
			latency_seconds: to_ethereum_latency,
			latest_polkadot_block: 25_000_000,
			latest_beefy_block: 24_999_990,
		},
		to_polkadot: ToPolkadotStatusInfo {
			outbound: to_polkadot_outbound,
			beacon,
			latency_seconds: to_polkadot_latency,
			latest_beacon_slot_attested: 11_000_000,
			latest_beacon_slot_finalized: 10_999_936,
		},
	}
}

/// Signals with every mode normal and latency well within bounds
pub fn healthy_signals() -> RawBridgeSignals {
	RawBridgeSignals {
		status_info: status_info(
			OperatingMode::Normal,
			600,
			OperatingMode::Normal,
			OperatingMode::Normal,
			900,
		),
		asset_hub_channel: channel_status(ASSET_HUB_CHANNEL, OperatingMode::Normal),
		primary_governance_channel: channel_status(
			PRIMARY_GOVERNANCE_CHANNEL,
			OperatingMode::Normal,
		),
		secondary_governance_channel: channel_status(
			SECONDARY_GOVERNANCE_CHANNEL,
			OperatingMode::Normal,
		),
	}
}
