//! Bridge status aggregation
//!
//! [`aggregate`] reduces raw operating modes and light client latencies to a
//! per-direction classification. [`BridgeStatusService`] fetches the raw
//! signals plus relayer and bridge account balances.

use chrono::Utc;
use futures::future::{try_join4, try_join_all};
use polar_types::{
	AdapterResult, BridgeStatus, BridgeStatusSummary, MonitoredAccount, NamedChannelStatus,
	RawBridgeSignals, StatusValue, ToEthereumSummary, ToPolkadotSummary,
	ACCEPTABLE_BRIDGE_LATENCY_SECONDS,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
	context::{with_timeout, BridgeConnection, BridgeContext},
	error::{ServiceError, ServiceResult},
};

const TRACING_TARGET: &str = "polar_service::status";

fn latency_is_acceptable(latency_seconds: u64) -> bool {
	latency_seconds < ACCEPTABLE_BRIDGE_LATENCY_SECONDS
}

fn classify(operational: bool, latency_acceptable: bool) -> StatusValue {
	if !operational {
		StatusValue::Halted
	} else if !latency_acceptable {
		StatusValue::Delayed
	} else {
		StatusValue::Normal
	}
}

/// Classify both directions of the bridge
pub fn aggregate(signals: &RawBridgeSignals) -> BridgeStatusSummary {
	let to_polkadot_info = &signals.status_info.to_polkadot;
	let bridge_operational = to_polkadot_info.outbound.is_normal() && to_polkadot_info.beacon.is_normal();
	let channel_operational = signals.asset_hub_channel.to_polkadot.outbound.is_normal();
	let to_polkadot_latency_ok = latency_is_acceptable(to_polkadot_info.latency_seconds);
	let to_polkadot = ToPolkadotSummary {
		bridge_operational,
		channel_operational,
		light_client_latency_is_acceptable: to_polkadot_latency_ok,
		light_client_latency_seconds: to_polkadot_info.latency_seconds,
		status: classify(bridge_operational && channel_operational, to_polkadot_latency_ok),
	};

	let to_ethereum_info = &signals.status_info.to_ethereum;
	let to_ethereum_operational = to_ethereum_info.outbound.is_normal();
	let to_ethereum_latency_ok = latency_is_acceptable(to_ethereum_info.latency_seconds);
	let to_ethereum = ToEthereumSummary {
		bridge_operational: to_ethereum_operational,
		light_client_latency_is_acceptable: to_ethereum_latency_ok,
		light_client_latency_seconds: to_ethereum_info.latency_seconds,
		status: classify(to_ethereum_operational, to_ethereum_latency_ok),
	};

	let overall_status = match to_ethereum.status {
		StatusValue::Normal => to_polkadot.status,
		other => other,
	};

	BridgeStatusSummary {
		to_polkadot,
		to_ethereum,
		overall_status,
	}
}

/// Fetches the full bridge status report
#[derive(Debug)]
pub struct BridgeStatusService {
	connection: Arc<BridgeConnection>,
	rpc_timeout_ms: u64,
}

impl BridgeStatusService {
	pub fn new(connection: Arc<BridgeConnection>, rpc_timeout_ms: u64) -> Self {
		Self {
			connection,
			rpc_timeout_ms,
		}
	}

	/// Status info and the three channel statuses, read concurrently
	pub async fn fetch_signals(&self, context: &BridgeContext) -> AdapterResult<RawBridgeSignals> {
		let sdk = context.sdk();
		let channels = context.environment().channels();
		let timeout = self.rpc_timeout_ms;

		let (status_info, asset_hub_channel, primary_governance_channel, secondary_governance_channel) =
			try_join4(
				with_timeout(timeout, sdk.bridge_status_info()),
				with_timeout(timeout, sdk.channel_status_info(&channels.asset_hub)),
				with_timeout(timeout, sdk.channel_status_info(&channels.primary_governance)),
				with_timeout(timeout, sdk.channel_status_info(&channels.secondary_governance)),
			)
			.await?;

		Ok(RawBridgeSignals {
			status_info,
			asset_hub_channel,
			primary_governance_channel,
			secondary_governance_channel,
		})
	}

	/// Relayers and bridge accounts with their current balances
	async fn fetch_accounts(
		&self,
		context: &BridgeContext,
	) -> AdapterResult<(Vec<MonitoredAccount>, Vec<MonitoredAccount>)> {
		let sdk = context.sdk();
		let timeout = self.rpc_timeout_ms;

		let relayers = try_join_all(context.environment().relayers().iter().map(|relayer| async move {
			let balance = with_timeout(timeout, sdk.account_balance(&relayer.account, relayer.kind)).await?;
			Ok::<_, polar_types::AdapterError>(MonitoredAccount {
				name: relayer.name.clone(),
				account: relayer.account.clone(),
				kind: relayer.kind,
				balance,
			})
		}));

		let accounts = async {
			let bridge_accounts = with_timeout(timeout, sdk.bridge_accounts()).await?;
			try_join_all(bridge_accounts.into_iter().map(|account| async move {
				let balance = with_timeout(timeout, sdk.account_balance(&account.account, account.kind)).await?;
				Ok::<_, polar_types::AdapterError>(MonitoredAccount {
					name: account.name,
					account: account.account,
					kind: account.kind,
					balance,
				})
			}))
			.await
		};

		futures::try_join!(relayers, accounts)
	}

	pub async fn fetch_status(&self) -> ServiceResult<BridgeStatus> {
		let context = self.connection.context().map_err(|_| ServiceError::NotReady)?;

		let (signals, (relayers, accounts)) =
			futures::try_join!(self.fetch_signals(&context), self.fetch_accounts(&context))?;
		let summary = aggregate(&signals);

		debug!(
			target: TRACING_TARGET,
			overall = ?summary.overall_status,
			to_ethereum = ?summary.to_ethereum.status,
			to_polkadot = ?summary.to_polkadot.status,
			"Fetched bridge status"
		);

		Ok(BridgeStatus {
			status_info: signals.status_info,
			channel_status_infos: vec![
				NamedChannelStatus {
					name: "Asset Hub".to_string(),
					status: signals.asset_hub_channel.clone(),
				},
				NamedChannelStatus {
					name: "Primary Governance".to_string(),
					status: signals.primary_governance_channel,
				},
				NamedChannelStatus {
					name: "Secondary Governance".to_string(),
					status: signals.secondary_governance_channel,
				},
			],
			asset_hub_channel: signals.asset_hub_channel,
			relayers,
			accounts,
			summary,
			fetched_at: Utc::now(),
		})
	}
}

/// Latest successfully fetched status report
#[derive(Debug, Default)]
pub struct StatusCache {
	latest: RwLock<Option<Arc<BridgeStatus>>>,
}

impl StatusCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn get(&self) -> Option<Arc<BridgeStatus>> {
		self.latest.read().await.clone()
	}

	pub async fn set(&self, status: BridgeStatus) {
		*self.latest.write().await = Some(Arc::new(status));
	}
}
