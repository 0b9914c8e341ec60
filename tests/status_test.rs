//! Bridge status classification and the status refresh path

use polar_path::types::{test_utils::*, OperatingMode, ACCEPTABLE_BRIDGE_LATENCY_SECONDS};
use polar_path::service::ServiceError;
use polar_path::{aggregate, BridgeConnection, BridgeContext, BridgeStatusService, StatusValue};
use std::sync::Arc;

fn status_service(sdk: Arc<MockBridgeSdk>) -> BridgeStatusService {
	let context = BridgeContext::new(Arc::new(test_environment()), sdk);
	BridgeStatusService::new(Arc::new(BridgeConnection::ready(context)), 1_000)
}

#[test]
fn test_to_ethereum_classification_takes_precedence() {
	let mut signals = healthy_signals();
	signals.status_info = status_info(
		OperatingMode::Normal,
		ACCEPTABLE_BRIDGE_LATENCY_SECONDS + 1,
		OperatingMode::Halted,
		OperatingMode::Normal,
		ACCEPTABLE_BRIDGE_LATENCY_SECONDS + 1,
	);
	let summary = aggregate(&signals);
	assert_eq!(summary.to_ethereum.status, StatusValue::Delayed);
	assert_eq!(summary.to_polkadot.status, StatusValue::Halted);
	assert_eq!(summary.overall_status, StatusValue::Delayed);

	signals.status_info.to_ethereum.outbound = OperatingMode::Halted;
	let summary = aggregate(&signals);
	assert_eq!(summary.to_ethereum.status, StatusValue::Halted);
	assert_eq!(summary.overall_status, StatusValue::Halted);
}

#[test]
fn test_overall_follows_to_polkadot_when_to_ethereum_is_normal() {
	let mut signals = healthy_signals();
	assert_eq!(aggregate(&signals).overall_status, StatusValue::Normal);

	signals.status_info.to_polkadot.latency_seconds = ACCEPTABLE_BRIDGE_LATENCY_SECONDS;
	let summary = aggregate(&signals);
	assert!(!summary.to_polkadot.light_client_latency_is_acceptable);
	assert_eq!(summary.overall_status, StatusValue::Delayed);

	signals.status_info.to_polkadot.latency_seconds = ACCEPTABLE_BRIDGE_LATENCY_SECONDS - 1;
	assert_eq!(aggregate(&signals).overall_status, StatusValue::Normal);

	signals.status_info.to_polkadot.beacon = OperatingMode::Halted;
	let summary = aggregate(&signals);
	assert!(!summary.to_polkadot.bridge_operational);
	assert_eq!(summary.overall_status, StatusValue::Halted);
}

#[test]
fn test_aggregate_is_deterministic() {
	let mut signals = healthy_signals();
	signals.asset_hub_channel = channel_status(ASSET_HUB_CHANNEL, OperatingMode::Halted);
	let first = aggregate(&signals);
	assert_eq!(first, aggregate(&signals));
	assert!(!first.to_polkadot.channel_operational);
	assert_eq!(first.to_polkadot.status, StatusValue::Halted);
}

#[tokio::test]
async fn test_fetch_status_reports_channels_and_balances() {
	let sdk = Arc::new(MockBridgeSdk::new());
	let status = status_service(sdk.clone()).fetch_status().await.unwrap();

	let names: Vec<&str> = status
		.channel_status_infos
		.iter()
		.map(|channel| channel.name.as_str())
		.collect();
	assert_eq!(names, vec!["Asset Hub", "Primary Governance", "Secondary Governance"]);
	assert_eq!(status.asset_hub_channel.channel_id, ASSET_HUB_CHANNEL);
	assert_eq!(status.relayers.len(), 2);
	assert_eq!(status.accounts.len(), 3);
	assert_eq!(status.summary.overall_status, StatusValue::Normal);

	sdk.set_asset_hub_channel(OperatingMode::Halted);
	let status = status_service(sdk).fetch_status().await.unwrap();
	assert_eq!(status.summary.to_polkadot.status, StatusValue::Halted);
}

#[tokio::test]
async fn test_fetch_status_errors() {
	let sdk = Arc::new(MockBridgeSdk::new());
	sdk.set_fail_status(true);
	assert!(matches!(
		status_service(sdk).fetch_status().await,
		Err(ServiceError::Adapter(_))
	));

	let disconnected = BridgeStatusService::new(Arc::new(BridgeConnection::new()), 1_000);
	assert!(matches!(
		disconnected.fetch_status().await,
		Err(ServiceError::NotReady)
	));
}
