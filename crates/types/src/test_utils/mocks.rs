//! Scriptable collaborator doubles with call counters

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::fixtures::{channel_status, ethereum_receipt, healthy_signals, ASSET_HUB_CHANNEL};
use crate::{
	adapters::{
		AdapterError, AdapterResult, BridgeSdk, ChainClient, ExtrinsicEvent,
		ExtrinsicEventStream, FinalizedExtrinsic, HistoryIndexer, HistoryWindow,
		SanctionsScreener, WalletSigner,
	},
	locations::LocationKind,
	plan::{
		BridgeInstruction, PlanError, PlanRequest, PreparedInstruction, SignedInstruction,
		SubmissionResult, TransferPlan,
	},
	status::{BridgeAccount, BridgeStatusInfo, ChannelStatusInfo, OperatingMode},
	transfers::{SigningError, Transfer},
	validation::{AccountData, ScreeningVerdict, XcmFee},
};

/// Account with one provider, enough to pass sufficiency checks
pub fn funded_account() -> AccountData {
	AccountData {
		free: 1_000_000_000_000,
		sufficients: 0,
		providers: 1,
		consumers: 0,
	}
}

/// Chain client answering from in-memory account data
#[derive(Debug)]
pub struct MockChainClient {
	location_id: String,
	accounts: Mutex<HashMap<String, AccountData>>,
	default_account: AccountData,
	xcm_fee: Option<XcmFee>,
	fee_asset_balance: u128,
	events: Mutex<Vec<ExtrinsicEvent>>,
	fail_queries: bool,
	pub account_calls: AtomicUsize,
	pub submit_calls: AtomicUsize,
}

impl MockChainClient {
	pub fn new(location_id: &str) -> Self {
		Self {
			location_id: location_id.to_string(),
			accounts: Mutex::new(HashMap::new()),
			default_account: funded_account(),
			xcm_fee: None,
			fee_asset_balance: 0,
			events: Mutex::new(Self::finalized_events(Some("0xxcm"), None)),
			fail_queries: false,
			account_calls: AtomicUsize::new(0),
			submit_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_account(self, address: &str, data: AccountData) -> Self {
		self.accounts
			.lock()
			.unwrap()
			.insert(address.to_string(), data);
		self
	}

	pub fn with_default_account(mut self, data: AccountData) -> Self {
		self.default_account = data;
		self
	}

	pub fn with_xcm_fee(mut self, amount: u128, balance: u128) -> Self {
		self.xcm_fee = Some(XcmFee {
			asset_id: "DOT".to_string(),
			amount,
		});
		self.fee_asset_balance = balance;
		self
	}

	pub fn with_events(self, events: Vec<ExtrinsicEvent>) -> Self {
		*self.events.lock().unwrap() = events;
		self
	}

	pub fn failing_queries(mut self) -> Self {
		self.fail_queries = true;
		self
	}

	/// In-block then finalized events for a successful or failed extrinsic
	pub fn finalized_events(
		message_id: Option<&str>,
		dispatch_error: Option<&str>,
	) -> Vec<ExtrinsicEvent> {
		vec![
			ExtrinsicEvent::InBlock {
				block_hash: "0xinblock".to_string(),
				extrinsic_hash: "0xextrinsic".to_string(),
			},
			ExtrinsicEvent::Finalized(FinalizedExtrinsic {
				block_hash: "0xfinalized".to_string(),
				block_number: 8_000_000,
				extrinsic_hash: "0xextrinsic".to_string(),
				extrinsic_index: 2,
				message_id: message_id.map(str::to_string),
				dispatch_error: dispatch_error.map(str::to_string),
			}),
		]
	}

	fn query_error(&self) -> AdapterError {
		AdapterError::rpc(&self.location_id, "connection refused")
	}
}

#[async_trait]
impl ChainClient for MockChainClient {
	fn location_id(&self) -> &str {
		&self.location_id
	}

	async fn account_info(&self, address: &str) -> AdapterResult<AccountData> {
		self.account_calls.fetch_add(1, Ordering::SeqCst);
		if self.fail_queries {
			return Err(self.query_error());
		}
		Ok(self
			.accounts
			.lock()
			.unwrap()
			.get(address)
			.copied()
			.unwrap_or(self.default_account))
	}

	async fn fee_asset_balance(&self, _asset_id: &str, _address: &str) -> AdapterResult<u128> {
		if self.fail_queries {
			return Err(self.query_error());
		}
		Ok(self.fee_asset_balance)
	}

	async fn xcm_fee(&self) -> AdapterResult<XcmFee> {
		if self.fail_queries {
			return Err(self.query_error());
		}
		self.xcm_fee
			.clone()
			.ok_or_else(|| AdapterError::UnsupportedOperation {
				operation: "xcm_fee".to_string(),
				client: self.location_id.clone(),
			})
	}

	async fn submit(&self, _signed: &SignedInstruction) -> AdapterResult<ExtrinsicEventStream> {
		self.submit_calls.fetch_add(1, Ordering::SeqCst);
		let events = self.events.lock().unwrap().clone();
		Ok(stream::iter(events).boxed())
	}

	async fn watch_account(&self, address: &str) -> AdapterResult<BoxStream<'static, AccountData>> {
		let current = self.account_info(address).await?;
		Ok(stream::iter(vec![current]).boxed())
	}
}

/// Bridge SDK double with scripted plans and status signals
#[derive(Debug)]
pub struct MockBridgeSdk {
	plan_errors: Mutex<Option<Vec<PlanError>>>,
	send_error: Mutex<Option<String>>,
	message_id: String,
	status_info: Mutex<BridgeStatusInfo>,
	channels: Mutex<HashMap<String, ChannelStatusInfo>>,
	fail_status: Mutex<bool>,
	pub validate_send_calls: AtomicUsize,
	pub send_calls: AtomicUsize,
	pub status_calls: AtomicUsize,
	pub last_plan_request: Mutex<Option<PlanRequest>>,
}

impl Default for MockBridgeSdk {
	fn default() -> Self {
		Self::new()
	}
}

impl MockBridgeSdk {
	pub fn new() -> Self {
		let signals = healthy_signals();
		let channels = [
			signals.asset_hub_channel,
			signals.primary_governance_channel,
			signals.secondary_governance_channel,
		]
		.into_iter()
		.map(|channel| (channel.channel_id.clone(), channel))
		.collect();
		Self {
			plan_errors: Mutex::new(None),
			send_error: Mutex::new(None),
			message_id: "0xmessage".to_string(),
			status_info: Mutex::new(signals.status_info),
			channels: Mutex::new(channels),
			fail_status: Mutex::new(false),
			validate_send_calls: AtomicUsize::new(0),
			send_calls: AtomicUsize::new(0),
			status_calls: AtomicUsize::new(0),
			last_plan_request: Mutex::new(None),
		}
	}

	pub fn with_message_id(mut self, message_id: &str) -> Self {
		self.message_id = message_id.to_string();
		self
	}

	pub fn with_plan_errors(self, errors: Vec<PlanError>) -> Self {
		*self.plan_errors.lock().unwrap() = Some(errors);
		self
	}

	pub fn with_send_error(self, reason: &str) -> Self {
		*self.send_error.lock().unwrap() = Some(reason.to_string());
		self
	}

	pub fn set_status_info(&self, info: BridgeStatusInfo) {
		*self.status_info.lock().unwrap() = info;
	}

	pub fn set_asset_hub_channel(&self, to_polkadot: OperatingMode) {
		self.channels.lock().unwrap().insert(
			ASSET_HUB_CHANNEL.to_string(),
			channel_status(ASSET_HUB_CHANNEL, to_polkadot),
		);
	}

	pub fn set_fail_status(&self, fail: bool) {
		*self.fail_status.lock().unwrap() = fail;
	}

	fn status_error(&self) -> Option<AdapterError> {
		if *self.fail_status.lock().unwrap() {
			Some(AdapterError::rpc("bridgehub", "status unavailable"))
		} else {
			None
		}
	}
}

#[async_trait]
impl BridgeSdk for MockBridgeSdk {
	async fn validate_send(&self, request: &PlanRequest) -> AdapterResult<TransferPlan> {
		self.validate_send_calls.fetch_add(1, Ordering::SeqCst);
		*self.last_plan_request.lock().unwrap() = Some(request.clone());
		if let Some(errors) = self.plan_errors.lock().unwrap().clone() {
			return Ok(TransferPlan::Failure(errors));
		}
		Ok(TransferPlan::Success(PreparedInstruction::Bridge(
			BridgeInstruction {
				pathway: request.pathway,
				source_account: request.source_account.clone(),
				payload: serde_json::json!({
					"beneficiary": request.beneficiary,
					"amount": request.amount.to_string(),
				}),
			},
		)))
	}

	async fn send(&self, _signed: &SignedInstruction) -> AdapterResult<SubmissionResult> {
		self.send_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(reason) = self.send_error.lock().unwrap().clone() {
			return Err(AdapterError::rpc("ethereum", reason));
		}
		Ok(SubmissionResult {
			message_id: self.message_id.clone(),
			receipt: ethereum_receipt("0xsubmitted"),
		})
	}

	async fn bridge_status_info(&self) -> AdapterResult<BridgeStatusInfo> {
		self.status_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(error) = self.status_error() {
			return Err(error);
		}
		Ok(*self.status_info.lock().unwrap())
	}

	async fn channel_status_info(&self, channel_id: &str) -> AdapterResult<ChannelStatusInfo> {
		if let Some(error) = self.status_error() {
			return Err(error);
		}
		self.channels
			.lock()
			.unwrap()
			.get(channel_id)
			.cloned()
			.ok_or_else(|| AdapterError::InvalidResponse {
				reason: format!("unknown channel {}", channel_id),
			})
	}

	async fn bridge_accounts(&self) -> AdapterResult<Vec<BridgeAccount>> {
		Ok(vec![
			BridgeAccount {
				name: "Asset Hub Sovereign".to_string(),
				account: "0xd803472c47a87d7b63e888de53f03b4191b846a8".to_string(),
				kind: LocationKind::Ethereum,
			},
			BridgeAccount {
				name: "Asset Hub Agent".to_string(),
				account: "0x81c5ab2571199e3188135178f3c2c8e2d268be1313d029b30f534fa579b69b79"
					.to_string(),
				kind: LocationKind::Ethereum,
			},
			BridgeAccount {
				name: "Bridge Hub Agent".to_string(),
				account: "0x03170a2e7597b7b7e3d84c05391d139a62b157e78786d8c082f29dcf4c111314"
					.to_string(),
				kind: LocationKind::Ethereum,
			},
		])
	}

	async fn account_balance(&self, _account: &str, kind: LocationKind) -> AdapterResult<u128> {
		match kind {
			LocationKind::Ethereum => Ok(2_000_000_000_000_000_000),
			LocationKind::Substrate => Ok(50_000_000_000),
		}
	}
}

/// Screening service with a fixed block list
#[derive(Debug, Default)]
pub struct MockSanctionsScreener {
	blocked: HashSet<String>,
	unavailable: bool,
	pub calls: AtomicUsize,
}

impl MockSanctionsScreener {
	pub fn allowing_all() -> Self {
		Self::default()
	}

	pub fn blocking(addresses: &[&str]) -> Self {
		Self {
			blocked: addresses.iter().map(|a| a.to_lowercase()).collect(),
			..Self::default()
		}
	}

	pub fn unavailable() -> Self {
		Self {
			unavailable: true,
			..Self::default()
		}
	}
}

#[async_trait]
impl SanctionsScreener for MockSanctionsScreener {
	async fn check(&self, address: &str) -> AdapterResult<ScreeningVerdict> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.unavailable {
			return Err(AdapterError::HttpStatusError {
				status_code: 503,
				reason: "screening offline".to_string(),
			});
		}
		if self.blocked.contains(&address.to_lowercase()) {
			Ok(ScreeningVerdict::Blocked)
		} else {
			Ok(ScreeningVerdict::Allowed)
		}
	}
}

/// How the mock wallet answers signature requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerBehavior {
	Sign,
	Reject,
	/// Never answers, as a user who walks away from the prompt
	Hang,
}

#[derive(Debug)]
pub struct MockWalletSigner {
	account: Option<String>,
	behavior: SignerBehavior,
	pub sign_calls: AtomicUsize,
}

impl MockWalletSigner {
	pub fn new(account: &str) -> Self {
		Self {
			account: Some(account.to_string()),
			behavior: SignerBehavior::Sign,
			sign_calls: AtomicUsize::new(0),
		}
	}

	pub fn disconnected() -> Self {
		Self {
			account: None,
			behavior: SignerBehavior::Sign,
			sign_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_behavior(mut self, behavior: SignerBehavior) -> Self {
		self.behavior = behavior;
		self
	}
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
	fn account(&self) -> Option<String> {
		self.account.clone()
	}

	async fn sign(
		&self,
		account: &str,
		instruction: &PreparedInstruction,
	) -> Result<SignedInstruction, SigningError> {
		self.sign_calls.fetch_add(1, Ordering::SeqCst);
		match self.behavior {
			SignerBehavior::Sign => Ok(SignedInstruction {
				signer: account.to_string(),
				instruction: instruction.clone(),
				signature: "0xsignature".to_string(),
			}),
			SignerBehavior::Reject => Err(SigningError::Rejected),
			SignerBehavior::Hang => {
				futures::future::pending::<()>().await;
				Err(SigningError::Rejected)
			},
		}
	}
}

/// History indexer serving a replaceable list of transfers
#[derive(Debug, Default)]
pub struct MockHistoryIndexer {
	transfers: Mutex<Vec<Transfer>>,
	fail: Mutex<bool>,
	pub calls: AtomicUsize,
	pub last_window: Mutex<Option<HistoryWindow>>,
}

impl MockHistoryIndexer {
	pub fn with_transfers(transfers: Vec<Transfer>) -> Self {
		Self {
			transfers: Mutex::new(transfers),
			..Self::default()
		}
	}

	pub fn set_transfers(&self, transfers: Vec<Transfer>) {
		*self.transfers.lock().unwrap() = transfers;
	}

	pub fn set_failing(&self, fail: bool) {
		*self.fail.lock().unwrap() = fail;
	}
}

#[async_trait]
impl HistoryIndexer for MockHistoryIndexer {
	async fn fetch_history(&self, window: &HistoryWindow) -> AdapterResult<Vec<Transfer>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self.last_window.lock().unwrap() = Some(*window);
		if *self.fail.lock().unwrap() {
			return Err(AdapterError::HttpStatusError {
				status_code: 502,
				reason: "indexer unavailable".to_string(),
			});
		}
		Ok(self.transfers.lock().unwrap().clone())
	}
}
