//! Transfer submitter
//!
//! Drives one transfer from a fully formed request to a [`Transfer`] record:
//! form checks, routing, validation, planning, wallet signing and dispatch.
//! Only one submission runs at a time; a second call while one is in flight
//! is rejected.
//!
//! Bridge pathways return a `Pending` transfer as soon as the bridge SDK
//! reports first inclusion. Parachain pathways wait for the finalized
//! extrinsic and report `Complete` or fail directly.

use chrono::Utc;
use futures::StreamExt;
use polar_types::{
	AdapterError, ExtrinsicEvent, ExtrinsicEventStream, FinalizedExtrinsic, Location, Pathway,
	PathwayFamily, PlanError, PlanFailure, PlanRequest, PreparedInstruction, SendOptions,
	SignedInstruction, SigningError, SubmissionError, SubmissionReceipt, SubmissionState,
	Transfer, TransferError, TransferInfo, TransferPlan, TransferRequest, TransferResult,
	TransferStatus, UserFacingError, WalletSigner, XcmCall, XcmInstruction, XcmReceipt,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
	analytics::{Analytics, AnalyticsEvent, AnalyticsEventKind},
	context::{with_timeout, BridgeConnection, BridgeContext},
	reconciler::TransferReconciler,
	route,
	validator::TransferValidator,
};

const TRACING_TARGET: &str = "polar_service::submitter";

pub const VALIDATING_MESSAGE: &str = "Validating...";

/// Busy message shown while the wallet prompt is open
pub fn awaiting_wallet_message(family: PathwayFamily) -> &'static str {
	match family {
		PathwayFamily::ToEthereum => {
			"Waiting for transaction to be confirmed by wallet. After finalization transfers can take up to 4 hours."
		},
		PathwayFamily::ToPolkadot => {
			"Waiting for transaction to be confirmed by wallet. After finalization transfers can take up to 15-20 minutes."
		},
	}
}

#[derive(Debug, Clone, Copy)]
pub struct SubmitterConfig {
	/// Bound on planning and broadcast calls
	pub rpc_timeout_ms: u64,
	/// Bound on waiting for a parachain extrinsic to finalize
	pub finalization_timeout_ms: u64,
}

impl Default for SubmitterConfig {
	fn default() -> Self {
		Self {
			rpc_timeout_ms: 30_000,
			finalization_timeout_ms: 120_000,
		}
	}
}

/// A successful submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
	pub transfer: Transfer,
	/// `/history#<key>`
	pub url: String,
	/// `Submitted` for bridge pathways, `Confirmed` for parachain pathways
	pub state: SubmissionState,
}

/// A failed submission and the error object to present
#[derive(Debug, Error)]
#[error("{report}")]
pub struct SubmissionFailure {
	pub error: TransferError,
	pub report: UserFacingError,
}

impl SubmissionFailure {
	fn new(error: TransferError, family: Option<PathwayFamily>) -> Self {
		let report = error.to_user_facing(family);
		Self { error, report }
	}
}

#[derive(Debug)]
pub struct TransferSubmitter {
	connection: Arc<BridgeConnection>,
	validator: Arc<TransferValidator>,
	signer: Arc<dyn WalletSigner>,
	reconciler: Arc<TransferReconciler>,
	analytics: Arc<dyn Analytics>,
	config: SubmitterConfig,
	in_flight: AtomicBool,
	busy: watch::Sender<String>,
	state: watch::Sender<SubmissionState>,
	cancel: Mutex<Option<oneshot::Sender<()>>>,
}

/// Releases the single-flight slot and clears the busy message on every exit.
/// An attempt dropped mid-flight is settled so the next one can start.
struct FlightGuard<'a> {
	submitter: &'a TransferSubmitter,
}

impl Drop for FlightGuard<'_> {
	fn drop(&mut self) {
		self.submitter.state.send_if_modified(|state| match state.abandoned() {
			Some(settled) => {
				warn!(target: TRACING_TARGET, from = %state, to = %settled, "Submission dropped mid-flight");
				*state = settled;
				true
			},
			None => false,
		});
		self.submitter.cancel_slot().take();
		self.submitter.busy.send_replace(String::new());
		self.submitter.in_flight.store(false, Ordering::Release);
	}
}

impl TransferSubmitter {
	pub fn new(
		connection: Arc<BridgeConnection>,
		validator: Arc<TransferValidator>,
		signer: Arc<dyn WalletSigner>,
		reconciler: Arc<TransferReconciler>,
		analytics: Arc<dyn Analytics>,
		config: SubmitterConfig,
	) -> Self {
		let (busy, _) = watch::channel(String::new());
		let (state, _) = watch::channel(SubmissionState::Idle);
		Self {
			connection,
			validator,
			signer,
			reconciler,
			analytics,
			config,
			in_flight: AtomicBool::new(false),
			busy,
			state,
			cancel: Mutex::new(None),
		}
	}

	/// Busy message; empty while idle
	pub fn busy(&self) -> watch::Receiver<String> {
		self.busy.subscribe()
	}

	pub fn state(&self) -> SubmissionState {
		*self.state.borrow()
	}

	pub fn subscribe_state(&self) -> watch::Receiver<SubmissionState> {
		self.state.subscribe()
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight.load(Ordering::Acquire)
	}

	/// Abandon an outstanding wallet prompt. Returns false when there is none.
	pub fn cancel(&self) -> bool {
		match self.cancel_slot().take() {
			Some(sender) => sender.send(()).is_ok(),
			None => false,
		}
	}

	/// Submit one transfer
	pub async fn submit(
		&self,
		request: TransferRequest,
	) -> Result<SubmissionOutcome, SubmissionFailure> {
		if self
			.in_flight
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			return Err(SubmissionFailure::new(TransferError::AlreadyInFlight, None));
		}
		let _guard = FlightGuard { submitter: self };

		let attempt = Uuid::new_v4();
		info!(
			target: TRACING_TARGET,
			%attempt,
			source = %request.source,
			destination = %request.destination,
			"Starting transfer submission"
		);

		let mut pathway = None;
		match self.run(&request, attempt, &mut pathway).await {
			Ok(outcome) => {
				info!(
					target: TRACING_TARGET,
					%attempt,
					key = outcome.transfer.key(),
					state = %outcome.state,
					"Transfer submitted"
				);
				self.track(
					AnalyticsEventKind::SendSuccess,
					&request,
					pathway,
					Some(outcome.transfer.key().to_string()),
				);
				Ok(outcome)
			},
			Err(error) => {
				let terminal = match error {
					TransferError::Plan(_) => SubmissionState::PlanFailed,
					TransferError::Cancelled => SubmissionState::Cancelled,
					_ => SubmissionState::Failed,
				};
				if let Err(e) = self.advance(terminal) {
					debug!(target: TRACING_TARGET, %attempt, error = %e, "State left unchanged");
				}

				warn!(target: TRACING_TARGET, %attempt, error = %error, "Transfer submission failed");
				let kind = match error {
					TransferError::Validation(_) => AnalyticsEventKind::ValidateFailed,
					TransferError::Plan(_) => AnalyticsEventKind::PlanFailed,
					_ => AnalyticsEventKind::SendFailed,
				};
				self.track(kind, &request, pathway, Some(error.to_string()));
				Err(SubmissionFailure::new(error, pathway.map(|p| p.family())))
			},
		}
	}

	async fn run(
		&self,
		request: &TransferRequest,
		attempt: Uuid,
		pathway_slot: &mut Option<Pathway>,
	) -> TransferResult<SubmissionOutcome> {
		self.advance(SubmissionState::Planning)?;
		self.busy.send_replace(VALIDATING_MESSAGE.to_string());

		let context = self.connection.context()?;
		let (source, destination) = self.check_form(&context, request)?;
		let pathway = route::decide(source, destination, context.environment())?;
		*pathway_slot = Some(pathway);
		debug!(target: TRACING_TARGET, %attempt, %pathway, "Routed transfer");

		self.track(AnalyticsEventKind::ValidateSend, request, Some(pathway), None);
		self.validator.validate(&context, request, pathway).await?;

		let (instruction, destination_fee) = self.plan(&context, request, pathway).await?;
		self.advance(SubmissionState::Ready)?;

		let signed = self.sign(request, pathway, instruction).await?;
		let info = TransferInfo {
			when: Utc::now(),
			source_address: request.source_account.clone(),
			beneficiary_address: request.beneficiary.clone(),
			token_address: request.token.clone(),
			amount: request.amount,
			pathway: Some(pathway),
			source_location: Some(source.id.clone()),
			destination_location: Some(destination.id.clone()),
			destination_fee,
		};

		let (transfer, state) = match &signed.instruction {
			PreparedInstruction::Bridge(_) => {
				let transfer = self.dispatch_bridge(&context, &signed, info).await?;
				(transfer, SubmissionState::Submitted)
			},
			PreparedInstruction::Xcm(xcm) => {
				let transfer = self.dispatch_xcm(&context, &xcm.submit_on, &signed, info).await?;
				self.advance(SubmissionState::Confirmed)?;
				(transfer, SubmissionState::Confirmed)
			},
		};

		self.reconciler.add(transfer.clone());
		Ok(SubmissionOutcome {
			url: transfer.history_url(),
			transfer,
			state,
		})
	}

	/// Locations exist, the wallet account is the sender and the token is receivable
	fn check_form<'c>(
		&self,
		context: &'c BridgeContext,
		request: &TransferRequest,
	) -> TransferResult<(&'c Location, &'c Location)> {
		let source = context.location(&request.source)?;
		let destination = context.location(&request.destination)?;

		let account = self.signer.account().ok_or(SigningError::SignerMissing)?;
		if !account.eq_ignore_ascii_case(&request.source_account) {
			return Err(TransferError::InvalidRequest {
				reason: format!(
					"source account {} is not the connected wallet account",
					request.source_account
				),
			});
		}
		if request.beneficiary.trim().is_empty() {
			return Err(TransferError::InvalidRequest {
				reason: "beneficiary is required".to_string(),
			});
		}
		if destination.receivable_token(&request.token).is_none() {
			return Err(TransferError::InvalidRequest {
				reason: format!("{} does not receive token {}", destination.name, request.token),
			});
		}

		Ok((source, destination))
	}

	async fn plan(
		&self,
		context: &BridgeContext,
		request: &TransferRequest,
		pathway: Pathway,
	) -> TransferResult<(PreparedInstruction, Option<u128>)> {
		let source = context.location(&request.source)?;
		let destination = context.location(&request.destination)?;

		match pathway {
			Pathway::EthereumToAssetHub | Pathway::AssetHubToEthereum => {
				let substrate_end = if pathway == Pathway::EthereumToAssetHub {
					destination
				} else {
					source
				};
				let info = substrate_end.para_info.as_ref();
				let options = SendOptions {
					destination_fee: info.map(|i| i.destination_fee).filter(|fee| *fee > 0),
					max_consumers: info.map(|i| i.max_consumers),
					skip_existential_deposit_check: info
						.is_some_and(|i| i.skip_existential_deposit_check),
				};
				let plan_request = PlanRequest {
					pathway,
					source_account: request.source_account.clone(),
					beneficiary: request.beneficiary.clone(),
					token: request.token.clone(),
					amount: request.amount,
					para_id: substrate_end
						.para_id()
						.unwrap_or_else(|| context.environment().asset_hub_para_id()),
					options,
				};
				let destination_fee = plan_request.options.destination_fee;

				let plan = with_timeout(
					self.config.rpc_timeout_ms,
					context.sdk().validate_send(&plan_request),
				)
				.await?;
				match plan {
					TransferPlan::Success(instruction) => Ok((instruction, destination_fee)),
					TransferPlan::Failure(errors) => Err(PlanFailure { pathway, errors }.into()),
				}
			},
			Pathway::AssetHubToParachain => {
				let dest_para_id = destination.para_id().ok_or_else(|| PlanFailure {
					pathway,
					errors: vec![PlanError::new(
						"missingParaId",
						format!("{} has no parachain id", destination.name),
					)],
				})?;
				Ok((
					PreparedInstruction::Xcm(XcmInstruction {
						pathway,
						submit_on: source.id.clone(),
						source_account: request.source_account.clone(),
						call: XcmCall::TransferAssetsUsingTypeAndThen {
							dest_para_id,
							asset: request.token.clone(),
							amount: request.amount,
							beneficiary: request.beneficiary.clone(),
						},
					}),
					None,
				))
			},
			Pathway::ParachainToAssetHub => {
				let pallet = source
					.para_info
					.as_ref()
					.and_then(|info| info.switch_pallet.clone())
					.ok_or_else(|| PlanFailure {
						pathway,
						errors: vec![PlanError::new(
							"missingSwitchPallet",
							format!("{} has no asset switch pallet configured", source.name),
						)],
					})?;
				Ok((
					PreparedInstruction::Xcm(XcmInstruction {
						pathway,
						submit_on: source.id.clone(),
						source_account: request.source_account.clone(),
						call: XcmCall::Switch {
							pallet,
							amount: request.amount,
							beneficiary: request.beneficiary.clone(),
						},
					}),
					None,
				))
			},
		}
	}

	/// Wallet prompt; no timeout, cancellable through [`Self::cancel`]
	async fn sign(
		&self,
		request: &TransferRequest,
		pathway: Pathway,
		instruction: PreparedInstruction,
	) -> TransferResult<SignedInstruction> {
		self.advance(SubmissionState::AwaitingSignature)?;
		self.busy
			.send_replace(awaiting_wallet_message(pathway.family()).to_string());

		let (sender, cancelled) = oneshot::channel();
		*self.cancel_slot() = Some(sender);

		let result = tokio::select! {
			signed = self.signer.sign(&request.source_account, &instruction) => signed.map_err(TransferError::from),
			_ = cancelled => Err(TransferError::Cancelled),
		};
		self.cancel_slot().take();
		result
	}

	async fn dispatch_bridge(
		&self,
		context: &BridgeContext,
		signed: &SignedInstruction,
		info: TransferInfo,
	) -> TransferResult<Transfer> {
		let result = with_timeout(self.config.rpc_timeout_ms, context.sdk().send(signed))
			.await
			.map_err(broadcast_failed)?;
		self.advance(SubmissionState::Submitted)?;

		Ok(Transfer {
			id: result.message_id,
			status: TransferStatus::Pending,
			info,
			submitted: result.receipt,
			is_wallet_transaction: true,
		})
	}

	async fn dispatch_xcm(
		&self,
		context: &BridgeContext,
		submit_on: &str,
		signed: &SignedInstruction,
		info: TransferInfo,
	) -> TransferResult<Transfer> {
		let client = context.client(submit_on)?;
		let events = with_timeout(self.config.rpc_timeout_ms, client.submit(signed))
			.await
			.map_err(broadcast_failed)?;
		self.advance(SubmissionState::Submitted)?;

		let timeout_ms = self.config.finalization_timeout_ms;
		let finalized = tokio::time::timeout(Duration::from_millis(timeout_ms), await_finalized(events))
			.await
			.map_err(|_| AdapterError::Timeout { timeout_ms })??;

		if let Some(reason) = finalized.dispatch_error {
			return Err(SubmissionError::ExtrinsicFailed {
				extrinsic_hash: finalized.extrinsic_hash,
				reason,
			}
			.into());
		}

		Ok(Transfer {
			id: finalized.message_id.unwrap_or_default(),
			status: TransferStatus::Complete,
			submitted: SubmissionReceipt::Xcm(XcmReceipt {
				extrinsic_index: format!("{}-{}", finalized.block_number, finalized.extrinsic_index),
				block_hash: finalized.block_hash,
				block_number: finalized.block_number,
				extrinsic_hash: finalized.extrinsic_hash,
				account_id: signed.signer.clone(),
				success: true,
			}),
			info,
			is_wallet_transaction: true,
		})
	}

	fn advance(&self, next: SubmissionState) -> TransferResult<()> {
		let current = self.state();
		if !current.can_transition_to(next) {
			return Err(TransferError::InvalidTransition {
				from: current,
				to: next,
			});
		}
		self.state.send_replace(next);
		Ok(())
	}

	fn track(
		&self,
		kind: AnalyticsEventKind,
		request: &TransferRequest,
		pathway: Option<Pathway>,
		detail: Option<String>,
	) {
		let event = AnalyticsEvent {
			kind,
			source: request.source.clone(),
			destination: request.destination.clone(),
			pathway,
			detail,
		};
		if let Err(e) = self.analytics.track(&event) {
			debug!(target: TRACING_TARGET, error = %e, "Analytics event dropped");
		}
	}

	fn cancel_slot(&self) -> MutexGuard<'_, Option<oneshot::Sender<()>>> {
		self.cancel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

fn broadcast_failed(error: AdapterError) -> TransferError {
	SubmissionError::BroadcastFailed {
		reason: error.to_string(),
	}
	.into()
}

async fn await_finalized(mut events: ExtrinsicEventStream) -> TransferResult<FinalizedExtrinsic> {
	while let Some(event) = events.next().await {
		match event {
			ExtrinsicEvent::InBlock {
				block_hash,
				extrinsic_hash,
			} => {
				debug!(target: TRACING_TARGET, %block_hash, %extrinsic_hash, "Extrinsic in block");
			},
			ExtrinsicEvent::Finalized(finalized) => return Ok(finalized),
			ExtrinsicEvent::Error { reason } => {
				return Err(SubmissionError::ChainError { reason }.into())
			},
		}
	}
	Err(SubmissionError::StreamClosed.into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analytics::MockAnalytics;
	use polar_types::{test_utils::*, ValidationFailure};
	use std::sync::atomic::Ordering::SeqCst;

	struct Harness {
		sdk: Arc<MockBridgeSdk>,
		hub: Arc<MockChainClient>,
		kilt: Arc<MockChainClient>,
		signer: Arc<MockWalletSigner>,
		reconciler: Arc<TransferReconciler>,
		submitter: Arc<TransferSubmitter>,
	}

	fn quiet_analytics() -> MockAnalytics {
		let mut analytics = MockAnalytics::new();
		analytics.expect_track().returning(|_| Ok(()));
		analytics
	}

	fn harness_with(
		sdk: MockBridgeSdk,
		kilt: MockChainClient,
		signer: MockWalletSigner,
		screener: MockSanctionsScreener,
		analytics: MockAnalytics,
	) -> Harness {
		let sdk = Arc::new(sdk);
		let hub = Arc::new(MockChainClient::new("assethub"));
		let kilt = Arc::new(kilt);
		let signer = Arc::new(signer);
		let reconciler = Arc::new(TransferReconciler::new());
		let context = BridgeContext::new(Arc::new(test_environment()), sdk.clone())
			.with_chain_client(hub.clone())
			.with_chain_client(kilt.clone());
		let submitter = Arc::new(TransferSubmitter::new(
			Arc::new(BridgeConnection::ready(context)),
			Arc::new(TransferValidator::new(Arc::new(screener), 1_000)),
			signer.clone(),
			reconciler.clone(),
			Arc::new(analytics),
			SubmitterConfig {
				rpc_timeout_ms: 1_000,
				finalization_timeout_ms: 1_000,
			},
		));
		Harness {
			sdk,
			hub,
			kilt,
			signer,
			reconciler,
			submitter,
		}
	}

	fn harness(signer_account: &str) -> Harness {
		harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(signer_account),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		)
	}

	#[tokio::test]
	async fn test_bridge_pathway_returns_pending_transfer() {
		let h = harness(ETH_ACCOUNT);
		let outcome = h
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap();

		assert_eq!(outcome.state, SubmissionState::Submitted);
		assert_eq!(outcome.transfer.status, TransferStatus::Pending);
		assert_eq!(outcome.transfer.id, "0xmessage");
		assert_eq!(outcome.url, "/history#0xmessage");
		assert!(outcome.transfer.is_wallet_transaction);
		assert!(h.reconciler.is_pending("0xmessage"));
		assert_eq!(h.sdk.validate_send_calls.load(SeqCst), 1);
		assert_eq!(h.sdk.send_calls.load(SeqCst), 1);

		let plan_request = h.sdk.last_plan_request.lock().unwrap().clone().unwrap();
		assert_eq!(plan_request.para_id, ASSET_HUB_PARA_ID);
		assert_eq!(plan_request.pathway, Pathway::EthereumToAssetHub);

		assert!(!h.submitter.is_in_flight());
		assert!(h.submitter.busy().borrow().is_empty());
	}

	#[tokio::test]
	async fn test_parachain_pathway_confirms_on_finalization() {
		let h = harness(SUBSTRATE_ACCOUNT);
		let outcome = h
			.submitter
			.submit(transfer_request("kilt", "assethub", KILT_TOKEN, KILT_MINIMUM))
			.await
			.unwrap();

		assert_eq!(outcome.state, SubmissionState::Confirmed);
		assert_eq!(outcome.transfer.status, TransferStatus::Complete);
		assert_eq!(outcome.transfer.id, "0xxcm");
		assert_eq!(h.submitter.state(), SubmissionState::Confirmed);
		assert_eq!(h.kilt.submit_calls.load(SeqCst), 1);
		assert_eq!(h.sdk.validate_send_calls.load(SeqCst), 0);
		match &outcome.transfer.submitted {
			SubmissionReceipt::Xcm(receipt) => {
				assert_eq!(receipt.extrinsic_hash, "0xextrinsic");
				assert_eq!(receipt.extrinsic_index, "8000000-2");
			},
			other => panic!("unexpected receipt {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_asset_hub_to_parachain_submits_on_asset_hub() {
		let h = harness(SUBSTRATE_ACCOUNT);
		h.submitter
			.submit(transfer_request("assethub", "kilt", KILT_TOKEN, KILT_MINIMUM))
			.await
			.unwrap();
		assert_eq!(h.hub.submit_calls.load(SeqCst), 1);
		assert_eq!(h.kilt.submit_calls.load(SeqCst), 0);
	}

	#[tokio::test]
	async fn test_parachain_without_message_id_keyed_by_extrinsic() {
		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt").with_events(MockChainClient::finalized_events(None, None)),
			MockWalletSigner::new(SUBSTRATE_ACCOUNT),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let outcome = h
			.submitter
			.submit(transfer_request("kilt", "assethub", KILT_TOKEN, KILT_MINIMUM))
			.await
			.unwrap();
		assert!(outcome.transfer.id.is_empty());
		assert_eq!(outcome.transfer.key(), "0xextrinsic");
		assert!(h.reconciler.is_pending("0xextrinsic"));
	}

	#[tokio::test]
	async fn test_dispatch_error_fails_submission() {
		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt").with_events(MockChainClient::finalized_events(
				None,
				Some("assetSwitchPool1.Unauthorized"),
			)),
			MockWalletSigner::new(SUBSTRATE_ACCOUNT),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);

		let failure = h
			.submitter
			.submit(transfer_request("kilt", "assethub", KILT_TOKEN, KILT_MINIMUM))
			.await
			.unwrap_err();
		assert!(matches!(
			failure.error,
			TransferError::Submission(SubmissionError::ExtrinsicFailed { .. })
		));
		assert_eq!(failure.report.title, "Send Error");
		assert_eq!(h.submitter.state(), SubmissionState::Failed);
		assert!(h.reconciler.pending().is_empty());
	}

	#[tokio::test]
	async fn test_chain_error_and_closed_stream() {
		for (events, expected) in [
			(
				vec![ExtrinsicEvent::Error {
					reason: "invalid transaction".to_string(),
				}],
				"Chain reported an error: invalid transaction",
			),
			(vec![], "Submission status stream closed before finalization"),
		] {
			let h = harness_with(
				MockBridgeSdk::new(),
				MockChainClient::new("kilt").with_events(events),
				MockWalletSigner::new(SUBSTRATE_ACCOUNT),
				MockSanctionsScreener::allowing_all(),
				quiet_analytics(),
			);
			let failure = h
				.submitter
				.submit(transfer_request("kilt", "assethub", KILT_TOKEN, KILT_MINIMUM))
				.await
				.unwrap_err();
			assert_eq!(failure.error.to_string(), expected);
		}
	}

	#[tokio::test]
	async fn test_below_minimum_stops_before_planning() {
		let h = harness(SUBSTRATE_ACCOUNT);
		let failure = h
			.submitter
			.submit(transfer_request("kilt", "assethub", KILT_TOKEN, KILT_MINIMUM - 1))
			.await
			.unwrap_err();

		let TransferError::Validation(issues) = &failure.error else {
			panic!("expected validation failure, got {:?}", failure.error);
		};
		assert_eq!(issues.len(), 1);
		assert!(matches!(issues[0].failure, ValidationFailure::BelowMinimum { .. }));
		assert_eq!(h.kilt.submit_calls.load(SeqCst), 0);
		assert_eq!(h.signer.sign_calls.load(SeqCst), 0);
		assert_eq!(failure.report.title, "Transfer Validation Failed");
		assert_eq!(h.submitter.state(), SubmissionState::Failed);
	}

	#[tokio::test]
	async fn test_blocked_beneficiary_stops_before_validate_send() {
		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(SUBSTRATE_ACCOUNT),
			MockSanctionsScreener::blocking(&[ETH_ACCOUNT]),
			quiet_analytics(),
		);
		let failure = h
			.submitter
			.submit(transfer_request("assethub", "ethereum", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();

		assert!(matches!(failure.error, TransferError::Validation(_)));
		assert_eq!(h.sdk.validate_send_calls.load(SeqCst), 0);
		assert_eq!(failure.report.errors[0].kind, Some(PathwayFamily::ToEthereum));
	}

	#[tokio::test]
	async fn test_plan_failure_surfaces_all_errors() {
		let h = harness_with(
			MockBridgeSdk::new().with_plan_errors(vec![
				PlanError::new("InsufficientTokenBalance", "Insufficient token balance."),
				PlanError::new("InsufficientEther", "Insufficient ether to pay fees."),
			]),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(ETH_ACCOUNT),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let failure = h
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();

		assert_eq!(failure.report.title, "Send Plan Failed");
		assert_eq!(failure.report.errors.len(), 2);
		assert_eq!(h.submitter.state(), SubmissionState::PlanFailed);
		assert_eq!(h.signer.sign_calls.load(SeqCst), 0);
		assert_eq!(h.sdk.send_calls.load(SeqCst), 0);
	}

	#[tokio::test]
	async fn test_signing_rejected_and_missing_wallet() {
		let rejected = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(ETH_ACCOUNT).with_behavior(SignerBehavior::Reject),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let failure = rejected
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();
		assert!(matches!(failure.error, TransferError::Signing(SigningError::Rejected)));
		assert_eq!(rejected.submitter.state(), SubmissionState::Failed);

		let missing = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::disconnected(),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let failure = missing
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();
		assert_eq!(failure.report.title, "Account not found");
	}

	#[tokio::test]
	async fn test_form_checks() {
		let h = harness(ETH_ACCOUNT);

		let mut wrong_account = transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000);
		wrong_account.source_account = "0x0000000000000000000000000000000000000001".to_string();
		assert!(matches!(
			h.submitter.submit(wrong_account).await.unwrap_err().error,
			TransferError::InvalidRequest { .. }
		));

		let unknown = transfer_request("ethereum", "moonbeam", WETH_TOKEN, 1_000);
		assert!(matches!(
			h.submitter.submit(unknown).await.unwrap_err().error,
			TransferError::UnknownLocation { ref id } if id == "moonbeam"
		));

		let unroutable = transfer_request("ethereum", "kilt", KILT_TOKEN, 1_000);
		let failure = h.submitter.submit(unroutable).await.unwrap_err();
		assert!(matches!(failure.error, TransferError::Routing(_)));
		assert_eq!(failure.report.title, "Unsupported Transfer");

		// A failed attempt does not block the next one
		assert!(h
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.is_ok());
	}

	#[tokio::test]
	async fn test_context_not_ready() {
		let submitter = TransferSubmitter::new(
			Arc::new(BridgeConnection::new()),
			Arc::new(TransferValidator::new(
				Arc::new(MockSanctionsScreener::allowing_all()),
				1_000,
			)),
			Arc::new(MockWalletSigner::new(ETH_ACCOUNT)),
			Arc::new(TransferReconciler::new()),
			Arc::new(quiet_analytics()),
			SubmitterConfig::default(),
		);
		let failure = submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();
		assert!(matches!(failure.error, TransferError::ContextNotReady));
		assert_eq!(failure.report.description, "Context not configured.");
	}

	#[tokio::test]
	async fn test_single_flight_and_cancellation() {
		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(ETH_ACCOUNT).with_behavior(SignerBehavior::Hang),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		assert!(!h.submitter.cancel());

		let mut states = h.submitter.subscribe_state();
		let first = tokio::spawn({
			let submitter = h.submitter.clone();
			async move {
				submitter
					.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
					.await
			}
		});

		states
			.wait_for(|state| *state == SubmissionState::AwaitingSignature)
			.await
			.unwrap();
		assert_eq!(
			h.submitter.busy().borrow().as_str(),
			awaiting_wallet_message(PathwayFamily::ToPolkadot)
		);

		let second = h
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();
		assert!(matches!(second.error, TransferError::AlreadyInFlight));

		assert!(h.submitter.cancel());
		let first = first.await.unwrap().unwrap_err();
		assert!(matches!(first.error, TransferError::Cancelled));
		assert_eq!(h.submitter.state(), SubmissionState::Cancelled);
		assert!(h.submitter.busy().borrow().is_empty());
		assert_eq!(h.sdk.send_calls.load(SeqCst), 0);
	}

	#[tokio::test]
	async fn test_dropped_submission_is_cancelled() {
		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(ETH_ACCOUNT).with_behavior(SignerBehavior::Hang),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let spawn_submit = |submitter: Arc<TransferSubmitter>| {
			tokio::spawn(async move {
				submitter
					.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
					.await
			})
		};

		let mut states = h.submitter.subscribe_state();
		let first = spawn_submit(h.submitter.clone());
		states
			.wait_for(|state| *state == SubmissionState::AwaitingSignature)
			.await
			.unwrap();

		first.abort();
		assert!(first.await.unwrap_err().is_cancelled());
		assert_eq!(h.submitter.state(), SubmissionState::Cancelled);
		assert!(!h.submitter.is_in_flight());
		assert!(h.submitter.busy().borrow().is_empty());
		assert!(!h.submitter.cancel());

		// A fresh attempt starts from the settled state
		let second = spawn_submit(h.submitter.clone());
		states
			.wait_for(|state| *state == SubmissionState::AwaitingSignature)
			.await
			.unwrap();
		assert!(h.submitter.cancel());
		let second = second.await.unwrap().unwrap_err();
		assert!(matches!(second.error, TransferError::Cancelled));
		assert_eq!(h.signer.sign_calls.load(SeqCst), 2);
		assert_eq!(h.sdk.send_calls.load(SeqCst), 0);
	}

	#[tokio::test]
	async fn test_analytics_events_and_failures_swallowed() {
		let mut analytics = MockAnalytics::new();
		analytics
			.expect_track()
			.withf(|event| event.kind == AnalyticsEventKind::ValidateSend)
			.times(1)
			.returning(|_| Err(crate::analytics::AnalyticsError("sink down".to_string())));
		analytics
			.expect_track()
			.withf(|event| {
				event.kind == AnalyticsEventKind::SendSuccess
					&& event.detail.as_deref() == Some("0xmessage")
			})
			.times(1)
			.returning(|_| Err(crate::analytics::AnalyticsError("sink down".to_string())));

		let h = harness_with(
			MockBridgeSdk::new(),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(ETH_ACCOUNT),
			MockSanctionsScreener::allowing_all(),
			analytics,
		);
		assert!(h
			.submitter
			.submit(transfer_request("ethereum", "assethub", WETH_TOKEN, 1_000))
			.await
			.is_ok());
	}

	#[tokio::test]
	async fn test_broadcast_failure() {
		let h = harness_with(
			MockBridgeSdk::new().with_send_error("nonce too low"),
			MockChainClient::new("kilt"),
			MockWalletSigner::new(SUBSTRATE_ACCOUNT),
			MockSanctionsScreener::allowing_all(),
			quiet_analytics(),
		);
		let failure = h
			.submitter
			.submit(transfer_request("assethub", "ethereum", WETH_TOKEN, 1_000))
			.await
			.unwrap_err();
		assert!(matches!(
			failure.error,
			TransferError::Submission(SubmissionError::BroadcastFailed { .. })
		));
		assert_eq!(failure.report.title, "Send Error");
		assert_eq!(failure.report.errors[0].kind, Some(PathwayFamily::ToEthereum));
		assert_eq!(h.submitter.state(), SubmissionState::Failed);
	}
}
