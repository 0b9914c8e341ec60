//! Collaborator traits
//!
//! Everything that touches a ledger, the bridge protocol, the wallet, the
//! history indexer or the sanctions list goes through one of these traits.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;

use super::{AdapterError, AdapterResult, ExtrinsicEvent, HistoryWindow};
use crate::{
	locations::LocationKind,
	plan::{PlanRequest, PreparedInstruction, SignedInstruction, SubmissionResult, TransferPlan},
	status::{BridgeAccount, BridgeStatusInfo, ChannelStatusInfo},
	transfers::{SigningError, Transfer},
	validation::{AccountData, ScreeningVerdict, XcmFee},
};

/// Stream of progress events for one submitted extrinsic
pub type ExtrinsicEventStream = BoxStream<'static, ExtrinsicEvent>;

/// Long-lived client for one substrate ledger
#[async_trait]
pub trait ChainClient: Send + Sync + Debug {
	/// Id of the location this client is connected to
	fn location_id(&self) -> &str;

	/// Free balance and sufficiency counters of an account
	async fn account_info(&self, address: &str) -> AdapterResult<AccountData>;

	/// Balance of a fungible fee asset held by an account
	///
	/// Default implementation returns UnsupportedOperation error.
	async fn fee_asset_balance(&self, _asset_id: &str, _address: &str) -> AdapterResult<u128> {
		Err(AdapterError::UnsupportedOperation {
			operation: "fee_asset_balance".to_string(),
			client: self.location_id().to_string(),
		})
	}

	/// XCM fee charged for messages leaving this chain
	///
	/// Default implementation returns UnsupportedOperation error.
	async fn xcm_fee(&self) -> AdapterResult<XcmFee> {
		Err(AdapterError::UnsupportedOperation {
			operation: "xcm_fee".to_string(),
			client: self.location_id().to_string(),
		})
	}

	/// Broadcast a signed extrinsic and follow it to finality
	async fn submit(&self, signed: &SignedInstruction) -> AdapterResult<ExtrinsicEventStream>;

	/// Watch an account for balance changes
	///
	/// Default implementation returns UnsupportedOperation error.
	async fn watch_account(&self, _address: &str) -> AdapterResult<BoxStream<'static, AccountData>> {
		Err(AdapterError::UnsupportedOperation {
			operation: "watch_account".to_string(),
			client: self.location_id().to_string(),
		})
	}
}

/// Bridge protocol SDK
#[async_trait]
pub trait BridgeSdk: Send + Sync + Debug {
	/// Preflight a bridge transfer and prepare its instruction
	async fn validate_send(&self, request: &PlanRequest) -> AdapterResult<TransferPlan>;

	/// Broadcast a signed bridge instruction, returning once it is first included
	async fn send(&self, signed: &SignedInstruction) -> AdapterResult<SubmissionResult>;

	async fn bridge_status_info(&self) -> AdapterResult<BridgeStatusInfo>;

	async fn channel_status_info(&self, channel_id: &str) -> AdapterResult<ChannelStatusInfo>;

	/// Sovereign and agent accounts owned by the bridge
	async fn bridge_accounts(&self) -> AdapterResult<Vec<BridgeAccount>>;

	/// Native balance of an account on Ethereum or the Asset Hub
	async fn account_balance(&self, account: &str, kind: LocationKind) -> AdapterResult<u128>;
}

/// Source of indexed transfer history
#[async_trait]
pub trait HistoryIndexer: Send + Sync + Debug {
	/// Transfers within the window, newest first
	async fn fetch_history(&self, window: &HistoryWindow) -> AdapterResult<Vec<Transfer>>;
}

/// Sanctions list lookup
#[async_trait]
pub trait SanctionsScreener: Send + Sync + Debug {
	async fn check(&self, address: &str) -> AdapterResult<ScreeningVerdict>;
}

/// Connected wallet capable of signing prepared instructions
#[async_trait]
pub trait WalletSigner: Send + Sync + Debug {
	/// Currently connected account, if any
	fn account(&self) -> Option<String>;

	/// Ask the user to sign. May wait indefinitely on user action.
	async fn sign(
		&self,
		account: &str,
		instruction: &PreparedInstruction,
	) -> Result<SignedInstruction, SigningError>;
}
