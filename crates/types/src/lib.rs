//! Polar Path Types
//!
//! Shared models and collaborator traits for the Polar Path bridge
//! orchestration core: the location registry, transfers and their plans,
//! validation failures, bridge status signals and the error taxonomy.

pub mod adapters;
pub mod amount;
pub mod environment;
pub mod locations;
pub mod plan;
pub mod secret_string;
pub mod status;
pub mod transfers;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{
	AdapterError, AdapterResult, BridgeSdk, ChainClient, ExtrinsicEvent, ExtrinsicEventStream,
	FinalizedExtrinsic, HistoryIndexer, HistoryWindow, SanctionsScreener, WalletSigner,
};

pub use environment::{
	BridgeContracts, ChainEndpoints, ChannelIds, Environment, EnvironmentBuilder,
	EnvironmentError, ParachainRegistration, Relayer,
};

pub use locations::{
	AddressType, Location, LocationKind, ParachainInfo, ReceivableToken,
	DEFAULT_MINIMUM_TRANSFER_AMOUNT,
};

pub use plan::{
	BridgeInstruction, PlanError, PlanRequest, PreparedInstruction, SendOptions,
	SignedInstruction, SubmissionResult, TransferPlan, XcmCall, XcmInstruction,
};

pub use secret_string::SecretString;

pub use status::{
	BridgeAccount, BridgeStatus, BridgeStatusInfo, BridgeStatusSummary, ChannelDirectionInfo,
	ChannelStatusInfo, MonitoredAccount, NamedChannelStatus, OperatingMode, RawBridgeSignals,
	StatusValue, ToEthereumStatusInfo, ToEthereumSummary, ToPolkadotStatusInfo,
	ToPolkadotSummary, ACCEPTABLE_BRIDGE_LATENCY_SECONDS,
};

pub use transfers::{
	EthereumReceipt, Pathway, PathwayFamily, PlanFailure, RoutingError, SigningError,
	SubmissionError, SubmissionReceipt, SubmissionState, SubstrateReceipt, Transfer,
	TransferError, TransferInfo, TransferRequest, TransferResult, TransferStatus,
	UserFacingError, UserFacingIssue, XcmReceipt,
};

pub use validation::{
	AccountData, ScreeningVerdict, ValidationFailure, ValidationIssue, XcmFee,
};
