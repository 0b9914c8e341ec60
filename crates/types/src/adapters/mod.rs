//! Collaborator interfaces and the data they exchange

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{AdapterError, AdapterResult};
pub use models::{ExtrinsicEvent, FinalizedExtrinsic, HistoryWindow};
pub use traits::{
	BridgeSdk, ChainClient, ExtrinsicEventStream, HistoryIndexer, SanctionsScreener, WalletSigner,
};
