//! Mock collaborators wired into a `BridgeBuilder`

use polar_path::{BridgeBuilder, Settings};
use polar_types::test_utils::*;
use std::sync::Arc;

/// One set of mock collaborators, kept around for their call counters
pub struct Collaborators {
	pub sdk: Arc<MockBridgeSdk>,
	pub asset_hub: Arc<MockChainClient>,
	pub kilt: Arc<MockChainClient>,
	pub hydration: Arc<MockChainClient>,
	pub indexer: Arc<MockHistoryIndexer>,
	pub screener: Arc<MockSanctionsScreener>,
	pub signer: Arc<MockWalletSigner>,
}

#[allow(dead_code)]
impl Collaborators {
	pub fn new(signer: MockWalletSigner) -> Self {
		Self {
			sdk: Arc::new(MockBridgeSdk::new()),
			asset_hub: Arc::new(MockChainClient::new("assethub")),
			kilt: Arc::new(MockChainClient::new("kilt")),
			hydration: Arc::new(MockChainClient::new("hydration")),
			indexer: Arc::new(MockHistoryIndexer::default()),
			screener: Arc::new(MockSanctionsScreener::allowing_all()),
			signer: Arc::new(signer),
		}
	}

	pub fn with_screener(mut self, screener: MockSanctionsScreener) -> Self {
		self.screener = Arc::new(screener);
		self
	}

	pub fn with_sdk(mut self, sdk: MockBridgeSdk) -> Self {
		self.sdk = Arc::new(sdk);
		self
	}

	/// Settings with short timeouts; intervals long enough that only the first run happens
	pub fn settings() -> Settings {
		let mut settings = Settings::default();
		settings.environment = ENVIRONMENT_NAME.to_string();
		settings.timeouts.rpc_ms = 1_000;
		settings.timeouts.finalization_ms = 1_000;
		settings.timeouts.http_ms = 1_000;
		settings.polling.status_interval_secs = 3_600;
		settings.polling.history_interval_secs = 3_600;
		settings
	}

	/// Builder over the standard test environment with every collaborator set
	pub fn builder(&self) -> BridgeBuilder {
		BridgeBuilder::new()
			.with_settings(Self::settings())
			.with_environment(test_environment())
			.with_bridge_sdk(self.sdk.clone())
			.with_chain_client(self.asset_hub.clone())
			.with_chain_client(self.kilt.clone())
			.with_chain_client(self.hydration.clone())
			.with_history_indexer(self.indexer.clone())
			.with_screener(self.screener.clone())
			.with_signer(self.signer.clone())
	}
}
