//! Connection to the bridge and the chain clients it needs
//!
//! A [`BridgeContext`] bundles the immutable environment with the bridge SDK
//! and one long-lived [`ChainClient`] per substrate location. Validation and
//! submission are refused until the [`BridgeConnection`] is `Ready`.

use polar_types::{
	AdapterError, AdapterResult, BridgeSdk, ChainClient, Environment, Location, TransferError,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Everything needed to talk to the bridge in one environment
#[derive(Debug)]
pub struct BridgeContext {
	environment: Arc<Environment>,
	sdk: Arc<dyn BridgeSdk>,
	clients: HashMap<String, Arc<dyn ChainClient>>,
}

impl BridgeContext {
	pub fn new(environment: Arc<Environment>, sdk: Arc<dyn BridgeSdk>) -> Self {
		Self {
			environment,
			sdk,
			clients: HashMap::new(),
		}
	}

	/// Register a chain client under the location id it reports
	pub fn with_chain_client(mut self, client: Arc<dyn ChainClient>) -> Self {
		self.clients.insert(client.location_id().to_string(), client);
		self
	}

	pub fn environment(&self) -> &Arc<Environment> {
		&self.environment
	}

	pub fn sdk(&self) -> &Arc<dyn BridgeSdk> {
		&self.sdk
	}

	pub fn client(&self, location_id: &str) -> Result<&Arc<dyn ChainClient>, TransferError> {
		self.clients
			.get(location_id)
			.ok_or_else(|| TransferError::ChainClientMissing {
				location: location_id.to_string(),
			})
	}

	pub fn asset_hub(&self) -> Result<&Location, TransferError> {
		self.environment
			.asset_hub()
			.ok_or_else(|| TransferError::UnknownLocation {
				id: format!("asset hub (para id {})", self.environment.asset_hub_para_id()),
			})
	}

	pub fn location(&self, id: &str) -> Result<&Location, TransferError> {
		self.environment
			.location(id)
			.ok_or_else(|| TransferError::UnknownLocation { id: id.to_string() })
	}

	/// Location ids that have a registered chain client
	pub fn client_ids(&self) -> impl Iterator<Item = &str> {
		self.clients.keys().map(String::as_str)
	}
}

#[derive(Debug, Clone, Default)]
pub enum ConnectionState {
	#[default]
	Disconnected,
	Connecting,
	Ready(Arc<BridgeContext>),
}

impl ConnectionState {
	pub fn is_ready(&self) -> bool {
		matches!(self, ConnectionState::Ready(_))
	}
}

/// Observable connection state shared by every service
#[derive(Debug)]
pub struct BridgeConnection {
	state: watch::Sender<ConnectionState>,
}

impl Default for BridgeConnection {
	fn default() -> Self {
		Self::new()
	}
}

impl BridgeConnection {
	pub fn new() -> Self {
		let (state, _) = watch::channel(ConnectionState::Disconnected);
		Self { state }
	}

	/// A connection that is ready from the start
	pub fn ready(context: BridgeContext) -> Self {
		let connection = Self::new();
		connection.set_ready(context);
		connection
	}

	pub fn set_connecting(&self) {
		self.state.send_replace(ConnectionState::Connecting);
	}

	pub fn set_ready(&self, context: BridgeContext) {
		self.state
			.send_replace(ConnectionState::Ready(Arc::new(context)));
	}

	pub fn disconnect(&self) {
		self.state.send_replace(ConnectionState::Disconnected);
	}

	pub fn state(&self) -> ConnectionState {
		self.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
		self.state.subscribe()
	}

	/// The ready context, or `ContextNotReady`
	pub fn context(&self) -> Result<Arc<BridgeContext>, TransferError> {
		match &*self.state.borrow() {
			ConnectionState::Ready(context) => Ok(Arc::clone(context)),
			_ => Err(TransferError::ContextNotReady),
		}
	}
}

/// Bound a collaborator call, surfacing elapsed time as `AdapterError::Timeout`
pub async fn with_timeout<T, F>(timeout_ms: u64, call: F) -> AdapterResult<T>
where
	F: Future<Output = AdapterResult<T>>,
{
	tokio::time::timeout(Duration::from_millis(timeout_ms), call)
		.await
		.map_err(|_| AdapterError::Timeout { timeout_ms })?
}

#[cfg(test)]
mod tests {
	use super::*;
	use polar_types::test_utils::{test_environment, MockBridgeSdk, MockChainClient};

	fn context() -> BridgeContext {
		BridgeContext::new(Arc::new(test_environment()), Arc::new(MockBridgeSdk::new()))
			.with_chain_client(Arc::new(MockChainClient::new("assethub")))
	}

	#[test]
	fn test_context_refused_until_ready() {
		let connection = BridgeConnection::new();
		assert!(matches!(connection.context(), Err(TransferError::ContextNotReady)));

		connection.set_connecting();
		assert!(matches!(connection.state(), ConnectionState::Connecting));
		assert!(matches!(connection.context(), Err(TransferError::ContextNotReady)));

		connection.set_ready(context());
		assert!(connection.state().is_ready());
		assert!(connection.context().is_ok());

		connection.disconnect();
		assert!(connection.context().is_err());
	}

	#[test]
	fn test_subscribers_observe_transitions() {
		let connection = BridgeConnection::new();
		let mut receiver = connection.subscribe();
		connection.set_ready(context());
		assert!(receiver.has_changed().unwrap());
		assert!(receiver.borrow_and_update().is_ready());
	}

	#[test]
	fn test_client_lookup() {
		let context = context();
		assert!(context.client("assethub").is_ok());
		assert!(matches!(
			context.client("kilt"),
			Err(TransferError::ChainClientMissing { ref location }) if location == "kilt"
		));
		assert_eq!(context.asset_hub().unwrap().id, "assethub");
	}

	#[tokio::test]
	async fn test_with_timeout_maps_elapsed() {
		let result: AdapterResult<()> = with_timeout(10, async {
			tokio::time::sleep(Duration::from_millis(200)).await;
			Ok(())
		})
		.await;
		assert!(matches!(result, Err(AdapterError::Timeout { timeout_ms: 10 })));
	}
}
