//! Polar Path
//!
//! Orchestration core for moving assets between Ethereum, the Polkadot Asset
//! Hub and parachains bridged to it. Wires the location registry, route
//! decider, validator, submitter, status aggregator and pending-transfer
//! reconciler behind a small read API.

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub use polar_types::{
	chrono, serde_json, AdapterError, BridgeSdk, BridgeStatus, BridgeStatusSummary, ChainClient,
	Environment, EnvironmentBuilder, HistoryIndexer, Location, Pathway, PathwayFamily,
	SanctionsScreener, StatusValue, SubmissionState, Transfer, TransferError, TransferRequest,
	TransferStatus, UserFacingError, WalletSigner,
};

pub use polar_service::{
	aggregate, decide_route, Analytics, BridgeConnection, BridgeContext, BridgeStatusService,
	HistoryService, JobProcessor, StatusCache, SubmissionFailure, SubmissionOutcome,
	SubmitterConfig, TracingAnalytics, TransferReconciler, TransferSubmitter, TransferValidator,
};

pub use polar_api::{create_router, AppState};

pub use polar_adapters::{HttpHistoryIndexer, HttpSanctionsScreener, HttpServiceConfig};

pub use polar_config::{
	load_config, log_service_info, log_startup_complete, LogFormat, LoggingSettings, Settings,
};

pub mod types {
	pub use polar_types::*;
}

pub mod config {
	pub use polar_config::*;
}

pub mod adapters {
	pub use polar_adapters::*;
}

pub mod service {
	pub use polar_service::*;
}

pub mod api {
	pub use polar_api::*;
}

/// Errors raised while assembling or starting the service
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("No {0} configured")]
	MissingCollaborator(&'static str),

	#[error("Configuration error: {0}")]
	Config(#[from] polar_config::ConfigValidationError),

	#[error("Failed to load configuration: {0}")]
	Load(#[from] polar_config::ConfigLoadError),

	#[error("Failed to resolve secret: {0}")]
	Secret(#[from] polar_config::ConfigurableValueError),

	#[error("Failed to create collaborator: {0}")]
	Adapter(#[from] AdapterError),

	#[error("Failed to schedule background job: {0}")]
	Job(#[from] polar_service::JobError),

	#[error("Invalid bind address '{address}': {reason}")]
	BindAddress { address: String, reason: String },

	#[error("Failed to initialise tracing: {0}")]
	Tracing(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Everything `BridgeBuilder::start` assembles
pub struct BridgeApp {
	pub router: axum::Router,
	pub state: AppState,
	pub connection: Arc<BridgeConnection>,
	/// Present when a wallet signer was supplied
	pub submitter: Option<Arc<TransferSubmitter>>,
	pub status_service: Arc<BridgeStatusService>,
	pub history_service: Arc<HistoryService>,
	pub jobs: Arc<JobProcessor>,
}

/// Builder wiring collaborators, services, background jobs and the router
#[derive(Default)]
pub struct BridgeBuilder {
	settings: Option<Settings>,
	environment: Option<Environment>,
	sdk: Option<Arc<dyn BridgeSdk>>,
	chain_clients: Vec<Arc<dyn ChainClient>>,
	indexer: Option<Arc<dyn HistoryIndexer>>,
	screener: Option<Arc<dyn SanctionsScreener>>,
	signer: Option<Arc<dyn WalletSigner>>,
	analytics: Option<Arc<dyn Analytics>>,
}

impl BridgeBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Use a ready-made environment instead of building one from settings
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);
		self
	}

	pub fn with_bridge_sdk(mut self, sdk: Arc<dyn BridgeSdk>) -> Self {
		self.sdk = Some(sdk);
		self
	}

	pub fn with_chain_client(mut self, client: Arc<dyn ChainClient>) -> Self {
		self.chain_clients.push(client);
		self
	}

	/// Overrides the HTTP indexer configured in settings
	pub fn with_history_indexer(mut self, indexer: Arc<dyn HistoryIndexer>) -> Self {
		self.indexer = Some(indexer);
		self
	}

	/// Overrides the HTTP screener configured in settings
	pub fn with_screener(mut self, screener: Arc<dyn SanctionsScreener>) -> Self {
		self.screener = Some(screener);
		self
	}

	pub fn with_signer(mut self, signer: Arc<dyn WalletSigner>) -> Self {
		self.signer = Some(signer);
		self
	}

	pub fn with_analytics(mut self, analytics: Arc<dyn Analytics>) -> Self {
		self.analytics = Some(analytics);
		self
	}

	/// Assemble services, schedule the refresh jobs and build the router
	pub async fn start(self) -> Result<BridgeApp, BuildError> {
		let settings = self.settings.unwrap_or_default();
		let environment = match self.environment {
			Some(environment) => environment,
			None => settings.build_environment()?,
		};
		let environment = Arc::new(environment);
		let sdk = self.sdk.ok_or(BuildError::MissingCollaborator("bridge SDK"))?;

		let screener: Arc<dyn SanctionsScreener> = match (self.screener, &settings.sanctions) {
			(Some(screener), _) => screener,
			(None, Some(endpoint)) => Arc::new(HttpSanctionsScreener::new(
				&HttpServiceConfig::new(&endpoint.endpoint, settings.timeouts.http_ms)
					.with_api_key(endpoint.resolve_api_key()?),
			)?),
			(None, None) => return Err(BuildError::MissingCollaborator("sanctions screener")),
		};
		let indexer: Arc<dyn HistoryIndexer> = match (self.indexer, &settings.indexer) {
			(Some(indexer), _) => indexer,
			(None, Some(endpoint)) => Arc::new(HttpHistoryIndexer::new(
				&HttpServiceConfig::new(&endpoint.endpoint, settings.timeouts.http_ms)
					.with_api_key(endpoint.resolve_api_key()?),
			)?),
			(None, None) => return Err(BuildError::MissingCollaborator("history indexer")),
		};
		let analytics = self
			.analytics
			.unwrap_or_else(|| Arc::new(TracingAnalytics));

		let context = self
			.chain_clients
			.into_iter()
			.fold(BridgeContext::new(Arc::clone(&environment), sdk), |context, client| {
				context.with_chain_client(client)
			});
		let connection = Arc::new(BridgeConnection::ready(context));
		let rpc_timeout_ms = settings.timeouts.rpc_ms;

		let status_service = Arc::new(BridgeStatusService::new(
			Arc::clone(&connection),
			rpc_timeout_ms,
		));
		let status_cache = Arc::new(StatusCache::new());
		let reconciler = Arc::new(TransferReconciler::new());
		let history_service = Arc::new(HistoryService::new(
			indexer,
			Arc::clone(&reconciler),
			settings.history_window(),
			settings.timeouts.http_ms,
		));

		let validator = Arc::new(TransferValidator::new(screener, rpc_timeout_ms));
		let submitter = self.signer.map(|signer| {
			Arc::new(TransferSubmitter::new(
				Arc::clone(&connection),
				validator,
				signer,
				Arc::clone(&reconciler),
				analytics,
				SubmitterConfig {
					rpc_timeout_ms,
					finalization_timeout_ms: settings.timeouts.finalization_ms,
				},
			))
		});

		let jobs = Arc::new(JobProcessor::new(Arc::new(
			polar_service::BackgroundJobHandler::new(
				Arc::clone(&status_service),
				Arc::clone(&status_cache),
				Arc::clone(&history_service),
			),
		)));
		jobs.schedule_job(
			settings.status_interval(),
			polar_service::BackgroundJob::RefreshBridgeStatus,
			"Bridge status refresh",
		)
		.await?;
		jobs.schedule_job(
			settings.history_interval(),
			polar_service::BackgroundJob::RefreshTransferHistory,
			"Transfer history refresh",
		)
		.await?;

		info!(
			environment = environment.name(),
			locations = environment.locations().len(),
			submitter = submitter.is_some(),
			"Bridge services initialised"
		);

		let state = AppState {
			environment,
			status_cache,
			reconciler,
		};
		let router = create_router().with_state(state.clone());

		Ok(BridgeApp {
			router,
			state,
			connection,
			submitter,
			status_service,
			history_service,
			jobs,
		})
	}

	/// Load `.env` and configuration, initialise tracing and serve the API
	/// until ctrl-c
	pub async fn start_server(mut self) -> Result<(), BuildError> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		init_tracing(&settings.logging)?;
		log_service_info();
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file and environment"
			}
		);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr.parse().map_err(|e: std::net::AddrParseError| {
			BuildError::BindAddress {
				address: bind_addr.clone(),
				reason: e.to_string(),
			}
		})?;

		self.settings = Some(settings);
		let app = self.start().await?;
		polar_config::log_environment(&app.state.environment);

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /api/v1/status");
		info!("  GET  /api/v1/history");
		info!("  GET  /api/v1/locations");
		info!("  GET  /api/v1/route?source=&destination=");

		axum::serve(listener, app.router)
			.with_graceful_shutdown(async {
				if let Err(e) = tokio::signal::ctrl_c().await {
					warn!("Failed to listen for shutdown signal: {}", e);
				}
			})
			.await?;

		app.jobs.shutdown().await;
		app.connection.disconnect();
		polar_config::log_service_shutdown();
		Ok(())
	}
}

/// Initialise the global subscriber; `RUST_LOG` takes precedence over the configured level
pub fn init_tracing(logging: &LoggingSettings) -> Result<(), BuildError> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

	let result = match logging.format {
		LogFormat::Json => tracing_subscriber::fmt()
			.json()
			.with_env_filter(env_filter)
			.with_target(logging.structured)
			.with_thread_ids(logging.structured)
			.try_init(),
		LogFormat::Pretty => tracing_subscriber::fmt()
			.pretty()
			.with_env_filter(env_filter)
			.with_target(logging.structured)
			.with_thread_ids(logging.structured)
			.try_init(),
		LogFormat::Compact => tracing_subscriber::fmt()
			.compact()
			.with_env_filter(env_filter)
			.with_target(logging.structured)
			.with_thread_ids(logging.structured)
			.try_init(),
	};
	result.map_err(|e| BuildError::Tracing(e.to_string()))?;

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		logging.level, logging.format, logging.structured
	);
	Ok(())
}
