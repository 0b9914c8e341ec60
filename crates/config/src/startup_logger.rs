//! Service startup logging for Polar Path

use polar_types::Environment;
use std::env;
use tracing::info;

/// Logs service information at startup
pub fn log_service_info() {
	let service_name = "polar-path";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Polar Path Bridge Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the active environment and its registered locations
pub fn log_environment(environment: &Environment) {
	info!("🌉 Environment: {}", environment.name());
	info!(
		"🔗 Asset Hub para id: {}, Bridge Hub para id: {}, Ethereum chain id: {}",
		environment.asset_hub_para_id(),
		environment.bridge_hub_para_id(),
		environment.eth_chain_id()
	);
	for location in environment.locations() {
		info!(
			"📍 Location {} ({}) -> [{}]",
			location.id,
			location.name,
			location.destination_ids.join(", ")
		);
	}
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Polar Path Bridge Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs startup completion
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Polar Path Bridge Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}
