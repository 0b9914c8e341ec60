//! Polar Path Configuration
//!
//! Settings, loading and startup logging for the bridge service.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError, ENV_PREFIX};
pub use settings::{
	ChannelSettings, ConfigValidationError, ContractSettings, EndpointSettings,
	EnvironmentSettings, LocationSettings, LogFormat, LoggingSettings, ParachainInfoSettings,
	ParachainSettings, PollingSettings, RelayerSettings, ServerSettings,
	ServiceEndpointSettings, Settings, TimeoutSettings, TokenSettings,
};
pub use startup_logger::{
	log_environment, log_service_info, log_service_shutdown, log_startup_complete,
};
