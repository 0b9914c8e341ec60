//! Shared HTTP plumbing for the external collaborators

use polar_types::{AdapterError, AdapterResult, SecretString};
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue},
	Client, StatusCode,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the API key, when one is configured
pub const API_KEY_HEADER: &str = "x-api-key";

/// Endpoint, credentials and request timeout for one HTTP collaborator
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
	pub endpoint: String,
	pub api_key: Option<SecretString>,
	pub timeout_ms: u64,
}

impl HttpServiceConfig {
	pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			endpoint: endpoint.into(),
			api_key: None,
			timeout_ms,
		}
	}

	pub fn with_api_key(mut self, api_key: Option<SecretString>) -> Self {
		self.api_key = api_key;
		self
	}
}

/// JSON client bound to one base endpoint
#[derive(Debug, Clone)]
pub(crate) struct JsonHttpClient {
	base: Url,
	client: Client,
	timeout_ms: u64,
}

impl JsonHttpClient {
	pub(crate) fn new(config: &HttpServiceConfig) -> AdapterResult<Self> {
		let mut base = Url::parse(&config.endpoint).map_err(|e| AdapterError::ConfigError {
			reason: format!("Invalid base URL '{}': {}", config.endpoint, e),
		})?;
		// Treat the base as a directory so joins append rather than replace
		if !base.path().ends_with('/') {
			base.set_path(&format!("{}/", base.path()));
		}

		let mut headers = HeaderMap::new();
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert("User-Agent", HeaderValue::from_static("Polar-Path/1.0"));
		if let Some(key) = config.api_key.as_ref().filter(|key| !key.is_empty()) {
			let mut value =
				HeaderValue::from_str(key.expose_secret()).map_err(|_| AdapterError::ConfigError {
					reason: "API key is not a valid header value".to_string(),
				})?;
			value.set_sensitive(true);
			headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
		}

		let client = Client::builder()
			.default_headers(headers)
			.timeout(Duration::from_millis(config.timeout_ms))
			.build()
			.map_err(AdapterError::HttpError)?;

		Ok(Self {
			base,
			client,
			timeout_ms: config.timeout_ms,
		})
	}

	/// Join a relative path onto the base endpoint
	pub(crate) fn build_url(&self, path: &str) -> AdapterResult<Url> {
		let path = path.trim_start_matches('/');
		self.base
			.join(path)
			.map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Failed to join URL path '{}' to base '{}': {}", path, self.base, e),
			})
	}

	pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AdapterResult<T> {
		debug!(url = %url, "Sending GET request");
		let response = self.client.get(url).send().await.map_err(|e| self.map_error(e))?;

		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(status_error(status, reason));
		}

		let body = response.text().await.map_err(|e| self.map_error(e))?;
		serde_json::from_str(&body).map_err(|e| AdapterError::InvalidResponse {
			reason: format!("Failed to parse response body: {}", e),
		})
	}

	fn map_error(&self, error: reqwest::Error) -> AdapterError {
		if error.is_timeout() {
			AdapterError::Timeout {
				timeout_ms: self.timeout_ms,
			}
		} else {
			AdapterError::HttpError(error)
		}
	}
}

fn status_error(status: StatusCode, reason: String) -> AdapterError {
	AdapterError::HttpStatusError {
		status_code: status.as_u16(),
		reason: if reason.is_empty() {
			status.canonical_reason().unwrap_or("unknown").to_string()
		} else {
			reason
		},
	}
}
