//! Sanctions screening over HTTP
//!
//! `GET <endpoint>/<address>` answers `{"blocked": bool}`.

use async_trait::async_trait;
use polar_types::{AdapterResult, SanctionsScreener, ScreeningVerdict};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http::{HttpServiceConfig, JsonHttpClient};

const TRACING_TARGET: &str = "polar_adapters::sanctions";

#[derive(Debug, Deserialize)]
struct ScreeningResponse {
	blocked: bool,
}

#[derive(Debug)]
pub struct HttpSanctionsScreener {
	client: JsonHttpClient,
}

impl HttpSanctionsScreener {
	pub fn new(config: &HttpServiceConfig) -> AdapterResult<Self> {
		Ok(Self {
			client: JsonHttpClient::new(config)?,
		})
	}
}

#[async_trait]
impl SanctionsScreener for HttpSanctionsScreener {
	async fn check(&self, address: &str) -> AdapterResult<ScreeningVerdict> {
		let url = self.client.build_url(address)?;
		let response: ScreeningResponse = self.client.get_json(url).await.map_err(|e| {
			warn!(target: TRACING_TARGET, address, error = %e, "Screening request failed");
			e
		})?;

		debug!(target: TRACING_TARGET, address, blocked = response.blocked, "Screened address");
		Ok(if response.blocked {
			ScreeningVerdict::Blocked
		} else {
			ScreeningVerdict::Allowed
		})
	}
}
