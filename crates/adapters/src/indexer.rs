//! Transfer history from an HTTP indexer
//!
//! `GET <endpoint>/transfers?from=<rfc3339>&to=<rfc3339>` answers a JSON
//! array of transfers.

use async_trait::async_trait;
use chrono::SecondsFormat;
use polar_types::{AdapterResult, HistoryIndexer, HistoryWindow, Transfer};
use tracing::{debug, warn};

use crate::http::{HttpServiceConfig, JsonHttpClient};

const TRACING_TARGET: &str = "polar_adapters::indexer";

#[derive(Debug)]
pub struct HttpHistoryIndexer {
	client: JsonHttpClient,
}

impl HttpHistoryIndexer {
	pub fn new(config: &HttpServiceConfig) -> AdapterResult<Self> {
		Ok(Self {
			client: JsonHttpClient::new(config)?,
		})
	}
}

#[async_trait]
impl HistoryIndexer for HttpHistoryIndexer {
	async fn fetch_history(&self, window: &HistoryWindow) -> AdapterResult<Vec<Transfer>> {
		let mut url = self.client.build_url("transfers")?;
		url.query_pairs_mut()
			.append_pair("from", &window.from.to_rfc3339_opts(SecondsFormat::Secs, true))
			.append_pair("to", &window.to.to_rfc3339_opts(SecondsFormat::Secs, true));

		let transfers: Vec<Transfer> = self.client.get_json(url).await.map_err(|e| {
			warn!(target: TRACING_TARGET, error = %e, "History request failed");
			e
		})?;

		debug!(target: TRACING_TARGET, count = transfers.len(), "Fetched transfer history");
		Ok(transfers)
	}
}
