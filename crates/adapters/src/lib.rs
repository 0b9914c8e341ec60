//! Polar Path Adapters
//!
//! HTTP implementations of the sanctions screener and history indexer.

pub mod http;
pub mod indexer;
pub mod sanctions;

pub use http::{HttpServiceConfig, API_KEY_HEADER};
pub use indexer::HttpHistoryIndexer;
pub use polar_types::{AdapterError, AdapterResult};
pub use sanctions::HttpSanctionsScreener;
