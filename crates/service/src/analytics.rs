//! Product analytics for the submission flow
//!
//! Tracking is fire-and-forget: a failing sink is logged and ignored.

use polar_types::Pathway;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalyticsEventKind {
	ValidateSend,
	ValidateFailed,
	PlanFailed,
	SendSuccess,
	SendFailed,
}

impl AnalyticsEventKind {
	pub fn name(&self) -> &'static str {
		match self {
			AnalyticsEventKind::ValidateSend => "Validate Send",
			AnalyticsEventKind::ValidateFailed => "Validate Failed",
			AnalyticsEventKind::PlanFailed => "Plan Failed",
			AnalyticsEventKind::SendSuccess => "Send Success",
			AnalyticsEventKind::SendFailed => "Send Failed",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
	pub kind: AnalyticsEventKind,
	pub source: String,
	pub destination: String,
	pub pathway: Option<Pathway>,
	/// Message id on success, error text on failure
	pub detail: Option<String>,
}

#[derive(Debug, Error)]
#[error("Analytics sink failed: {0}")]
pub struct AnalyticsError(pub String);

#[cfg_attr(test, mockall::automock)]
pub trait Analytics: Send + Sync + std::fmt::Debug {
	fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Sink that records events in the log
#[derive(Debug, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
	fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
		info!(
			target: "polar_service::analytics",
			event = event.kind.name(),
			source = %event.source,
			destination = %event.destination,
			pathway = ?event.pathway,
			detail = event.detail.as_deref().unwrap_or_default(),
			"Analytics event"
		);
		Ok(())
	}
}
