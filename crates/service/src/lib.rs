//! Polar Path Service
//!
//! Routing, validation and submission of transfers, bridge status
//! aggregation, and reconciliation of locally submitted transfers against
//! indexed history.

pub mod analytics;
pub mod context;
pub mod error;
pub mod history;
pub mod jobs;
pub mod reconciler;
pub mod route;
pub mod status;
pub mod submitter;
pub mod validator;

pub use analytics::{Analytics, AnalyticsError, AnalyticsEvent, AnalyticsEventKind, TracingAnalytics};
pub use context::{with_timeout, BridgeConnection, BridgeContext, ConnectionState};
pub use error::{ServiceError, ServiceResult};
pub use history::HistoryService;
pub use jobs::{BackgroundJob, BackgroundJobHandler, JobError, JobProcessor};
pub use reconciler::{HistorySnapshot, TransferReconciler};
pub use route::decide as decide_route;
pub use status::{aggregate, BridgeStatusService, StatusCache};
pub use submitter::{
	awaiting_wallet_message, SubmissionFailure, SubmissionOutcome, SubmitterConfig,
	TransferSubmitter, VALIDATING_MESSAGE,
};
pub use validator::TransferValidator;
