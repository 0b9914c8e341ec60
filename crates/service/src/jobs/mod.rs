//! Background jobs
//!
//! Recurring refreshes of the bridge status report and the transfer history.

pub mod handlers;
pub mod processor;
pub mod types;

pub use handlers::BackgroundJobHandler;
pub use processor::{JobHandler, JobProcessor, JobStatus, ScheduledJob};
pub use types::{BackgroundJob, JobError, JobResult};
