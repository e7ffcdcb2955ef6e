//! Optional observability helpers for client operations and steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `webinar_steps.operation` (fields
//!   `operation`, `stage`) around the token exchange and every registrant call, and
//!   `webinar_steps.step` (field `step`) around each step execution.
//! - Enable `metrics` to increment `webinar_steps_operation_total` (labels `operation`,
//!   `outcome`) and `webinar_steps_step_total` (labels `step`, `outcome`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Refresh-token exchange performed while the client becomes ready.
	Authenticate,
	/// `POST .../registrants`.
	CreateRegistrant,
	/// `DELETE .../registrants/{registrantKey}`.
	DeleteRegistrant,
	/// `GET .../registrants/{registrantKey}`.
	GetRegistrant,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::CreateRegistrant => "create_registrant",
			OperationKind::DeleteRegistrant => "delete_registrant",
			OperationKind::GetRegistrant => "get_registrant",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
