// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	step::StepOutcome,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"webinar_steps_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the outcome reported by a step (when enabled).
pub fn record_step_outcome(step_id: &'static str, outcome: StepOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"webinar_steps_step_total",
			"step" => step_id,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step_id, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_operation_outcome(OperationKind::GetRegistrant, OperationOutcome::Failure);
		record_step_outcome("RegistrantFieldEqualsStep", StepOutcome::Passed);
	}
}
