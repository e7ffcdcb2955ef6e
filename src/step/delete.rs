//! `DeleteRegistrantStep`: cancels a registration.

// self
use crate::{
	_prelude::*,
	client::RegistrantApi,
	step::{
		FieldDefinition, FieldType, NO_ARGS, RecordDefinition, Step, StepDefinition, StepFuture,
		StepKind, StepRequest, StepResponse, keys_json, not_found, observe,
	},
};

/// Step id of [`DeleteRegistrantStep`].
pub const DELETE_REGISTRANT_STEP_ID: &str = "DeleteRegistrantStep";

/// Deletes a registrant from a webinar.
pub struct DeleteRegistrantStep {
	api: Arc<dyn RegistrantApi>,
	definition: StepDefinition,
}
impl DeleteRegistrantStep {
	/// Binds the step to `api`.
	pub fn new(api: Arc<dyn RegistrantApi>) -> Self {
		let definition = StepDefinition {
			step_id: DELETE_REGISTRANT_STEP_ID,
			name: "Delete a GoTo Webinar Registrant",
			expression: "delete a goto webinar registrant",
			kind: StepKind::Action,
			expected_fields: vec![
				FieldDefinition::required(
					"organizerKey",
					FieldType::String,
					"Webinar Organizer's Id",
				),
				FieldDefinition::required("webinarKey", FieldType::String, "Webinar's Id"),
				FieldDefinition::required("registrantKey", FieldType::String, "Registrant's Key"),
			],
			expected_records: vec![RecordDefinition {
				id: "registrant",
				fields: Vec::new(),
				dynamic_fields: true,
			}],
		};

		Self { api, definition }
	}

	async fn run(&self, request: &StepRequest) -> StepResponse {
		let (organizer_key, webinar_key, registrant_key) = match (
			request.string("organizerKey"),
			request.string("webinarKey"),
			request.string("registrantKey"),
		) {
			(Ok(organizer_key), Ok(webinar_key), Ok(registrant_key)) =>
				(organizer_key, webinar_key, registrant_key),
			(Err(err), ..) | (_, Err(err), _) | (.., Err(err)) => return err.into(),
		};

		match self.api.delete_registrant(&registrant_key, &webinar_key, &organizer_key).await {
			Ok(_) => StepResponse::pass("Successfully deleted GoTo Webinar registrant", NO_ARGS),
			Err(err) => match not_found(&err) {
				Some(api) => StepResponse::error(
					format!("{}: %s", api.description()),
					[keys_json(&[
						("webinarKey", webinar_key.as_str()),
						("organizerKey", organizer_key.as_str()),
						("registrantKey", registrant_key.as_str()),
					])],
				),
				None => StepResponse::error(
					"There was an error deleting the registrant in GoTo Webinar: %s",
					[err.to_string()],
				),
			},
		}
	}
}
impl Step for DeleteRegistrantStep {
	fn definition(&self) -> &StepDefinition {
		&self.definition
	}

	fn execute<'a>(&'a self, request: &'a StepRequest) -> StepFuture<'a> {
		Box::pin(observe(DELETE_REGISTRANT_STEP_ID, self.run(request)))
	}
}
