//! `CreateRegistrantStep`: registers a person for a webinar.

// self
use crate::{
	_prelude::*,
	client::RegistrantApi,
	registrant::{JOIN_URL_FIELD, REGISTRANT_KEY_FIELD, Registrant, decode_registrant},
	step::{
		FieldDefinition, FieldType, NO_ARGS, RecordDefinition, Step, StepDefinition, StepFuture,
		StepKind, StepRecord, StepRequest, StepResponse, keys_json, not_found, observe,
	},
};

/// Step id of [`CreateRegistrantStep`].
pub const CREATE_REGISTRANT_STEP_ID: &str = "CreateRegistrantStep";

/// Creates a registrant and records it, with the normalized key and join URL, for later steps.
pub struct CreateRegistrantStep {
	api: Arc<dyn RegistrantApi>,
	definition: StepDefinition,
}
impl CreateRegistrantStep {
	/// Binds the step to `api`.
	pub fn new(api: Arc<dyn RegistrantApi>) -> Self {
		let definition = StepDefinition {
			step_id: CREATE_REGISTRANT_STEP_ID,
			name: "Create a GoTo Webinar Registrant",
			expression: "create a goto webinar registrant",
			kind: StepKind::Action,
			expected_fields: vec![
				FieldDefinition::required(
					"organizerKey",
					FieldType::String,
					"Webinar Organizer's Id",
				),
				FieldDefinition::required("webinarKey", FieldType::String, "Webinar's Id"),
				FieldDefinition::required(
					"registrant",
					FieldType::Map,
					"A map of field names to field values",
				),
			],
			expected_records: vec![RecordDefinition {
				id: "registrant",
				fields: vec![
					FieldDefinition::required("id", FieldType::String, "The Registrant's ID"),
					FieldDefinition::required(
						REGISTRANT_KEY_FIELD,
						FieldType::String,
						"The Registrant's registrant key",
					),
					FieldDefinition::required(
						JOIN_URL_FIELD,
						FieldType::String,
						"The Registrant's join URL",
					),
				],
				dynamic_fields: true,
			}],
		};

		Self { api, definition }
	}

	async fn run(&self, request: &StepRequest) -> StepResponse {
		let (organizer_key, webinar_key, fields) = match (
			request.string("organizerKey"),
			request.string("webinarKey"),
			request.map("registrant"),
		) {
			(Ok(organizer_key), Ok(webinar_key), Ok(fields)) => (organizer_key, webinar_key, fields),
			(Err(err), ..) | (_, Err(err), _) | (.., Err(err)) => return err.into(),
		};
		let mut registrant = Registrant::from_fields(fields);
		let created = self
			.api
			.create_registrant(&registrant, &webinar_key, &organizer_key)
			.await
			.and_then(|response| Ok(decode_registrant(&response.body)?));

		match created {
			Ok(created) => {
				if let Some(key) = self.api.registrant_key_source().extract(&created) {
					registrant.insert(REGISTRANT_KEY_FIELD, key);
				}
				if let Some(join_url) = created.join_url() {
					registrant.insert(JOIN_URL_FIELD, join_url);
				}

				let fields = registrant.into_fields();
				let order = request.step_order();

				StepResponse::pass("Successfully created GoTo Webinar registrant", NO_ARGS)
					.with_records([
						StepRecord::key_value("registrant", "Created Registrant", fields.clone()),
						StepRecord::key_value(
							format!("registrant.{order}"),
							format!("Created Registrant from Step {order}"),
							fields,
						),
					])
			},
			Err(err) => {
				if let Some(api) = not_found(&err) {
					return StepResponse::error(
						format!("{}: %s", api.description()),
						[keys_json(&[
							("webinarKey", webinar_key.as_str()),
							("organizerKey", organizer_key.as_str()),
						])],
					);
				}
				if matches!(&err, Error::Api(api) if api.is_conflict()) {
					let email = registrant
						.get("email")
						.map(|value| match value {
							JsonValue::String(text) => text.clone(),
							other => other.to_string(),
						})
						.unwrap_or_default();

					return StepResponse::error(
						"Registrant %s is already registered in webinar with id %s",
						[email, webinar_key],
					);
				}

				StepResponse::error(
					"There was an error creating the registrant in GoTo Webinar: %s",
					[err.to_string()],
				)
			},
		}
	}
}
impl Step for CreateRegistrantStep {
	fn definition(&self) -> &StepDefinition {
		&self.definition
	}

	fn execute<'a>(&'a self, request: &'a StepRequest) -> StepFuture<'a> {
		Box::pin(observe(CREATE_REGISTRANT_STEP_ID, self.run(request)))
	}
}
