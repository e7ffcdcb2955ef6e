//! `RegistrantFieldEqualsStep`: asserts on one field of a registrant.

// self
use crate::{
	_prelude::*,
	client::RegistrantApi,
	evaluate::{EvaluationError, OPERATORS, Operator, evaluate},
	registrant::{REGISTRANT_KEY_FIELD, Registrant, decode_registrant},
	step::{
		FieldDefinition, FieldType, NO_ARGS, RecordDefinition, Step, StepDefinition, StepFuture,
		StepKind, StepRecord, StepRequest, StepResponse, keys_json, not_found, observe,
	},
};

/// Step id of [`RegistrantFieldEqualsStep`].
pub const REGISTRANT_FIELD_EQUALS_STEP_ID: &str = "RegistrantFieldEqualsStep";

const DEFAULT_OPERATOR: &str = "be";
const EXPRESSION: &str = r"the (?<field>[a-zA-Z0-9_-]+) field on goto webinar registrant (?<registrantKey>.+\@.+\..+) should (?<operator>be set|not be set|be less than|be greater than|be one of|be|contain|not be one of|not be|not contain|match|not match) ?(?<expectation>.+)?";

/// Fetches a registrant and checks one of its fields with an operator.
pub struct RegistrantFieldEqualsStep {
	api: Arc<dyn RegistrantApi>,
	definition: StepDefinition,
}
impl RegistrantFieldEqualsStep {
	/// Binds the step to `api`.
	pub fn new(api: Arc<dyn RegistrantApi>) -> Self {
		let definition = StepDefinition {
			step_id: REGISTRANT_FIELD_EQUALS_STEP_ID,
			name: "Check a field on a GoTo Webinar Registrant",
			expression: EXPRESSION,
			kind: StepKind::Validation,
			expected_fields: vec![
				FieldDefinition::required(
					"organizerKey",
					FieldType::String,
					"Webinar's Organizer Key",
				),
				FieldDefinition::required("webinarKey", FieldType::String, "Webinar's Key"),
				FieldDefinition::required("registrantKey", FieldType::String, "Registrant's Key"),
				FieldDefinition::required("field", FieldType::String, "Field name to check"),
				FieldDefinition::optional(
					"operator",
					FieldType::String,
					"Check Logic (be, not be, contain, not contain, be greater than, be less than, be set, not be set, be one of, or not be one of)",
				),
				FieldDefinition::optional(
					"expectation",
					FieldType::AnyScalar,
					"Expected field value",
				),
			],
			expected_records: vec![RecordDefinition {
				id: "registrant",
				fields: vec![
					FieldDefinition::required(
						REGISTRANT_KEY_FIELD,
						FieldType::Numeric,
						"Registrant's Key",
					),
					FieldDefinition::required(
						"firstName",
						FieldType::String,
						"Registrant's First Name",
					),
					FieldDefinition::required("lastName", FieldType::String, "Registrant's Last Name"),
					FieldDefinition::required("email", FieldType::String, "Registrant's Email"),
				],
				dynamic_fields: true,
			}],
		};

		Self { api, definition }
	}

	async fn run(&self, request: &StepRequest) -> StepResponse {
		let inputs = (
			request.string("organizerKey"),
			request.string("webinarKey"),
			request.string("registrantKey"),
			request.string("field"),
			request.optional_string("operator"),
		);
		let (organizer_key, webinar_key, registrant_key, field, operator) = match inputs {
			(Ok(organizer_key), Ok(webinar_key), Ok(registrant_key), Ok(field), Ok(operator)) => (
				organizer_key,
				webinar_key,
				registrant_key,
				field,
				operator
					.filter(|operator| !operator.trim().is_empty())
					.unwrap_or_else(|| DEFAULT_OPERATOR.into()),
			),
			(Err(err), ..)
			| (_, Err(err), ..)
			| (_, _, Err(err), ..)
			| (.., Err(err), _)
			| (.., Err(err)) => return err.into(),
		};
		let expectation = request.value("expectation");
		let presence_only =
			matches!(operator.parse::<Operator>(), Ok(Operator::BeSet | Operator::NotBeSet));

		if expectation.is_none() && !presence_only {
			return requires_expectation(&operator);
		}

		let fetched = self
			.api
			.get_registrant_by_registrant_key(&registrant_key, &webinar_key, &organizer_key)
			.await
			.and_then(|response| Ok(decode_registrant(&response.body)?));
		let mut registrant = match fetched {
			Ok(registrant) => registrant,
			Err(err) => {
				if let Some(api) = not_found(&err) {
					return StepResponse::error(
						format!("{}: %s", api.description()),
						[keys_json(&[
							("webinarKey", webinar_key.as_str()),
							("organizerKey", organizer_key.as_str()),
							("registrantKey", registrant_key.as_str()),
						])],
					);
				}

				return validation_error(err);
			},
		};

		registrant.normalize_key(self.api.registrant_key_source());

		let Some(actual) = registrant.get(&field).cloned() else {
			return StepResponse::fail(
				"Found the registrant with key %s, but there was no %s field.",
				[registrant_key, field],
			)
			.with_records([checked_record(registrant)]);
		};

		match evaluate(&operator, &actual, expectation, &field) {
			Ok(verdict) => {
				let response = if verdict.valid {
					StepResponse::pass(verdict.message, NO_ARGS)
				} else {
					StepResponse::fail(verdict.message, NO_ARGS)
				};

				response.with_records([checked_record(registrant)])
			},
			Err(err @ EvaluationError::UnknownOperator { .. }) => StepResponse::error(
				"%s Please provide one of: %s",
				[err.to_string(), OPERATORS.join(", ")],
			),
			Err(EvaluationError::InvalidOperand { message, .. }) =>
				StepResponse::error(message, NO_ARGS),
			Err(EvaluationError::MissingExpectation { operator }) =>
				requires_expectation(operator.as_str()),
		}
	}
}
impl Step for RegistrantFieldEqualsStep {
	fn definition(&self) -> &StepDefinition {
		&self.definition
	}

	fn execute<'a>(&'a self, request: &'a StepRequest) -> StepFuture<'a> {
		Box::pin(observe(REGISTRANT_FIELD_EQUALS_STEP_ID, self.run(request)))
	}
}

fn requires_expectation(operator: &str) -> StepResponse {
	StepResponse::error(
		"The operator '%s' requires an expected value. Please provide one.",
		[operator],
	)
}

fn validation_error(err: Error) -> StepResponse {
	StepResponse::error(
		"There was an error during validation of registrant field: %s",
		[err.to_string()],
	)
}

fn checked_record(registrant: Registrant) -> StepRecord {
	StepRecord::key_value("registrant", "Checked Registrant", registrant.into_fields())
}
