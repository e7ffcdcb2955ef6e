// std
use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use serde_json::{Value as JsonValue, json};
// self
use webinar_steps::{
	client::{ApiFuture, RegistrantApi},
	error::{ApiError, AuthError, Error},
	http::ApiResponse,
	registrant::{Registrant, RegistrantKeySource},
	step::{
		CREATE_REGISTRANT_STEP_ID, CreateRegistrantStep, DELETE_REGISTRANT_STEP_ID,
		DeleteRegistrantStep, REGISTRANT_FIELD_EQUALS_STEP_ID, RegistrantFieldEqualsStep, Step,
		StepKind, StepOutcome, StepRequest, find_step, steps,
	},
};

enum Reply {
	Body(u16, &'static str),
	AuthFailure(AuthError),
}

/// Canned provider answering every operation with the same reply.
struct StubApi {
	reply: Reply,
	key_source: RegistrantKeySource,
	calls: AtomicUsize,
	last_keys: Mutex<Option<(String, String, String)>>,
}
impl StubApi {
	fn new(reply: Reply) -> Arc<Self> {
		Self::with_key_source(reply, RegistrantKeySource::JoinUrl)
	}

	fn with_key_source(reply: Reply, key_source: RegistrantKeySource) -> Arc<Self> {
		Arc::new(Self { reply, key_source, calls: AtomicUsize::new(0), last_keys: Mutex::new(None) })
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	fn respond<'a>(&'a self, keys: (&str, &str, &str)) -> ApiFuture<'a, ApiResponse> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self.last_keys.lock().expect("Stub lock should not be poisoned.") =
			Some((keys.0.to_owned(), keys.1.to_owned(), keys.2.to_owned()));

		let result = match &self.reply {
			Reply::Body(status, body) if (200..300).contains(status) =>
				Ok(ApiResponse { status: *status, body: (*body).to_owned() }),
			Reply::Body(status, body) =>
				Err(Error::Api(ApiError { status: *status, body: (*body).to_owned() })),
			Reply::AuthFailure(err) => Err(Error::Auth(err.clone())),
		};

		Box::pin(async move { result })
	}
}
impl RegistrantApi for StubApi {
	fn create_registrant<'a>(
		&'a self,
		_registrant: &'a Registrant,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		self.respond(("", webinar_key, organizer_key))
	}

	fn delete_registrant<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		self.respond((registrant_key, webinar_key, organizer_key))
	}

	fn get_registrant_by_registrant_key<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		self.respond((registrant_key, webinar_key, organizer_key))
	}

	fn registrant_key_source(&self) -> RegistrantKeySource {
		self.key_source
	}
}

fn field_request(field: &str, operator: &str, expectation: impl Into<JsonValue>) -> StepRequest {
	StepRequest::default()
		.with("organizerKey", "O1")
		.with("webinarKey", "W1")
		.with("registrantKey", "R1")
		.with("field", field)
		.with("operator", operator)
		.with("expectation", expectation)
}

const FETCHED: &str = r#"{"registrantKey":1234567890123456789,"firstName":"Ada","email":"ada@example.com","status":"b","joinUrl":"https://global.gotowebinar.com/join/W1/9876543210987654321"}"#;

#[tokio::test]
async fn registry_exposes_three_steps() {
	let api = StubApi::new(Reply::Body(200, "{}"));
	let all = steps(api.clone());
	let ids = all.iter().map(|step| step.definition().step_id).collect::<Vec<_>>();

	assert_eq!(ids, [CREATE_REGISTRANT_STEP_ID, DELETE_REGISTRANT_STEP_ID, REGISTRANT_FIELD_EQUALS_STEP_ID]);

	let field_step = find_step(api.clone(), REGISTRANT_FIELD_EQUALS_STEP_ID)
		.expect("Field step should be registered.");

	assert_eq!(field_step.definition().kind, StepKind::Validation);
	assert_eq!(field_step.definition().name, "Check a field on a GoTo Webinar Registrant");
	assert!(find_step(api, "UnknownStep").is_none());
}

#[tokio::test]
async fn field_step_passes_for_member_of_list() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api.clone());
	let response = step.execute(&field_request("status", "be one of", "a,b,c")).await;

	assert_eq!(response.outcome, StepOutcome::Passed, "{}", response.message());

	let record = response.record("registrant").expect("Checked registrant should be recorded.");

	assert_eq!(record.name, "Checked Registrant");
	assert_eq!(record.fields["email"], "ada@example.com");
	assert_eq!(
		api.last_keys.lock().expect("Stub lock should not be poisoned.").clone(),
		Some(("R1".into(), "W1".into(), "O1".into()))
	);
}

#[tokio::test]
async fn field_step_fails_for_non_member_with_explanation() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api);
	let response = step.execute(&field_request("firstName", "be one of", "a,b,c")).await;

	assert_eq!(response.outcome, StepOutcome::Failed);
	assert!(response.message().contains("firstName"));
	assert!(response.message().contains("Ada"));
}

#[tokio::test]
async fn field_step_keeps_every_digit_of_large_identifiers() {
	let api = StubApi::with_key_source(
		Reply::Body(200, FETCHED),
		RegistrantKeySource::ResponseField,
	);
	let step = RegistrantFieldEqualsStep::new(api);
	let response =
		step.execute(&field_request("registrantKey", "be", "1234567890123456789")).await;

	assert_eq!(response.outcome, StepOutcome::Passed, "{}", response.message());

	let record = response.record("registrant").expect("Checked registrant should be recorded.");

	assert_eq!(record.fields["registrantKey"], "1234567890123456789");
}

#[tokio::test]
async fn field_step_normalizes_key_from_join_url() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api);
	let response =
		step.execute(&field_request("registrantKey", "be", "9876543210987654321")).await;

	assert_eq!(response.outcome, StepOutcome::Passed, "{}", response.message());
}

#[tokio::test]
async fn field_step_treats_blank_operator_as_be() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api.clone());

	for operator in ["", "  "] {
		let response = step.execute(&field_request("firstName", operator, "Ada")).await;

		assert_eq!(response.outcome, StepOutcome::Passed, "{}", response.message());
	}

	let missing = step.execute(&field_request("firstName", "", JsonValue::Null)).await;

	assert_eq!(missing.outcome, StepOutcome::Error);
	assert_eq!(
		missing.message(),
		"The operator 'be' requires an expected value. Please provide one."
	);
	assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn field_step_requires_expectation_before_any_call() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api.clone());
	let request = field_request("email", "contain", JsonValue::Null);
	let response = step.execute(&request).await;

	assert_eq!(response.outcome, StepOutcome::Error);
	assert_eq!(
		response.message(),
		"The operator 'contain' requires an expected value. Please provide one."
	);
	assert_eq!(api.calls(), 0);

	let presence = field_request("email", "be set", JsonValue::Null);

	assert_eq!(step.execute(&presence).await.outcome, StepOutcome::Passed);
	assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn field_step_reports_missing_field() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api);
	let response = step.execute(&field_request("phone", "be", "555")).await;

	assert_eq!(response.outcome, StepOutcome::Failed);
	assert_eq!(response.message(), "Found the registrant with key R1, but there was no phone field.");
	assert!(response.record("registrant").is_some());
}

#[tokio::test]
async fn field_step_reports_operator_problems_as_errors() {
	let api = StubApi::new(Reply::Body(200, FETCHED));
	let step = RegistrantFieldEqualsStep::new(api);
	let unknown = step.execute(&field_request("email", "resemble", "x")).await;

	assert_eq!(unknown.outcome, StepOutcome::Error);
	assert!(unknown.message().contains("Please provide one of: be, not be, contain"));

	let invalid = step.execute(&field_request("firstName", "be greater than", 5)).await;

	assert_eq!(invalid.outcome, StepOutcome::Error);
	assert!(invalid.message().contains("firstName"));
}

#[tokio::test]
async fn field_step_maps_provider_failures() {
	let not_found = StubApi::new(Reply::Body(404, r#"{"description":"Registrant not found"}"#));
	let response =
		RegistrantFieldEqualsStep::new(not_found).execute(&field_request("email", "be", "x")).await;

	assert_eq!(response.outcome, StepOutcome::Error);
	assert_eq!(response.message_format, "Registrant not found: %s");

	let keys: JsonValue =
		serde_json::from_str(&response.message_args[0]).expect("Keys should be JSON.");

	assert_eq!(keys, json!({ "webinarKey": "W1", "organizerKey": "O1", "registrantKey": "R1" }));

	let unauthorized = StubApi::new(Reply::AuthFailure(AuthError::TokenNotIssued));
	let response = RegistrantFieldEqualsStep::new(unauthorized)
		.execute(&field_request("email", "be", "x"))
		.await;

	assert_eq!(response.outcome, StepOutcome::Error);
	assert_eq!(
		response.message(),
		"There was an error during validation of registrant field: Access Token was not retrieved. Please try to reconnect."
	);
}

#[tokio::test]
async fn create_step_records_registrant_with_join_url_key() {
	let api = StubApi::new(Reply::Body(
		201,
		r#"{"registrantKey":123456789012345678,"joinUrl":"https://x/join/W1/R987"}"#,
	));
	let step = CreateRegistrantStep::new(api);
	let request = StepRequest::default()
		.with("organizerKey", "O1")
		.with("webinarKey", "W1")
		.with("registrant", json!({ "email": "a@b.com" }))
		.with("__stepOrder", 2);
	let response = step.execute(&request).await;

	assert_eq!(response.outcome, StepOutcome::Passed, "{}", response.message());
	assert_eq!(response.message(), "Successfully created GoTo Webinar registrant");

	let record = response.record("registrant").expect("Created registrant should be recorded.");

	assert_eq!(record.name, "Created Registrant");
	assert_eq!(record.fields["email"], "a@b.com");
	assert_eq!(record.fields["registrantKey"], "R987");
	assert_eq!(record.fields["joinUrl"], "https://x/join/W1/R987");

	let ordered = response.record("registrant.2").expect("Ordered record should be present.");

	assert_eq!(ordered.name, "Created Registrant from Step 2");
	assert_eq!(ordered.fields, record.fields);
}

#[tokio::test]
async fn create_step_uses_response_field_when_configured() {
	let api = StubApi::with_key_source(
		Reply::Body(201, r#"{"registrantKey":123456789012345678,"joinUrl":"https://x/join/W1/R987"}"#),
		RegistrantKeySource::ResponseField,
	);
	let request = StepRequest::default()
		.with("organizerKey", "O1")
		.with("webinarKey", "W1")
		.with("registrant", json!({ "email": "a@b.com" }));
	let response = CreateRegistrantStep::new(api).execute(&request).await;
	let record = response.record("registrant").expect("Created registrant should be recorded.");

	assert_eq!(record.fields["registrantKey"], "123456789012345678");
	assert!(response.record("registrant.1").is_some());
}

#[tokio::test]
async fn create_step_maps_conflict_and_not_found() {
	let request = StepRequest::default()
		.with("organizerKey", "O1")
		.with("webinarKey", "W1")
		.with("registrant", json!({ "email": "a@b.com" }));
	let conflict = CreateRegistrantStep::new(StubApi::new(Reply::Body(409, "{}")))
		.execute(&request)
		.await;

	assert_eq!(conflict.outcome, StepOutcome::Error);
	assert_eq!(conflict.message(), "Registrant a@b.com is already registered in webinar with id W1");

	let missing = CreateRegistrantStep::new(StubApi::new(Reply::Body(
		404,
		r#"{"description":"Webinar not found"}"#,
	)))
	.execute(&request)
	.await;

	assert_eq!(missing.outcome, StepOutcome::Error);
	assert_eq!(missing.message_format, "Webinar not found: %s");

	let keys: JsonValue =
		serde_json::from_str(&missing.message_args[0]).expect("Keys should be JSON.");

	assert_eq!(keys, json!({ "webinarKey": "W1", "organizerKey": "O1" }));

	let failure = CreateRegistrantStep::new(StubApi::new(Reply::Body(500, "boom")))
		.execute(&request)
		.await;

	assert!(
		failure
			.message()
			.starts_with("There was an error creating the registrant in GoTo Webinar: ")
	);
}

#[tokio::test]
async fn create_step_requires_inputs() {
	let api = StubApi::new(Reply::Body(201, "{}"));
	let request = StepRequest::default().with("organizerKey", "O1").with("webinarKey", "W1");
	let response = CreateRegistrantStep::new(api.clone()).execute(&request).await;

	assert_eq!(response.outcome, StepOutcome::Error);
	assert!(response.message().contains("registrant"));
	assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn delete_step_reports_success_and_not_found() {
	let request = StepRequest::default()
		.with("organizerKey", "O1")
		.with("webinarKey", "W1")
		.with("registrantKey", "R1");
	let deleted = DeleteRegistrantStep::new(StubApi::new(Reply::Body(204, "")))
		.execute(&request)
		.await;

	assert_eq!(deleted.outcome, StepOutcome::Passed);
	assert_eq!(deleted.message(), "Successfully deleted GoTo Webinar registrant");

	let missing = DeleteRegistrantStep::new(StubApi::new(Reply::Body(
		404,
		r#"{"description":"Registrant not found"}"#,
	)))
	.execute(&request)
	.await;

	assert_eq!(missing.outcome, StepOutcome::Error);

	let message = missing.message();

	assert!(message.starts_with("Registrant not found: "));
	assert!(message.contains("\"webinarKey\":\"W1\""));
	assert!(message.contains("\"organizerKey\":\"O1\""));
	assert!(message.contains("\"registrantKey\":\"R1\""));

	let failure = DeleteRegistrantStep::new(StubApi::new(Reply::Body(500, "boom")))
		.execute(&request)
		.await;

	assert!(
		failure
			.message()
			.starts_with("There was an error deleting the registrant in GoTo Webinar: ")
	);
}

