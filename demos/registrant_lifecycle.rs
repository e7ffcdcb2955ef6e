//! Walks a registrant through create, field check, and delete against a mocked GoTo Webinar
//! API, printing each step response the way a host would report it.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use webinar_steps::{
	auth::Credential,
	client::{AuthenticatedClient, RegistrantApi},
	http::ReqwestHttpClient,
	provider::ProviderDescriptor,
	step::{
		CREATE_REGISTRANT_STEP_ID, DELETE_REGISTRANT_STEP_ID, REGISTRANT_FIELD_EQUALS_STEP_ID,
		StepRequest, find_step,
	},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let registrants = "/G2W/rest/v2/organizers/O1/webinars/W1/registrants";

	server
		.mock_async(|when, then| {
			when.method(POST).path(registrants);
			then.status(201).header("content-type", "application/json").body(
				"{\"registrantKey\":123456789012345678,\"joinUrl\":\"https://global.gotowebinar.com/join/W1/9876543210987654321\"}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{registrants}/9876543210987654321"));
			then.status(200).header("content-type", "application/json").body(
				"{\"registrantKey\":9876543210987654321,\"email\":\"ada@example.com\",\"status\":\"APPROVED\"}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(DELETE).path(format!("{registrants}/9876543210987654321"));
			then.status(204);
		})
		.await;

	let descriptor = ProviderDescriptor::builder()
		.token_endpoint(Url::parse(&server.url("/oauth/token"))?)
		.api_base(Url::parse(&server.url("/G2W/rest/v2"))?)
		.build()?;
	let client = AuthenticatedClient::with_http_client(
		Credential::new("demo-client", "demo-secret", "demo-refresh"),
		descriptor,
		ReqwestHttpClient::new()?,
	);
	let api: Arc<dyn RegistrantApi> = Arc::new(client);
	let keys = StepRequest::default().with("organizerKey", "O1").with("webinarKey", "W1");
	let create = find_step(api.clone(), CREATE_REGISTRANT_STEP_ID)
		.ok_or_else(|| color_eyre::eyre::eyre!("Create step is not registered."))?;
	let created = create
		.execute(&keys.clone().with("registrant", json!({ "email": "ada@example.com" })))
		.await;

	println!("{}: {}", created.outcome, created.message());

	let registrant_key = created
		.record("registrant")
		.and_then(|record| record.fields.get("registrantKey"))
		.and_then(|key| key.as_str())
		.unwrap_or_default()
		.to_owned();
	let keyed = keys.with("registrantKey", registrant_key);
	let check = find_step(api.clone(), REGISTRANT_FIELD_EQUALS_STEP_ID)
		.ok_or_else(|| color_eyre::eyre::eyre!("Field step is not registered."))?;
	let checked = check
		.execute(
			&keyed
				.clone()
				.with("field", "status")
				.with("operator", "be one of")
				.with("expectation", "APPROVED,WAITING"),
		)
		.await;

	println!("{}: {}", checked.outcome, checked.message());

	let delete = find_step(api, DELETE_REGISTRANT_STEP_ID)
		.ok_or_else(|| color_eyre::eyre::eyre!("Delete step is not registered."))?;
	let deleted = delete.execute(&keyed).await;

	println!("{}: {}", deleted.outcome, deleted.message());

	token_mock.assert_calls_async(1).await;

	Ok(())
}
