//! Registrant resource calls issued once the client is ready.

// crates.io
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderValue},
};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	client::{ApiSession, Readiness},
	error::{ConfigError, TransportError},
	http::{ApiResponse, ReqwestHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::BodyEncoding,
	registrant::Registrant,
};

/// Registrant operations composed into [`AuthenticatedClient`](crate::client::AuthenticatedClient).
///
/// Every call awaits the shared readiness cell first; no request leaves before the token
/// exchange has succeeded.
#[derive(Clone, Debug)]
pub struct RegistrantOperations {
	readiness: Arc<Readiness>,
	transport: ReqwestHttpClient,
}
impl RegistrantOperations {
	pub(crate) fn new(readiness: Arc<Readiness>, transport: ReqwestHttpClient) -> Self {
		Self { readiness, transport }
	}

	/// Creates `registrant` in the given webinar.
	pub async fn create(
		&self,
		registrant: &Registrant,
		webinar_key: &str,
		organizer_key: &str,
	) -> Result<ApiResponse> {
		self.send(
			OperationKind::CreateRegistrant,
			Method::POST,
			registrants_path(organizer_key, webinar_key, None),
			Some(registrant),
		)
		.await
	}

	/// Deletes the registrant identified by `registrant_key`.
	pub async fn delete(
		&self,
		registrant_key: &str,
		webinar_key: &str,
		organizer_key: &str,
	) -> Result<ApiResponse> {
		self.send(
			OperationKind::DeleteRegistrant,
			Method::DELETE,
			registrants_path(organizer_key, webinar_key, Some(registrant_key)),
			None,
		)
		.await
	}

	/// Fetches the registrant identified by `registrant_key`.
	pub async fn get(
		&self,
		registrant_key: &str,
		webinar_key: &str,
		organizer_key: &str,
	) -> Result<ApiResponse> {
		self.send(
			OperationKind::GetRegistrant,
			Method::GET,
			registrants_path(organizer_key, webinar_key, Some(registrant_key)),
			None,
		)
		.await
	}

	async fn send(
		&self,
		kind: OperationKind,
		method: Method,
		segments: Vec<&str>,
		body: Option<&Registrant>,
	) -> Result<ApiResponse> {
		let span = OperationSpan::new(kind, "send");

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let session = self.readiness.resolve().await?;
				let request = self.build_request(&session, method, &segments, body)?;
				let response = request.send().await.map_err(TransportError::from)?;
				let envelope = ApiResponse::read(response).await.map_err(TransportError::from)?;

				Ok(envelope.error_for_status()?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(kind, OperationOutcome::Failure),
		}

		result
	}

	fn build_request(
		&self,
		session: &ApiSession,
		method: Method,
		segments: &[&str],
		body: Option<&Registrant>,
	) -> Result<reqwest::RequestBuilder> {
		let is_get = method == Method::GET;
		let request = self
			.transport
			.request(method, session.url(segments))
			.headers(session.default_headers().clone());
		let request = match body {
			Some(registrant) => {
				let encoding = session.post_encoding();

				request
					.header(CONTENT_TYPE, HeaderValue::from_static(encoding.content_type()))
					.body(encode_body(registrant, encoding)?)
			},
			None if is_get => request
				.header(CONTENT_TYPE, HeaderValue::from_static(session.get_content_type())),
			None => request,
		};

		Ok(request)
	}
}

fn registrants_path<'a>(
	organizer_key: &'a str,
	webinar_key: &'a str,
	registrant_key: Option<&'a str>,
) -> Vec<&'a str> {
	let mut segments = vec!["organizers", organizer_key, "webinars", webinar_key, "registrants"];

	segments.extend(registrant_key);

	segments
}

/// Encodes a registrant body for `encoding`.
///
/// Form bodies render scalars as text, `null` as an empty value, and nested values as JSON.
pub fn encode_body(
	registrant: &Registrant,
	encoding: BodyEncoding,
) -> Result<Vec<u8>, ConfigError> {
	match encoding {
		BodyEncoding::Json => serde_json::to_vec(registrant).map_err(ConfigError::BodyEncode),
		BodyEncoding::Form => {
			let mut form = FormSerializer::new(String::new());

			for (name, value) in registrant.fields() {
				let text = match value {
					JsonValue::Null => String::new(),
					JsonValue::String(text) => text.clone(),
					JsonValue::Bool(_) | JsonValue::Number(_) => value.to_string(),
					JsonValue::Array(_) | JsonValue::Object(_) =>
						serde_json::to_string(value).map_err(ConfigError::BodyEncode)?,
				};

				form.append_pair(name, &text);
			}

			Ok(form.finish().into_bytes())
		},
	}
}
