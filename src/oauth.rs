//! Refresh-token exchange against the provider's token endpoint.
//!
//! The exchange authenticates with HTTP Basic over the raw `client_id:client_secret` pair
//! (neither part is form-encoded before base64) and posts
//! `grant_type=refresh_token&refresh_token=<token>` as a form body. Successful replies are
//! decoded as an `oauth2` token response. Every failure is mapped onto a cloneable
//! [`AuthError`] so the client's readiness cell can hand the same reason to every waiter.

pub use oauth2;

// crates.io
use oauth2::{TokenResponse, basic::BasicTokenResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credential},
	error::AuthError,
	http::ReqwestHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Exchanges the credential's refresh token for an access token at `token_endpoint`.
///
/// The credential must already be validated; blank parts are not re-checked here.
pub async fn exchange_refresh_token(
	credential: &Credential,
	token_endpoint: &Url,
	http_client: &ReqwestHttpClient,
) -> Result<AccessToken, AuthError> {
	const KIND: OperationKind = OperationKind::Authenticate;

	let span = OperationSpan::new(KIND, "exchange_refresh_token");

	obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

	let result = span
		.instrument(async move {
			let response = http_client
				.post(token_endpoint.clone())
				.basic_auth(&credential.client_id, Some(credential.client_secret.expose()))
				.header(ACCEPT, HeaderValue::from_static("application/json"))
				.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
				.body(refresh_form(credential.refresh_token.expose()))
				.send()
				.await
				.map_err(transport_error)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(transport_error)?;

			token_from_reply(status, &body, OffsetDateTime::now_utc())
		})
		.await;

	match &result {
		Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
		Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
	}

	result
}

fn refresh_form(refresh_token: &str) -> String {
	FormSerializer::new(String::new())
		.append_pair("grant_type", "refresh_token")
		.append_pair("refresh_token", refresh_token)
		.finish()
}

/// Maps a token endpoint reply onto an access token or the reason it was refused.
///
/// Non-success statuses keep the provider's raw body as the payload. A success status whose
/// body does not carry a non-empty `access_token` is [`AuthError::TokenNotIssued`].
fn token_from_reply(
	status: u16,
	body: &[u8],
	issued_at: OffsetDateTime,
) -> Result<AccessToken, AuthError> {
	if !(200..300).contains(&status) {
		let raw = String::from_utf8_lossy(body).into_owned();
		let payload = if raw.trim().is_empty() {
			format!("Token endpoint responded with status {status}.")
		} else {
			raw
		};

		return Err(AuthError::Rejected { status: Some(status), payload });
	}

	let response = serde_json::from_slice::<BasicTokenResponse>(body)
		.map_err(|_| AuthError::TokenNotIssued)?;
	let secret = response.access_token().secret();

	if secret.is_empty() {
		return Err(AuthError::TokenNotIssued);
	}

	let expires_in = response
		.expires_in()
		.and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok())
		.filter(|secs| *secs > 0)
		.map(Duration::seconds);

	Ok(AccessToken::new(secret.as_str(), issued_at, expires_in))
}

fn transport_error(err: ReqwestError) -> AuthError {
	AuthError::Transport { message: err.to_string() }
}
