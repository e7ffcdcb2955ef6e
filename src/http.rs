//! Transport primitives shared by the token exchange and the registrant API.
//!
//! [`ReqwestHttpClient`] is the single HTTP stack used by the crate: the token exchange posts
//! through it directly and resource calls read responses into an [`ApiResponse`] envelope
//! without decoding them.

// std
use std::ops::Deref;
// crates.io
use reqwest::{Response, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests must not follow redirects; [`ReqwestHttpClient::new`] disables them.
/// Configure any custom [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the
/// same way.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client with redirects disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Raw response envelope returned by registrant operations.
///
/// `body` is the undecoded response text; callers decode it with
/// [`crate::registrant::decode_registrant`] when they need the registrant fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response text.
	pub body: String,
}
impl ApiResponse {
	/// Reads a reqwest response into an envelope, keeping the body as text.
	pub async fn read(response: Response) -> Result<Self, ReqwestError> {
		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(Self { status, body })
	}

	/// Returns true for `2xx` statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Passes success envelopes through and turns every other status into [`ApiError`].
	pub fn error_for_status(self) -> Result<Self, ApiError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(ApiError { status: self.status, body: self.body })
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_for_status_keeps_body_verbatim() {
		let ok = ApiResponse { status: 204, body: String::new() };

		assert!(ok.clone().error_for_status().is_ok());

		let not_found = ApiResponse { status: 404, body: "{\"description\":\"gone\"}".into() };
		let err = not_found.error_for_status().expect_err("404 should map to ApiError.");

		assert_eq!(err.status, 404);
		assert_eq!(err.body, "{\"description\":\"gone\"}");
	}
}
