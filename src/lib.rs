//! GoTo Webinar registrant automation steps: a refresh-token bootstrapped API client, registrant
//! operations, and an operator-driven field assertion engine reporting to a step host.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod evaluate;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod registrant;
pub mod step;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credential,
		client::AuthenticatedClient,
		http::ReqwestHttpClient,
		provider::{ProviderDescriptor, ProviderQuirks},
	};

	/// Client identifier used by test fixtures.
	pub const TEST_CLIENT_ID: &str = "anyId";
	/// Client secret used by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "anySecret";
	/// Refresh token used by test fixtures.
	pub const TEST_REFRESH_TOKEN: &str = "anyToken";

	/// Builds a descriptor whose token endpoint and API base point at a mock server.
	///
	/// `base` is the mock server root (for example `httpmock::MockServer::base_url`).
	pub fn mock_descriptor(base: &str, quirks: ProviderQuirks) -> ProviderDescriptor {
		let token = Url::parse(&format!("{base}/oauth/token"))
			.expect("Mock token endpoint should parse successfully.");
		let api_base = Url::parse(&format!("{base}/G2W/rest/v2"))
			.expect("Mock API base should parse successfully.");

		ProviderDescriptor::builder()
			.token_endpoint(token)
			.api_base(api_base)
			.quirks(quirks)
			.build()
			.expect("Mock provider descriptor should build successfully.")
	}

	/// Credential fixture matching the `TEST_*` constants.
	pub fn test_credential() -> Credential {
		Credential::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_REFRESH_TOKEN)
	}

	/// Constructs an [`AuthenticatedClient`] aimed at a mock server with default quirks.
	pub fn build_test_client(base: &str, credential: Credential) -> AuthenticatedClient {
		AuthenticatedClient::with_http_client(
			credential,
			mock_descriptor(base, ProviderQuirks::default()),
			ReqwestHttpClient::default(),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {base64 as _, color_eyre as _, httpmock as _};
