//! Crate-level error types shared by the client and the steps.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authentication handshake failed; every operation on the client reports the same reason.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS) while calling the webinar API.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Webinar API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Registrant payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}
impl Error {
	/// Returns the HTTP status when the error came from a provider response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(err) => Some(err.status),
			Self::Auth(AuthError::Rejected { status, .. }) => *status,
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Registrant body could not be encoded for the configured content type.
	#[error("Registrant body could not be encoded.")]
	BodyEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Authentication failures captured by the client's readiness cell.
///
/// The value is cloned out to every waiter, so it keeps only owned text.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AuthError {
	/// One of the client identifier, client secret, or refresh token is missing.
	#[error(
		"Client credentials or refresh token were not provided. Try reconnecting your GoTo Webinar account."
	)]
	MissingCredentials,
	/// Token endpoint answered successfully but did not include an access token.
	#[error("Access Token was not retrieved. Please try to reconnect.")]
	TokenNotIssued,
	/// Token endpoint rejected the exchange; `payload` is the provider's raw error body.
	#[error("{payload}")]
	Rejected {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Raw error payload returned by the provider.
		payload: String,
	},
	/// Token request never produced a response.
	#[error("Token request failed: {message}")]
	Transport {
		/// Transport failure description.
		message: String,
	},
}

/// Transport-level failures on resource calls.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the webinar API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success HTTP response returned unchanged from the webinar API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Webinar API responded with status {status}: {body}")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl ApiError {
	/// Returns true when the provider reported `404 Not Found`.
	pub fn is_not_found(&self) -> bool {
		self.status == 404
	}

	/// Returns true when the provider reported `409 Conflict`.
	pub fn is_conflict(&self) -> bool {
		self.status == 409
	}

	/// Extracts the provider's `description` field, falling back to the raw body.
	pub fn description(&self) -> String {
		serde_json::from_str::<JsonValue>(&self.body)
			.ok()
			.and_then(|value| match value.get("description") {
				Some(JsonValue::String(text)) => Some(text.clone()),
				_ => None,
			})
			.unwrap_or_else(|| self.body.clone())
	}
}

/// Registrant payload decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Payload is not valid JSON once numeric literals are quoted.
	#[error("Registrant payload is malformed at `{path}`.")]
	Malformed {
		/// JSON path where decoding stopped.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Payload is valid JSON but not an object.
	#[error("Registrant payload must be a JSON object.")]
	NotAnObject,
}
