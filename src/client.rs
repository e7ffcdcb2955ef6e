//! Authenticated GoTo Webinar client.
//!
//! [`AuthenticatedClient`] bootstraps itself from a [`Credential`]: the first operation (or
//! an explicit [`AuthenticatedClient::ready`]) runs the refresh-token exchange exactly once
//! and stores the outcome in a shared readiness cell. A successful exchange installs an
//! immutable [`ApiSession`] carrying the bearer header and the per-method content types; a
//! failed exchange is remembered too, so every later operation reports the same
//! [`AuthError`] without touching the network again.
//!
//! Registrant calls live in [`RegistrantOperations`], which the client owns and delegates to
//! through the [`RegistrantApi`] trait.

pub mod registrant;

pub use registrant::*;

// crates.io
use async_lock::OnceCell;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credential},
	error::{AuthError, ConfigError},
	http::{ApiResponse, ReqwestHttpClient},
	oauth,
	provider::{BodyEncoding, ProviderDescriptor},
	registrant::{Registrant, RegistrantKeySource},
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Boxed future returned by [`RegistrantApi`] operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Registrant operations offered by the webinar API.
///
/// Every operation returns the raw [`ApiResponse`]; non-success statuses surface as
/// [`Error::Api`] with the body unchanged.
pub trait RegistrantApi
where
	Self: Send + Sync,
{
	/// `POST /organizers/{organizerKey}/webinars/{webinarKey}/registrants`.
	fn create_registrant<'a>(
		&'a self,
		registrant: &'a Registrant,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse>;

	/// `DELETE /organizers/{organizerKey}/webinars/{webinarKey}/registrants/{registrantKey}`.
	fn delete_registrant<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse>;

	/// `GET /organizers/{organizerKey}/webinars/{webinarKey}/registrants/{registrantKey}`.
	fn get_registrant_by_registrant_key<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse>;

	/// Where the authoritative registrant key lives in this provider's responses.
	fn registrant_key_source(&self) -> RegistrantKeySource {
		RegistrantKeySource::default()
	}
}

/// Immutable state installed once the token exchange succeeds.
#[derive(Debug)]
pub struct ApiSession {
	descriptor: Arc<ProviderDescriptor>,
	token: AccessToken,
	default_headers: HeaderMap,
}
impl ApiSession {
	fn new(descriptor: Arc<ProviderDescriptor>, token: AccessToken) -> Result<Self, AuthError> {
		let mut bearer = HeaderValue::from_str(&token.bearer()).map_err(|_| {
			AuthError::Rejected {
				status: None,
				payload: "Access token cannot be sent in an Authorization header.".into(),
			}
		})?;

		bearer.set_sensitive(true);

		let mut default_headers = HeaderMap::new();

		default_headers.insert(AUTHORIZATION, bearer);
		default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

		Ok(Self { descriptor, token, default_headers })
	}

	/// Base URL every registrant path is appended to.
	pub fn base_url(&self) -> &Url {
		&self.descriptor.endpoints.api_base
	}

	/// Access token issued by the exchange.
	pub fn token(&self) -> &AccessToken {
		&self.token
	}

	/// Headers sent with every request: `Authorization` and `Accept`.
	pub fn default_headers(&self) -> &HeaderMap {
		&self.default_headers
	}

	/// `Content-Type` sent with `GET` requests.
	pub fn get_content_type(&self) -> &'static str {
		JSON_CONTENT_TYPE
	}

	/// Encoding (and therefore `Content-Type`) of `POST` bodies.
	pub fn post_encoding(&self) -> BodyEncoding {
		self.descriptor.quirks.post_encoding
	}

	/// Absolute URL for `segments` below the base URL.
	pub fn url<I, S>(&self, segments: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.descriptor.api_url(segments)
	}
}

type ReadinessCell = OnceCell<Result<Arc<ApiSession>, AuthError>>;

/// One-shot readiness shared by the client and its operations.
#[derive(Debug)]
pub(crate) struct Readiness {
	credential: Credential,
	descriptor: Arc<ProviderDescriptor>,
	http_client: ReqwestHttpClient,
	cell: ReadinessCell,
}
impl Readiness {
	/// Resolves the session; the exchange runs at most once per client.
	pub(crate) async fn resolve(&self) -> Result<Arc<ApiSession>, AuthError> {
		self.cell.get_or_init(|| self.authenticate()).await.clone()
	}

	async fn authenticate(&self) -> Result<Arc<ApiSession>, AuthError> {
		self.credential.validate()?;

		let token = oauth::exchange_refresh_token(
			&self.credential,
			&self.descriptor.endpoints.token,
			&self.http_client,
		)
		.await?;

		ApiSession::new(self.descriptor.clone(), token).map(Arc::new)
	}
}

/// Webinar API client authenticated through a refresh-token exchange.
///
/// Cloning is cheap; clones share the readiness cell, so the exchange still runs once.
#[derive(Clone, Debug)]
pub struct AuthenticatedClient {
	readiness: Arc<Readiness>,
	operations: RegistrantOperations,
}
impl AuthenticatedClient {
	/// Creates a client for `descriptor` with a fresh redirect-free HTTP client.
	///
	/// Nothing is sent until the first operation or [`ready`](Self::ready).
	pub fn new(credential: Credential, descriptor: ProviderDescriptor) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Ok(Self::with_http_client(credential, descriptor, http_client))
	}

	/// Creates a client for the production GoTo Webinar endpoints.
	pub fn production(credential: Credential) -> Result<Self> {
		let descriptor = ProviderDescriptor::production().map_err(ConfigError::from)?;

		Self::new(credential, descriptor)
	}

	/// Creates a client reusing an existing HTTP client.
	pub fn with_http_client(
		credential: Credential,
		descriptor: ProviderDescriptor,
		http_client: ReqwestHttpClient,
	) -> Self {
		let descriptor = Arc::new(descriptor);
		let readiness = Arc::new(Readiness {
			credential,
			descriptor: descriptor.clone(),
			http_client: http_client.clone(),
			cell: OnceCell::new(),
		});
		let operations = RegistrantOperations::new(readiness.clone(), http_client);

		Self { readiness, operations }
	}

	/// Waits for the token exchange and returns the resulting session.
	///
	/// Concurrent callers share one exchange; the outcome, including a rejection, is never
	/// recomputed.
	pub async fn ready(&self) -> Result<Arc<ApiSession>, AuthError> {
		self.readiness.resolve().await
	}

	/// Returns true once the exchange has completed, successfully or not.
	pub fn is_resolved(&self) -> bool {
		self.readiness.cell.is_initialized()
	}

	/// Provider descriptor the client targets.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.readiness.descriptor
	}
}
impl RegistrantApi for AuthenticatedClient {
	fn create_registrant<'a>(
		&'a self,
		registrant: &'a Registrant,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		Box::pin(self.operations.create(registrant, webinar_key, organizer_key))
	}

	fn delete_registrant<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		Box::pin(self.operations.delete(registrant_key, webinar_key, organizer_key))
	}

	fn get_registrant_by_registrant_key<'a>(
		&'a self,
		registrant_key: &'a str,
		webinar_key: &'a str,
		organizer_key: &'a str,
	) -> ApiFuture<'a, ApiResponse> {
		Box::pin(self.operations.get(registrant_key, webinar_key, organizer_key))
	}

	fn registrant_key_source(&self) -> RegistrantKeySource {
		self.readiness.descriptor.quirks.registrant_key_source
	}
}
