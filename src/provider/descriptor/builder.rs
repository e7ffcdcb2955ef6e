// self
use crate::{
	_prelude::*,
	provider::{BodyEncoding, ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
	registrant::RegistrantKeySource,
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// API base is mandatory.
	#[error("Missing API base URL.")]
	MissingApiBase,
	/// Endpoint cannot be used for HTTP requests.
	#[error("The {endpoint} endpoint is not a usable HTTP(S) URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values; also the serde shape of a descriptor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDescriptorBuilder {
	/// Token endpoint used for the refresh-token exchange.
	pub token_endpoint: Option<Url>,
	/// Base URL of the webinar API.
	pub api_base: Option<Url>,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder with default quirks and no endpoints.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Selects where registrant keys are read from.
	pub fn registrant_key_source(mut self, source: RegistrantKeySource) -> Self {
		self.quirks.registrant_key_source = source;

		self
	}

	/// Selects the POST body encoding.
	pub fn post_encoding(mut self, encoding: BodyEncoding) -> Self {
		self.quirks.post_encoding = encoding;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let api_base = self.api_base.ok_or(ProviderDescriptorError::MissingApiBase)?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints { token, api_base },
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl From<ProviderDescriptor> for ProviderDescriptorBuilder {
	fn from(descriptor: ProviderDescriptor) -> Self {
		Self {
			token_endpoint: Some(descriptor.endpoints.token),
			api_base: Some(descriptor.endpoints.api_base),
			quirks: descriptor.quirks,
		}
	}
}
impl TryFrom<ProviderDescriptorBuilder> for ProviderDescriptor {
	type Error = ProviderDescriptorError;

	fn try_from(builder: ProviderDescriptorBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("api_base", &self.endpoints.api_base)?;

		if self.endpoints.api_base.cannot_be_a_base() {
			return Err(ProviderDescriptorError::InvalidEndpoint {
				endpoint: "api_base",
				url: self.endpoints.api_base.to_string(),
			});
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if matches!(url.scheme(), "https" | "http") && url.host().is_some() {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InvalidEndpoint { endpoint: name, url: url.to_string() })
	}
}
