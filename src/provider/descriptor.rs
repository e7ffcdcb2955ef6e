//! Provider descriptor data structures shared by the client and the steps.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::_prelude::*;

/// Production OAuth token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://authentication.logmeininc.com/oauth/token";
/// Production webinar API base.
pub const DEFAULT_API_BASE: &str = "https://api.getgo.com/G2W/rest/v2";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Token endpoint used for the refresh-token exchange.
	pub token: Url,
	/// Base URL every registrant path is appended to.
	pub api_base: Url,
}

/// Immutable provider descriptor consumed by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProviderDescriptorBuilder", into = "ProviderDescriptorBuilder")]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new, empty builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new()
	}

	/// Descriptor for the production GoTo Webinar endpoints with default quirks.
	pub fn production() -> Result<Self, ProviderDescriptorError> {
		let token = parse_endpoint("token", DEFAULT_TOKEN_ENDPOINT)?;
		let api_base = parse_endpoint("api_base", DEFAULT_API_BASE)?;

		Self::builder().token_endpoint(token).api_base(api_base).build()
	}

	/// Builds the absolute URL for `segments` below the API base; each segment is
	/// percent-encoded.
	pub fn api_url<I, S>(&self, segments: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.endpoints.api_base.clone();

		// `build` rejects cannot-be-a-base URLs, so the segments are always available.
		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty();

			for segment in segments {
				path.push(segment.as_ref());
			}
		}

		url
	}
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw)
		.map_err(|_| ProviderDescriptorError::InvalidEndpoint { endpoint: name, url: raw.into() })
}
