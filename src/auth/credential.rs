//! OAuth client credential supplied once per client.

// self
use crate::{_prelude::*, auth::Secret, error::AuthError};

/// Client identifier, client secret, and long-lived refresh token for the webinar account.
///
/// The host hands these over as connection metadata; any of them may be blank when the
/// account was never connected, which [`Credential::validate`] reports before any request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
	/// OAuth client identifier.
	#[serde(default)]
	pub client_id: String,
	/// OAuth client secret.
	#[serde(default)]
	pub client_secret: Secret,
	/// Refresh token exchanged for an access token.
	#[serde(default)]
	pub refresh_token: Secret,
}
impl Credential {
	/// Creates a credential from its three parts.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		refresh_token: impl Into<Secret>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			refresh_token: refresh_token.into(),
		}
	}

	/// Reads the credential from host-provided metadata pairs (`clientId`, `clientSecret`,
	/// `refreshToken`); unknown keys are ignored and missing ones stay empty.
	pub fn from_metadata<'a, I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let mut credential = Self::default();

		for (key, value) in pairs {
			match key {
				"clientId" => credential.client_id = value.to_owned(),
				"clientSecret" => credential.client_secret = Secret::new(value),
				"refreshToken" => credential.refresh_token = Secret::new(value),
				_ => {},
			}
		}

		credential
	}

	/// Ensures all three parts are present and non-empty.
	pub fn validate(&self) -> Result<(), AuthError> {
		if self.client_id.trim().is_empty()
			|| self.client_secret.is_blank()
			|| self.refresh_token.is_blank()
		{
			Err(AuthError::MissingCredentials)
		} else {
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validate_rejects_any_blank_part() {
		assert!(Credential::new("id", "secret", "refresh").validate().is_ok());

		for credential in [
			Credential::new("", "secret", "refresh"),
			Credential::new("id", "", "refresh"),
			Credential::new("id", "secret", " "),
			Credential::default(),
		] {
			assert_eq!(credential.validate(), Err(AuthError::MissingCredentials));
		}
	}

	#[test]
	fn from_metadata_picks_known_keys() {
		let credential = Credential::from_metadata([
			("clientId", "anyId"),
			("clientSecret", "anySecret"),
			("refreshToken", "anyToken"),
			("ignored", "value"),
		]);

		assert_eq!(credential, Credential::new("anyId", "anySecret", "anyToken"));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered = format!("{:?}", Credential::new("id", "hunter2", "refresh-me"));

		assert!(!rendered.contains("hunter2"));
		assert!(!rendered.contains("refresh-me"));
		assert!(rendered.contains("id"));
	}
}
