// self
use crate::{_prelude::*, registrant::RegistrantKeySource};

/// Encoding applied to request bodies sent with `POST`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
	/// `application/x-www-form-urlencoded`, the session's POST default.
	#[default]
	Form,
	/// `application/json`.
	Json,
}
impl BodyEncoding {
	/// Returns the `Content-Type` header value.
	pub const fn content_type(self) -> &'static str {
		match self {
			BodyEncoding::Form => "application/x-www-form-urlencoded",
			BodyEncoding::Json => "application/json",
		}
	}
}

/// Provider-specific quirks that influence how responses are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Where the authoritative registrant key lives in create/get responses.
	pub registrant_key_source: RegistrantKeySource,
	/// Encoding used for registrant bodies sent with `POST`.
	pub post_encoding: BodyEncoding,
}
