//! Registrant payloads: field map, big-integer-safe decoding, and key extraction.

pub mod decode;
pub mod key;

pub use decode::*;
pub use key::*;

// self
use crate::_prelude::*;

/// Field carrying the registrant identifier.
pub const REGISTRANT_KEY_FIELD: &str = "registrantKey";
/// Field carrying the registrant's personal join link.
pub const JOIN_URL_FIELD: &str = "joinUrl";

/// Mapping of registrant field names to JSON scalars.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registrant(JsonMap<String, JsonValue>);
impl Registrant {
	/// Creates an empty registrant.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps an existing field map.
	pub fn from_fields(fields: JsonMap<String, JsonValue>) -> Self {
		Self(fields)
	}

	/// Returns the value of `field`, if present.
	pub fn get(&self, field: &str) -> Option<&JsonValue> {
		self.0.get(field)
	}

	/// Returns true when `field` is present, even if its value is `null`.
	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	/// Inserts or replaces a field.
	pub fn insert(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
		self.0.insert(field.into(), value.into());
	}

	/// Borrows the underlying field map.
	pub fn fields(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Consumes the registrant, returning its field map.
	pub fn into_fields(self) -> JsonMap<String, JsonValue> {
		self.0
	}

	/// Returns the `registrantKey` field rendered as text.
	pub fn registrant_key(&self) -> Option<String> {
		match self.get(REGISTRANT_KEY_FIELD)? {
			JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
			JsonValue::Number(number) => Some(number.to_string()),
			_ => None,
		}
	}

	/// Returns the `joinUrl` field.
	pub fn join_url(&self) -> Option<&str> {
		self.get(JOIN_URL_FIELD).and_then(JsonValue::as_str)
	}

	/// Rewrites `registrantKey` with the key selected by `source`; leaves the field untouched
	/// when no key can be derived.
	pub fn normalize_key(&mut self, source: RegistrantKeySource) {
		if let Some(key) = source.extract(self) {
			self.insert(REGISTRANT_KEY_FIELD, key);
		}
	}
}
impl From<JsonMap<String, JsonValue>> for Registrant {
	fn from(fields: JsonMap<String, JsonValue>) -> Self {
		Self(fields)
	}
}
impl From<Registrant> for JsonValue {
	fn from(registrant: Registrant) -> Self {
		JsonValue::Object(registrant.0)
	}
}
impl FromIterator<(String, JsonValue)> for Registrant {
	fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn registrant_key_renders_numbers_as_text() {
		let mut registrant = Registrant::new();

		registrant.insert(REGISTRANT_KEY_FIELD, 42);

		assert_eq!(registrant.registrant_key().as_deref(), Some("42"));

		registrant.insert(REGISTRANT_KEY_FIELD, "");

		assert_eq!(registrant.registrant_key(), None);
	}

	#[test]
	fn normalize_key_prefers_join_url_segment() {
		let mut registrant: Registrant = [
			(REGISTRANT_KEY_FIELD.to_owned(), JsonValue::from("123456789012345678")),
			(JOIN_URL_FIELD.to_owned(), JsonValue::from("https://x/join/W1/R987")),
		]
		.into_iter()
		.collect();

		registrant.normalize_key(RegistrantKeySource::JoinUrl);

		assert_eq!(registrant.registrant_key().as_deref(), Some("R987"));
		assert_eq!(registrant.join_url(), Some("https://x/join/W1/R987"));
	}
}
