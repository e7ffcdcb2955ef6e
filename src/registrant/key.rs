//! Registrant key extraction across provider API versions.
//!
//! Depending on the API version, the `registrantKey` returned by create/get is either the
//! real key or an unrelated identifier; in the latter case the real key is the last path
//! segment of `joinUrl` (`.../join/{webinarKey}/{registrantKey}`). The active behavior is
//! chosen by configuration rather than branching in the steps.

// self
use crate::{_prelude::*, registrant::Registrant};

/// Where the authoritative registrant key is read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrantKeySource {
	/// Segment following `/join/{webinarKey}/` in `joinUrl`, falling back to the returned
	/// `registrantKey` when the URL carries no key.
	#[default]
	JoinUrl,
	/// Returned `registrantKey` field, verbatim.
	ResponseField,
}
impl RegistrantKeySource {
	/// Derives the registrant key from a decoded response.
	pub fn extract(self, registrant: &Registrant) -> Option<String> {
		match self {
			RegistrantKeySource::JoinUrl => registrant
				.join_url()
				.and_then(key_from_join_url)
				.or_else(|| registrant.registrant_key()),
			RegistrantKeySource::ResponseField => registrant.registrant_key(),
		}
	}
}

/// Returns the segment following `/join/{webinarKey}/` in a join URL.
pub fn key_from_join_url(join_url: &str) -> Option<String> {
	let from_url = Url::parse(join_url).ok().and_then(|url| {
		let segments = url.path_segments()?.collect::<Vec<_>>();
		let join = segments.iter().position(|segment| *segment == "join")?;

		segments.get(join + 2).filter(|segment| !segment.is_empty()).map(|segment| (*segment).to_owned())
	});

	from_url.or_else(|| {
		join_url
			.split("/join/")
			.nth(1)?
			.split('/')
			.nth(1)
			.filter(|segment| !segment.is_empty())
			.map(str::to_owned)
	})
}
