//! Access token issued by the refresh-token exchange.

// self
use crate::{_prelude::*, auth::Secret};

/// Bearer token held by an authenticated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: Secret,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
	/// Expiry instant, when the provider reported `expires_in`.
	pub expires_at: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Creates a token issued at `issued_at`, optionally expiring after `expires_in`.
	pub fn new(
		secret: impl Into<Secret>,
		issued_at: OffsetDateTime,
		expires_in: Option<Duration>,
	) -> Self {
		Self {
			secret: secret.into(),
			issued_at,
			expires_at: expires_in.map(|lifetime| issued_at + lifetime),
		}
	}

	/// Returns true when the token has a known expiry at or before `instant`.
	///
	/// Sessions are never refreshed in place; callers build a new client instead.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| instant >= expiry)
	}

	/// Formats the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn expiry_follows_expires_in() {
		let issued = OffsetDateTime::now_utc();
		let token = AccessToken::new("abc", issued, Some(Duration::seconds(60)));

		assert!(!token.is_expired_at(issued + Duration::seconds(59)));
		assert!(token.is_expired_at(issued + Duration::seconds(60)));
		assert_eq!(token.bearer(), "Bearer abc");

		let open = AccessToken::new("abc", issued, None);

		assert!(!open.is_expired_at(issued + Duration::days(365)));
	}
}
