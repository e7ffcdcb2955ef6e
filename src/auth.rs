//! Credential material, redacted secrets, and the access token issued by the exchange.

pub mod credential;
pub mod secret;
pub mod session;

pub use credential::*;
pub use secret::*;
pub use session::*;
