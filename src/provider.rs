//! Provider-facing configuration: endpoints and response-shape quirks.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the OAuth token
//! endpoint, the webinar API base, and provider quirks (registrant key source, POST body
//! encoding). Production defaults target GoTo Webinar's API v2; tests point the same
//! descriptor at a mock server.

pub mod descriptor;

pub use descriptor::*;
