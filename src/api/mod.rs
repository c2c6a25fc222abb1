//! Client for the platform's `api_v3` HTTP endpoint.
//!
//! Every call is a form-encoded POST carrying `service`/`action` plus a
//! session token (KS). Responses come back as JSON; vendor faults arrive
//! inside a 200 response and are surfaced as [`ApiFault`].

pub mod client;
pub mod error;
pub mod filters;
pub mod models;
pub mod params;
pub mod retry;
pub mod services;

pub use client::PlatformClient;
pub use error::ApiFault;
pub use filters::*;
pub use models::*;
pub use params::{Pager, ParamList};
pub use retry::{RetryConfig, RetryPolicy, RetryableError};

/// Session type requested at `session.start`. Admin sessions are required
/// for every tool in this crate.
pub const SESSION_TYPE_ADMIN: i64 = 2;

/// Privileges string that overrides entitlement rules on admin sessions.
pub const DEFAULT_PRIVILEGES: &str = "all:*,disableentitlement";

/// Default session lifetime in seconds.
pub const DEFAULT_SESSION_EXPIRY: i64 = 86_400;

/// The backend refuses list queries that would match more than this many
/// objects.
pub const MAX_MATCHES: usize = 10_000;
