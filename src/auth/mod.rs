//! Session authentication: cookie-carried JWT, resolved per request.

pub mod middleware;

pub use middleware::require_auth;

/// Cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "social_token";
