//! JWT issuance and the session resolver.
//!
//! Resolution is a pure function of the token and the server secret: a
//! missing, malformed, or expired token resolves to [`Identity::Anonymous`]
//! rather than an error. Callers that require an identity map `Anonymous` to
//! an authorization failure at the HTTP layer.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::UserResult;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    /// Issued at (UTC seconds).
    pub iat: u64,
    /// Expiration (UTC seconds).
    pub exp: u64,
}

/// Identity carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User(AuthUser),
    Anonymous,
}

impl Identity {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::User(user) => Some(user.user_id.as_str()),
            Identity::Anonymous => None,
        }
    }
}

/// Sign an HS256 session token for a user.
pub fn generate_token(
    user_id: &str,
    username: &str,
    secret: &str,
    lifetime: Duration,
) -> UserResult<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now + lifetime.as_secs(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Resolve a bearer token to an identity. Never fails; anything that does not
/// verify is `Anonymous`.
pub fn resolve_token(token: Option<&str>, secret: &str) -> Identity {
    let Some(token) = token else {
        return Identity::Anonymous;
    };

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => Identity::User(AuthUser {
            user_id: data.claims.sub,
            username: data.claims.username,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "token failed verification, treating as anonymous");
            Identity::Anonymous
        }
    }
}
