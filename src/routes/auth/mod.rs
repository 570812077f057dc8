//! Auth endpoints: register, login, logout. All three speak JSON and manage
//! the HTTP-only session cookie.

pub mod login;
pub mod logout;
pub mod register;

pub use login::post_login;
pub use logout::post_logout;
pub use register::post_register;

use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Serialize;
use sociable_user::User;

use crate::auth::SESSION_COOKIE;
use crate::config::Config;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Session cookie: HTTP-only, SameSite=Lax, path /, Secure from config.
/// One lifetime policy for login and register.
pub fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.session.cookie_secure)
        .max_age(time::Duration::seconds(config.jwt.lifetime_seconds as i64))
        .build()
}
