use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{Value, json};

use crate::auth::SESSION_COOKIE;

/// POST /auth/logout - clear the session cookie. Always succeeds, even
/// without a session.
pub async fn post_logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Json(json!({ "message": "Logged out" })))
}
