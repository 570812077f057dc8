use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use sociable_user::{Identity, resolve_token};

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::routes::AppState;

/// Gate for write routes: an anonymous request is rejected with 401 before
/// it reaches the service layer. On success the resolved user lands in the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());

    match resolve_token(token, &state.config.jwt.secret) {
        Identity::User(user) => {
            tracing::debug!(user_id = %user.user_id, "request authenticated");
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Identity::Anonymous => Err(AppError::Unauthorized),
    }
}
