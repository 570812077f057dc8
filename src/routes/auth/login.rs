use std::time::Duration;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use sociable_user::{LoginInput, generate_token, password, query};
use validator::Validate;

use super::{AuthResponse, session_cookie};
use crate::error::AppError;
use crate::routes::AppState;

/// POST /auth/login `{username, password}` → 200 + session cookie. Unknown
/// username and wrong password are indistinguishable to the caller.
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let Json(input) =
        body.map_err(|_| AppError::Validation("Invalid request payload".to_string()))?;
    input.validate()?;

    let user = query::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or(AppError::Authentication)?;

    if !password::verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::Authentication);
    }

    let token = generate_token(
        &user.id,
        &user.username,
        &state.config.jwt.secret,
        Duration::from_secs(state.config.jwt.lifetime_seconds),
    )?;

    let jar = jar.add(session_cookie(&state.config, token.clone()));

    tracing::info!(user_id = %user.id, "user logged in");

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
