use std::time::Duration;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use sociable_user::{RegisterInput, generate_token, password, query};
use validator::Validate;

use super::{AuthResponse, session_cookie};
use crate::error::AppError;
use crate::routes::AppState;

/// POST /auth/register `{fullName, username, password}` → 201 + session
/// cookie. 409 when the username is taken, 400 on a malformed payload.
pub async fn post_register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let Json(input) =
        body.map_err(|_| AppError::Validation("Invalid request payload".to_string()))?;
    input.validate()?;

    // Friendly pre-check; the unique index still catches a losing racer.
    if query::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already in use".to_string()));
    }

    let password_hash = password::hash_password(&input.password)?;

    let user = query::create_user(
        &state.pool,
        &input.username,
        &input.full_name,
        &password_hash,
    )
    .await?;

    let token = generate_token(
        &user.id,
        &user.username,
        &state.config.jwt.secret,
        Duration::from_secs(state.config.jwt.lifetime_seconds),
    )?;

    let jar = jar.add(session_cookie(&state.config, token.clone()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
