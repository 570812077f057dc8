//! Like endpoints: personalized state reads, the toggle write, and the SSE
//! live-count stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use futures::StreamExt;
use serde::Deserialize;
use sociable_like::LikeState;
use sociable_user::{AuthUser, resolve_token};

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::routes::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesQuery {
    post_id: Option<String>,
    stream: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBody {
    post_id: String,
}

/// GET /likes?postId=<id>[&stream=1]
///
/// Without `stream`, returns the current `{likesCount, liked}` for the
/// requester; an anonymous read is not an error, it just gets `liked: false`.
/// With `stream=1`, switches to a `text/event-stream` of count updates that
/// only ends when the client disconnects.
pub async fn get_likes(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LikesQuery>,
) -> Result<Response, AppError> {
    let post_id = query
        .post_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("postId is required".to_string()))?;

    if query.stream.as_deref() == Some("1") {
        return Ok(stream_likes(&state, post_id));
    }

    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());
    let identity = resolve_token(token, &state.config.jwt.secret);

    let like_state = state.likes.like_state(&post_id, identity.user_id()).await?;

    Ok(Json(like_state).into_response())
}

/// POST /likes `{postId}` - toggle the authenticated user's like.
/// `require_auth` has already rejected anonymous callers.
pub async fn post_likes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ToggleBody>, JsonRejection>,
) -> Result<Json<LikeState>, AppError> {
    let Json(body) =
        body.map_err(|_| AppError::Validation("Invalid request payload".to_string()))?;

    let like_state = state.likes.toggle(&body.post_id, &user.user_id).await?;

    Ok(Json(like_state))
}

fn stream_likes(state: &AppState, post_id: String) -> Response {
    let period = Duration::from_millis(state.config.likes.stream_interval_ms);

    tracing::debug!(post_id = %post_id, ?period, "like count stream opened");

    let events = state
        .likes
        .subscribe(post_id, period)
        .filter_map(|item| async move {
            match item {
                Ok(update) => match Event::default().json_data(&update) {
                    Ok(event) => Some(Ok::<_, Infallible>(event)),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to encode like count update");
                        None
                    }
                },
                Err(e) => {
                    // Failed ticks are skipped; the stream stays open and the
                    // next tick queries again.
                    tracing::warn!(error = %e, "like count query failed, skipping tick");
                    None
                }
            }
        });

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}
