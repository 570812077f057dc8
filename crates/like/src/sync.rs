//! Client-side synchronization controller for a displayed like counter.
//!
//! Each displayed post owns one [`LikeSync`]: it applies toggles
//! optimistically, reconciles against the server's authoritative response,
//! and rolls back when the server rejects. A [`Poller`] keeps the display
//! reconciled on a fixed interval for as long as the post is on screen.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::state::LikeState;

/// Transport seam between the controller and the server.
#[async_trait]
pub trait LikeClient: Send + Sync {
    async fn fetch_state(&self, post_id: &str) -> Result<LikeState, ClientError>;
    async fn toggle(&self, post_id: &str) -> Result<LikeState, ClientError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("request failed: {0}")]
    Transient(String),
}

/// Result of a toggle request as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server confirmed; display now holds the server's values.
    Applied(LikeState),
    /// Server returned 401; display rolled back, caller should redirect to
    /// authentication.
    RequiresLogin,
    /// Any other failure; display rolled back.
    Failed,
    /// A toggle for this post was already in flight; the request was dropped,
    /// not queued.
    Ignored,
}

/// Per-post display state with optimistic updates.
pub struct LikeSync {
    post_id: String,
    display: Mutex<LikeState>,
    in_flight: AtomicBool,
}

impl LikeSync {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            display: Mutex::new(LikeState {
                likes_count: 0,
                liked: false,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Snapshot of the currently displayed state.
    pub fn state(&self) -> LikeState {
        self.lock_display().clone()
    }

    /// Overwrite the display with the server's current state. Fetch failures
    /// are logged and leave the display untouched; the next tick retries.
    ///
    /// While a toggle is in flight the snapshot is discarded: the toggle's
    /// own reconciliation supersedes it, and an older snapshot must not
    /// regress a toggle the user just performed. The in-flight re-check and
    /// the write hold the display lock together, so a toggle starting between
    /// them cannot have its optimistic write clobbered.
    pub async fn refresh(&self, client: &dyn LikeClient) {
        if self.in_flight.load(Ordering::SeqCst) {
            return;
        }
        match client.fetch_state(&self.post_id).await {
            Ok(state) => {
                let mut display = self.lock_display();
                if self.in_flight.load(Ordering::SeqCst) {
                    return;
                }
                *display = state;
            }
            Err(e) => {
                tracing::debug!(post_id = %self.post_id, error = %e, "like state refresh failed");
            }
        }
    }

    /// Toggle the like optimistically, then reconcile with the server.
    ///
    /// The display flips immediately (count clamped at 0), the request is
    /// issued, and on success the server's `liked`/`likesCount` replace the
    /// optimistic guess. On any failure the exact pre-toggle display is
    /// restored. While one toggle is in flight further calls for this post
    /// return [`ToggleOutcome::Ignored`].
    pub async fn toggle(&self, client: &dyn LikeClient) -> ToggleOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return ToggleOutcome::Ignored;
        }

        let previous = self.state();

        {
            let mut display = self.lock_display();
            display.liked = !previous.liked;
            display.likes_count = if display.liked {
                previous.likes_count + 1
            } else {
                (previous.likes_count - 1).max(0)
            };
        }

        let outcome = match client.toggle(&self.post_id).await {
            Ok(state) => {
                *self.lock_display() = state.clone();
                ToggleOutcome::Applied(state)
            }
            Err(ClientError::Unauthorized) => {
                *self.lock_display() = previous;
                ToggleOutcome::RequiresLogin
            }
            Err(ClientError::Transient(e)) => {
                tracing::debug!(post_id = %self.post_id, error = %e, "toggle failed");
                *self.lock_display() = previous;
                ToggleOutcome::Failed
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    fn lock_display(&self) -> std::sync::MutexGuard<'_, LikeState> {
        self.display.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Repeating refresh task for one mounted post. Fetches once on spawn, then
/// on every interval tick until cancelled. No state is shared between
/// pollers of different posts.
pub struct Poller {
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// `period` must be non-zero.
    pub fn spawn(sync: Arc<LikeSync>, client: Arc<dyn LikeClient>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                sync.refresh(client.as_ref()).await;
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Stop polling. Calling this more than once is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel();
    }
}
