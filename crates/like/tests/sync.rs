//! Client sync controller: optimistic updates, rollback, re-entrancy,
//! polling lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sociable_like::{ClientError, LikeClient, LikeState, LikeSync, Poller, ToggleOutcome};
use tokio::sync::Notify;
use tokio::time::sleep;

/// Transport stub returning fixed responses and counting calls.
struct StaticClient {
    fetch_result: Result<LikeState, ClientError>,
    toggle_result: Result<LikeState, ClientError>,
    fetches: AtomicUsize,
}

impl StaticClient {
    fn new(
        fetch_result: Result<LikeState, ClientError>,
        toggle_result: Result<LikeState, ClientError>,
    ) -> Self {
        Self {
            fetch_result,
            toggle_result,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LikeClient for StaticClient {
    async fn fetch_state(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_result.clone()
    }

    async fn toggle(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        self.toggle_result.clone()
    }
}

/// Transport stub whose toggle blocks until released, so tests can observe
/// the in-flight window.
struct GatedClient {
    initial: LikeState,
    toggle_result: Result<LikeState, ClientError>,
    entered: Notify,
    release: Notify,
}

impl GatedClient {
    fn new(initial: LikeState, toggle_result: Result<LikeState, ClientError>) -> Self {
        Self {
            initial,
            toggle_result,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl LikeClient for GatedClient {
    async fn fetch_state(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        Ok(self.initial.clone())
    }

    async fn toggle(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.toggle_result.clone()
    }
}

/// Transport stub whose fetch blocks until released, so tests can start a
/// toggle while a refresh snapshot is still pending.
struct SlowFetchClient {
    fetch_value: LikeState,
    toggle_result: Result<LikeState, ClientError>,
    fetch_entered: Notify,
    fetch_release: Notify,
    toggle_entered: Notify,
    toggle_release: Notify,
}

impl SlowFetchClient {
    fn new(fetch_value: LikeState, toggle_result: Result<LikeState, ClientError>) -> Self {
        Self {
            fetch_value,
            toggle_result,
            fetch_entered: Notify::new(),
            fetch_release: Notify::new(),
            toggle_entered: Notify::new(),
            toggle_release: Notify::new(),
        }
    }
}

#[async_trait]
impl LikeClient for SlowFetchClient {
    async fn fetch_state(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        self.fetch_entered.notify_one();
        self.fetch_release.notified().await;
        Ok(self.fetch_value.clone())
    }

    async fn toggle(&self, _post_id: &str) -> Result<LikeState, ClientError> {
        self.toggle_entered.notify_one();
        self.toggle_release.notified().await;
        self.toggle_result.clone()
    }
}

fn state(likes_count: i64, liked: bool) -> LikeState {
    LikeState { likes_count, liked }
}

#[tokio::test]
async fn successful_toggle_reconciles_to_server_values() {
    // Server reports a different count than the optimistic guess (someone
    // else liked in the meantime); the response wins.
    let client = StaticClient::new(Ok(state(3, false)), Ok(state(5, true)));
    let sync = LikeSync::new("post-1");

    sync.refresh(&client).await;
    assert_eq!(sync.state(), state(3, false));

    let outcome = sync.toggle(&client).await;
    assert_eq!(outcome, ToggleOutcome::Applied(state(5, true)));
    assert_eq!(sync.state(), state(5, true));
}

#[tokio::test]
async fn unauthorized_toggle_rolls_back_exactly() {
    let client = StaticClient::new(Ok(state(3, false)), Err(ClientError::Unauthorized));
    let sync = LikeSync::new("post-1");

    sync.refresh(&client).await;
    let before = sync.state();

    let outcome = sync.toggle(&client).await;
    assert_eq!(outcome, ToggleOutcome::RequiresLogin);
    assert_eq!(sync.state(), before);
}

#[tokio::test]
async fn transient_failure_rolls_back_exactly() {
    let client = StaticClient::new(
        Ok(state(2, true)),
        Err(ClientError::Transient("boom".to_string())),
    );
    let sync = LikeSync::new("post-1");

    sync.refresh(&client).await;

    let outcome = sync.toggle(&client).await;
    assert_eq!(outcome, ToggleOutcome::Failed);
    assert_eq!(sync.state(), state(2, true));
}

#[tokio::test]
async fn failed_refresh_leaves_display_untouched() {
    let ok = StaticClient::new(Ok(state(4, true)), Err(ClientError::Unauthorized));
    let sync = LikeSync::new("post-1");
    sync.refresh(&ok).await;

    let broken = StaticClient::new(
        Err(ClientError::Transient("down".to_string())),
        Err(ClientError::Unauthorized),
    );
    sync.refresh(&broken).await;

    assert_eq!(sync.state(), state(4, true));
}

#[tokio::test]
async fn optimistic_update_is_visible_and_clamped_while_in_flight() {
    // Display claims liked with a count of 0 (drifted); unliking must clamp
    // at 0 instead of going negative.
    let client = Arc::new(GatedClient::new(
        state(0, true),
        Err(ClientError::Transient("boom".to_string())),
    ));
    let sync = Arc::new(LikeSync::new("post-1"));
    sync.refresh(client.as_ref()).await;

    let task = tokio::spawn({
        let sync = sync.clone();
        let client = client.clone();
        async move { sync.toggle(client.as_ref()).await }
    });

    client.entered.notified().await;
    assert_eq!(sync.state(), state(0, false));

    client.release.notify_one();
    assert_eq!(task.await.unwrap(), ToggleOutcome::Failed);
    assert_eq!(sync.state(), state(0, true));
}

#[tokio::test]
async fn refresh_does_not_regress_an_in_flight_toggle() {
    let client = Arc::new(GatedClient::new(state(3, false), Ok(state(4, true))));
    let sync = Arc::new(LikeSync::new("post-1"));
    sync.refresh(client.as_ref()).await;

    let task = tokio::spawn({
        let sync = sync.clone();
        let client = client.clone();
        async move { sync.toggle(client.as_ref()).await }
    });

    client.entered.notified().await;

    // A poll tick landing mid-toggle must not clobber the optimistic state
    // with the stale snapshot.
    sync.refresh(client.as_ref()).await;
    assert_eq!(sync.state(), state(4, true));

    client.release.notify_one();
    assert_eq!(task.await.unwrap(), ToggleOutcome::Applied(state(4, true)));
}

#[tokio::test]
async fn snapshot_fetched_before_a_toggle_began_is_discarded() {
    // The refresh starts first, but its snapshot only becomes available
    // after a toggle has begun; applying it would overwrite the optimistic
    // write with pre-toggle values.
    let client = Arc::new(SlowFetchClient::new(state(3, false), Ok(state(4, true))));
    let sync = Arc::new(LikeSync::new("post-1"));

    let refresh = tokio::spawn({
        let sync = sync.clone();
        let client = client.clone();
        async move { sync.refresh(client.as_ref()).await }
    });
    client.fetch_entered.notified().await;

    let toggle = tokio::spawn({
        let sync = sync.clone();
        let client = client.clone();
        async move { sync.toggle(client.as_ref()).await }
    });
    client.toggle_entered.notified().await;
    assert_eq!(sync.state(), state(1, true));

    client.fetch_release.notify_one();
    refresh.await.unwrap();
    assert_eq!(sync.state(), state(1, true));

    client.toggle_release.notify_one();
    assert_eq!(toggle.await.unwrap(), ToggleOutcome::Applied(state(4, true)));
    assert_eq!(sync.state(), state(4, true));
}

#[tokio::test]
async fn second_toggle_while_in_flight_is_ignored() {
    let client = Arc::new(GatedClient::new(state(1, false), Ok(state(2, true))));
    let sync = Arc::new(LikeSync::new("post-1"));
    sync.refresh(client.as_ref()).await;

    let first = tokio::spawn({
        let sync = sync.clone();
        let client = client.clone();
        async move { sync.toggle(client.as_ref()).await }
    });

    client.entered.notified().await;

    // Dropped, not queued: the ignored call has no effect once the first
    // completes.
    assert_eq!(
        sync.toggle(client.as_ref()).await,
        ToggleOutcome::Ignored
    );

    client.release.notify_one();
    assert_eq!(first.await.unwrap(), ToggleOutcome::Applied(state(2, true)));
    assert_eq!(sync.state(), state(2, true));
}

#[tokio::test]
async fn poller_fetches_on_spawn_and_every_period_until_cancelled() {
    let client = Arc::new(StaticClient::new(
        Ok(state(6, false)),
        Err(ClientError::Unauthorized),
    ));
    let sync = Arc::new(LikeSync::new("post-1"));

    let mut poller = Poller::spawn(sync.clone(), client.clone(), Duration::from_millis(20));

    sleep(Duration::from_millis(90)).await;
    let while_running = client.fetches.load(Ordering::SeqCst);
    assert!(while_running >= 2, "expected repeated fetches");
    assert_eq!(sync.state(), state(6, false));

    poller.cancel();
    sleep(Duration::from_millis(30)).await;
    let after_cancel = client.fetches.load(Ordering::SeqCst);
    sleep(Duration::from_millis(60)).await;
    assert_eq!(client.fetches.load(Ordering::SeqCst), after_cancel);

    // Double cancellation is a no-op.
    poller.cancel();
}

#[tokio::test]
async fn dropping_the_poller_cancels_it() {
    let client = Arc::new(StaticClient::new(
        Ok(state(1, false)),
        Err(ClientError::Unauthorized),
    ));
    let sync = Arc::new(LikeSync::new("post-1"));

    let poller = Poller::spawn(sync, client.clone(), Duration::from_millis(20));
    sleep(Duration::from_millis(30)).await;
    drop(poller);

    sleep(Duration::from_millis(10)).await;
    let after_drop = client.fetches.load(Ordering::SeqCst);
    sleep(Duration::from_millis(60)).await;
    assert_eq!(client.fetches.load(Ordering::SeqCst), after_drop);
}
