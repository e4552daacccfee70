//! Session realtime synchronizer
//!
//! Keeps local UI state consistent with server-authoritative session state
//! using the push channel, with REST polling as the fallback while the
//! channel is disconnected. Views observe state through a `tokio::sync::watch`
//! subscription.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::game::GameApi;
use crate::error::Result;
use crate::push::{PushChannel, SessionEvent};
use crate::sync::state::{SessionState, SessionView};

/// Synchronizes one session-bound page with the backend
///
/// Lifecycle: construct, [`start`](Self::start) the event loop, subscribe to
/// views, and [`close`](Self::close) on navigation away. Close is idempotent
/// and tears down exactly one channel and one polling loop.
pub struct SessionSynchronizer {
    session_id: String,
    game: GameApi,
    channel: Arc<dyn PushChannel>,
    state: Mutex<SessionState>,
    view_tx: watch::Sender<SessionView>,
    poll_interval: Duration,
    cancel: CancellationToken,
    closed: AtomicBool,
    // Monotonic sequence numbers for REST snapshots; responses that lose the
    // race to a newer request are discarded instead of overwriting fresher
    // state.
    request_seq: AtomicU64,
    applied_seq: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for SessionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSynchronizer")
            .field("session_id", &self.session_id)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SessionSynchronizer {
    /// Create a synchronizer for one session.
    ///
    /// # Arguments
    ///
    /// * `game` - REST endpoint group for snapshots and the ready toggle
    /// * `channel` - Push channel scoped to this session
    /// * `session_id` - The session being synchronized
    /// * `self_player_id` - The caller's player id (for the ready intent)
    /// * `poll_interval` - REST fallback interval while disconnected
    pub fn new(
        game: GameApi,
        channel: Arc<dyn PushChannel>,
        session_id: &str,
        self_player_id: &str,
        poll_interval: Duration,
    ) -> Arc<Self> {
        let (view_tx, _) = watch::channel(SessionView::initial());
        Arc::new(Self {
            session_id: session_id.to_string(),
            game,
            channel,
            state: Mutex::new(SessionState::new(self_player_id)),
            view_tx,
            poll_interval,
            cancel: CancellationToken::new(),
            closed: AtomicBool::new(false),
            request_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
            task: Mutex::new(None),
        })
    }

    /// Subscribe to rendered session views.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    /// The session this synchronizer is bound to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Fetch the initial snapshot and start the event loop.
    ///
    /// A failed initial fetch does not abort the loop; it surfaces the
    /// retryable [`Error`](crate::sync::PagePhase::Error) phase and keeps
    /// listening so [`retry`](Self::retry) can recover.
    pub fn start(self: Arc<Self>) {
        let this = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            this.refresh().await;
            this.run().await;
        });
        if let Ok(mut slot) = self.task.lock() {
            *slot = Some(handle);
        }
    }

    async fn run(&self) {
        let channel = Arc::clone(&self.channel);
        let mut events = channel.events();
        let mut events_open = true;

        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut display_tick = tokio::time::interval(Duration::from_secs(1));
        display_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Synchronizer for session {} stopped", self.session_id);
                    return;
                }
                maybe_event = events.next(), if events_open => match maybe_event {
                    Some(event) => self.apply_event(event),
                    None => {
                        // Channel task gone for good; polling carries on.
                        events_open = false;
                    }
                },
                _ = poll.tick() => {
                    if !self.channel.is_connected() {
                        self.refresh().await;
                    }
                }
                _ = display_tick.tick() => {
                    self.with_state(|state| state.tick());
                }
            }
        }
    }

    /// Re-fetch the session snapshot and reconcile.
    ///
    /// Snapshots are applied last-write-wins by arrival; a response belonging
    /// to a superseded request is discarded.
    pub async fn refresh(&self) {
        let seq = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match self.game.session_status(&self.session_id).await {
            Ok(session) => {
                let mut state = match self.state.lock() {
                    Ok(state) => state,
                    Err(_) => return,
                };
                if seq < self.applied_seq.load(Ordering::SeqCst) {
                    tracing::debug!("Discarding stale snapshot (seq {})", seq);
                    return;
                }
                self.applied_seq.store(seq, Ordering::SeqCst);
                state.apply_snapshot(session);
                let _ = self.view_tx.send(state.view());
            }
            Err(e) => {
                self.with_state(|state| {
                    if state.awaiting_first_snapshot() {
                        state.set_error(e.to_string());
                    } else {
                        // A failed poll is not a page failure; keep the last
                        // good view and try again on the next tick.
                        tracing::warn!("Status poll failed: {}", e);
                    }
                });
            }
        }
    }

    /// Retry the initial load after a failure.
    pub async fn retry(&self) {
        self.with_state(|state| state.set_loading());
        self.refresh().await;
    }

    /// Toggle the caller's ready flag.
    ///
    /// Fire-and-forget: the local intent is recorded for display, the REST
    /// call is issued, and the authoritative update arrives via the
    /// subsequent `player-ready` push event, never from the response body.
    pub async fn toggle_ready(&self) -> Result<()> {
        let desired = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| crate::error::QuizmateError::Channel("state poisoned".to_string()))?;
            let desired = !state.displayed_ready();
            state.set_pending_ready(desired);
            let _ = self.view_tx.send(state.view());
            desired
        };

        tracing::debug!("Toggling ready -> {} for session {}", desired, self.session_id);
        if let Err(e) = self.game.toggle_ready(&self.session_id).await {
            // The push event will correct the display either way.
            tracing::warn!("Ready toggle call failed: {}", e);
        }
        Ok(())
    }

    /// Tear down the synchronizer: stop the loop and close the channel.
    ///
    /// Exactly-once semantics: a second call is a no-op, so a page cannot
    /// double-close its channel or leave a polling timer behind.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.cancel.cancel();
        // Abort rather than await: an in-flight status poll would otherwise
        // hold up teardown for the full request timeout.
        let handle = self.task.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            handle.abort();
        }
        self.channel.close().await
    }

    /// `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn apply_event(&self, event: SessionEvent) {
        self.with_state(|state| state.apply_event(event, Utc::now()));
    }

    fn with_state(&self, f: impl FnOnce(&mut SessionState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
            let _ = self.view_tx.send(state.view());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{GameMode, Player, Session, SessionStatus};
    use crate::api::ApiClient;
    use crate::auth::CredentialStore;
    use crate::config::ApiConfig;
    use crate::push::fake::{FakeChannel, FakeChannelHandle};
    use crate::sync::state::PagePhase;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn game_api(base_url: &str) -> GameApi {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        };
        let credentials = Arc::new(CredentialStore::in_memory());
        GameApi::new(ApiClient::new(&config, credentials).unwrap())
    }

    fn synchronizer(base_url: &str) -> (Arc<SessionSynchronizer>, FakeChannelHandle) {
        let (channel, handle) = FakeChannel::new();
        let sync = SessionSynchronizer::new(
            game_api(base_url),
            Arc::new(channel),
            "s-1",
            "me",
            Duration::from_secs(1),
        );
        (sync, handle)
    }

    fn session_body(status: &str, me_ready: bool) -> serde_json::Value {
        serde_json::json!({
            "id": "s-1",
            "mode": "competitive",
            "players": [
                {"id": "me", "displayName": "ME", "ready": me_ready},
                {"id": "host", "displayName": "HOST", "isHost": true, "ready": false}
            ],
            "currentQuestion": 0,
            "questionCount": 10,
            "status": status
        })
    }

    #[tokio::test]
    async fn test_close_tears_down_exactly_once() {
        let (sync, handle) = synchronizer("http://localhost:8080");

        sync.close().await.unwrap();
        sync.close().await.unwrap();

        assert_eq!(handle.close_count(), 1);
        assert!(sync.is_closed());
        assert!(sync.cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_initial_load_failure_is_retryable_error() {
        // Nothing listens here: refresh must surface the error phase.
        let (sync, _handle) = synchronizer("http://127.0.0.1:1");

        sync.refresh().await;
        assert!(matches!(
            sync.subscribe().borrow().phase,
            PagePhase::Error { .. }
        ));
    }

    #[tokio::test]
    async fn test_refresh_applies_snapshot_and_retry_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", false)))
            .mount(&server)
            .await;

        let (sync, _handle) = synchronizer(&server.uri());
        sync.retry().await;

        let view = sync.subscribe().borrow().clone();
        assert_eq!(view.phase, PagePhase::Lobby);
        assert_eq!(view.session.unwrap().players.len(), 2);
    }

    #[tokio::test]
    async fn test_poll_failure_after_first_snapshot_keeps_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", false)))
            .expect(1)
            .mount(&server)
            .await;

        let (sync, _handle) = synchronizer(&server.uri());
        sync.refresh().await;
        drop(server);

        // Backend gone mid-session: the poll failure must not regress the
        // page into the error phase.
        sync.refresh().await;
        assert_eq!(sync.subscribe().borrow().phase, PagePhase::Lobby);
    }

    #[tokio::test]
    async fn test_toggle_ready_shows_intent_then_defers_to_push() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", false)))
            .mount(&server)
            .await;
        // The toggle response body is deliberately not a session snapshot;
        // the synchronizer must not read it.
        Mock::given(method("PUT"))
            .and(path("/v1/game/session/s-1/ready"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(2)
            .mount(&server)
            .await;

        let (sync, _handle) = synchronizer(&server.uri());
        sync.refresh().await;

        // Toggle on, then off: two REST calls, display follows the intent.
        sync.toggle_ready().await.unwrap();
        assert!(sync.subscribe().borrow().session.as_ref().unwrap().players[0].ready);
        sync.toggle_ready().await.unwrap();
        assert!(!sync.subscribe().borrow().session.as_ref().unwrap().players[0].ready);

        // Confirming pushes arrive in order; final display equals the last
        // server-confirmed value.
        sync.apply_event(SessionEvent::PlayerReady {
            player_id: "me".to_string(),
            ready: true,
        });
        sync.apply_event(SessionEvent::PlayerReady {
            player_id: "me".to_string(),
            ready: false,
        });
        assert!(!sync.subscribe().borrow().session.as_ref().unwrap().players[0].ready);
    }

    #[tokio::test]
    async fn test_events_from_channel_drive_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", true)))
            .mount(&server)
            .await;

        let (sync, handle) = synchronizer(&server.uri());
        sync.refresh().await;
        Arc::clone(&sync).start();

        let mut views = sync.subscribe();
        handle.emit(SessionEvent::SessionStart);

        // The loop folds the pushed event into the next published view.
        loop {
            views.changed().await.unwrap();
            if views.borrow().phase == PagePhase::Playing {
                break;
            }
        }

        sync.close().await.unwrap();
        assert_eq!(handle.close_count(), 1);
    }

    #[tokio::test]
    async fn test_close_aborts_event_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", true)))
            .mount(&server)
            .await;

        let (sync, handle) = synchronizer(&server.uri());
        let mut views = sync.subscribe();
        Arc::clone(&sync).start();

        views.changed().await.unwrap();
        sync.close().await.unwrap();
        assert!(sync.task.lock().unwrap().is_none());

        // The loop is gone: events emitted after close never reach the view.
        handle.emit(SessionEvent::SessionStart);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_ne!(sync.subscribe().borrow().phase, PagePhase::Playing);
    }

    #[tokio::test]
    async fn test_polling_runs_while_disconnected_and_stops_on_reconnect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("waiting", false)))
            .mount(&server)
            .await;

        let (channel, handle) = FakeChannel::new();
        handle.set_connected(false);
        let sync = SessionSynchronizer::new(
            game_api(&server.uri()),
            Arc::new(channel),
            "s-1",
            "me",
            Duration::from_millis(50),
        );
        Arc::clone(&sync).start();

        // Disconnected: the interval keeps driving REST status polls.
        tokio::time::sleep(Duration::from_millis(400)).await;
        let while_down = server.received_requests().await.unwrap().len();
        assert!(
            while_down >= 2,
            "expected repeated polls while disconnected, saw {while_down}"
        );

        // Reconnected: ticks still fire but no further polls are issued.
        handle.set_connected(true);
        tokio::time::sleep(Duration::from_millis(150)).await;
        let baseline = server.received_requests().await.unwrap().len();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let after = server.received_requests().await.unwrap().len();
        assert_eq!(after, baseline);

        sync.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/game/session/s-1/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("active", true)))
            .mount(&server)
            .await;

        let (sync, _handle) = synchronizer(&server.uri());

        // Simulate a superseded request: a newer sequence number has already
        // been applied by the time the older response would land.
        sync.applied_seq.store(10, Ordering::SeqCst);
        sync.refresh().await;

        // seq 1 < applied 10: the snapshot must not have been applied.
        assert_eq!(sync.subscribe().borrow().phase, PagePhase::Loading);
    }
}
