//! Local session state reconciliation
//!
//! [`SessionState`] is the pure core behind the synchronizer: it folds REST
//! snapshots and push events into the page-level state machine
//! (loading -> lobby/error -> countdown -> playing -> complete) with no I/O,
//! so every reconciliation rule is testable deterministically.
//!
//! Reconciliation rules:
//!
//! - Every incoming snapshot is authoritative-as-of-receipt and overwrites
//!   local state wholesale; there is no merging or diffing against prior
//!   state (the backend provides no sequence numbers on the wire).
//! - The caller's own ready toggle is modeled as a pending local intent
//!   merged over the last confirmed server state, never as a direct mutation
//!   of the shared snapshot. The intent is dropped once the server confirms
//!   the intended value, so the final displayed value always equals the last
//!   server-confirmed one.

use chrono::{DateTime, Utc};

use crate::api::types::{Player, Session, SessionStatus};
use crate::push::{countdown_remaining, SessionEvent};

/// Page-level phase of a session-bound view
#[derive(Debug, Clone, PartialEq)]
pub enum PagePhase {
    /// Initial snapshot not yet loaded
    Loading,
    /// Waiting for players to ready up
    Lobby,
    /// Countdown to start is running
    ///
    /// `remaining` is `None` when the phase is known only from a REST
    /// snapshot, which carries no timing; the next `session-countdown` event
    /// fills it in.
    Countdown {
        /// Seconds left on the display tick
        remaining: Option<i64>,
    },
    /// Gameplay in progress
    Playing,
    /// Session finished
    Complete,
    /// Initial load failed; retryable
    Error {
        /// Human-readable failure message
        message: String,
    },
}

/// Snapshot of session state for rendering
///
/// `session` already has the pending ready intent merged in; renderers never
/// see the raw confirmed state and the intent separately.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Current page phase
    pub phase: PagePhase,
    /// Merged session snapshot, absent until the first load succeeds
    pub session: Option<Session>,
}

impl SessionView {
    /// The view before anything has loaded.
    pub fn initial() -> Self {
        Self {
            phase: PagePhase::Loading,
            session: None,
        }
    }
}

/// Pure state core folding snapshots and events into a [`SessionView`]
#[derive(Debug)]
pub struct SessionState {
    self_player_id: String,
    confirmed: Option<Session>,
    pending_ready: Option<bool>,
    phase: PagePhase,
}

impl SessionState {
    /// Create the state for a session-bound page.
    ///
    /// `self_player_id` identifies the caller inside the player list; only
    /// that player's ready flag participates in the pending-intent merge.
    pub fn new(self_player_id: &str) -> Self {
        Self {
            self_player_id: self_player_id.to_string(),
            confirmed: None,
            pending_ready: None,
            phase: PagePhase::Loading,
        }
    }

    /// Overwrite local state with an authoritative REST snapshot.
    pub fn apply_snapshot(&mut self, session: Session) {
        self.phase = match session.status {
            SessionStatus::Waiting => PagePhase::Lobby,
            SessionStatus::Countdown => match &self.phase {
                // Keep the locally computed remaining time; the snapshot
                // carries none.
                PagePhase::Countdown { remaining } => PagePhase::Countdown {
                    remaining: *remaining,
                },
                _ => PagePhase::Countdown { remaining: None },
            },
            SessionStatus::Active => PagePhase::Playing,
            SessionStatus::Complete => PagePhase::Complete,
        };

        self.drop_intent_if_confirmed(&session);
        self.confirmed = Some(session);
    }

    /// Fold one push event into local state.
    ///
    /// `now` is the receipt time, used to compute the countdown remainder.
    pub fn apply_event(&mut self, event: SessionEvent, now: DateTime<Utc>) {
        match event {
            SessionEvent::PlayerReady { player_id, ready } => {
                if player_id == self.self_player_id && self.pending_ready == Some(ready) {
                    self.pending_ready = None;
                }
                if let Some(session) = self.confirmed.as_mut() {
                    if let Some(player) = session.players.iter_mut().find(|p| p.id == player_id) {
                        player.ready = ready;
                    }
                }
            }
            SessionEvent::SessionCountdown { seconds, start_at } => {
                self.phase = PagePhase::Countdown {
                    remaining: Some(countdown_remaining(seconds, start_at, now)),
                };
                if let Some(session) = self.confirmed.as_mut() {
                    session.status = SessionStatus::Countdown;
                }
            }
            SessionEvent::SessionPaused => {
                // A pause overrides any locally running countdown immediately
                // and resets every displayed ready flag, matching the
                // server-side reset.
                self.phase = PagePhase::Lobby;
                self.pending_ready = None;
                if let Some(session) = self.confirmed.as_mut() {
                    session.status = SessionStatus::Waiting;
                    for player in &mut session.players {
                        player.ready = false;
                    }
                }
            }
            SessionEvent::SessionStart => {
                self.phase = PagePhase::Playing;
                if let Some(session) = self.confirmed.as_mut() {
                    session.status = SessionStatus::Active;
                }
            }
            SessionEvent::PlayerJoined { player } => {
                if let Some(session) = self.confirmed.as_mut() {
                    upsert_player(&mut session.players, player);
                }
            }
            SessionEvent::Unknown => {
                tracing::trace!("Ignoring unrecognized push event");
            }
        }
    }

    /// Record the caller's local ready intent (set on toggle, before the
    /// confirming push arrives).
    pub fn set_pending_ready(&mut self, desired: bool) {
        self.pending_ready = Some(desired);
    }

    /// The ready value currently displayed for the caller: the pending intent
    /// when one exists, else the last confirmed server value.
    pub fn displayed_ready(&self) -> bool {
        if let Some(pending) = self.pending_ready {
            return pending;
        }
        self.confirmed
            .as_ref()
            .and_then(|s| s.players.iter().find(|p| p.id == self.self_player_id))
            .map(|p| p.ready)
            .unwrap_or(false)
    }

    /// Advance the cosmetic one-second countdown tick.
    pub fn tick(&mut self) {
        if let PagePhase::Countdown {
            remaining: Some(remaining),
        } = &mut self.phase
        {
            if *remaining > 0 {
                *remaining -= 1;
            }
        }
    }

    /// Enter the retryable error phase (initial load failed).
    pub fn set_error(&mut self, message: String) {
        self.phase = PagePhase::Error { message };
    }

    /// Back to loading for a manual retry.
    pub fn set_loading(&mut self) {
        self.phase = PagePhase::Loading;
    }

    /// `true` until the first snapshot has been applied.
    pub fn awaiting_first_snapshot(&self) -> bool {
        self.confirmed.is_none()
    }

    /// Render the current view, merging the pending ready intent over the
    /// confirmed snapshot.
    pub fn view(&self) -> SessionView {
        let session = self.confirmed.as_ref().map(|confirmed| {
            let mut merged = confirmed.clone();
            if let Some(pending) = self.pending_ready {
                if let Some(player) = merged
                    .players
                    .iter_mut()
                    .find(|p| p.id == self.self_player_id)
                {
                    player.ready = pending;
                }
            }
            merged
        });

        SessionView {
            phase: self.phase.clone(),
            session,
        }
    }

    fn drop_intent_if_confirmed(&mut self, session: &Session) {
        if let Some(pending) = self.pending_ready {
            let confirmed_ready = session
                .players
                .iter()
                .find(|p| p.id == self.self_player_id)
                .map(|p| p.ready);
            if confirmed_ready == Some(pending) {
                self.pending_ready = None;
            }
        }
    }
}

fn upsert_player(players: &mut Vec<Player>, player: Player) {
    match players.iter_mut().find(|p| p.id == player.id) {
        Some(existing) => *existing = player,
        None => players.push(player),
    }
}
