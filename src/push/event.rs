//! Server-pushed session events
//!
//! Every push frame carries an event name and a payload. Instead of an
//! open-ended dispatch on the name string, the frame deserializes into the
//! closed [`SessionEvent`] union so handling is checked exhaustively at
//! compile time; names the client does not know map to
//! [`SessionEvent::Unknown`] and are ignored without failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::Player;

/// A server-to-client session event
///
/// The wire shape is `{"event": "<name>", "payload": {...}}` with kebab-case
/// event names. The server is the sole authority; the client only renders
/// what it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// A player's ready flag changed
    #[serde(rename_all = "camelCase")]
    PlayerReady {
        /// The player whose flag changed
        player_id: String,
        /// The authoritative new value
        ready: bool,
    },

    /// The pre-game countdown started (or restarted)
    #[serde(rename_all = "camelCase")]
    SessionCountdown {
        /// Countdown duration in seconds
        seconds: i64,
        /// Server timestamp at which the countdown started
        start_at: DateTime<Utc>,
    },

    /// The host paused the countdown; ready flags reset server-side
    SessionPaused,

    /// Gameplay begins now
    SessionStart,

    /// A new player entered the session
    PlayerJoined {
        /// The joining player's snapshot
        player: Player,
    },

    /// An event name this client does not recognize; ignored
    #[serde(other)]
    Unknown,
}

impl SessionEvent {
    /// Parse one push frame.
    ///
    /// Returns `None` for frames that are not valid event JSON at all;
    /// recognized-but-unknown event names still parse, as
    /// [`SessionEvent::Unknown`].
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Discarding malformed push frame: {}", e);
                None
            }
        }
    }
}

/// Remaining countdown seconds at the moment an event is received.
///
/// The server provides the start timestamp and the duration; the client
/// computes `duration - (now - start_at)` once at receipt and then runs a
/// purely cosmetic one-second display tick. Clamped at zero for events that
/// arrive late.
pub fn countdown_remaining(seconds: i64, start_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - start_at).num_seconds();
    (seconds - elapsed).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_player_ready() {
        let event =
            SessionEvent::parse(r#"{"event":"player-ready","payload":{"playerId":"p-1","ready":true}}"#)
                .unwrap();
        assert_eq!(
            event,
            SessionEvent::PlayerReady {
                player_id: "p-1".to_string(),
                ready: true,
            }
        );
    }

    #[test]
    fn test_parse_session_countdown() {
        let event = SessionEvent::parse(
            r#"{"event":"session-countdown","payload":{"seconds":5,"startAt":"2026-01-01T12:00:00Z"}}"#,
        )
        .unwrap();
        match event {
            SessionEvent::SessionCountdown { seconds, .. } => assert_eq!(seconds, 5),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unit_events_without_payload() {
        assert_eq!(
            SessionEvent::parse(r#"{"event":"session-paused"}"#),
            Some(SessionEvent::SessionPaused)
        );
        assert_eq!(
            SessionEvent::parse(r#"{"event":"session-start"}"#),
            Some(SessionEvent::SessionStart)
        );
    }

    #[test]
    fn test_parse_player_joined() {
        let event = SessionEvent::parse(
            r#"{"event":"player-joined","payload":{"player":{"id":"p-2","displayName":"Grace"}}}"#,
        )
        .unwrap();
        match event {
            SessionEvent::PlayerJoined { player } => assert_eq!(player.id, "p-2"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_event_name_is_unknown_not_error() {
        let event = SessionEvent::parse(r#"{"event":"confetti-burst","payload":{"amount":9000}}"#);
        assert_eq!(event, Some(SessionEvent::Unknown));
    }

    #[test]
    fn test_malformed_frame_is_discarded() {
        assert_eq!(SessionEvent::parse("not json"), None);
        assert_eq!(SessionEvent::parse(r#"{"payload":{}}"#), None);
    }

    #[test]
    fn test_countdown_remaining_subtracts_elapsed() {
        let now = Utc::now();
        // seconds=5 with a start timestamp 2 seconds in the past: 3 remain.
        let remaining = countdown_remaining(5, now - Duration::seconds(2), now);
        assert_eq!(remaining, 3);
    }

    #[test]
    fn test_countdown_remaining_clamps_at_zero() {
        let now = Utc::now();
        let remaining = countdown_remaining(5, now - Duration::seconds(60), now);
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_countdown_remaining_full_when_start_is_now() {
        let now = Utc::now();
        assert_eq!(countdown_remaining(10, now, now), 10);
    }
}
