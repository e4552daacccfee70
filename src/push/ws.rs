//! WebSocket push channel
//!
//! Connects to the backend's per-session event socket and feeds parsed
//! [`SessionEvent`]s to the synchronizer. A lost connection flips
//! [`PushChannel::is_connected`] to `false` (degrading the synchronizer to
//! REST polling) and is retried on a bounded exponential backoff schedule:
//! base delay doubling per attempt up to the configured cap.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::PushConfig;
use crate::error::{QuizmateError, Result};
use crate::push::{PushChannel, SessionEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket implementation of [`PushChannel`]
///
/// `open` never fails on an unreachable backend: the connection attempt runs
/// in a background task, and until it succeeds the channel simply reports
/// itself disconnected so the polling fallback covers liveness.
#[derive(Debug)]
pub struct WsChannel {
    events_rx: Arc<Mutex<mpsc::UnboundedReceiver<SessionEvent>>>,
    connected: Arc<AtomicBool>,
    cancel: CancellationToken,
    closed: AtomicBool,
}

impl WsChannel {
    /// Open a channel to the given session events URL.
    ///
    /// # Arguments
    ///
    /// * `url` - WebSocket URL from
    ///   [`ApiClient::session_events_url`](crate::api::ApiClient::session_events_url)
    /// * `config` - Reconnect backoff schedule
    pub fn open(url: Url, config: &PushConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        tokio::spawn(run_loop(
            url,
            config.clone(),
            events_tx,
            Arc::clone(&connected),
            cancel.clone(),
        ));

        Self {
            events_rx: Arc::new(Mutex::new(events_rx)),
            connected,
            cancel,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl PushChannel for WsChannel {
    fn events(&self) -> Pin<Box<dyn Stream<Item = SessionEvent> + Send + '_>> {
        let rx = Arc::clone(&self.events_rx);
        Box::pin(futures::stream::unfold(rx, |rx| async move {
            let mut guard = rx.lock().await;
            let item = guard.recv().await?;
            drop(guard);
            Some((item, rx))
        }))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!("Closing push channel");
        self.cancel.cancel();
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Reader/reconnect loop for one channel.
///
/// Runs until the cancel token fires or the event receiver is dropped.
async fn run_loop(
    url: Url,
    config: PushConfig,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    connected: Arc<AtomicBool>,
    cancel: CancellationToken,
) {
    let mut socket: Option<WsStream> = None;
    let mut backoff_ms = config.reconnect_base_ms;
    let mut first_attempt = true;

    loop {
        let Some(ws) = socket.as_mut() else {
            if !first_attempt {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(Duration::from_millis(backoff_ms)) => {}
                }
            }
            first_attempt = false;

            tokio::select! {
                _ = cancel.cancelled() => return,
                result = connect_async(url.as_str()) => match result {
                    Ok((ws, _)) => {
                        tracing::info!("Push channel connected: {}", redacted(&url));
                        socket = Some(ws);
                        connected.store(true, Ordering::SeqCst);
                        backoff_ms = config.reconnect_base_ms;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Push channel connect failed ({}), retrying in {}ms",
                            QuizmateError::Channel(e.to_string()),
                            backoff_ms
                        );
                        backoff_ms = (backoff_ms * 2).min(config.reconnect_cap_ms);
                    }
                },
            }
            continue;
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws.close(None).await;
                return;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(event) = SessionEvent::parse(&text) {
                        if events_tx.send(event).is_err() {
                            // Receiver dropped: the synchronizer is gone.
                            return;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Push channel closed by server, falling back to polling");
                    socket = None;
                    connected.store(false, Ordering::SeqCst);
                }
                Some(Ok(_)) => {
                    // Ping/pong and binary frames carry no session events.
                }
                Some(Err(e)) => {
                    tracing::warn!("Push channel read error: {}", e);
                    socket = None;
                    connected.store(false, Ordering::SeqCst);
                }
            }
        }
    }
}

/// URL without its query string, safe for logs (the query carries the token).
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_unreachable_backend_reports_disconnected() {
        // Nothing listens on this port; the channel must come up in the
        // disconnected state rather than failing.
        let url = Url::parse("ws://127.0.0.1:1/v1/game/session/s-1/events").unwrap();
        let channel = WsChannel::open(url, &PushConfig::default());

        assert!(!channel.is_connected());
        channel.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let url = Url::parse("ws://127.0.0.1:1/v1/game/session/s-1/events").unwrap();
        let channel = WsChannel::open(url, &PushConfig::default());

        channel.close().await.unwrap();
        channel.close().await.unwrap();
        assert!(!channel.is_connected());
    }

    #[test]
    fn test_redacted_strips_query() {
        let url = Url::parse("ws://host/v1/game/session/s-1/events?token=secret").unwrap();
        let logged = redacted(&url);
        assert!(!logged.contains("secret"));
        assert!(logged.contains("/events"));
    }

    #[test]
    fn test_ws_channel_is_object_safe() {
        let url = Url::parse("ws://127.0.0.1:1/events").unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let channel = WsChannel::open(url, &PushConfig::default());
        let _boxed: Box<dyn PushChannel> = Box::new(channel);
    }
}
