//! In-process fake push channel for synchronizer tests
//!
//! [`FakeChannel::new`] returns a `(FakeChannel, FakeChannelHandle)` pair.
//! Wire the channel into the code under test; from the test side, use the
//! handle to emit server events, flip connectedness, and count `close` calls.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, Mutex};

use crate::error::Result;
use crate::push::{PushChannel, SessionEvent};

/// In-process fake implementation of [`PushChannel`]
#[derive(Debug)]
pub struct FakeChannel {
    events_rx: Arc<Mutex<mpsc::UnboundedReceiver<SessionEvent>>>,
    connected: Arc<AtomicBool>,
    close_count: Arc<AtomicUsize>,
}

/// Test-side handle for a [`FakeChannel`]
#[derive(Debug)]
pub struct FakeChannelHandle {
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    connected: Arc<AtomicBool>,
    close_count: Arc<AtomicUsize>,
}

impl FakeChannel {
    /// Create a connected fake channel and its handle.
    pub fn new() -> (Self, FakeChannelHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(true));
        let close_count = Arc::new(AtomicUsize::new(0));

        let channel = Self {
            events_rx: Arc::new(Mutex::new(events_rx)),
            connected: Arc::clone(&connected),
            close_count: Arc::clone(&close_count),
        };
        let handle = FakeChannelHandle {
            events_tx,
            connected,
            close_count,
        };
        (channel, handle)
    }
}

impl FakeChannelHandle {
    /// Emit a server event into the channel's event stream.
    pub fn emit(&self, event: SessionEvent) {
        self.events_tx
            .send(event)
            .expect("FakeChannel event receiver dropped");
    }

    /// Flip the channel's reported connectedness.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Number of times `close` was invoked on the channel.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PushChannel for FakeChannel {
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
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_emit_delivers_event_in_order() {
        let (channel, handle) = FakeChannel::new();

        handle.emit(SessionEvent::SessionPaused);
        handle.emit(SessionEvent::SessionStart);

        let mut stream = channel.events();
        let first = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out")
            .expect("stream ended");
        let second = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out")
            .expect("stream ended");

        assert_eq!(first, SessionEvent::SessionPaused);
        assert_eq!(second, SessionEvent::SessionStart);
    }

    #[tokio::test]
    async fn test_close_counts_and_disconnects() {
        let (channel, handle) = FakeChannel::new();
        assert!(channel.is_connected());

        channel.close().await.unwrap();
        assert_eq!(handle.close_count(), 1);
        assert!(!channel.is_connected());
    }

    #[test]
    fn test_set_connected_flips_flag() {
        let (channel, handle) = FakeChannel::new();
        handle.set_connected(false);
        assert!(!channel.is_connected());
        handle.set_connected(true);
        assert!(channel.is_connected());
    }
}
