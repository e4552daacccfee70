//! Realtime push channel abstraction and implementations
//!
//! This module defines the [`PushChannel`] trait the session synchronizer
//! consumes. Concrete implementations live in submodules:
//!
//! - [`ws::WsChannel`] -- WebSocket channel over `tokio-tungstenite` with a
//!   bounded exponential reconnect backoff.
//! - [`fake::FakeChannel`] -- in-process fake used in tests (cfg(test) only).
//!
//! # Design
//!
//! The trait is receive-only: the client holds no authority over session
//! state, so the channel only delivers server-pushed [`SessionEvent`]s. While
//! a channel reports itself disconnected the synchronizer degrades to REST
//! polling; a disconnect is never an error condition for the page.

use std::pin::Pin;

use futures::Stream;

use crate::error::Result;

pub use event::{countdown_remaining, SessionEvent};

/// Abstraction over realtime push channel implementations.
///
/// Used polymorphically through `Arc<dyn PushChannel>` so tests can substitute
/// [`fake::FakeChannel`] without touching the synchronizer.
#[async_trait::async_trait]
pub trait PushChannel: Send + Sync + std::fmt::Debug {
    /// Returns the stream of inbound session events.
    ///
    /// Malformed frames are dropped inside the implementation; the stream
    /// yields only parsed events. The stream ends when the channel is closed.
    fn events(&self) -> Pin<Box<dyn Stream<Item = SessionEvent> + Send + '_>>;

    /// `true` while the underlying connection is established.
    ///
    /// The synchronizer polls REST status whenever this is `false`.
    fn is_connected(&self) -> bool;

    /// Close the channel and release the underlying connection.
    ///
    /// Must be idempotent: a second close is a no-op, not an error.
    async fn close(&self) -> Result<()>;
}

pub mod event;
pub mod ws;

#[cfg(test)]
pub mod fake;
