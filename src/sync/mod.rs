//! Session realtime synchronization
//!
//! The server owns all session state; this module keeps a local, render-ready
//! mirror of it. [`SessionState`] is the pure reconciliation core,
//! [`SessionSynchronizer`] the async driver wiring it to the REST API, the
//! push channel, the polling fallback, and the countdown display tick.

mod state;
mod synchronizer;

pub use state::{PagePhase, SessionState, SessionView};
pub use synchronizer::SessionSynchronizer;
