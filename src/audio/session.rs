// Seams between the playback engine and whatever actually makes sound.
// The engine only ever talks to these traits so tests can swap in fakes.

use crate::error::StreamResult;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    NaturalEnd,
    Terminated,
}

/// Live controls for a running session, shared with the input listener thread
pub trait SessionControl: Send + Sync {
    fn pause(&self) -> StreamResult<()>;

    fn resume(&self) -> StreamResult<()>;

    /// Returns the new volume, or `None` when the process has no control channel
    fn adjust_volume(&self, delta: i32) -> Option<u32>;

    fn volume(&self) -> Option<u32>;

    /// Ask the process to exit. Safe to call any number of times.
    fn terminate(&self);
}

/// One running external audio process
pub trait PlaybackSession: Send {
    fn control(&self) -> Arc<dyn SessionControl>;

    /// Resolves once the process has exited, either on its own or after `terminate`
    fn wait(self) -> impl Future<Output = SessionOutcome> + Send;
}

/// Starts sessions. A spawn failure returns an error and no session.
pub trait Player: Send + Sync {
    type Session: PlaybackSession + 'static;

    fn start(&self, stream_url: &str) -> StreamResult<Self::Session>;
}
