// Playback control - everything that runs while a track is playing
// Snapshot + clock + key listener around one audio process, and the engine that sequences tracks

pub mod clock;
pub mod engine;
pub mod input;
pub mod runner;
pub mod state;
pub mod traversal;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::ElapsedClock;
pub use engine::{EngineState, PlaylistEngine, TraversalReport};
pub use input::{apply_action, shared_keys, ControlAction, KeySource, SharedKeys};
pub use runner::{PlaybackEnd, PlaybackOutcome, RunnerSettings};
pub use state::{PendingAction, PlaybackStatus, SharedState, StateSnapshot};

use crate::audio::Track;

/// Whatever shows playback to the user. Called from the engine and the render task.
pub trait PlaybackUi: Send + Sync {
    /// Once the stream is resolved, before the audio process starts
    fn now_playing(&self, track: &Track, artist: Option<&str>, position: usize, total: usize);

    fn progress(&self, track: &Track, snapshot: &StateSnapshot);

    fn finished(&self, track: &Track, outcome: &PlaybackOutcome);

    fn notice(&self, message: &str);
}
