// StreamTune - terminal audio streamer
// Search, queue and play remote tracks through an external player with live key controls

pub mod audio;    // track model and the external player process
pub mod cli;      // command parsing and the prompt loop
pub mod config;   // settings and preferences
pub mod error;
pub mod library;  // playlist, history, favorites
pub mod logging;
pub mod playback; // shared state, clock, key listener, playlist engine
pub mod resolver; // search and stream lookup
pub mod ui;       // terminal output and key mapping

pub use audio::Track;
pub use config::Config;
pub use error::{StreamError, StreamResult};
pub use library::Library;
pub use playback::{PlaylistEngine, StateSnapshot};
