// Command loop - reads one line at a time and dispatches it
// Playback runs inline; the prompt comes back once a traversal ends or is stopped

pub mod app;
pub mod command;

pub use app::{App, Flow};
pub use command::Command;
