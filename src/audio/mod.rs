pub mod mpv;
pub mod session;
pub mod track;

pub use mpv::{MpvPlayer, MpvSession};
pub use session::{PlaybackSession, Player, SessionControl, SessionOutcome};
pub use track::{format_duration, Track};
