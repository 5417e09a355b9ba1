// Terminal UI - plain line output plus a live progress line while a track plays
// crossterm handles raw mode and in-place redraws

pub mod events;
pub mod progress;

pub use events::{key_to_action, TerminalKeys};
pub use progress::format_progress_line;

use crate::audio::Track;
use crate::playback::{PlaybackEnd, PlaybackOutcome, PlaybackUi, StateSnapshot};
use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use std::io::{self, Write};

/// Raw mode for as long as the guard lives
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Never leave the shell in raw mode, even when unwinding
        let _ = disable_raw_mode();
        let _ = queue!(io::stdout(), cursor::Show);
        let _ = io::stdout().flush();
    }
}

pub struct TerminalUi {
    fallback_secs: u64,
}

impl TerminalUi {
    pub fn new(fallback_secs: u64) -> Self {
        Self { fallback_secs }
    }

    fn redraw(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(
            out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line)
        )?;
        out.flush()
    }
}

impl PlaybackUi for TerminalUi {
    fn now_playing(&self, track: &Track, artist: Option<&str>, position: usize, total: usize) {
        println!();
        println!(
            "🎵 [{}/{}] {} ({})",
            position,
            total,
            track.title,
            track.duration_string()
        );
        if let Some(artist) = artist {
            println!("   by {}", artist);
        }
        println!("   space: pause/resume  n: next  q: stop  +/-: volume");
    }

    fn progress(&self, track: &Track, snapshot: &StateSnapshot) {
        let line = format_progress_line(track, snapshot, self.fallback_secs);
        // A failed redraw only costs one frame
        let _ = self.redraw(&line);
    }

    fn finished(&self, track: &Track, outcome: &PlaybackOutcome) {
        let verb = match outcome.end {
            PlaybackEnd::Finished => "Finished",
            PlaybackEnd::Skipped => "Skipped",
            PlaybackEnd::Quit => "Stopped",
        };
        let _ = self.redraw("");
        println!(
            "{} '{}' after {}",
            verb,
            track.title,
            crate::audio::format_duration(outcome.elapsed)
        );
    }

    fn notice(&self, message: &str) {
        println!("⚠️  {}", message);
    }
}

/// Numbered listing, 1-based to match the index commands
pub fn print_tracks(heading: &str, tracks: &[Track]) {
    if tracks.is_empty() {
        println!("{} is empty", heading);
        return;
    }

    println!("{} ({}):", heading, tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!("  {:>3}. {} [{}]", i + 1, track.title, track.duration_string());
    }
}
