use crate::audio::{format_duration, Track};
use crate::playback::{PlaybackStatus, StateSnapshot};

const BAR_WIDTH: usize = 30;

pub fn progress_bar(elapsed: u64, total: u64, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (elapsed.min(total) * width as u64 / total) as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One status line: icon, title, elapsed/total, bar, then volume and the latest message.
/// Tracks without a known length are drawn against `fallback_secs`.
pub fn format_progress_line(track: &Track, snapshot: &StateSnapshot, fallback_secs: u64) -> String {
    let total = track.duration.unwrap_or(fallback_secs);
    let icon = match snapshot.status {
        PlaybackStatus::Playing => "▶",
        PlaybackStatus::Paused => "⏸",
        PlaybackStatus::Idle | PlaybackStatus::Ended => "■",
    };

    let mut line = format!(
        "{} {} {} / {} {}",
        icon,
        track.display_title(),
        format_duration(snapshot.elapsed),
        format_duration(total),
        progress_bar(snapshot.elapsed, total, BAR_WIDTH),
    );

    if let Some(volume) = snapshot.volume {
        line.push_str(&format!(" vol {}%", volume));
    }
    if !snapshot.message.is_empty() {
        line.push_str(&format!("  {}", snapshot.message));
    }
    line
}
