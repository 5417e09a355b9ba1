use crate::audio::{format_duration, Track};
use crate::error::StreamResult;
use tracing::info;

use super::parse_index;

/// The user's queue. Only the command loop touches it, never the playback threads.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    pub shuffle: bool,
    pub repeat: bool,
}

impl Playlist {
    pub fn new(shuffle: bool, repeat: bool) -> Self {
        Self {
            tracks: Vec::new(),
            shuffle,
            repeat,
        }
    }

    /// Transient list (radio, single search hit) that borrows the user's policy flags
    pub fn from_tracks(tracks: Vec<Track>, shuffle: bool, repeat: bool) -> Self {
        let mut playlist = Self::new(shuffle, repeat);
        for track in tracks {
            playlist.add(track);
        }
        playlist
    }

    pub fn single(track: Track) -> Self {
        Self::from_tracks(vec![track], false, false)
    }

    /// Add a track unless one with the same url is already queued
    pub fn add(&mut self, track: Track) -> bool {
        if self.tracks.iter().any(|t| t.same_source(&track)) {
            return false;
        }
        info!("Added '{}' to playlist", track.title);
        self.tracks.push(track);
        true
    }

    /// Remove by 1-based position as typed by the user
    pub fn remove(&mut self, raw_index: &str) -> StreamResult<Track> {
        let index = parse_index(raw_index, self.tracks.len())?;
        let track = self.tracks.remove(index);
        info!("Removed '{}' from playlist", track.title);
        Ok(track)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sum of known durations, `None` when no track has one
    pub fn total_duration(&self) -> Option<u64> {
        let known: Vec<u64> = self.tracks.iter().filter_map(|t| t.duration).collect();
        if known.is_empty() {
            None
        } else {
            Some(known.iter().sum())
        }
    }

    pub fn duration_string(&self) -> String {
        self.total_duration()
            .map(format_duration)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
