// Library - the user's playlist, play history and favorites
// History and favorites are persisted after every change; the in-memory copy stays authoritative

pub mod favorites;
pub mod history;
pub mod playlist;
pub mod store;

pub use favorites::FavoritesSet;
pub use history::{HistoryLog, HISTORY_LIMIT};
pub use playlist::Playlist;
pub use store::JsonStore;

use crate::audio::Track;
use crate::error::{StreamError, StreamResult};
use tracing::{info, warn};

/// Receives tracks that count as played
pub trait HistorySink {
    fn record(&mut self, track: &Track);
}

/// Turn a 1-based index typed by the user into a 0-based one
pub fn parse_index(raw: &str, len: usize) -> StreamResult<usize> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Ok(n - 1),
        _ => Err(StreamError::invalid_index(raw, len)),
    }
}

pub struct Library {
    history: HistoryLog,
    favorites: FavoritesSet,
    store: JsonStore,
}

impl Library {
    pub fn open(store: JsonStore, history_limit: usize) -> Self {
        let history = HistoryLog::from_entries(store.load_history(), history_limit);
        let favorites = FavoritesSet::from_entries(store.load_favorites());
        info!(
            "Loaded {} history entries and {} favorites",
            history.len(),
            favorites.len()
        );

        Self {
            history,
            favorites,
            store,
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn record_play(&mut self, track: &Track) {
        if self.history.append(track.clone()) {
            self.persist_history();
        }
    }

    /// `fav <n>`: n points into the history list
    pub fn favorite_from_history(&mut self, raw_index: &str) -> StreamResult<(Track, bool)> {
        let index = parse_index(raw_index, self.history.len())?;
        let track = self.history.get(index).cloned().ok_or_else(|| {
            StreamError::invalid_index(raw_index.trim(), self.history.len())
        })?;
        let added = self.add_favorite(track.clone());
        Ok((track, added))
    }

    pub fn add_favorite(&mut self, track: Track) -> bool {
        let added = self.favorites.add(track);
        if added {
            self.persist_favorites();
        }
        added
    }

    pub fn remove_favorite(&mut self, raw_index: &str) -> StreamResult<Track> {
        let index = parse_index(raw_index, self.favorites.len())?;
        let track = self.favorites.remove(index).ok_or_else(|| {
            StreamError::invalid_index(raw_index.trim(), self.favorites.len())
        })?;
        self.persist_favorites();
        Ok(track)
    }

    pub fn favorite(&self, raw_index: &str) -> StreamResult<Track> {
        let index = parse_index(raw_index, self.favorites.len())?;
        self.favorites
            .get(index)
            .cloned()
            .ok_or_else(|| StreamError::invalid_index(raw_index.trim(), self.favorites.len()))
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        self.persist_favorites();
    }

    // Persistence is best effort: log and carry on with what's in memory
    fn persist_history(&self) {
        if let Err(e) = self.store.save_history(&self.history.to_vec()) {
            warn!("History not saved: {}", e);
        }
    }

    fn persist_favorites(&self) {
        if let Err(e) = self.store.save_favorites(self.favorites.entries()) {
            warn!("Favorites not saved: {}", e);
        }
    }
}

impl HistorySink for Library {
    fn record(&mut self, track: &Track) {
        self.record_play(track);
    }
}
