use crate::audio::Track;

/// Favorites in insertion order, unique by url
#[derive(Debug, Clone, Default)]
pub struct FavoritesSet {
    entries: Vec<Track>,
}

impl FavoritesSet {
    pub fn from_entries(entries: Vec<Track>) -> Self {
        let mut set = Self::default();
        for track in entries {
            set.add(track);
        }
        set
    }

    pub fn add(&mut self, track: Track) -> bool {
        if self.contains(&track.url) {
            return false;
        }
        self.entries.push(track);
        true
    }

    /// Out-of-range positions are a silent no-op
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|t| t.url == url)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
