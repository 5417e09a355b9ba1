use crate::audio::Track;
use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 100;

/// Bounded play history, oldest first.
/// Never holds two adjacent entries with the same url and never more than `limit`.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<Track>,
    limit: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl HistoryLog {
    /// `limit` is clamped to 1..=HISTORY_LIMIT
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.clamp(1, HISTORY_LIMIT),
        }
    }

    /// Rebuild from stored entries, re-applying the append rules
    pub fn from_entries(entries: Vec<Track>, limit: usize) -> Self {
        let mut log = Self::new(limit);
        for track in entries {
            log.append(track);
        }
        log
    }

    pub fn append(&mut self, track: Track) -> bool {
        if self.entries.back().is_some_and(|last| last.same_source(&track)) {
            return false;
        }
        self.entries.push_back(track);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        true
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Track> {
        self.entries.iter().cloned().collect()
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn track(n: usize) -> Track {
        Track::new(format!("Song {}", n), format!("url-{}", n))
    }

    #[test]
    fn test_consecutive_duplicate_is_dropped() {
        let mut log = HistoryLog::default();
        assert!(log.append(track(1)));
        assert!(!log.append(track(1)));
        assert!(log.append(track(2)));
        assert!(log.append(track(1)), "non-adjacent repeat is allowed");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_oversized_limit_is_capped() {
        let mut log = HistoryLog::new(500);
        for n in 0..300 {
            log.append(track(n));
        }
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.get(0).unwrap().url, "url-200");
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let mut log = HistoryLog::default();
        for n in 0..130 {
            log.append(track(n));
        }
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.get(0).unwrap().url, "url-30");
        assert_eq!(log.iter().last().unwrap().url, "url-129");
    }

    #[test]
    fn test_random_appends_keep_invariants() {
        let mut rng = rand::thread_rng();
        let mut log = HistoryLog::default();

        for _ in 0..2000 {
            log.append(track(rng.gen_range(0..4)));

            assert!(log.len() <= HISTORY_LIMIT);
            let entries = log.to_vec();
            assert!(entries.windows(2).all(|pair| pair[0].url != pair[1].url));
        }
    }

    #[test]
    fn test_loaded_entries_are_normalized() {
        let stored: Vec<Track> = vec![track(1), track(1), track(2)]
            .into_iter()
            .chain((0..200).map(track))
            .collect();
        let log = HistoryLog::from_entries(stored, 100);
        assert_eq!(log.len(), 100);
        assert_eq!(log.get(0).unwrap().url, "url-100");
    }
}
