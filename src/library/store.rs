// JSON persistence for history and favorites
// Each list is one JSON array on disk, rewritten whole through a temp file + rename

use crate::audio::Track;
use crate::error::{StreamError, StreamResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const HISTORY_FILE: &str = "history.json";
const FAVORITES_FILE: &str = "favorites.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.dir.join(FAVORITES_FILE)
    }

    pub fn load_history(&self) -> Vec<Track> {
        Self::load(&self.history_path())
    }

    pub fn load_favorites(&self) -> Vec<Track> {
        Self::load(&self.favorites_path())
    }

    pub fn save_history(&self, tracks: &[Track]) -> StreamResult<()> {
        self.save(&self.history_path(), tracks)
    }

    pub fn save_favorites(&self, tracks: &[Track]) -> StreamResult<()> {
        self.save(&self.favorites_path(), tracks)
    }

    /// Missing or unreadable files load as an empty list
    fn load(path: &Path) -> Vec<Track> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("Ignoring corrupt {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, path: &Path, tracks: &[Track]) -> StreamResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StreamError::persistence(&self.dir, e))?;

        let json = serde_json::to_string_pretty(tracks)
            .map_err(|e| StreamError::persistence(path, e))?;

        // Same directory so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| StreamError::persistence(path, e))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| StreamError::persistence(path, e))?;
        temp.persist(path)
            .map_err(|e| StreamError::persistence(path, e.error))?;

        debug!("Saved {} entries to {}", tracks.len(), path.display());
        Ok(())
    }
}
