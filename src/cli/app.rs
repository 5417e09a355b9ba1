use super::command::{Command, HELP};
use crate::audio::{MpvPlayer, Player, Track};
use crate::config::Config;
use crate::library::{JsonStore, Library, Playlist};
use crate::playback::{
    shared_keys, EngineState, PlaybackUi, PlaylistEngine, RunnerSettings, SharedKeys,
    TraversalReport,
};
use crate::resolver::{Resolver, YoutubeResolver};
use crate::ui::{print_tracks, TerminalKeys, TerminalUi};
use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interactive command loop. Owns the playlist and library; playback borrows them
/// only for the length of one traversal.
pub struct App<R = YoutubeResolver, P = MpvPlayer> {
    config: Config,
    resolver: R,
    player: P,
    keys: SharedKeys,
    ui: Arc<dyn PlaybackUi>,
    settings: RunnerSettings,
    playlist: Playlist,
    library: Library,
}

impl App {
    pub fn new(config: Config) -> Self {
        let resolver = YoutubeResolver::new(&config.resolver);
        let player = MpvPlayer::new(config.player.clone());
        let library = Library::open(
            JsonStore::new(&config.storage.data_dir),
            config.storage.history_limit,
        );
        let ui = Arc::new(TerminalUi::new(config.playback.fallback_duration_secs));

        Self::with_parts(
            config,
            resolver,
            player,
            shared_keys(TerminalKeys::new()),
            ui,
            library,
        )
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("\n🎶 Welcome to StreamTune!");
        println!("Type a song name to play it, 'help' for commands, 'q' to quit");

        loop {
            let Some(line) = read_line("\n🎧 > ").await? else {
                // stdin closed
                break;
            };
            if self.execute(Command::parse(&line)).await == Flow::Exit {
                break;
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

impl<R: Resolver, P: Player> App<R, P> {
    pub fn with_parts(
        config: Config,
        resolver: R,
        player: P,
        keys: SharedKeys,
        ui: Arc<dyn PlaybackUi>,
        library: Library,
    ) -> Self {
        let settings = RunnerSettings::from_config(&config);
        let playlist = Playlist::new(config.playback.shuffle, config.playback.repeat);
        Self {
            config,
            resolver,
            player,
            keys,
            ui,
            settings,
            playlist,
            library,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Empty => {}
            Command::Quit => return Flow::Exit,
            Command::Help => println!("{}", HELP),
            Command::Usage(usage) => println!("Usage: {}", usage),

            Command::Search(query) => self.search_and_play(&query).await,
            Command::Radio(Some(query)) => self.radio(&query).await,
            Command::Radio(None) => match read_line("Enter a search term for radio: ").await {
                Ok(Some(query)) if !query.trim().is_empty() => self.radio(query.trim()).await,
                Ok(_) => println!("Radio needs a search term"),
                Err(e) => warn!("Could not read radio query: {}", e),
            },

            Command::ShowPlaylist => self.show_playlist(),
            Command::PlayAll => {
                if self.playlist.is_empty() {
                    println!("Playlist is empty. Search for a song to add one.");
                } else {
                    let playlist = self.playlist.clone();
                    self.play(&playlist).await;
                }
            }
            Command::Remove(raw) => match self.playlist.remove(&raw) {
                Ok(track) => println!("Removed '{}' from the playlist", track.title),
                Err(e) => println!("❌ {}", e),
            },
            Command::Clear => {
                self.playlist.clear();
                println!("Playlist cleared");
            }
            Command::ToggleShuffle => {
                let on = self.playlist.toggle_shuffle();
                println!("Shuffle {}", if on { "on" } else { "off" });
            }
            Command::ToggleRepeat => {
                let on = self.playlist.toggle_repeat();
                println!("Repeat {}", if on { "on" } else { "off" });
            }

            Command::History => print_tracks("History", &self.library.history().to_vec()),
            Command::Favorites => print_tracks("Favorites", self.library.favorites().entries()),
            Command::Favorite(raw) => match self.library.favorite_from_history(&raw) {
                Ok((track, true)) => println!("⭐ Added '{}' to favorites", track.title),
                Ok((track, false)) => println!("'{}' is already a favorite", track.title),
                Err(e) => println!("❌ {}", e),
            },
            Command::Unfavorite(raw) => match self.library.remove_favorite(&raw) {
                Ok(track) => println!("Removed '{}' from favorites", track.title),
                Err(e) => println!("❌ {}", e),
            },
            Command::PlayFavorite(raw) => match self.library.favorite(&raw) {
                Ok(track) => {
                    self.play(&Playlist::single(track)).await;
                }
                Err(e) => println!("❌ {}", e),
            },
            Command::ClearHistory => {
                self.library.clear_history();
                println!("History cleared");
            }
            Command::ClearFavorites => {
                self.library.clear_favorites();
                println!("Favorites cleared");
            }
        }

        Flow::Continue
    }

    async fn search_and_play(&mut self, query: &str) {
        let top = match self.search(query, self.config.resolver.search_results).await {
            Some(mut hits) => hits.remove(0),
            None => return,
        };

        if self.playlist.add(top.clone()) {
            println!("Added '{}' to the playlist", top.title);
        }
        self.play(&Playlist::single(top)).await;
    }

    async fn radio(&mut self, query: &str) {
        let Some(hits) = self.search(query, self.config.resolver.radio_results).await else {
            return;
        };

        println!("📻 Radio: {} tracks for '{}'", hits.len(), query);
        let station = Playlist::from_tracks(hits, self.playlist.shuffle, self.playlist.repeat);
        self.play(&station).await;
    }

    /// Non-empty hits, or `None` after telling the user why not
    async fn search(&self, query: &str, max_results: usize) -> Option<Vec<Track>> {
        println!("🔍 Searching for '{}'...", query);
        match self.resolver.search(query, max_results).await {
            Ok(hits) if !hits.is_empty() => Some(hits),
            Ok(_) => {
                println!("No track found. Try a different search term.");
                None
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                println!("❌ {}", e);
                None
            }
        }
    }

    async fn play(&mut self, playlist: &Playlist) -> TraversalReport {
        let engine = PlaylistEngine::new(
            &self.resolver,
            &self.player,
            self.keys.clone(),
            self.ui.clone(),
            self.settings,
        );
        let report = engine.play(playlist, &mut self.library).await;

        if report.final_state == EngineState::Quit {
            println!("⏹ Playback stopped");
        }
        info!(
            "Traversal finished: played {}, failed {}",
            report.played, report.failed
        );
        report
    }

    fn show_playlist(&self) {
        print_tracks("Playlist", self.playlist.tracks());
        if !self.playlist.is_empty() {
            println!(
                "Total: {}  shuffle: {}  repeat: {}",
                self.playlist.duration_string(),
                on_off(self.playlist.shuffle),
                on_off(self.playlist.repeat)
            );
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Blocking stdin read off the runtime threads. `None` at end of input.
async fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .map(|read| (read > 0).then_some(line))
    })
    .await??;
    Ok(line)
}
