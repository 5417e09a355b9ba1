use super::input::SharedKeys;
use super::runner::{run_session, PlaybackEnd, PlaybackOutcome, RunnerSettings};
use super::traversal::{Advance, Traversal};
use super::PlaybackUi;
use crate::audio::{Player, Track};
use crate::error::{StreamError, StreamResult};
use crate::library::{HistorySink, Playlist};
use crate::resolver::Resolver;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Resolving,
    Playing,
    Advancing,
    Skipped,
    /// Ran out of tracks
    Ended,
    /// User asked to stop the whole traversal
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalReport {
    pub final_state: EngineState,
    pub played: usize,
    pub failed: usize,
}

/// History write + next state for a finished session.
/// A skip or quit only counts as a play once the clock had started.
pub fn settle(outcome: &PlaybackOutcome) -> (bool, EngineState) {
    match outcome.end {
        PlaybackEnd::Finished => (true, EngineState::Advancing),
        PlaybackEnd::Skipped => (outcome.started, EngineState::Skipped),
        PlaybackEnd::Quit => (outcome.started, EngineState::Quit),
    }
}

fn transition(state: &mut EngineState, next: EngineState) {
    debug!("Engine {:?} -> {:?}", state, next);
    *state = next;
}

pub struct PlaylistEngine<'a, R, P> {
    resolver: &'a R,
    player: &'a P,
    keys: SharedKeys,
    ui: Arc<dyn PlaybackUi>,
    settings: RunnerSettings,
}

impl<'a, R: Resolver, P: Player> PlaylistEngine<'a, R, P> {
    pub fn new(
        resolver: &'a R,
        player: &'a P,
        keys: SharedKeys,
        ui: Arc<dyn PlaybackUi>,
        settings: RunnerSettings,
    ) -> Self {
        Self {
            resolver,
            player,
            keys,
            ui,
            settings,
        }
    }

    /// Walk the playlist until it runs out or the user quits
    pub async fn play(
        &self,
        playlist: &Playlist,
        history: &mut dyn HistorySink,
    ) -> TraversalReport {
        let tracks = playlist.tracks();
        let mut traversal = Traversal::new(tracks.len(), playlist.shuffle, playlist.repeat);
        let mut state = EngineState::Idle;
        let mut played = 0;
        let mut failed = 0;
        let mut played_this_pass = false;

        info!(
            "Starting traversal of {} tracks (shuffle={}, repeat={})",
            tracks.len(),
            playlist.shuffle,
            playlist.repeat
        );

        loop {
            let Some(index) = traversal.current() else {
                transition(&mut state, EngineState::Ended);
                break;
            };
            let track = &tracks[index];

            transition(&mut state, EngineState::Resolving);
            let position = (traversal.position() + 1, tracks.len());

            match self.play_track(track, position, &mut state).await {
                Ok((shown, outcome)) => {
                    played += 1;
                    played_this_pass = true;
                    self.ui.finished(&shown, &outcome);

                    let (record, next) = settle(&outcome);
                    if record {
                        history.record(&shown);
                    }
                    transition(&mut state, next);
                    if next == EngineState::Quit {
                        break;
                    }
                }
                Err(e) => {
                    failed += 1;
                    match &e {
                        StreamError::Spawn(_) => error!("Could not start '{}': {}", track.title, e),
                        _ => warn!("Skipping '{}': {}", track.title, e),
                    }
                    self.ui.notice(&format!("Skipping '{}': {}", track.title, e));
                }
            }

            transition(&mut state, EngineState::Advancing);
            match traversal.advance() {
                Advance::Next => {}
                Advance::Wrapped => {
                    // A full repeat pass with nothing playable would spin forever
                    if !played_this_pass {
                        self.ui.notice("Nothing in this playlist could be played");
                        transition(&mut state, EngineState::Ended);
                        break;
                    }
                    played_this_pass = false;
                }
                Advance::Exhausted => {
                    transition(&mut state, EngineState::Ended);
                    break;
                }
            }
        }

        info!(
            "Traversal over: {:?}, played {}, failed {}",
            state, played, failed
        );
        TraversalReport {
            final_state: state,
            played,
            failed,
        }
    }

    async fn play_track(
        &self,
        track: &Track,
        (position, total): (usize, usize),
        state: &mut EngineState,
    ) -> StreamResult<(Track, PlaybackOutcome)> {
        let stream = self.resolver.resolve_stream(&track.url).await?;
        debug!("Resolved '{}' to '{}'", track.title, stream.title);

        // Keep the resolved length around for the progress bar
        let shown = match track.duration {
            Some(_) => track.clone(),
            None => track.clone().with_duration(stream.duration),
        };

        self.ui.now_playing(&shown, stream.artist.as_deref(), position, total);
        let session = self.player.start(&stream.stream_url)?;
        transition(state, EngineState::Playing);
        info!("Playing '{}'", shown.title);

        let outcome = run_session(session, &shown, &self.keys, &self.ui, &self.settings).await;
        Ok((shown, outcome))
    }
}
