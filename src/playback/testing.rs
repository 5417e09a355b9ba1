//! In-memory stand-ins for the resolver, the audio process and the keyboard,
//! so whole traversals run in tests without network or child processes.

use super::input::{ControlAction, KeySource};
use super::runner::{PlaybackOutcome, RunnerSettings};
use super::state::StateSnapshot;
use super::PlaybackUi;
use crate::audio::{PlaybackSession, Player, SessionControl, SessionOutcome, Track};
use crate::error::{StreamError, StreamResult};
use crate::library::HistorySink;
use crate::resolver::{ResolvedStream, Resolver};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
pub struct FakeResolver {
    pub failing: HashSet<String>,
    pub results: Vec<Track>,
    pub artist: Option<String>,
}

impl FakeResolver {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_results(results: Vec<Track>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }
}

impl Resolver for FakeResolver {
    async fn search(&self, query: &str, max_results: usize) -> StreamResult<Vec<Track>> {
        if self.results.is_empty() {
            return Err(StreamError::resolution(query, "no results found"));
        }
        Ok(self.results.iter().take(max_results).cloned().collect())
    }

    async fn resolve_stream(&self, url: &str) -> StreamResult<ResolvedStream> {
        if self.failing.contains(url) {
            return Err(StreamError::resolution(url, "video unavailable"));
        }
        Ok(ResolvedStream {
            stream_url: url.to_string(),
            title: url.to_string(),
            duration: Some(180),
            artist: self.artist.clone(),
        })
    }
}

#[derive(Default)]
pub struct FakeSessionControl {
    terminated: AtomicBool,
    notify: Notify,
}

impl SessionControl for FakeSessionControl {
    fn pause(&self) -> StreamResult<()> {
        Ok(())
    }

    fn resume(&self) -> StreamResult<()> {
        Ok(())
    }

    fn adjust_volume(&self, _delta: i32) -> Option<u32> {
        None
    }

    fn volume(&self) -> Option<u32> {
        None
    }

    fn terminate(&self) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            self.notify.notify_one();
        }
    }
}

/// Ends by itself after `length` unless terminated first
pub struct FakeSession {
    pub control: Arc<FakeSessionControl>,
    pub length: Duration,
}

impl FakeSession {
    pub fn new(length: Duration) -> Self {
        Self {
            control: Arc::new(FakeSessionControl::default()),
            length,
        }
    }
}

impl PlaybackSession for FakeSession {
    fn control(&self) -> Arc<dyn SessionControl> {
        self.control.clone()
    }

    async fn wait(self) -> SessionOutcome {
        tokio::select! {
            _ = tokio::time::sleep(self.length) => SessionOutcome::NaturalEnd,
            _ = self.control.notify.notified() => SessionOutcome::Terminated,
        }
    }
}

pub struct FakePlayer {
    pub unspawnable: HashSet<String>,
    pub length: Duration,
    started: Mutex<Vec<String>>,
}

impl FakePlayer {
    pub fn new(length: Duration) -> Self {
        Self {
            unspawnable: HashSet::new(),
            length,
            started: Mutex::new(Vec::new()),
        }
    }

    /// Stream URLs in the order sessions were started
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl Player for FakePlayer {
    type Session = FakeSession;

    fn start(&self, stream_url: &str) -> StreamResult<FakeSession> {
        if self.unspawnable.contains(stream_url) {
            return Err(StreamError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no player",
            )));
        }
        self.started.lock().unwrap().push(stream_url.to_string());
        Ok(FakeSession::new(self.length))
    }
}

/// One key script per session, picked up in `begin`. `None` slots are idle polls.
pub struct SessionKeys {
    sessions: VecDeque<Vec<Option<ControlAction>>>,
    current: VecDeque<Option<ControlAction>>,
}

impl SessionKeys {
    pub fn new(sessions: Vec<Vec<Option<ControlAction>>>) -> Self {
        Self {
            sessions: sessions.into(),
            current: VecDeque::new(),
        }
    }

    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl KeySource for SessionKeys {
    fn poll_action(&mut self, timeout: Duration) -> StreamResult<Option<ControlAction>> {
        match self.current.pop_front() {
            Some(Some(action)) => Ok(Some(action)),
            _ => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }

    fn begin(&mut self) -> StreamResult<()> {
        self.current = self.sessions.pop_front().unwrap_or_default().into();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingUi {
    /// (title, artist, position, total) per announced track
    pub now_playing: Mutex<Vec<(String, Option<String>, usize, usize)>>,
    pub notices: Mutex<Vec<String>>,
    pub frames: Mutex<Vec<StateSnapshot>>,
}

impl PlaybackUi for RecordingUi {
    fn now_playing(&self, track: &Track, artist: Option<&str>, position: usize, total: usize) {
        self.now_playing.lock().unwrap().push((
            track.title.clone(),
            artist.map(str::to_string),
            position,
            total,
        ));
    }

    fn progress(&self, _track: &Track, snapshot: &StateSnapshot) {
        self.frames.lock().unwrap().push(snapshot.clone());
    }

    fn finished(&self, _track: &Track, _outcome: &PlaybackOutcome) {}

    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

impl HistorySink for Vec<Track> {
    fn record(&mut self, track: &Track) {
        self.push(track.clone());
    }
}

/// Fast polling; `tick` decides whether the clock ever credits time
pub fn settings(tick: Duration) -> RunnerSettings {
    RunnerSettings {
        tick_interval: tick,
        clock_step: 1,
        input_poll: Duration::from_millis(5),
        render_interval: Duration::from_millis(5),
        volume_step: 5,
    }
}
