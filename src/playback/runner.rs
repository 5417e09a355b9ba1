use super::clock::ElapsedClock;
use super::input::{run_shared_listener, SharedKeys};
use super::state::{PendingAction, SharedState};
use super::PlaybackUi;
use crate::audio::{PlaybackSession, SessionOutcome, Track};
use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct RunnerSettings {
    pub tick_interval: Duration,
    pub clock_step: u64,
    pub input_poll: Duration,
    pub render_interval: Duration,
    pub volume_step: i32,
}

impl RunnerSettings {
    pub fn from_config(config: &Config) -> Self {
        let tick_interval = config.playback.tick_interval();
        Self {
            tick_interval,
            clock_step: tick_interval.as_secs().max(1),
            input_poll: config.playback.input_poll(),
            render_interval: config.playback.render_interval(),
            volume_step: config.player.volume_step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished,
    Skipped,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackOutcome {
    pub end: PlaybackEnd,
    pub started: bool,
    pub elapsed: u64,
    pub session: SessionOutcome,
}

/// Drive one session to completion.
///
/// Process wait, clock, key listener and renderer start together against a fresh
/// snapshot; all of them are joined before the final snapshot is read.
pub async fn run_session<S: PlaybackSession + 'static>(
    session: S,
    track: &Track,
    keys: &SharedKeys,
    ui: &Arc<dyn PlaybackUi>,
    settings: &RunnerSettings,
) -> PlaybackOutcome {
    let state = SharedState::new();
    let control = session.control();
    state.begin(control.volume());

    let clock = tokio::spawn(
        ElapsedClock::with_step(settings.tick_interval, settings.clock_step).run(state.clone()),
    );

    let listener = {
        let keys = keys.clone();
        let state = state.clone();
        let control = control.clone();
        let poll = settings.input_poll;
        let step = settings.volume_step;
        tokio::task::spawn_blocking(move || {
            run_shared_listener(&keys, &state, control.as_ref(), poll, step)
        })
    };

    let renderer = {
        let ui = ui.clone();
        let state = state.clone();
        let track = track.clone();
        let every = settings.render_interval;
        tokio::spawn(async move {
            loop {
                let snapshot = state.snapshot();
                ui.progress(&track, &snapshot);
                if !snapshot.status.is_active() {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(every) => {}
                    _ = state.ended() => {}
                }
            }
        })
    };

    let session_outcome = session.wait().await;
    state.finish();

    for (name, joined) in [
        ("clock", clock.await),
        ("listener", listener.await),
        ("renderer", renderer.await),
    ] {
        if let Err(e) = joined {
            warn!("Playback {} task failed: {}", name, e);
        }
    }

    let end = match state.take_terminal_action() {
        PendingAction::Quit => PlaybackEnd::Quit,
        PendingAction::Skip => PlaybackEnd::Skipped,
        _ => PlaybackEnd::Finished,
    };
    let snapshot = state.snapshot();
    debug!(
        "Session for '{}' over: {:?} after {}s ({:?})",
        track.title, end, snapshot.elapsed, session_outcome
    );

    PlaybackOutcome {
        end,
        started: snapshot.started,
        elapsed: snapshot.elapsed,
        session: session_outcome,
    }
}
