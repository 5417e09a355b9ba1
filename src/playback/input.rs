// Keyboard side of a playback session.
// Keys become typed actions; apply_action is the only place actions touch state.

use super::state::{PendingAction, PlaybackStatus, SharedState};
use crate::audio::SessionControl;
use crate::error::StreamResult;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    TogglePause,
    Next,
    Quit,
    VolumeUp,
    VolumeDown,
}

/// Where actions come from. Must return within `timeout`.
pub trait KeySource: Send {
    fn poll_action(&mut self, timeout: Duration) -> StreamResult<Option<ControlAction>>;

    /// Called before the first poll of a session (raw mode etc.)
    fn begin(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn end(&mut self) {}
}

pub type SharedKeys = Arc<Mutex<Box<dyn KeySource>>>;

pub fn shared_keys(source: impl KeySource + 'static) -> SharedKeys {
    Arc::new(Mutex::new(Box::new(source)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFlow {
    Continue,
    Stop,
}

pub fn apply_action(
    state: &SharedState,
    control: &dyn SessionControl,
    action: ControlAction,
    volume_step: i32,
) -> ListenerFlow {
    match action {
        ControlAction::TogglePause => {
            // Signal and status change under one lock so rapid toggles can't interleave
            state.update(|s| match s.status {
                PlaybackStatus::Paused => match control.resume() {
                    Ok(()) => {
                        s.status = PlaybackStatus::Playing;
                        s.message = "Resumed".to_string();
                    }
                    Err(e) => s.message = format!("Resume failed: {}", e),
                },
                PlaybackStatus::Playing => match control.pause() {
                    Ok(()) => {
                        s.status = PlaybackStatus::Paused;
                        s.message = "Paused".to_string();
                    }
                    Err(e) => s.message = format!("Pause failed: {}", e),
                },
                PlaybackStatus::Idle | PlaybackStatus::Ended => {}
            });
            ListenerFlow::Continue
        }
        ControlAction::Next | ControlAction::Quit => {
            let (pending, message) = if action == ControlAction::Quit {
                (PendingAction::Quit, "Stopping playback")
            } else {
                (PendingAction::Skip, "Skipping")
            };
            state.update(|s| {
                // Quit outranks a skip that hasn't been consumed yet
                if s.pending != PendingAction::Quit {
                    s.pending = pending;
                }
                s.message = message.to_string();
            });
            control.terminate();
            ListenerFlow::Stop
        }
        ControlAction::VolumeUp | ControlAction::VolumeDown => {
            let (pending, delta) = if action == ControlAction::VolumeUp {
                (PendingAction::VolumeUp, volume_step)
            } else {
                (PendingAction::VolumeDown, -volume_step)
            };
            state.update(|s| s.pending = pending);
            // IPC round trip; the renderer keeps reading meanwhile
            let adjusted = control.adjust_volume(delta);
            state.update(|s| {
                match adjusted {
                    Some(volume) => {
                        s.volume = Some(volume);
                        s.message = format!("Volume: {}%", volume);
                    }
                    None => s.message = "Volume control unavailable".to_string(),
                }
                s.pending = PendingAction::None;
            });
            ListenerFlow::Continue
        }
    }
}

/// Blocking loop; run it on a blocking task. Exits within one poll interval of the
/// session leaving Playing/Paused, or right after a Next/Quit.
pub fn run_listener(
    keys: &mut dyn KeySource,
    state: &SharedState,
    control: &dyn SessionControl,
    poll: Duration,
    volume_step: i32,
) {
    if let Err(e) = keys.begin() {
        warn!("Key input unavailable for this track: {}", e);
        return;
    }

    while state.is_active() {
        match keys.poll_action(poll) {
            Ok(Some(action)) => {
                debug!("Key action: {:?}", action);
                if apply_action(state, control, action, volume_step) == ListenerFlow::Stop {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Key polling failed: {}", e);
                std::thread::sleep(poll);
            }
        }
    }

    keys.end();
}

/// Listener entry point for the shared source held by the engine
pub fn run_shared_listener(
    keys: &SharedKeys,
    state: &SharedState,
    control: &dyn SessionControl,
    poll: Duration,
    volume_step: i32,
) {
    let mut guard = keys.lock().unwrap_or_else(PoisonError::into_inner);
    run_listener(guard.as_mut(), state, control, poll, volume_step);
}
