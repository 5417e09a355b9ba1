//! The one piece of state that crosses threads during playback.
//!
//! The clock, the input listener, the process waiter and the renderer all go through
//! [`SharedState`], which keeps the whole [`StateSnapshot`] behind a single mutex so every
//! read and write is linearizable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Ended,
}

impl PlaybackStatus {
    /// Playing or Paused - the clock and listener keep running while this holds
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackStatus::Playing | PlaybackStatus::Paused)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Ended => write!(f, "ended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    Skip,
    Quit,
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub status: PlaybackStatus,
    pub elapsed: u64, // seconds
    pub pending: PendingAction,
    pub message: String,
    /// Set once the clock has credited playing time
    pub started: bool,
    pub volume: Option<u32>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            elapsed: 0,
            pending: PendingAction::None,
            message: String::new(),
            started: false,
            volume: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Mutex<StateSnapshot>>,
    ended: Arc<Notify>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicked writer leaves the snapshot consistent enough to keep reading
    fn lock(&self) -> MutexGuard<'_, StateSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the snapshot
    pub fn update<R>(&self, f: impl FnOnce(&mut StateSnapshot) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.lock().clone()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.lock().status
    }

    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    pub fn begin(&self, volume: Option<u32>) {
        self.update(|state| {
            state.status = PlaybackStatus::Playing;
            state.volume = volume;
        });
    }

    /// Credit `step` seconds if playing. Returns false once the session is over.
    pub fn tick(&self, step: u64) -> bool {
        self.update(|state| match state.status {
            PlaybackStatus::Playing => {
                state.elapsed += step;
                state.started = true;
                true
            }
            PlaybackStatus::Paused => true,
            PlaybackStatus::Idle | PlaybackStatus::Ended => false,
        })
    }

    pub fn finish(&self) {
        self.update(|state| state.status = PlaybackStatus::Ended);
        self.ended.notify_waiters();
    }

    /// Resolves once `finish` has been called. Any number of tasks may wait.
    pub async fn ended(&self) {
        let notified = self.ended.notified();
        tokio::pin!(notified);
        // Registered before the status check, so a finish in between still wakes us
        notified.as_mut().enable();
        if self.status() == PlaybackStatus::Ended {
            return;
        }
        notified.await;
    }

    /// Consume a Skip/Quit left by the listener; volume actions are not touched
    pub fn take_terminal_action(&self) -> PendingAction {
        self.update(|state| match state.pending {
            PendingAction::Skip | PendingAction::Quit => std::mem::take(&mut state.pending),
            _ => PendingAction::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_clock_does_not_advance() {
        let state = SharedState::new();
        state.begin(Some(70));

        assert!(state.tick(1));
        state.update(|s| s.status = PlaybackStatus::Paused);
        assert!(state.tick(1));
        assert!(state.tick(1));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.elapsed, 1);
        assert!(snapshot.started);
    }

    #[test]
    fn test_tick_reports_terminal_status() {
        let state = SharedState::new();
        assert!(!state.tick(1), "idle session is not running");

        state.begin(None);
        state.finish();
        assert!(!state.tick(1));
        assert_eq!(state.snapshot().elapsed, 0);
        assert!(!state.snapshot().started);
    }

    #[tokio::test]
    async fn test_ended_wakes_after_finish() {
        let state = SharedState::new();
        state.begin(None);

        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move { state.ended().await })
            })
            .collect();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(waiters.iter().all(|w| !w.is_finished()));

        state.finish();
        for waiter in waiters {
            tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
                .await
                .expect("finish must wake every waiter")
                .unwrap();
        }
        // Already ended: returns immediately
        state.ended().await;
    }

    #[test]
    fn test_terminal_action_is_consumed_once() {
        let state = SharedState::new();
        state.update(|s| s.pending = PendingAction::Skip);

        assert_eq!(state.take_terminal_action(), PendingAction::Skip);
        assert_eq!(state.take_terminal_action(), PendingAction::None);
        assert_eq!(state.snapshot().pending, PendingAction::None);
    }

    #[test]
    fn test_volume_action_is_left_for_volume_path() {
        let state = SharedState::new();
        state.update(|s| s.pending = PendingAction::VolumeUp);

        assert_eq!(state.take_terminal_action(), PendingAction::None);
        assert_eq!(state.snapshot().pending, PendingAction::VolumeUp);
    }
}
