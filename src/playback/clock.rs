use super::state::SharedState;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Progress clock for the display. Has no say in how playback ends.
#[derive(Debug, Clone, Copy)]
pub struct ElapsedClock {
    interval: Duration,
    step: u64, // seconds credited per tick
}

impl ElapsedClock {
    /// Whole-second intervals only; the config rejects anything else
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            step: interval.as_secs().max(1),
        }
    }

    /// Tick on `interval` but credit `step` seconds each time
    pub fn with_step(interval: Duration, step: u64) -> Self {
        Self { interval, step }
    }

    pub async fn run(self, state: SharedState) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !state.tick(self.step) {
                        break;
                    }
                }
                _ = state.ended() => break,
            }
        }

        debug!("Elapsed clock stopped at {}s", state.snapshot().elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::state::PlaybackStatus;

    #[tokio::test]
    async fn test_clock_counts_while_playing_and_stops_when_ended() {
        let state = SharedState::new();
        state.begin(None);

        let clock = ElapsedClock::with_step(Duration::from_millis(10), 1);
        let handle = tokio::spawn(clock.run(state.clone()));

        tokio::time::sleep(Duration::from_millis(60)).await;
        state.update(|s| s.status = PlaybackStatus::Paused);
        let frozen = state.snapshot().elapsed;
        assert!(frozen >= 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(state.snapshot().elapsed, frozen);

        state.finish();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("clock should stop within one interval")
            .unwrap();
    }

    #[tokio::test]
    async fn test_finish_stops_clock_before_next_tick() {
        let state = SharedState::new();
        state.begin(None);

        let clock = ElapsedClock::new(Duration::from_secs(10));
        let handle = tokio::spawn(clock.run(state.clone()));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let asked = std::time::Instant::now();
        state.finish();
        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("finish must wake a clock mid-interval")
            .unwrap();
        assert!(asked.elapsed() < Duration::from_millis(500));
        assert_eq!(state.snapshot().elapsed, 0);
    }

    #[test]
    fn test_default_step_matches_interval() {
        assert_eq!(ElapsedClock::new(Duration::from_secs(1)).step, 1);
        assert_eq!(ElapsedClock::new(Duration::from_secs(3)).step, 3);
    }
}
