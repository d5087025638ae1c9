use std::cmp::max;
use std::time::Duration;

/// Tick interval at the start of a game, in ms.
pub const INITIAL_SPEED: u64 = 150;
/// How much each food shortens the interval.
pub const SPEED_INCREASE: u64 = 5;
/// Fastest interval reachable.
pub const MAX_SPEED: u64 = 50;

pub fn on_food_eaten(current_interval: u64) -> u64 {
    max(MAX_SPEED, current_interval.saturating_sub(SPEED_INCREASE))
}

pub fn level_for(current_interval: u64) -> u32 {
    (INITIAL_SPEED.saturating_sub(current_interval) / SPEED_INCREASE) as u32 + 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedState {
    interval_ms: u64,
}

impl Default for SpeedState {
    fn default() -> Self {
        SpeedState { interval_ms: INITIAL_SPEED }
    }
}

impl SpeedState {
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn level(&self) -> u32 {
        level_for(self.interval_ms)
    }

    pub fn food_eaten(&mut self) {
        self.interval_ms = on_food_eaten(self.interval_ms);
    }

    pub fn reset(&mut self) {
        *self = SpeedState::default();
    }
}
