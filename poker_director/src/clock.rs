//! Level clock with explicit time inputs.
//!
//! The clock never reads the wall clock itself. Callers pass the current
//! time in Unix milliseconds to [`TournamentClock::start`] and
//! [`TournamentClock::tick`], which keeps simulations deterministic.

use serde::{Deserialize, Serialize};

/// Counts down the time left in the current blind level.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TournamentClock {
    millis_remaining: i64,
    running: bool,
    /// When the running clock was last ticked.
    tick_begin: i64,
}

impl TournamentClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            millis_remaining: 0,
            running: false,
            tick_begin: 0,
        }
    }

    pub fn set_seconds_remaining(&mut self, seconds: u32, now_millis: i64) {
        self.set_millis_remaining(i64::from(seconds) * 1000, now_millis);
    }

    pub fn set_millis_remaining(&mut self, millis: i64, now_millis: i64) {
        self.millis_remaining = millis.max(0);
        self.tick_begin = now_millis;
    }

    #[must_use]
    pub const fn millis_remaining(&self) -> i64 {
        self.millis_remaining
    }

    #[must_use]
    pub const fn seconds_remaining(&self) -> i64 {
        self.millis_remaining / 1000
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.millis_remaining <= 0
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Starts counting down from `now_millis`. Starting a running clock is
    /// a no-op.
    pub fn start(&mut self, now_millis: i64) {
        if !self.running {
            self.running = true;
            self.tick_begin = now_millis;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the clock and rewinds it to a full level.
    pub fn reset(&mut self, seconds: u32, now_millis: i64) {
        self.stop();
        self.set_seconds_remaining(seconds, now_millis);
    }

    /// Consumes the time elapsed since the previous tick. The clock stops
    /// on its own once it expires.
    pub fn tick(&mut self, now_millis: i64) {
        if !self.running {
            return;
        }
        let elapsed = (now_millis - self.tick_begin).max(0);
        self.tick_begin = now_millis;
        self.millis_remaining = (self.millis_remaining - elapsed).max(0);
        if self.millis_remaining == 0 {
            self.running = false;
        }
    }

    /// Removes a fixed amount of time, running or not. Practice games move
    /// the clock this way, one player action at a time.
    pub fn advance(&mut self, millis: i64) {
        self.millis_remaining = (self.millis_remaining - millis.max(0)).max(0);
    }
}
