//! State shared between the tick interrupt and the foreground loop.
//!
//! The firmware keeps one [`Session`] as an RTIC shared resource; every
//! access from either side goes through [`rtic_core::Mutex::lock`], so a
//! tick can never land in the middle of a counter read.

use crate::clock::GameClock;
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameState {
    AwaitingStart,
    Playing,
    /// Absorbing: only an external reset leaves it.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Tick arrived outside a running round and was ignored.
    Idle,
    Running,
    /// This tick ended the round.
    Expired,
}

/// Copy of the shared state taken under one lock, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub state: GameState,
    pub elapsed_ticks: u32,
    pub appear_ticks: u32,
    pub hits: u32,
    pub remaining_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    clock: GameClock,
    hits: u32,
    state: GameState,
    duration_secs: u32,
}

impl Session {
    pub const fn new(config: &GameConfig) -> Self {
        Self {
            clock: GameClock::new(),
            hits: 0,
            state: GameState::AwaitingStart,
            duration_secs: config.duration_secs,
        }
    }

    /// Tick callback body. Counts only while a round is running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Idle;
        }
        self.clock.tick();
        trace!("tick {}", self.clock.elapsed_ticks());
        if self.clock.expired(self.duration_secs) {
            self.state = GameState::GameOver;
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    pub(crate) fn begin(&mut self) {
        if self.state == GameState::AwaitingStart {
            self.state = GameState::Playing;
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            elapsed_ticks: self.clock.elapsed_ticks(),
            appear_ticks: self.clock.appear_ticks(),
            hits: self.hits,
            remaining_secs: self.clock.remaining(self.duration_secs),
        }
    }
}
