//! Whac-a-mole for a five-button board with a Nokia 5110 LCD.
//!
//! A 1 Hz timer interrupt counts the round down while the foreground loop
//! redraws the screen, samples the buttons and moves the mole. The pieces:
//!
//! - [`session`]: state shared with the tick interrupt (counters, score, state)
//! - [`input`]: active-low buttons, lowest index wins, one report per press
//! - [`mole`]: slot selection that never repeats the previous slot
//! - [`game`]: title, play loop and game-over lifecycle
//! - [`render`], [`surface`], [`display`], [`pcd8544`]: frames down to the glass
//!
//! Everything here is hardware-agnostic; the RP2040 wiring lives in the
//! firmware binary.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod display;
pub mod game;
pub mod input;
pub mod mole;
pub mod pcd8544;
pub mod render;
pub mod session;
pub mod surface;

pub use clock::GameClock;
pub use config::{Error, GameConfig, TickConfig};
pub use game::{Game, GameError, RoundMole, Step};
pub use input::{Buttons, Hold};
pub use mole::{Mole, Strike};
pub use session::{GameState, Session, Snapshot, TickOutcome};
pub use surface::{Lcd, Panel, Surface};

/// Number of holes on the board.
pub const SLOTS: usize = 5;
