//! Round lifecycle: title screen and seeding, the play loop, game over.
//!
//! The controller never touches the tick counters directly. Everything it
//! shares with the timer interrupt lives in a [`Session`] reached through an
//! RTIC [`Mutex`], one short lock at a time.

use core::fmt;

use embedded_graphics::prelude::Point;
use embedded_hal::digital::v2::InputPin;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rtic_core::Mutex;

use crate::config::{Error, GameConfig};
use crate::input::{Buttons, Hold};
use crate::mole::{Mole, Strike};
use crate::render;
use crate::session::{GameState, Session};
use crate::surface::Surface;

pub type RoundMole<const N: usize> = Mole<ChaCha8Rng, N>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Continue,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameError<E> {
    Setup(Error),
    Display(E),
}

impl<E: fmt::Debug> fmt::Display for GameError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Setup(err) => write!(f, "setup failed: {}", err),
            GameError::Display(err) => write!(f, "display failed: {:?}", err),
        }
    }
}

pub struct Game<S, P, const N: usize> {
    surface: S,
    buttons: Buttons<P, N>,
    config: GameConfig,
    anchors: [Point; N],
}

impl<S, P, const N: usize> Game<S, P, N>
where
    S: Surface,
    P: InputPin,
{
    pub fn new(
        surface: S,
        buttons: Buttons<P, N>,
        config: GameConfig,
        anchors: [Point; N],
    ) -> Result<Self, Error> {
        config.validate(N)?;
        Ok(Self {
            surface,
            buttons,
            config,
            anchors,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Shows the title card and spins until the start button goes down and
    /// back up. The spin count and an `entropy` sample taken at the press
    /// are folded into the returned seed; both depend on the player's timing.
    pub fn await_start(&mut self, mut entropy: impl FnMut() -> u64) -> Result<u64, S::Error> {
        render::title(&mut self.surface, self.config.duration_secs)?;

        let start = self.config.start_slot;
        let mut spins: u64 = 0;
        while !self.buttons.is_pressed(start) {
            spins = spins.wrapping_add(1);
        }
        let sample = entropy();
        while self.buttons.is_pressed(start) {}

        let seed = spins.rotate_left(32) ^ sample;
        info!("start after {=u64} spins, seed {=u64:#x}", spins, seed);
        Ok(seed)
    }

    /// Seeds the mole and moves the session to `Playing`. Ticks must only be
    /// enabled after this returns.
    pub fn start<M>(&mut self, session: &mut M, seed: u64) -> Result<RoundMole<N>, Error>
    where
        M: Mutex<T = Session>,
    {
        let mole = Mole::new(ChaCha8Rng::seed_from_u64(seed))?;
        session.lock(|s| s.begin());
        info!("round started, mole in slot {}", mole.current());
        Ok(mole)
    }

    /// One pass of the play loop: HUD, timeout relocation, grid, input, and
    /// resolving the press. Returns [`Step::GameOver`] as soon as the tick
    /// interrupt has ended the round, without touching game logic again.
    pub fn step<M, R>(&mut self, session: &mut M, mole: &mut Mole<R, N>) -> Result<Step, S::Error>
    where
        M: Mutex<T = Session>,
        R: RngCore,
    {
        let snapshot = session.lock(|s| s.snapshot());
        if snapshot.state == GameState::GameOver {
            return Ok(Step::GameOver);
        }
        render::hud(&mut self.surface, &snapshot);

        let appear_secs = self.config.appear_secs;
        let timed_out = session.lock(|s| {
            let due = s.state() == GameState::Playing && s.clock().appear_ticks() >= appear_secs;
            due.then(|| mole.advance(s.clock_mut()))
        });
        if let Some(slot) = timed_out {
            debug!("mole timed out, now in slot {}", slot);
        }
        render::grid(&mut self.surface, &self.anchors, mole.current())?;

        let surface = &mut self.surface;
        let anchors = &self.anchors;
        let active = mole.current();
        let press = self.buttons.poll(|| -> Result<Hold, S::Error> {
            let snapshot = session.lock(|s| s.snapshot());
            if snapshot.state == GameState::GameOver {
                return Ok(Hold::Abort);
            }
            render::play(&mut *surface, &snapshot, anchors, active)?;
            Ok(Hold::Wait)
        })?;

        if let Some(slot) = press {
            let strike = session.lock(|s| {
                if s.state() != GameState::Playing {
                    return None;
                }
                let strike = mole.strike(slot, s.clock_mut());
                if strike == Strike::Hit {
                    s.record_hit();
                }
                Some(strike)
            });
            match strike {
                Some(strike) => {
                    debug!("{} on slot {}, mole now in {}", strike, slot, mole.current())
                }
                None => debug!("press on slot {} after the round ended", slot),
            }
        }

        let over = session.lock(|s| s.state() == GameState::GameOver);
        Ok(if over { Step::GameOver } else { Step::Continue })
    }

    /// Terminal frame. Reads no more input.
    pub fn game_over<M>(&mut self, session: &mut M) -> Result<u32, S::Error>
    where
        M: Mutex<T = Session>,
    {
        let hits = session.lock(|s| s.hits());
        info!("game over, {} points", hits);
        render::game_over(&mut self.surface, hits)?;
        Ok(hits)
    }

    /// A whole round, from title screen to the game-over frame. Returns the
    /// final score; the caller decides how to idle afterwards.
    pub fn run<M>(
        &mut self,
        session: &mut M,
        entropy: impl FnMut() -> u64,
        enable_ticks: impl FnOnce(),
    ) -> Result<u32, GameError<S::Error>>
    where
        M: Mutex<T = Session>,
    {
        let seed = self.await_start(entropy).map_err(GameError::Display)?;
        let mut mole = self.start(session, seed).map_err(GameError::Setup)?;
        enable_ticks();

        while self.step(session, &mut mole).map_err(GameError::Display)? == Step::Continue {}

        self.game_over(session).map_err(GameError::Display)
    }
}
