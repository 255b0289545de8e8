use rand::{Rng, RngCore};

use crate::clock::GameClock;
use crate::config::Error;

/// What a resolved press did to the mole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strike {
    Hit,
    Miss,
}

/// Which of the `N` slots the mole occupies.
pub struct Mole<R, const N: usize> {
    current: usize,
    rng: R,
}

impl<R: RngCore, const N: usize> Mole<R, N> {
    /// Places the mole in a random slot. Fails for `N < 2`, where relocation
    /// could never find a different slot.
    pub fn new(mut rng: R) -> Result<Self, Error> {
        if N < 2 {
            return Err(Error::TooFewSlots);
        }
        let current = rng.gen_range(0..N);
        Ok(Self { current, rng })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Draws slots until one differs from `forbidden`, then restarts the
    /// appearance timer. The only place `appear_ticks` goes back to zero.
    pub fn relocate(&mut self, forbidden: usize, clock: &mut GameClock) -> usize {
        let next = loop {
            let candidate = self.rng.gen_range(0..N);
            if candidate != forbidden {
                break candidate;
            }
        };
        clock.reset_appear();
        self.current = next;
        next
    }

    /// Moves on from the current slot.
    pub fn advance(&mut self, clock: &mut GameClock) -> usize {
        self.relocate(self.current, clock)
    }

    /// Resolves a press against the current slot. A hit and a miss both send
    /// the mole elsewhere.
    pub fn strike(&mut self, slot: usize, clock: &mut GameClock) -> Strike {
        let strike = if slot == self.current {
            Strike::Hit
        } else {
            Strike::Miss
        };
        self.advance(clock);
        strike
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, slot: usize) {
        self.current = slot;
    }
}
