//! Spin outcome sources.

use std::collections::VecDeque;

use croupier_types::roulette::{Slot, WHEEL_SLOTS};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Supplies the winning slot for each round: one draw per call, uniform over
/// the 38 slots and independent across calls.
pub trait OutcomeSource {
    fn next_outcome(&mut self) -> Slot;
}

impl<T: OutcomeSource + ?Sized> OutcomeSource for Box<T> {
    fn next_outcome(&mut self) -> Slot {
        (**self).next_outcome()
    }
}

/// A fair American wheel driven by any RNG.
#[derive(Clone, Debug)]
pub struct Wheel<R: RngCore = ChaCha20Rng> {
    rng: R,
}

impl<R: RngCore> Wheel<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Wheel<ChaCha20Rng> {
    /// Reproducible wheel; the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha20Rng::from_entropy())
    }
}

impl<R: RngCore> OutcomeSource for Wheel<R> {
    fn next_outcome(&mut self) -> Slot {
        Slot::ALL[self.rng.gen_range(0..WHEEL_SLOTS)]
    }
}

/// Replays scripted outcomes, then defers to a fallback wheel.
#[derive(Clone, Debug)]
pub struct ForcedOutcomes<W = Wheel> {
    queue: VecDeque<Slot>,
    fallback: W,
}

impl ForcedOutcomes<Wheel> {
    pub fn new(outcomes: impl IntoIterator<Item = Slot>) -> Self {
        Self::with_fallback(outcomes, Wheel::seeded(0))
    }
}

impl<W: OutcomeSource> ForcedOutcomes<W> {
    pub fn with_fallback(outcomes: impl IntoIterator<Item = Slot>, fallback: W) -> Self {
        Self {
            queue: outcomes.into_iter().collect(),
            fallback,
        }
    }

    pub fn push(&mut self, slot: Slot) {
        self.queue.push_back(slot);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl<W: OutcomeSource> OutcomeSource for ForcedOutcomes<W> {
    fn next_outcome(&mut self) -> Slot {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_outcome())
    }
}
