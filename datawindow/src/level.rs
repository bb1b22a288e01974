use alloc::boxed::Box;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::options::IndexOptions;

/// A source of random bits used to pick skip list node heights.
///
/// Every `rand::RngCore` is a `RandomBits`. Tests can plug in a seeded generator (see
/// [`IndexOptions::with_seed`]) or a scripted sequence to get a fixed level structure.
pub trait RandomBits {
    /// Returns one fair coin flip.
    fn next_bit(&mut self) -> bool;
}

impl<R: RngCore> RandomBits for R {
    fn next_bit(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/// Draws node heights from a geometric distribution (p = 0.5), capped at `max_level`.
pub(crate) struct LevelGenerator {
    bits: Box<dyn RandomBits + Send + Sync>,
    max_level: usize,
}

impl LevelGenerator {
    pub(crate) fn new(options: &IndexOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_bits(options.max_level, rng)
    }

    pub(crate) fn with_bits(
        max_level: usize,
        bits: impl RandomBits + Send + Sync + 'static,
    ) -> Self {
        Self {
            bits: Box::new(bits),
            max_level: max_level.max(1),
        }
    }

    pub(crate) fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns a height in `1..=max_level`.
    pub(crate) fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.bits.next_bit() {
            level += 1;
        }
        level
    }
}

impl core::fmt::Debug for LevelGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LevelGenerator")
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}
