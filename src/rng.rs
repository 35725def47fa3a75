//! Deterministic 64-bit splitting generator (SplitMix64).
//!
//! The same generator drives tile spawning in a [`GameSession`](crate::session::GameSession)
//! and the chance-node sampling inside the search, so a seed fully determines a game.
//! The state is a plain value: copy it to fork a stream, thread it through calls
//! by `&mut` to advance it.

use rand::{Error, RngCore, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    #[inline]
    pub const fn new(seed: u64) -> Self { Self { state: seed } }

    /// Current internal state. `SplitMix64::new(rng.state())` resumes the stream.
    #[inline]
    pub const fn state(&self) -> u64 { self.state }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `[0, bound)` without modulo bias.
    ///
    /// Draws whose `draw - draw % bound` falls below `2^64 mod bound` are
    /// rejected and redrawn.
    ///
    /// Panics if `bound == 0`.
    ///
    /// ```
    /// use core_2048::rng::SplitMix64;
    /// let mut rng = SplitMix64::new(42);
    /// assert!((0..1000).all(|_| rng.next_bounded(6) < 6));
    /// ```
    #[inline]
    pub fn next_bounded(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        let bound = bound as u64;
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u64();
            let m = r % bound;
            if r - m >= threshold {
                return m as usize;
            }
        }
    }
}

impl RngCore for SplitMix64 {
    #[inline]
    fn next_u32(&mut self) -> u32 { (SplitMix64::next_u64(self) >> 32) as u32 }

    #[inline]
    fn next_u64(&mut self) -> u64 { SplitMix64::next_u64(self) }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = SplitMix64::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self { Self::new(u64::from_le_bytes(seed)) }

    // The seed is the state; no expansion step.
    fn seed_from_u64(state: u64) -> Self { Self::new(state) }
}
