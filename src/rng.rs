//! The interpreter's pseudo-random generator.
//!
//! Owned per-[`crate::interpreter::Interpreter`] instance rather than a
//! process-global, which resolves spec.md §9 open question 3 (a
//! process-wide PRNG would become a shared-mutable hazard if jobs ever
//! interleaved).

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Thin newtype so callers reseed through one spot (`RAND_SEED`) instead of
/// reaching into `StdRng` directly.
#[derive(Debug, Clone)]
pub struct Rng(StdRng);

impl Rng {
    /// A generator seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Rng(StdRng::from_entropy())
    }

    /// Reseed deterministically, as `RAND_SEED` does.
    pub fn reseed(&mut self, seed: i64) {
        self.0 = StdRng::seed_from_u64(seed as u64);
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl rand::RngCore for Rng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}
