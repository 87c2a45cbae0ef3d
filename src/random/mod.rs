//! Seeded uniform fills.
//!
//! Random vectors and matrices must be reproducible from a `(scale, seed)` pair
//! alone, so the fills draw from [`MinStdRand`], the Park-Miller "minimal
//! standard" multiplicative congruential generator, wrapped as a
//! `rand::RngCore` so the `rand` distributions can sit on top of it.

use anyhow::anyhow;
use rand::distr::{Distribution, Uniform};
use rand::{Rng, RngCore, SeedableRng};

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 48_271;

/// Multiplicative linear congruential generator `x' = 48271 x mod (2^31 - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    pub fn new(seed: u32) -> Self {
        // zero is a fixed point of the recurrence
        let state = match (seed as u64) % MODULUS {
            0 => 1,
            s => s as u32,
        };
        MinStdRand { state }
    }

    /// Advances the recurrence and returns the raw state, in `[1, 2^31 - 2]`.
    pub fn next_raw(&mut self) -> u32 {
        self.state = ((self.state as u64 * MULTIPLIER) % MODULUS) as u32;
        self.state
    }
}

impl Default for MinStdRand {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RngCore for MinStdRand {
    fn next_u32(&mut self) -> u32 {
        // each raw draw carries ~31 good bits; keep the top 16 of two draws
        let high = (self.next_raw() >> 15) & 0xffff;
        let low = (self.next_raw() >> 15) & 0xffff;
        (high << 16) | low
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for MinStdRand {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Fills `values` with draws from the closed interval `[-scale, scale]`.
pub fn fill_uniform<R: Rng + ?Sized>(
    values: &mut [f64],
    scale: f64,
    rng: &mut R,
) -> anyhow::Result<()> {
    let distribution = Uniform::new_inclusive(-scale, scale)
        .map_err(|e| anyhow!("Invalid random scale {}: {}", scale, e))?;
    for value in values.iter_mut() {
        *value = distribution.sample(rng);
    }
    Ok(())
}

/// Fills `values` from a fresh [`MinStdRand`] seeded with `seed`.
pub fn fill_seeded(values: &mut [f64], scale: f64, seed: u32) -> anyhow::Result<()> {
    let mut rng = MinStdRand::new(seed);
    fill_uniform(values, scale, &mut rng)
}
