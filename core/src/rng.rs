//! Linear congruential generator driving every random decision of a run.
//!
//! The sequence is a pure function of the seed and the parameters: the same
//! seed replays bit-identical values, and the draw counter tells how much
//! randomness a run has consumed (draw-budget termination relies on it).

use crate::error::ConfigError;
use crate::traits::RandomSource;
use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Recurrence `state = (multiplier * state + increment) mod modulus`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LcgParams {
    pub multiplier: u64,
    pub increment: u64,
    pub modulus: u64,
}

impl LcgParams {
    /// The 48-bit parameter set (a = 25214903917, c = 11, m = 2^48).
    pub const WIDE: LcgParams = LcgParams {
        multiplier: 25_214_903_917,
        increment: 11,
        modulus: 1 << 48,
    };

    /// Largest modulus whose states all convert to `f64` exactly. Beyond it
    /// `state / modulus` can round up to 1.0.
    pub const MAX_MODULUS: u64 = 1 << 53;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modulus < 2 || self.modulus > Self::MAX_MODULUS || self.multiplier == 0 {
            return Err(ConfigError::InvalidGenerator);
        }
        Ok(())
    }
}

impl Default for LcgParams {
    fn default() -> Self {
        Self {
            multiplier: 1_664_525,
            increment: 1_013_904_223,
            modulus: 1 << 31,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lcg {
    params: LcgParams,
    state: u64,
    draws: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, LcgParams::default())
    }

    /// Callers are expected to have validated `params`; the modulus is
    /// clamped to `2..=MAX_MODULUS` so outputs stay in `[0, 1)`.
    pub fn with_params(seed: u64, params: LcgParams) -> Self {
        let params = LcgParams {
            modulus: params.modulus.clamp(2, LcgParams::MAX_MODULUS),
            ..params
        };
        Self {
            params,
            state: seed % params.modulus,
            draws: 0,
        }
    }

    pub fn params(&self) -> LcgParams {
        self.params
    }

    fn advance(&mut self) -> u64 {
        let LcgParams {
            multiplier,
            increment,
            modulus,
        } = self.params;
        let next = (multiplier as u128 * self.state as u128 + increment as u128) % modulus as u128;
        self.state = next as u64;
        self.draws += 1;
        self.state
    }
}

impl RandomSource for Lcg {
    fn next_uniform(&mut self) -> f64 {
        self.advance() as f64 / self.params.modulus as f64
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        (self.next_uniform() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Lcg::new(u64::from_le_bytes(seed))
    }

    // The seed is the initial state; no scrambling.
    fn seed_from_u64(state: u64) -> Self {
        Lcg::new(state)
    }
}
