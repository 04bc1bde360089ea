//! Fixtures for merged-mining tests: an auxpow builder, header mining and a
//! generic `Arbitrary` generator.

use arbitrary::{Arbitrary, Unstructured};
use auxpow_params::ConsensusParams;
use rand_core::{CryptoRngCore, OsRng};

mod builder;
mod mining;

pub use builder::AuxPowBuilder;
pub use mining::{coinbase_script, mine_header, tamper_merkle_root, tamper_with};

/// Chain id the fixtures validate blocks for.
pub const TEST_CHAIN_ID: u32 = 42;

/// Regtest parameters for [`TEST_CHAIN_ID`].
pub fn regtest_params() -> ConsensusParams {
    ConsensusParams::regtest(TEST_CHAIN_ID)
}

/// The default buffer size for the `ArbitraryGenerator`.
const ARB_GEN_LEN: usize = 65_536;

/// Produces arbitrary values of types deriving [`Arbitrary`] from random bytes.
#[derive(Debug)]
pub struct ArbitraryGenerator {
    buf: Vec<u8>, // Persistent buffer
}

impl Default for ArbitraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitraryGenerator {
    /// Creates a new `ArbitraryGenerator` with a default buffer size.
    ///
    /// # Returns
    ///
    /// A new instance of `ArbitraryGenerator`.
    pub fn new() -> Self {
        Self::new_with_size(ARB_GEN_LEN)
    }

    /// Creates a new `ArbitraryGenerator` with a specified buffer size.
    ///
    /// Large values, such as long merkle branches, need a larger buffer.
    ///
    /// # Arguments
    ///
    /// * `s` - The size of the buffer to be used.
    pub fn new_with_size(s: usize) -> Self {
        Self { buf: vec![0u8; s] }
    }

    /// Generates an arbitrary instance of type `T` using [`OsRng`].
    pub fn generate<T>(&mut self) -> T
    where
        T: for<'a> Arbitrary<'a> + Clone,
    {
        self.generate_with_rng::<T, OsRng>(&mut OsRng)
    }

    /// Generates an arbitrary instance of type `T`, filling the buffer from
    /// `rng`.
    ///
    /// # Arguments
    ///
    /// * `rng` - Source of the buffer bytes. Must implement [`CryptoRngCore`]; a seeded RNG
    ///   makes the output reproducible.
    ///
    /// # Panics
    ///
    /// If no buffer fill yields a `T` after a fixed number of attempts.
    pub fn generate_with_rng<T, R>(&mut self, rng: &mut R) -> T
    where
        T: for<'a> Arbitrary<'a> + Clone,
        R: CryptoRngCore,
    {
        const MAX_ATTEMPTS: usize = 16;
        let mut last_error = None;

        for _ in 0..MAX_ATTEMPTS {
            rng.fill_bytes(&mut self.buf);
            let mut u = Unstructured::new(&self.buf);
            match T::arbitrary(&mut u) {
                Ok(value) => return value,
                Err(err) => last_error = Some(err),
            }
        }

        let error_msg = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        panic!("Failed to generate arbitrary instance: {error_msg}");
    }
}
