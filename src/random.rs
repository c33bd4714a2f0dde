//! Seeded random sources.

use crate::lns::LnsRng;
use rand::SeedableRng;

/// Creates the engine RNG from an optional seed.
///
/// `None` draws a seed from the thread-local generator, so unseeded runs
/// are not reproducible.
pub fn create_rng(seed: Option<u64>) -> LnsRng {
    match seed {
        Some(seed) => LnsRng::seed_from_u64(seed),
        None => LnsRng::seed_from_u64(rand::random()),
    }
}
