//! Per-trial seed derivation.
//!
//! Every try of a run gets its own RNG seeded from (run_seed, try_index), not
//! from a shared evolving RNG. That makes each try reproducible on its own and
//! independent of how tries are spread over threads.

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// SplitMix64 step (fast, deterministic).
pub fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// One-shot SplitMix64 of `x`.
pub fn splitmix64(x: u64) -> u64 {
    let mut s = x;
    splitmix64_next(&mut s)
}

/// Seed for try `try_index` of a run seeded with `run_seed`.
pub fn trial_seed(run_seed: u64, try_index: u64) -> u64 {
    // Fixed, stable mixing. Avoid std Hash/RandomState.
    let x = run_seed ^ try_index.wrapping_mul(0xD6E8FEB86659FD93);
    splitmix64(x)
}

/// RNG for a single trial.
pub fn trial_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
