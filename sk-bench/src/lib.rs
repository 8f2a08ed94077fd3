//! sk-bench: shared fixtures for the criterion benches.

use rand::Rng;
use sk_core::{legal_moves, trial_rng, Board};

/// Deterministic mid-game positions: the start board after 0..=24 random jumps.
pub fn sample_positions(n: usize, seed: u64) -> Vec<Board> {
    let mut rng = trial_rng(seed);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut b = Board::new();
        for _ in 0..(i % 25) {
            let moves = legal_moves(&b);
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            if b.apply(&mv).is_err() {
                break;
            }
        }
        out.push(b);
    }
    out
}
