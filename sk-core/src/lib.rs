//! sk-core: Board model, move generation, randomized trials, and configuration.

pub mod board;
pub mod config;
pub mod moves;
pub mod seed;
pub mod trial;

pub use board::{is_on_board, new_board, Board, BoardError, Cell, Pos, CENTER, SIZE};
pub use config::{Config, ConfigError};
pub use moves::{apply_move, legal_moves, legal_moves_into, ApplyError, Direction, Move};
pub use seed::{splitmix64, trial_rng, trial_seed};
pub use trial::{
    play_trial, play_trial_from, play_trial_with_sink, EndReason, TrialOutcome, TrialSink,
    DEFAULT_MOVE_CAP,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod board_tests;
#[cfg(test)]
mod moves_tests;
