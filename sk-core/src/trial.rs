//! Randomized trial executor: plays one random game to its natural end.
//!
//! This module is the single place that drives a board through a game.

use rand::Rng;

use crate::board::{new_board, Board};
use crate::moves::{legal_moves_into, Move};

/// Default per-trial move cap. 32 pegs down to 1 needs 31 jumps, so the cap is
/// never reached by correct play.
pub const DEFAULT_MOVE_CAP: u32 = 32;

/// Why a trial stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Exactly one peg left.
    Solved,
    /// No legal jump left and more than one peg on the board.
    Stuck,
    /// The move cap was hit while jumps were still available.
    MoveCap,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Solved => "solved",
            EndReason::Stuck => "stuck",
            EndReason::MoveCap => "move_cap",
        }
    }
}

/// Terminal state of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub board: Board,
    pub remaining: u32,
    pub moves_played: u32,
    pub end: EndReason,
}

impl TrialOutcome {
    pub fn solved(&self) -> bool {
        self.end == EndReason::Solved
    }
}

/// Receives every move a trial applies.
pub trait TrialSink {
    /// Called after `mv` was applied; `ply` counts from 0 and `board` is the
    /// resulting position.
    fn on_move(&mut self, ply: u32, mv: &Move, board: &Board);
}

impl TrialSink for () {
    #[inline]
    fn on_move(&mut self, _ply: u32, _mv: &Move, _board: &Board) {}
}

/// Records the move sequence.
impl TrialSink for Vec<Move> {
    fn on_move(&mut self, _ply: u32, mv: &Move, _board: &Board) {
        self.push(*mv);
    }
}

/// Play one trial from the initial layout with [`DEFAULT_MOVE_CAP`].
pub fn play_trial<R: Rng + ?Sized>(rng: &mut R) -> TrialOutcome {
    play_trial_from(&new_board(), DEFAULT_MOVE_CAP, rng)
}

/// Play one trial from `start` with an explicit move cap.
pub fn play_trial_from<R: Rng + ?Sized>(start: &Board, move_cap: u32, rng: &mut R) -> TrialOutcome {
    play_trial_with_sink(start, move_cap, rng, &mut ())
}

/// Play one trial, reporting each applied move to `sink`.
pub fn play_trial_with_sink<R, S>(
    start: &Board,
    move_cap: u32,
    rng: &mut R,
    sink: &mut S,
) -> TrialOutcome
where
    R: Rng + ?Sized,
    S: TrialSink + ?Sized,
{
    let mut board = *start;
    let mut moves = Vec::with_capacity(16);
    let mut played: u32 = 0;

    let stop = loop {
        legal_moves_into(&board, &mut moves);
        if moves.is_empty() {
            break EndReason::Stuck;
        }
        if played >= move_cap {
            break EndReason::MoveCap;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.apply_unchecked(&mv);
        sink.on_move(played, &mv, &board);
        played += 1;
    };

    let remaining = board.remaining_pegs();
    let end = if remaining == 1 {
        EndReason::Solved
    } else {
        stop
    };

    TrialOutcome {
        board,
        remaining,
        moves_played: played,
        end,
    }
}
