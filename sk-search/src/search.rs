//! Random-restart search loop.
//!
//! Plays independent trials until one solves the board or the try budget runs
//! out. Try `i` always uses the RNG seeded by `trial_seed(run_seed, i)`, and
//! batches are folded in try order, so the report depends only on the params,
//! not on how many threads ran the batches.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use sk_core::config::Config;
use sk_core::{
    play_trial_from, play_trial_with_sink, trial_rng, trial_seed, Board, BoardError, TrialSink,
    DEFAULT_MOVE_CAP,
};

use crate::stats::{RunEnd, RunReport, RunStats, TrialRecord};

fn dbg_enabled() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| matches!(std::env::var("SK_DEBUG_LOG").as_deref(), Ok("1" | "true" | "yes")))
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search params: {0}")]
    InvalidParams(&'static str),
    #[error("invalid start board: {0}")]
    Board(#[from] BoardError),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("run finished without recording a trial")]
    Empty,
}

/// Fully resolved search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub start: Board,
    /// Try cap per run (>= 1).
    pub max_tries: u64,
    /// Move cap per trial.
    pub move_cap: u32,
    pub seed: u64,
    /// 0 = rayon global pool, 1 = sequential, n = dedicated pool of n threads.
    pub threads: usize,
    /// Tries per batch (>= 1).
    pub batch_size: usize,
}

impl SearchParams {
    /// Standard board, default caps, sequential.
    pub fn new(seed: u64) -> Self {
        Self {
            start: Board::new(),
            max_tries: sk_core::config::DEFAULT_MAX_TRIES,
            move_cap: DEFAULT_MOVE_CAP,
            seed,
            threads: 1,
            batch_size: 4096,
        }
    }

    /// Resolve a config. A missing seed is drawn from OS entropy.
    pub fn from_config(cfg: &Config) -> Result<Self, SearchError> {
        let s = &cfg.search;
        let params = Self {
            start: cfg.board.start_board()?,
            max_tries: s.max_tries,
            move_cap: s.move_cap,
            seed: s.seed.unwrap_or_else(rand::random),
            threads: s.threads,
            batch_size: s.batch_size,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_tries == 0 {
            return Err(SearchError::InvalidParams("max_tries must be >= 1"));
        }
        if self.batch_size == 0 {
            return Err(SearchError::InvalidParams("batch_size must be >= 1"));
        }
        Ok(())
    }
}

/// Progress callback, invoked after every batch with the stats so far.
pub trait SearchObserver {
    fn on_batch(&mut self, stats: &RunStats);
}

impl SearchObserver for () {
    fn on_batch(&mut self, _stats: &RunStats) {}
}

/// Requests a running search to stop at the next batch boundary.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

enum Exec {
    Sequential,
    Global,
    Pool(rayon::ThreadPool),
}

pub struct Searcher {
    params: SearchParams,
    exec: Exec,
    cancel: Arc<AtomicBool>,
    /// Trials actually played, including ones discarded after an earlier solve.
    played: AtomicU64,
}

impl Searcher {
    pub fn new(params: SearchParams) -> Result<Self, SearchError> {
        params.validate()?;
        let exec = match params.threads {
            0 => Exec::Global,
            1 => Exec::Sequential,
            n => Exec::Pool(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
        };
        Ok(Self {
            params,
            exec,
            cancel: Arc::new(AtomicBool::new(false)),
            played: AtomicU64::new(0),
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancel),
        }
    }

    pub fn run(&self) -> Result<RunReport, SearchError> {
        self.run_observed(&mut ())
    }

    /// Run to completion, calling `observer` after every batch.
    ///
    /// The first batch always runs; cancellation is honoured between batches.
    pub fn run_observed<O>(&self, observer: &mut O) -> Result<RunReport, SearchError>
    where
        O: SearchObserver + ?Sized,
    {
        let t0 = Instant::now();
        let max_tries = self.params.max_tries;
        let batch = self.params.batch_size as u64;

        let mut stats = RunStats::new();
        let mut next: u64 = 0;
        let end = loop {
            let hi = next.saturating_add(batch).min(max_tries);
            let part = self.play_batch(next..hi);
            let solved = part.solved();
            stats = stats.merge(part);
            next = hi;
            observer.on_batch(&stats);

            if dbg_enabled() {
                eprintln!(
                    "[sk-search] tries={} best={:?} solved={} elapsed_ms={}",
                    stats.tries,
                    stats.best.map(|r| r.outcome.remaining),
                    solved,
                    t0.elapsed().as_millis()
                );
            }

            if solved {
                break RunEnd::Solved;
            }
            if next >= max_tries {
                break RunEnd::TryBudgetExhausted;
            }
            if self.cancel.load(Ordering::Relaxed) {
                break RunEnd::Cancelled;
            }
        };

        stats
            .finish(end, self.params.seed, t0.elapsed())
            .ok_or(SearchError::Empty)
    }

    /// Trials played over all runs of this searcher.
    pub(crate) fn trials_played(&self) -> u64 {
        self.played.load(Ordering::Relaxed)
    }

    fn play_one(&self, index: u64) -> TrialRecord {
        self.played.fetch_add(1, Ordering::Relaxed);
        let seed = trial_seed(self.params.seed, index);
        let mut rng = trial_rng(seed);
        let outcome = play_trial_from(&self.params.start, self.params.move_cap, &mut rng);
        TrialRecord {
            index,
            seed,
            outcome,
        }
    }

    /// Stats for tries in `range`, cut after the first solved try.
    fn play_batch(&self, range: Range<u64>) -> RunStats {
        match &self.exec {
            Exec::Sequential => {
                let mut stats = RunStats::new();
                for i in range {
                    let rec = self.play_one(i);
                    stats.push(&rec);
                    if rec.outcome.solved() {
                        break;
                    }
                }
                stats
            }
            Exec::Global => self.play_batch_par(range),
            Exec::Pool(pool) => pool.install(|| self.play_batch_par(range)),
        }
    }

    fn play_batch_par(&self, range: Range<u64>) -> RunStats {
        let lo = range.start;
        let len = (range.end - range.start) as usize;
        // Lowest solved index so far; tries above it skip their work.
        let first_solved = AtomicU64::new(u64::MAX);

        let records: Vec<Option<TrialRecord>> = (0..len)
            .into_par_iter()
            .map(|k| {
                let i = lo + k as u64;
                if i > first_solved.load(Ordering::Relaxed) {
                    return None;
                }
                let rec = self.play_one(i);
                if rec.outcome.solved() {
                    first_solved.fetch_min(i, Ordering::Relaxed);
                }
                Some(rec)
            })
            .collect();

        // Every try at or below the final cutoff ran, since skips only happen
        // above an already-published solved index.
        let cutoff = first_solved.load(Ordering::Relaxed);
        let mut stats = RunStats::new();
        for rec in records.into_iter().flatten() {
            if rec.index > cutoff {
                break;
            }
            stats.push(&rec);
        }
        stats
    }
}

/// Run a search with `params`.
pub fn run(params: &SearchParams) -> Result<RunReport, SearchError> {
    Searcher::new(params.clone())?.run()
}

/// Replay try `index` of a run, reporting each move to `sink`.
pub fn replay_trial<S>(params: &SearchParams, index: u64, sink: &mut S) -> TrialRecord
where
    S: TrialSink + ?Sized,
{
    let seed = trial_seed(params.seed, index);
    let mut rng = trial_rng(seed);
    let outcome = play_trial_with_sink(&params.start, params.move_cap, &mut rng, sink);
    TrialRecord {
        index,
        seed,
        outcome,
    }
}
