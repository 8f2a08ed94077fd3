//! Run statistics: reduction of trial records into summary metrics.
//!
//! All reductions are associative, so per-batch stats can be merged in any
//! grouping. Ties on best/worst go to the earliest try.

use std::collections::BTreeMap;
use std::time::Duration;

use sk_core::{EndReason, TrialOutcome};

/// One finished try of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecord {
    /// 0-based try number within the run.
    pub index: u64,
    /// Seed of the trial RNG; replaying with it reproduces the trial.
    pub seed: u64,
    pub outcome: TrialOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndReasonCounts {
    pub solved: u64,
    pub stuck: u64,
    pub move_cap: u64,
}

impl EndReasonCounts {
    fn add(&mut self, r: EndReason) {
        match r {
            EndReason::Solved => self.solved += 1,
            EndReason::Stuck => self.stuck += 1,
            EndReason::MoveCap => self.move_cap += 1,
        }
    }

    fn merge(&mut self, o: &EndReasonCounts) {
        self.solved += o.solved;
        self.stuck += o.stuck;
        self.move_cap += o.move_cap;
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Solved,
    TryBudgetExhausted,
    Cancelled,
}

impl RunEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            RunEnd::Solved => "solved",
            RunEnd::TryBudgetExhausted => "try_budget_exhausted",
            RunEnd::Cancelled => "cancelled",
        }
    }
}

/// Running aggregate over trial records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub tries: u64,
    pub total_moves: u64,
    /// Fewest remaining pegs (earliest on ties).
    pub best: Option<TrialRecord>,
    /// Most remaining pegs (earliest on ties).
    pub worst: Option<TrialRecord>,
    /// Highest try index seen.
    pub last: Option<TrialRecord>,
    pub end_reasons: EndReasonCounts,
    /// remaining pegs -> number of tries.
    pub remaining_histogram: BTreeMap<u32, u64>,
}

fn pick(
    a: Option<TrialRecord>,
    b: Option<TrialRecord>,
    prefer_b: impl Fn(&TrialRecord, &TrialRecord) -> bool,
) -> Option<TrialRecord> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if prefer_b(&a, &b) { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

fn better_best(a: &TrialRecord, b: &TrialRecord) -> bool {
    (b.outcome.remaining, b.index) < (a.outcome.remaining, a.index)
}

fn better_worst(a: &TrialRecord, b: &TrialRecord) -> bool {
    b.outcome.remaining > a.outcome.remaining
        || (b.outcome.remaining == a.outcome.remaining && b.index < a.index)
}

fn later(a: &TrialRecord, b: &TrialRecord) -> bool {
    b.index > a.index
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in.
    pub fn push(&mut self, rec: &TrialRecord) {
        self.tries += 1;
        self.total_moves += u64::from(rec.outcome.moves_played);
        self.best = pick(self.best, Some(*rec), better_best);
        self.worst = pick(self.worst, Some(*rec), better_worst);
        self.last = pick(self.last, Some(*rec), later);
        self.end_reasons.add(rec.outcome.end);
        *self
            .remaining_histogram
            .entry(rec.outcome.remaining)
            .or_insert(0) += 1;
    }

    /// Combine two disjoint aggregates.
    pub fn merge(mut self, other: RunStats) -> RunStats {
        self.tries += other.tries;
        self.total_moves += other.total_moves;
        self.best = pick(self.best, other.best, better_best);
        self.worst = pick(self.worst, other.worst, better_worst);
        self.last = pick(self.last, other.last, later);
        self.end_reasons.merge(&other.end_reasons);
        for (k, v) in other.remaining_histogram {
            *self.remaining_histogram.entry(k).or_insert(0) += v;
        }
        self
    }

    pub fn solved(&self) -> bool {
        self.end_reasons.solved > 0
    }

    /// Freeze into a report. None if no trial was recorded.
    pub fn finish(self, end: RunEnd, seed: u64, elapsed: Duration) -> Option<RunReport> {
        Some(RunReport {
            tries: self.tries,
            solved: self.solved(),
            end,
            total_moves: self.total_moves,
            best: self.best?,
            worst: self.worst?,
            last: self.last?,
            end_reasons: self.end_reasons,
            remaining_histogram: self.remaining_histogram,
            seed,
            elapsed,
        })
    }
}

/// Reduce records (in try order) into stats.
pub fn aggregate<I>(records: I) -> RunStats
where
    I: IntoIterator<Item = TrialRecord>,
{
    let mut s = RunStats::new();
    for r in records {
        s.push(&r);
    }
    s
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub tries: u64,
    pub solved: bool,
    pub end: RunEnd,
    pub total_moves: u64,
    pub best: TrialRecord,
    pub worst: TrialRecord,
    /// The final trial executed; the solving one when `solved`.
    pub last: TrialRecord,
    pub end_reasons: EndReasonCounts,
    pub remaining_histogram: BTreeMap<u32, u64>,
    /// Run seed; with a try index it reproduces any trial.
    pub seed: u64,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn best_remaining(&self) -> u32 {
        self.best.outcome.remaining
    }

    pub fn worst_remaining(&self) -> u32 {
        self.worst.outcome.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{Board, Pos};

    fn rec(index: u64, remaining: u32, moves: u32, end: EndReason) -> TrialRecord {
        let pegs: Vec<Pos> = (0..remaining as usize)
            .map(|i| Pos::new(2 + i / 7, i % 7))
            .collect();
        TrialRecord {
            index,
            seed: index * 10,
            outcome: TrialOutcome {
                board: Board::with_pegs(&pegs).unwrap(),
                remaining,
                moves_played: moves,
                end,
            },
        }
    }

    fn sample() -> Vec<TrialRecord> {
        vec![
            rec(0, 6, 26, EndReason::Stuck),
            rec(1, 3, 29, EndReason::Stuck),
            rec(2, 9, 23, EndReason::Stuck),
            rec(3, 3, 29, EndReason::Stuck),
            rec(4, 9, 23, EndReason::Stuck),
            rec(5, 4, 2, EndReason::MoveCap),
        ]
    }

    #[test]
    fn sums_and_counts() {
        let s = aggregate(sample());
        assert_eq!(s.tries, 6);
        assert_eq!(s.total_moves, 26 + 29 + 23 + 29 + 23 + 2);
        assert_eq!(s.end_reasons.stuck, 5);
        assert_eq!(s.end_reasons.move_cap, 1);
        assert_eq!(s.end_reasons.solved, 0);
        assert!(!s.solved());
        assert_eq!(s.remaining_histogram.get(&3), Some(&2));
        assert_eq!(s.remaining_histogram.get(&9), Some(&2));
        assert_eq!(s.last.unwrap().index, 5);
    }

    #[test]
    fn best_and_worst_tie_break_to_first_occurrence() {
        let s = aggregate(sample());
        assert_eq!(s.best.unwrap().index, 1);
        assert_eq!(s.worst.unwrap().index, 2);
    }

    #[test]
    fn merge_matches_sequential_push() {
        let all = sample();
        let want = aggregate(all.clone());
        for split in 0..=all.len() {
            let left = aggregate(all[..split].iter().copied());
            let right = aggregate(all[split..].iter().copied());
            assert_eq!(left.clone().merge(right.clone()), want);
            // Order of merging does not matter either.
            assert_eq!(right.merge(left), want);
        }
    }

    #[test]
    fn finish_requires_a_trial() {
        assert!(RunStats::new()
            .finish(RunEnd::Cancelled, 0, Duration::ZERO)
            .is_none());

        let r = aggregate(sample())
            .finish(RunEnd::TryBudgetExhausted, 42, Duration::from_millis(5))
            .unwrap();
        assert_eq!(r.tries, 6);
        assert!(!r.solved);
        assert_eq!(r.best_remaining(), 3);
        assert_eq!(r.worst_remaining(), 9);
        assert_eq!(r.seed, 42);
        assert_eq!(r.end.as_str(), "try_budget_exhausted");
    }

    #[test]
    fn solved_record_marks_report_solved() {
        let mut recs = sample();
        recs.push(rec(6, 1, 31, EndReason::Solved));
        let r = aggregate(recs)
            .finish(RunEnd::Solved, 0, Duration::ZERO)
            .unwrap();
        assert!(r.solved);
        assert_eq!(r.best.index, 6);
        assert_eq!(r.last.index, 6);
        assert_eq!(r.end_reasons.solved, 1);
    }
}
