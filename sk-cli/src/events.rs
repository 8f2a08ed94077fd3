//! Run events: search stats -> sk-logging event schemas.

use std::time::Instant;

use sk_logging::{
    now_ms, BatchProgressV1, EndReasonCountsV1, LogError, NdjsonWriter, RunFinishedV1,
    RunStartedV1, TrialSummaryV1, EVENT_SCHEMA_VERSION,
};
use sk_search::{EndReasonCounts, RunReport, RunStats, SearchObserver, SearchParams, TrialRecord};

pub fn trial_summary(r: &TrialRecord) -> TrialSummaryV1 {
    TrialSummaryV1 {
        index: r.index,
        seed: r.seed,
        remaining: r.outcome.remaining,
        moves_played: r.outcome.moves_played,
        end: r.outcome.end.as_str().to_string(),
        board: r.outcome.board.rows(),
    }
}

fn counts(c: &EndReasonCounts) -> EndReasonCountsV1 {
    EndReasonCountsV1 {
        solved: c.solved,
        stuck: c.stuck,
        move_cap: c.move_cap,
    }
}

pub fn run_started(p: &SearchParams, run_id: &str, config_hash: Option<String>) -> RunStartedV1 {
    RunStartedV1 {
        event: RunStartedV1::EVENT.to_string(),
        v: EVENT_SCHEMA_VERSION,
        ts_ms: now_ms(),
        run_id: run_id.to_string(),
        seed: p.seed,
        max_tries: p.max_tries,
        move_cap: p.move_cap,
        threads: p.threads,
        batch_size: p.batch_size,
        start_pegs: p.start.remaining_pegs(),
        config_hash,
    }
}

pub fn run_finished(r: &RunReport, run_id: &str) -> RunFinishedV1 {
    RunFinishedV1 {
        event: RunFinishedV1::EVENT.to_string(),
        v: EVENT_SCHEMA_VERSION,
        ts_ms: now_ms(),
        run_id: run_id.to_string(),
        seed: r.seed,
        tries: r.tries,
        solved: r.solved,
        end: r.end.as_str().to_string(),
        total_moves: r.total_moves,
        best: trial_summary(&r.best),
        worst: trial_summary(&r.worst),
        last: trial_summary(&r.last),
        end_reasons: counts(&r.end_reasons),
        remaining_histogram: r.remaining_histogram.clone(),
        elapsed_ms: r.elapsed.as_millis() as u64,
    }
}

/// Writes a `batch_progress` event every `every` batches.
///
/// Write errors can't abort the search, so the first one is kept and all
/// further writes are skipped; [`EventLog::finish`] hands it back.
pub struct EventLog {
    w: NdjsonWriter,
    run_id: String,
    every: u64,
    batches: u64,
    t0: Instant,
    err: Option<LogError>,
}

impl EventLog {
    pub fn new(w: NdjsonWriter, run_id: String, every: u64) -> Self {
        Self {
            w,
            run_id,
            every,
            batches: 0,
            t0: Instant::now(),
            err: None,
        }
    }

    pub fn started(&mut self, p: &SearchParams, config_hash: Option<String>) {
        let ev = run_started(p, &self.run_id, config_hash);
        self.write(&ev);
    }

    fn write<T: serde::Serialize>(&mut self, ev: &T) {
        if self.err.is_some() {
            return;
        }
        if let Err(e) = self.w.write_event(ev) {
            self.err = Some(e);
        }
    }

    /// Log the final event and flush.
    pub fn finish(mut self, r: &RunReport) -> Result<(), LogError> {
        let ev = run_finished(r, &self.run_id);
        self.write(&ev);
        if let Some(e) = self.err.take() {
            return Err(e);
        }
        self.w.flush()
    }
}

impl SearchObserver for EventLog {
    fn on_batch(&mut self, stats: &RunStats) {
        self.batches += 1;
        if self.every == 0 || self.batches % self.every != 0 {
            return;
        }
        let ev = BatchProgressV1 {
            event: BatchProgressV1::EVENT.to_string(),
            v: EVENT_SCHEMA_VERSION,
            ts_ms: now_ms(),
            run_id: self.run_id.clone(),
            tries: stats.tries,
            total_moves: stats.total_moves,
            best_remaining: stats.best.map(|r| r.outcome.remaining),
            worst_remaining: stats.worst.map(|r| r.outcome.remaining),
            end_reasons: counts(&stats.end_reasons),
            elapsed_ms: self.t0.elapsed().as_millis() as u64,
        };
        self.write(&ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{Board, Pos};
    use sk_search::Searcher;

    fn isolated_params() -> SearchParams {
        SearchParams {
            start: Board::with_pegs(&[Pos::new(0, 2), Pos::new(6, 4)]).unwrap(),
            max_tries: 40,
            batch_size: 10,
            ..SearchParams::new(3)
        }
    }

    #[test]
    fn writes_started_progress_and_finished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        let p = isolated_params();
        let w = NdjsonWriter::open_append(&path).unwrap();
        let mut log = EventLog::new(w, "r1".to_string(), 2);
        log.started(&p, Some("h".to_string()));
        let report = Searcher::new(p).unwrap().run_observed(&mut log).unwrap();
        log.finish(&report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            ["run_started", "batch_progress", "batch_progress", "run_finished"]
        );
        assert!(events.iter().all(|e| e["run_id"] == "r1"));
        assert_eq!(events[0]["start_pegs"], 2);
        assert_eq!(events[1]["tries"], 20);
        assert_eq!(events[2]["tries"], 40);
        assert_eq!(events[3]["end"], "try_budget_exhausted");
        assert_eq!(events[3]["remaining_histogram"]["2"], 40);
    }

    #[test]
    fn summary_carries_replay_keys() {
        let p = isolated_params();
        let r = Searcher::new(p).unwrap().run().unwrap();
        let s = trial_summary(&r.last);
        assert_eq!(s.index, 39);
        assert_eq!(s.seed, r.last.seed);
        assert_eq!(s.end, "stuck");
        assert_eq!(s.board.len(), 7);
    }
}
