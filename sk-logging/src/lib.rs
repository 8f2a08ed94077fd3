//! sk-logging: NDJSON run events + atomic JSON report files.
//!
//! Append-only NDJSON logs for run post-mortems. Each line is one event object
//! tagged with `event`, `ts_ms` and `run_id`.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event schema version written into every event.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Run id from the run seed and start time, e.g. `run-1700000000000-2a`.
pub fn make_run_id(seed: u64, ts_ms: u64) -> String {
    format!("run-{ts_ms}-{seed:x}")
}

/// Write `value` as pretty JSON via a tmp file + rename, so readers never see
/// a half-written file.
pub fn write_json_atomic<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), LogError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, LogError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<T>(&bytes)?)
}

/// Summary of one trial, as logged and written into report files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSummaryV1 {
    pub index: u64,
    pub seed: u64,
    pub remaining: u32,
    pub moves_played: u32,
    /// "solved" | "stuck" | "move_cap"
    pub end: String,
    /// Final board, seven text rows.
    pub board: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndReasonCountsV1 {
    pub solved: u64,
    pub stuck: u64,
    pub move_cap: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStartedV1 {
    pub event: String,
    pub v: u32,
    pub ts_ms: u64,
    pub run_id: String,

    pub seed: u64,
    pub max_tries: u64,
    pub move_cap: u32,
    pub threads: usize,
    pub batch_size: usize,
    pub start_pegs: u32,
    pub config_hash: Option<String>,
}

impl RunStartedV1 {
    pub const EVENT: &'static str = "run_started";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgressV1 {
    pub event: String,
    pub v: u32,
    pub ts_ms: u64,
    pub run_id: String,

    pub tries: u64,
    pub total_moves: u64,
    pub best_remaining: Option<u32>,
    pub worst_remaining: Option<u32>,
    pub end_reasons: EndReasonCountsV1,
    pub elapsed_ms: u64,
}

impl BatchProgressV1 {
    pub const EVENT: &'static str = "batch_progress";
}

/// Final event of a run. Also the `--report-json` file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFinishedV1 {
    pub event: String,
    pub v: u32,
    pub ts_ms: u64,
    pub run_id: String,

    pub seed: u64,
    pub tries: u64,
    pub solved: bool,
    /// "solved" | "try_budget_exhausted" | "cancelled"
    pub end: String,
    pub total_moves: u64,
    pub best: TrialSummaryV1,
    pub worst: TrialSummaryV1,
    pub last: TrialSummaryV1,
    pub end_reasons: EndReasonCountsV1,
    /// Remaining pegs (as string keys in JSON) -> tries.
    pub remaining_histogram: BTreeMap<u32, u64>,
    pub elapsed_ms: u64,
}

impl RunFinishedV1 {
    pub const EVENT: &'static str = "run_finished";
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    ///
    /// If the file ends in a partial line (crash mid-write), a newline is
    /// written first so new events start on their own line.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, LogError> {
        let mut f = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        if f.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            f.seek(SeekFrom::End(-1))?;
            f.read_exact(&mut last)?;
            if last[0] != b'\n' {
                f.write_all(b"\n")?;
            }
        }
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), LogError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
