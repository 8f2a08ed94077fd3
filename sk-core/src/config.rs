//! Run configuration.
//!
//! Loaded from YAML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::trial::DEFAULT_MOVE_CAP;

/// Default try cap per run.
pub const DEFAULT_MAX_TRIES: u64 = 1_000_000;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid board layout: {0}")]
    Board(#[from] BoardError),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Search loop settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Starting position.
    #[serde(default)]
    pub board: BoardConfig,
    /// Event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Try cap per run.
    #[serde(default = "default_max_tries")]
    pub max_tries: u64,
    /// Move cap per trial.
    #[serde(default = "default_move_cap")]
    pub move_cap: u32,
    /// Run seed. If None, one is drawn from OS entropy and reported.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker threads: 0 = rayon default, 1 = sequential.
    #[serde(default)]
    pub threads: usize,
    /// Tries per batch. Cancellation and progress are checked between batches.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_max_tries() -> u64 {
    DEFAULT_MAX_TRIES
}

fn default_move_cap() -> u32 {
    DEFAULT_MOVE_CAP
}

fn default_batch_size() -> usize {
    4096
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            move_cap: default_move_cap(),
            seed: None,
            threads: 0,
            batch_size: default_batch_size(),
        }
    }
}

/// Starting board configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Optional custom layout, seven rows in [`Board::parse`] syntax.
    /// If None, the standard initial layout is used.
    #[serde(default)]
    pub layout: Option<Vec<String>>,
}

impl BoardConfig {
    /// The configured starting board.
    pub fn start_board(&self) -> Result<Board, BoardError> {
        match &self.layout {
            Some(rows) => Board::from_rows(rows),
            None => Ok(Board::new()),
        }
    }
}

/// NDJSON event log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append events to this file. If None, no event log is written.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
    /// Flush the event log every N lines (0 disables periodic flushing).
    #[serde(default = "default_flush_every_lines")]
    pub flush_every_lines: u64,
    /// Emit a progress event every N batches (0 disables progress events).
    #[serde(default = "default_progress_every_batches")]
    pub progress_every_batches: u64,
}

fn default_flush_every_lines() -> u64 {
    100
}

fn default_progress_every_batches() -> u64 {
    16
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            flush_every_lines: default_flush_every_lines(),
            progress_every_batches: default_progress_every_batches(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the search cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_tries == 0 {
            return Err(ConfigError::Invalid("search.max_tries must be >= 1"));
        }
        if self.search.batch_size == 0 {
            return Err(ConfigError::Invalid("search.batch_size must be >= 1"));
        }
        self.board.start_board()?;
        Ok(())
    }
}
