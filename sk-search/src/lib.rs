//! sk-search: Random-restart search loop + stats aggregation over trials.

pub mod search;
pub mod stats;

pub use search::{
    replay_trial, run, CancelHandle, SearchError, SearchObserver, SearchParams, Searcher,
};
pub use stats::{aggregate, EndReasonCounts, RunEnd, RunReport, RunStats, TrialRecord};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
