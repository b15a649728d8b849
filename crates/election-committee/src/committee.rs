//! Committee instance: height index + result archive behind one lock.
//!
//! The chain-observation driver is the single writer and calls
//! [`Committee::record`]; result computation and export tooling are readers.
//! Every operation takes the same `Mutex`, so a reader never sees the index
//! and the archive out of step with each other.

use crate::height::{HeightError, HeightIndex, NO_HEIGHT};
use crate::result::{ElectionResult, ResultError};
use crate::source::ResultSource;
use chrono::{DateTime, Utc};
use election_config::CommitteeConfig;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CommitteeError {
    #[error("invalid committee config: {0}")]
    InvalidConfig(String),

    #[error("height {height} is before the committee start height {start}")]
    HeightBeforeStart { height: u64, start: u64 },

    #[error("height {height} is not on the grid (start {start}, interval {interval})")]
    HeightOffGrid {
        height: u64,
        start: u64,
        interval: u64,
    },

    #[error(transparent)]
    Height(#[from] HeightError),

    #[error("invalid result: {0}")]
    InvalidResult(#[from] ResultError),

    #[error("no result archived for height {0}")]
    ResultNotFound(u64),

    #[error("no height recorded at or before {0}")]
    NoResultBefore(DateTime<Utc>),
}

#[derive(Debug, Default)]
struct State {
    heights: HeightIndex,
    results: BTreeMap<u64, Arc<ElectionResult>>,
}

#[derive(Debug)]
pub struct Committee {
    config: CommitteeConfig,
    state: Mutex<State>,
}

impl Committee {
    /// Create a committee with an empty index.
    pub fn new(config: CommitteeConfig) -> Result<Self, CommitteeError> {
        config
            .validate()
            .map_err(|e| CommitteeError::InvalidConfig(format!("{e:#}")))?;
        Ok(Self {
            config,
            state: Mutex::new(State::default()),
        })
    }

    pub fn config(&self) -> &CommitteeConfig {
        &self.config
    }

    /// Probe whether `(height, time)` would be accepted by [`record`](Self::record).
    pub fn validate(&self, height: u64, time: DateTime<Utc>) -> Result<(), CommitteeError> {
        self.check_grid(height)?;
        self.state.lock().heights.validate(height, time)?;
        Ok(())
    }

    /// Admit the `(height, time)` observation and archive its result.
    ///
    /// All-or-nothing: on error neither the index nor the archive changes.
    pub fn record(
        &self,
        height: u64,
        time: DateTime<Utc>,
        result: ElectionResult,
    ) -> Result<(), CommitteeError> {
        self.check_grid(height)?;
        result.validate()?;

        let mut state = self.state.lock();
        if let Err(e) = state.heights.add(height, time) {
            warn!(height, %time, error = %e, "rejected height/time observation");
            return Err(e.into());
        }
        state.results.insert(height, Arc::new(result));

        let cap = self.config.cache_size;
        while cap > 0 && state.results.len() > cap {
            if let Some((evicted, _)) = state.results.pop_first() {
                debug!(evicted, "archive full; dropped oldest result");
            }
        }

        info!(height, %time, recorded = state.heights.len(), "recorded height");
        Ok(())
    }

    /// Greatest recorded height, or `0` before the first observation.
    pub fn latest_height(&self) -> u64 {
        self.state.lock().heights.latest_height()
    }

    /// Height authoritative as of `time`, or `0` when none applies.
    pub fn height_by_time(&self, time: DateTime<Utc>) -> u64 {
        self.state.lock().heights.nearest_height_before(time)
    }

    /// Number of recorded heights.
    pub fn recorded(&self) -> usize {
        self.state.lock().heights.len()
    }

    pub fn fetch_result_by_height(
        &self,
        height: u64,
    ) -> Result<Arc<ElectionResult>, CommitteeError> {
        self.check_grid(height)?;
        let state = self.state.lock();
        state
            .results
            .get(&height)
            .cloned()
            .ok_or(CommitteeError::ResultNotFound(height))
    }

    /// Result of the height authoritative as of `time`.
    pub fn result_by_time(
        &self,
        time: DateTime<Utc>,
    ) -> Result<(u64, Arc<ElectionResult>), CommitteeError> {
        let state = self.state.lock();
        let height = state.heights.nearest_height_before(time);
        debug!(%time, height, "resolved height by time");
        if height == NO_HEIGHT {
            return Err(CommitteeError::NoResultBefore(time));
        }
        let result = state
            .results
            .get(&height)
            .cloned()
            .ok_or(CommitteeError::ResultNotFound(height))?;
        Ok((height, result))
    }

    fn check_grid(&self, height: u64) -> Result<(), CommitteeError> {
        let start = self.config.gravity_chain_start_height;
        if height < start {
            return Err(CommitteeError::HeightBeforeStart { height, start });
        }
        if !self.config.is_on_grid(height) {
            return Err(CommitteeError::HeightOffGrid {
                height,
                start,
                interval: self.config.gravity_chain_height_interval,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResultSource for Committee {
    fn source_name(&self) -> &'static str {
        "committee"
    }

    async fn fetch_result_by_height(&self, height: u64) -> anyhow::Result<Arc<ElectionResult>> {
        Ok(Committee::fetch_result_by_height(self, height)?)
    }
}
