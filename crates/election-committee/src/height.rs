//! Height ↔ time correlation index
//!
//! # Purpose
//!
//! Every committee member answers "which gravity-chain height is authoritative
//! as of time T" through this index. Two honest members fed the same
//! observations must resolve the same height for every query, so the index
//! refuses any observation that would make that resolution ambiguous.
//!
//! # Invariants
//!
//! - **Aligned**: `heights.len() == times.len()`; `heights[i]` was observed at
//!   `times[i]`.
//! - **Strictly ascending on both axes**: for `i > 0`,
//!   `heights[i] > heights[i-1]` and `times[i] > times[i-1]`.
//! - **Bijective**: no height and no time is stored twice.
//! - **Insert-only**: there is no removal or update. A pair is admitted only
//!   through [`HeightIndex::add`], which runs [`HeightIndex::validate`] first.
//!
//! Observations may arrive out of append order; any pair consistent with the
//! whole stored history is inserted at its ordered position.
//!
//! # Thread-safety
//! `HeightIndex` is plain data. The owning [`Committee`](crate::Committee)
//! keeps it behind a single lock so readers never see a half-applied insert.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Returned by the point queries when no recorded height applies.
///
/// Committee heights start above zero (see `CommitteeConfig::validate`), so a
/// `0` from a committee query always means "no data yet".
pub const NO_HEIGHT: u64 = 0;

/// Why a `(height, time)` observation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeightError {
    /// The height is already bound to a time (even the same time).
    #[error("height {height} already recorded at {recorded_at}")]
    HeightAlreadyRecorded {
        height: u64,
        recorded_at: DateTime<Utc>,
    },

    /// The time is already bound to a different height.
    #[error("time {time} already recorded for height {recorded_height}")]
    TimeAlreadyRecorded {
        time: DateTime<Utc>,
        recorded_height: u64,
    },

    /// The height axis and the time axis disagree on where the pair belongs.
    #[error(
        "height {height} at {time} contradicts recorded height {conflicting_height} at {conflicting_time}"
    )]
    OrderInconsistent {
        height: u64,
        time: DateTime<Utc>,
        conflicting_height: u64,
        conflicting_time: DateTime<Utc>,
    },
}

/// Ordered, index-aligned heights and their observation times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeightIndex {
    heights: Vec<u64>,
    times: Vec<DateTime<Utc>>,
}

impl HeightIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Recorded heights, ascending.
    pub fn heights(&self) -> &[u64] {
        &self.heights
    }

    /// Recorded times, ascending and aligned with [`heights`](Self::heights).
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    /// Recorded `(height, time)` pairs in ascending order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, DateTime<Utc>)> + '_ {
        self.heights
            .iter()
            .copied()
            .zip(self.times.iter().copied())
    }

    /// Check whether `(height, time)` could be admitted. Does not mutate.
    ///
    /// The candidate is checked against every recorded pair, not only the
    /// latest one, so a pair may be admitted anywhere in the history as long
    /// as both axes agree on its position. The first recorded pair that
    /// objects decides the error; per pair, height reuse is checked before
    /// time reuse, and both before ordering.
    pub fn validate(&self, height: u64, time: DateTime<Utc>) -> Result<(), HeightError> {
        for (h, t) in self.entries() {
            if height == h {
                return Err(HeightError::HeightAlreadyRecorded {
                    height,
                    recorded_at: t,
                });
            }
            if time == t {
                return Err(HeightError::TimeAlreadyRecorded {
                    time,
                    recorded_height: h,
                });
            }
            if height.cmp(&h) != time.cmp(&t) {
                return Err(HeightError::OrderInconsistent {
                    height,
                    time,
                    conflicting_height: h,
                    conflicting_time: t,
                });
            }
        }
        Ok(())
    }

    /// Validate, then insert `(height, time)` at its ordered position.
    ///
    /// On error the index is unchanged.
    pub fn add(&mut self, height: u64, time: DateTime<Utc>) -> Result<(), HeightError> {
        self.validate(height, time)?;

        let pos = self.heights.partition_point(|&h| h < height);
        debug_assert_eq!(pos, self.times.partition_point(|&t| t < time));

        self.heights.insert(pos, height);
        self.times.insert(pos, time);
        Ok(())
    }

    /// Latest recorded pair whose time is `<= time`, or `None`.
    ///
    /// Binary search over `times`; O(log n).
    pub fn floor(&self, time: DateTime<Utc>) -> Option<(u64, DateTime<Utc>)> {
        let idx = self.times.partition_point(|&t| t <= time).checked_sub(1)?;
        Some((self.heights[idx], self.times[idx]))
    }

    /// Height of the latest pair recorded at or before `time`.
    ///
    /// Returns [`NO_HEIGHT`] when the index is empty or `time` precedes the
    /// first recorded time.
    pub fn nearest_height_before(&self, time: DateTime<Utc>) -> u64 {
        self.floor(time).map_or(NO_HEIGHT, |(h, _)| h)
    }

    /// Greatest recorded height, or [`NO_HEIGHT`] when empty.
    pub fn latest_height(&self) -> u64 {
        self.heights.last().copied().unwrap_or(NO_HEIGHT)
    }
}
