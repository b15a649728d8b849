//! Election result model.
//!
//! The committee does not compute results; it archives what the result
//! computation produced and serves it by height. Token amounts stay as decimal
//! strings so no precision is lost at the boundary, and `weighted_amount` is
//! treated as opaque: it is carried verbatim and never re-derived here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    #[error("delegate '{0}' listed twice")]
    DuplicateDelegate(String),

    #[error("votes filed under unknown delegate '{0}'")]
    UnknownDelegate(String),

    #[error("vote for '{candidate}' filed under delegate '{filed_under}'")]
    MisfiledVote {
        filed_under: String,
        candidate: String,
    },

    #[error("{field} is not a decimal amount: '{value}'")]
    BadAmount { field: &'static str, value: String },
}

/// A single stake vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Raw voter identity (20-byte account payload on the gravity chain).
    #[serde(with = "hex::serde")]
    pub voter: Vec<u8>,
    pub start_time: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub decay: bool,
    /// Staked principal, decimal.
    pub amount: String,
    /// Decay-weighted amount, decimal, computed upstream.
    pub weighted_amount: String,
    /// Name of the delegate this vote is cast for.
    pub candidate: String,
}

impl Vote {
    fn validate(&self) -> Result<(), ResultError> {
        check_decimal("amount", &self.amount)?;
        check_decimal("weightedAmount", &self.weighted_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegate {
    pub name: String,
    pub address: String,
    pub operator_address: String,
    pub reward_address: String,
    /// Total weighted votes, decimal.
    pub score: String,
    /// Self-staked tokens, decimal.
    pub self_staking_tokens: String,
}

impl Delegate {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of one election round, as of one gravity-chain height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResult {
    mint_time: DateTime<Utc>,
    delegates: Vec<Delegate>,
    #[serde(default)]
    votes: BTreeMap<String, Vec<Vote>>,
}

impl ElectionResult {
    /// Build a result, filing each vote under its candidate.
    ///
    /// Votes keep their relative order within a delegate.
    pub fn new(mint_time: DateTime<Utc>, delegates: Vec<Delegate>, votes: Vec<Vote>) -> Self {
        let mut by_delegate: BTreeMap<String, Vec<Vote>> = BTreeMap::new();
        for v in votes {
            by_delegate.entry(v.candidate.clone()).or_default().push(v);
        }
        Self {
            mint_time,
            delegates,
            votes: by_delegate,
        }
    }

    pub fn mint_time(&self) -> DateTime<Utc> {
        self.mint_time
    }

    /// Delegates in ranking order.
    pub fn delegates(&self) -> &[Delegate] {
        &self.delegates
    }

    /// Votes cast for `name`; empty for unknown names.
    pub fn votes_by_delegate(&self, name: &str) -> &[Vote] {
        self.votes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_votes(&self) -> usize {
        self.votes.values().map(Vec::len).sum()
    }

    /// Structural checks for results arriving from outside the process.
    pub fn validate(&self) -> Result<(), ResultError> {
        let mut names = BTreeSet::new();
        for d in &self.delegates {
            if !names.insert(d.name.as_str()) {
                return Err(ResultError::DuplicateDelegate(d.name.clone()));
            }
            check_decimal("score", &d.score)?;
            check_decimal("selfStakingTokens", &d.self_staking_tokens)?;
        }

        for (filed_under, votes) in &self.votes {
            if !names.contains(filed_under.as_str()) {
                return Err(ResultError::UnknownDelegate(filed_under.clone()));
            }
            for v in votes {
                if &v.candidate != filed_under {
                    return Err(ResultError::MisfiledVote {
                        filed_under: filed_under.clone(),
                        candidate: v.candidate.clone(),
                    });
                }
                v.validate()?;
            }
        }
        Ok(())
    }
}

fn check_decimal(field: &'static str, value: &str) -> Result<(), ResultError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResultError::BadAmount {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
