//! election-rpc
//!
//! Remote collaborators of the committee tooling:
//! - epoch metadata (epoch number → gravity-chain height)
//! - the committee result service (height → election result)
//!
//! No retries here; callers decide whether a failure is fatal.

pub mod epoch;
mod remote;

pub use epoch::{EpochMeta, EpochMetaProvider, HttpEpochMetaProvider};
pub use remote::HttpResultSource;
