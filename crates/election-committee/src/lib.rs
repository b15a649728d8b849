//! election-committee
//!
//! Correlates gravity-chain heights with the wall-clock time they were
//! observed at, and serves the election result authoritative at a given time.
//!
//! - [`HeightIndex`]: the height ↔ time correlation index. Pure, no IO.
//! - [`Committee`]: owns one index and the per-height result archive behind a
//!   single lock; the chain-sync driver writes, readers query.
//! - [`ResultSource`]: the call contract export tooling consumes.
//!
//! Result computation (vote aggregation, decay arithmetic, ranking) happens
//! upstream; results arrive here already computed.

mod committee;
mod height;
mod result;
mod source;

pub use committee::{Committee, CommitteeError};
pub use height::{HeightError, HeightIndex, NO_HEIGHT};
pub use result::{Delegate, ElectionResult, ResultError, Vote};
pub use source::ResultSource;
