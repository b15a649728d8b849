use crate::ElectionResult;
use std::sync::Arc;

/// Anything that can hand out the election result computed at a height.
///
/// Implemented in-process by [`Committee`](crate::Committee) and remotely by
/// `election_rpc::HttpResultSource`. Export tooling depends only on this trait.
#[async_trait::async_trait]
pub trait ResultSource: Send + Sync {
    /// Short name for logs (e.g. `"committee"`, `"http"`).
    fn source_name(&self) -> &'static str;

    async fn fetch_result_by_height(&self, height: u64) -> anyhow::Result<Arc<ElectionResult>>;
}
