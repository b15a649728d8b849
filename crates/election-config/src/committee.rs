use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Public epoch-metadata endpoint used when the config names none.
pub const DEFAULT_EPOCH_ENDPOINT: &str = "http://api.iotex.one:80";

/// Committee settings read from the shared committee YAML.
///
/// Keys are camelCase to stay compatible with existing committee files.
/// Keys this struct does not name are tolerated here and surfaced by
/// [`report_unused_keys`](crate::report_unused_keys) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeConfig {
    /// First gravity-chain height the committee computes a result for.
    /// Must be > 0: height 0 is the "no applicable height" sentinel.
    pub gravity_chain_start_height: u64,
    /// Distance between two consecutive recordable heights.
    pub gravity_chain_height_interval: u64,
    /// Maximum number of archived results kept in memory (0 = unbounded).
    /// The height index itself is never pruned.
    #[serde(default)]
    pub cache_size: usize,
}

impl CommitteeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.gravity_chain_start_height == 0 {
            bail!("CONFIG_INVALID gravityChainStartHeight must be > 0 (0 is reserved)");
        }
        if self.gravity_chain_height_interval == 0 {
            bail!("CONFIG_INVALID gravityChainHeightInterval must be > 0");
        }
        Ok(())
    }

    /// `true` when `height` lies on the committee's height grid.
    pub fn is_on_grid(&self, height: u64) -> bool {
        height >= self.gravity_chain_start_height
            && self.gravity_chain_height_interval != 0
            && (height - self.gravity_chain_start_height) % self.gravity_chain_height_interval == 0
    }
}

/// Settings for the CSV export tool: the committee file plus two endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumperConfig {
    #[serde(flatten)]
    pub committee: CommitteeConfig,
    /// Epoch-metadata RPC base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Committee result service base URL.
    pub result_api: String,
}

fn default_endpoint() -> String {
    DEFAULT_EPOCH_ENDPOINT.to_string()
}

impl DumperConfig {
    pub fn validate(&self) -> Result<()> {
        self.committee.validate()?;
        for (key, url) in [("endpoint", &self.endpoint), ("resultApi", &self.result_api)] {
            let u = url.trim();
            if !(u.starts_with("http://") || u.starts_with("https://")) {
                bail!("CONFIG_INVALID {key} must be an http(s) URL, got '{u}'");
            }
        }
        Ok(())
    }
}
