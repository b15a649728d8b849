//! Epoch-metadata boundary.
//!
//! Maps a chain epoch number to the gravity-chain height its delegates were
//! elected at. Only the provider trait and the HTTP implementation live here.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Epoch metadata as reported by the chain API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochMeta {
    pub epoch_number: u64,
    /// First block height of the epoch on the chain itself.
    pub height: u64,
    /// Gravity-chain height whose election result governs this epoch.
    pub gravity_chain_start_height: u64,
    pub num_delegates: usize,
}

#[async_trait::async_trait]
pub trait EpochMetaProvider: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_epoch_meta(&self, epoch: u64) -> Result<EpochMeta>;
}

/// JSON-over-HTTP epoch metadata client.
#[derive(Debug, Clone)]
pub struct HttpEpochMetaProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEpochMetaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn epoch_meta_url(&self, epoch: u64) -> String {
        format!(
            "{}/v1/epochs/{}/meta",
            self.base_url.trim_end_matches('/'),
            epoch
        )
    }
}

#[async_trait::async_trait]
impl EpochMetaProvider for HttpEpochMetaProvider {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn fetch_epoch_meta(&self, epoch: u64) -> Result<EpochMeta> {
        if epoch == 0 {
            bail!("epoch numbers start at 1");
        }

        let url = self.epoch_meta_url(epoch);
        debug!(%url, "fetching epoch meta");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("epoch meta request failed: {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.text().await {
                Ok(text) => error_body_message(&text),
                Err(e) => format!("body unreadable: {e}"),
            };
            return Err(anyhow!(
                "epoch meta http error status={} message={}",
                status.as_u16(),
                message
            ));
        }

        let body: EpochMetaResponse = resp
            .json()
            .await
            .context("epoch meta response json decode failed")?;

        let data = body
            .epoch_data
            .ok_or_else(|| anyhow!("epoch meta response has no epochData"))?;
        if data.num != epoch {
            bail!("asked for epoch {} but got epoch {}", epoch, data.num);
        }

        Ok(EpochMeta {
            epoch_number: data.num,
            height: data.height,
            gravity_chain_start_height: data.gravity_chain_start_height,
            num_delegates: body.block_producers_info.len(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EpochMetaResponse {
    epoch_data: Option<EpochData>,
    #[serde(default)]
    block_producers_info: Vec<serde_json::Value>,
    code: Option<i64>,
    message: Option<String>,
}

impl EpochMetaResponse {
    fn status_message(&self) -> String {
        match (&self.code, &self.message) {
            (Some(c), Some(m)) => format!("code={} {}", c, m),
            (_, Some(m)) => m.clone(),
            _ => "unknown".to_string(),
        }
    }
}

/// API error bodies carry `code`/`message`; proxies answer with plain text or HTML.
fn error_body_message(text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<EpochMetaResponse>(text) {
        return body.status_message();
    }
    let t = text.trim();
    if t.is_empty() {
        return "unknown".to_string();
    }
    t.chars().take(ERROR_BODY_PREVIEW).collect()
}

const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EpochData {
    num: u64,
    #[serde(default)]
    height: u64,
    gravity_chain_start_height: u64,
}
