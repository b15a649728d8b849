use anyhow::{anyhow, Context, Result};
use election_committee::{ElectionResult, ResultSource};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// Committee result service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpResultSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpResultSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn result_url(&self, height: u64) -> String {
        format!(
            "{}/v1/results/{}",
            self.base_url.trim_end_matches('/'),
            height
        )
    }
}

#[async_trait::async_trait]
impl ResultSource for HttpResultSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn fetch_result_by_height(&self, height: u64) -> Result<Arc<ElectionResult>> {
        let url = self.result_url(height);
        debug!(%url, "fetching election result");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("result request failed: {url}"))?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(anyhow!("no result at height {height}")),
            other => {
                let body = error_body(resp.text().await);
                return Err(anyhow!(
                    "result service http error status={} body={}",
                    other.as_u16(),
                    body
                ));
            }
        }

        let result: ElectionResult = resp
            .json()
            .await
            .context("result response json decode failed")?;
        result
            .validate()
            .with_context(|| format!("result at height {height} is malformed"))?;
        Ok(Arc::new(result))
    }
}

fn error_body(text: reqwest::Result<String>) -> String {
    match text {
        Ok(t) => t.trim().to_string(),
        Err(e) => format!("<unreadable: {e}>"),
    }
}
