//! election-config
//!
//! Layered YAML configuration for the committee and its tooling.
//!
//! - YAML documents are merged in order (earlier = base, later = override).
//! - The merged document is hashed over its canonical JSON form so two
//!   operators can confirm they run the same settings.
//! - Literal secrets are refused; endpoints carrying API keys belong in env.
//!   A consumer-aware load only refuses secrets under keys that consumer
//!   reads and masks the rest, so shared committee files with keyed chain
//!   APIs still load for tools that never touch them.
//! - Typed views ([`CommitteeConfig`], [`DumperConfig`]) are decoded from the
//!   merged JSON and validated before use.

mod committee;
mod consumption;

pub use committee::{CommitteeConfig, DumperConfig, DEFAULT_EPOCH_ENDPOINT};
pub use consumption::{
    consumed_pointers_for, report_unused_keys, ConfigConsumer, UnusedKeyPolicy, UnusedKeyReport,
};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

/// Leaf string values starting with any of these abort the load with
/// CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // OpenAI style
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
];

/// Replacement for secret-like values under keys the consumer does not read.
pub const REDACTED: &str = "REDACTED";

/// URL path fragments that embed a provider key (e.g. `https://mainnet.infura.io/v3/<key>`).
const SECRET_URL_MARKERS: &[&str] = &["/v3/"];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Decode the merged document into a typed config.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.config_json.clone()).context("config decode failed")
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = read_docs(paths)?;
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let merged = merge_docs(yaml_docs)?;
    enforce_no_secret_literals(&merged)?;
    finish(merged)
}

/// Layered load for one consumer.
///
/// Secret-like values under pointers `consumer` reads still abort the load.
/// Elsewhere they are replaced by [`REDACTED`] in both the JSON and the
/// hashed form, and the key stays visible to the unused-key report.
pub fn load_layered_yaml_for(consumer: ConfigConsumer, paths: &[&str]) -> Result<LoadedConfig> {
    let docs = read_docs(paths)?;
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings_for(consumer, &doc_refs)
}

pub fn load_layered_yaml_from_strings_for(
    consumer: ConfigConsumer,
    yaml_docs: &[&str],
) -> Result<LoadedConfig> {
    let mut merged = merge_docs(yaml_docs)?;
    let masked = redact_unconsumed_secrets(consumer, &mut merged)?;
    if masked > 0 {
        tracing::warn!(
            consumer = consumer.as_str(),
            masked,
            "secret-like values under unread keys were redacted"
        );
    }
    finish(merged)
}

/// Load the layered files and decode a validated [`DumperConfig`].
///
/// Unused keys are reported as warnings; a full committee config file carries
/// chain-sync settings this tool never reads.
pub fn load_dumper_config(paths: &[&str]) -> Result<(LoadedConfig, DumperConfig)> {
    let loaded = load_layered_yaml_for(ConfigConsumer::Dumper, paths)?;
    let report = report_unused_keys(
        ConfigConsumer::Dumper,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )?;
    if !report.is_clean() {
        tracing::warn!(
            unused = report.unused_leaf_pointers.len(),
            first = ?report.unused_leaf_pointers.first(),
            "config carries keys the dumper does not read"
        );
    }

    let cfg: DumperConfig = loaded.decode()?;
    cfg.validate()?;
    Ok((loaded, cfg))
}

fn read_docs(paths: &[&str]) -> Result<Vec<String>> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    Ok(docs)
}

fn merge_docs(yaml_docs: &[&str]) -> Result<Value> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }
    Ok(merged)
}

fn finish(merged: Value) -> Result<LoadedConfig> {
    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is a BTreeMap, so keys serialize sorted.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    consumption::collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(s) = v.pointer(&ptr).and_then(|val| val.as_str()) {
            if looks_like_secret(s) {
                bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
            }
        }
    }
    Ok(())
}

fn redact_unconsumed_secrets(consumer: ConfigConsumer, v: &mut Value) -> Result<usize> {
    let mut leaves = Vec::new();
    consumption::collect_leaf_pointers(v, "", &mut leaves);

    let mut masked = 0;
    for ptr in leaves {
        let Some(leaf) = v.pointer_mut(&ptr) else {
            continue;
        };
        if !leaf.as_str().is_some_and(looks_like_secret) {
            continue;
        }
        if consumption::is_consumed(consumer, &ptr) {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
        }
        *leaf = Value::String(REDACTED.to_string());
        masked += 1;
    }
    Ok(masked)
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    if SECRET_PREFIXES.iter().any(|p| t.starts_with(p)) {
        return true;
    }
    SECRET_URL_MARKERS.iter().any(|m| match t.find(m) {
        Some(i) => t.len() > i + m.len(),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_provider_url_is_a_secret() {
        assert!(looks_like_secret("https://mainnet.infura.io/v3/abcdef0123456789"));
        assert!(!looks_like_secret("https://mainnet.infura.io/v3/"));
        assert!(!looks_like_secret("http://api.iotex.one:80"));
    }

    #[test]
    fn short_strings_are_never_secrets() {
        assert!(!looks_like_secret("sk-1"));
    }

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let a = serde_json::json!({"a": {"x": 1, "y": 2}});
        let b = serde_json::json!({"a": {"y": 3}});
        assert_eq!(deep_merge(a, b), serde_json::json!({"a": {"x": 1, "y": 3}}));
    }
}
