//! Config hash stability
//!
//! GREEN when:
//! - the same inputs hash identically across calls
//! - key order inside a YAML document does not change the hash
//! - different values produce different hashes
//! - merge layers apply in order and hash stably

use election_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
gravityChainStartHeight: 7368630
gravityChainHeightInterval: 100
cacheSize: 1000
endpoint: "http://api.iotex.one:80"
resultApi: "http://127.0.0.1:8080"
"#;

const BASE_YAML_REORDERED: &str = r#"
resultApi: "http://127.0.0.1:8080"
cacheSize: 1000
endpoint: "http://api.iotex.one:80"
gravityChainHeightInterval: 100
gravityChainStartHeight: 7368630
"#;

const OVERLAY_YAML: &str = r#"
gravityChainHeightInterval: 50
resultApi: "http://results.internal:9000"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_base_and_keeps_untouched_keys() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    let interval = loaded
        .config_json
        .pointer("/gravityChainHeightInterval")
        .and_then(|v| v.as_u64())
        .unwrap();
    assert_eq!(interval, 50, "overlay must override the base interval");

    let start = loaded
        .config_json
        .pointer("/gravityChainStartHeight")
        .and_then(|v| v.as_u64())
        .unwrap();
    assert_eq!(start, 7_368_630, "keys absent from the overlay survive");
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn literal_secret_aborts_load() {
    let yaml = r#"
gravityChainApis:
  - "https://mainnet.infura.io/v3/0123456789abcdef"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("CONFIG_SECRET_DETECTED"), "got: {msg}");
    assert!(!msg.contains("0123456789abcdef"), "secret value must be redacted");
}
