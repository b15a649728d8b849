use election_config::{
    load_layered_yaml_from_strings, load_layered_yaml_from_strings_for, report_unused_keys,
    ConfigConsumer, UnusedKeyPolicy,
};

/// A full committee file carries chain-sync keys neither consumer reads.
const FULL_COMMITTEE_YAML: &str = r#"
gravityChainStartHeight: 7368630
gravityChainHeightInterval: 100
cacheSize: 1000
gravityChainAPIs:
  - "https://mainnet.infura.io/v3/b355cae6fafc4302b106b937ee6c15af"
numOfRetries: 8
paginationSize: 100
stakingContractAddress: "0x87c9dbff0016af23f5b1ab9b8e072124ab729193"
"#;

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let loaded =
        load_layered_yaml_from_strings_for(ConfigConsumer::Committee, &[FULL_COMMITTEE_YAML])
            .unwrap();

    let report = report_unused_keys(
        ConfigConsumer::Committee,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )
    .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/gravityChainAPIs/0".to_string(),
            "/numOfRetries".to_string(),
            "/paginationSize".to_string(),
            "/stakingContractAddress".to_string(),
        ],
        "unused pointers must be sorted deterministically"
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let loaded =
        load_layered_yaml_from_strings_for(ConfigConsumer::Committee, &[FULL_COMMITTEE_YAML])
            .unwrap();

    let result = report_unused_keys(
        ConfigConsumer::Committee,
        &loaded.config_json,
        UnusedKeyPolicy::Fail,
    );

    let msg = format!("{:?}", result.err().expect("fail policy must error"));
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
}

#[test]
fn dumper_consumes_endpoints_that_committee_does_not() {
    let yaml = r#"
gravityChainStartHeight: 1
gravityChainHeightInterval: 1
endpoint: "http://127.0.0.1:1"
resultApi: "http://127.0.0.1:2"
"#;
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let dumper = report_unused_keys(
        ConfigConsumer::Dumper,
        &loaded.config_json,
        UnusedKeyPolicy::Fail,
    )
    .expect("every key is read by the dumper");
    assert!(dumper.is_clean());

    let committee = report_unused_keys(
        ConfigConsumer::Committee,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )
    .unwrap();
    assert_eq!(
        committee.unused_leaf_pointers,
        vec!["/endpoint".to_string(), "/resultApi".to_string()]
    );
}
