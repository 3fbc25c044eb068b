use chrono::Weekday;
use resource_schedule::{BoundaryPolicy, ConfigError, ConflictScan, SchedulingConfig};
use std::collections::HashMap;
use tempfile::NamedTempFile;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_planning_horizon() {
    let config = SchedulingConfig::default();
    assert_eq!(config.available_hours, 160.0);
    assert_eq!(config.week_start, Weekday::Sun);
    assert_eq!(config.conflict_scan, ConflictScan::AdjacentPairs);
    assert_eq!(config.boundary_policy, BoundaryPolicy::SharedDayAllowed);
}

#[test]
fn overrides_replace_only_the_given_keys() {
    let config = SchedulingConfig::default()
        .with_overrides(lookup(&[
            ("RESOURCE_SCHEDULE_AVAILABLE_HOURS", "120"),
            ("RESOURCE_SCHEDULE_WEEK_START", "monday"),
            ("RESOURCE_SCHEDULE_CONFLICT_SCAN", "all_pairs"),
        ]))
        .unwrap();
    assert_eq!(config.available_hours, 120.0);
    assert_eq!(config.week_start, Weekday::Mon);
    assert_eq!(config.conflict_scan, ConflictScan::AllPairs);
    assert_eq!(config.boundary_policy, BoundaryPolicy::SharedDayAllowed);
}

#[test]
fn invalid_override_is_reported_with_its_key() {
    let err = SchedulingConfig::default()
        .with_overrides(lookup(&[("RESOURCE_SCHEDULE_BOUNDARY_POLICY", "sometimes")]))
        .unwrap_err();
    match err {
        ConfigError::InvalidValue { key, value } => {
            assert_eq!(key, "RESOURCE_SCHEDULE_BOUNDARY_POLICY");
            assert_eq!(value, "sometimes");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn non_positive_horizon_is_rejected() {
    let result = SchedulingConfig::default()
        .with_overrides(lookup(&[("RESOURCE_SCHEDULE_AVAILABLE_HOURS", "0")]));
    assert!(result.is_err());
}

#[test]
fn config_round_trips_through_json_file() {
    let mut config = SchedulingConfig::default();
    config.week_start = Weekday::Mon;
    config.boundary_policy = BoundaryPolicy::SharedDayConflicts;
    let tmp = NamedTempFile::new().unwrap();
    config.save(tmp.path()).unwrap();

    let loaded = SchedulingConfig::load(tmp.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_config_file_falls_back_to_defaults() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), r#"{ "conflict_scan": "all_pairs" }"#).unwrap();
    let loaded = SchedulingConfig::load(tmp.path()).unwrap();
    assert_eq!(loaded.conflict_scan, ConflictScan::AllPairs);
    assert_eq!(loaded.available_hours, 160.0);
}

#[test]
fn config_builds_matching_calculators() {
    let mut config = SchedulingConfig::default();
    config.available_hours = 80.0;
    config.week_start = Weekday::Mon;
    assert_eq!(config.utilization_calculator().available_hours(), 80.0);
    assert_eq!(config.week_navigator().first_weekday(), Weekday::Mon);
    assert_eq!(config.conflict_detector().scan(), ConflictScan::AdjacentPairs);
}
