use class_schedule::{AppConfig, ConfigError, ELIGIBILITY_THRESHOLD};
use std::fs;
use tempfile::NamedTempFile;

#[test]
fn empty_object_uses_defaults() {
    let config = AppConfig::from_json_str("{}").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.eligibility_threshold, ELIGIBILITY_THRESHOLD);
    assert_eq!(config.http_addr, "0.0.0.0:3000");
}

#[test]
fn config_file_overrides_fields() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        r#"{"course_code": "BCSE301L", "eligibility_threshold": 80.0, "verbosity": 2}"#,
    )
    .unwrap();
    let config = AppConfig::load(tmp.path()).unwrap();
    assert_eq!(config.course_code, "BCSE301L");
    assert_eq!(config.eligibility_threshold, 80.0);
    assert_eq!(config.verbosity, 2);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = AppConfig::from_json_str(r#"{"threshold": 75}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn threshold_outside_percentage_range_is_rejected() {
    let err = AppConfig::from_json_str(r#"{"eligibility_threshold": 120}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = AppConfig::load("/nonexistent/class-schedule.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
