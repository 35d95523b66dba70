//! Tests for logging functionality

use harnessviz::core::logging::{init_logging, resolve_format, resolve_level, LogFormat};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_explicit_values_win() {
    assert_eq!(resolve_level(Some("trace")), "trace");
    assert_eq!(resolve_format(Some("pretty")).unwrap(), LogFormat::Pretty);
    assert!(resolve_format(Some("fancy")).is_err());
}

#[test]
fn test_init_logging_with_levels() {
    // only the first call installs a subscriber; the rest must not panic
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("info"), Some("json"));
    let _ = init_logging(Some("off"), Some("pretty"));
}
