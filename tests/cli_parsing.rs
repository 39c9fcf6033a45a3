//! Tests for command-line parsing and configuration resolution.

use std::path::PathBuf;

use clap::Parser;
use a11y_reporter::config::{Opt, ScreenshotFormat, ViewportMode};
use a11y_reporter::error_handling::ConfigError;

#[test]
fn test_rejects_unknown_enum_values() {
    assert!(Opt::try_parse_from(["a11y_reporter", "--mode", "tablet"]).is_err());
    assert!(Opt::try_parse_from(["a11y_reporter", "--log-level", "verbose"]).is_err());
    assert!(Opt::try_parse_from(["a11y_reporter", "--log-format", "xml"]).is_err());
    assert!(Opt::try_parse_from(["a11y_reporter", "--concurrency", "many"]).is_err());
}

#[test]
fn test_file_values_survive_when_not_overridden() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("audit.toml");
    std::fs::write(
        &path,
        r#"
url_list = "sites.txt"
mode = "mobile"
screenshot_format = "png"
blocked_domains = ["internal.example", "10.0.0.0/8"]
enable_csv = false
"#,
    )
    .unwrap();

    let opt = Opt::try_parse_from([
        "a11y_reporter",
        "--config",
        path.to_str().unwrap(),
        "--output-dir",
        "out",
    ])
    .unwrap();
    let config = opt.resolve_config().unwrap();

    assert_eq!(config.url_list, PathBuf::from("sites.txt"));
    assert_eq!(config.mode, ViewportMode::Mobile);
    assert_eq!(config.screenshot_format, ScreenshotFormat::Png);
    assert_eq!(config.blocked_domains, ["internal.example", "10.0.0.0/8"]);
    assert!(!config.enable_csv);
    assert_eq!(config.output_directory, PathBuf::from("out"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_a_read_error() {
    let opt = Opt::try_parse_from(["a11y_reporter", "--config", "/nonexistent/audit.toml"]).unwrap();
    assert!(matches!(opt.resolve_config(), Err(ConfigError::Read { .. })));
}

#[test]
fn test_invalid_values_are_all_listed() {
    let opt = Opt::try_parse_from([
        "a11y_reporter",
        "--concurrency",
        "0",
        "--per-domain-concurrency",
        "11",
        "--domain-delay-ms",
        "60001",
    ])
    .unwrap();
    let config = opt.resolve_config().unwrap();
    match config.validate() {
        Err(ConfigError::Invalid(errors)) => {
            assert_eq!(errors.len(), 3);
            assert!(errors[0].starts_with("concurrency"));
            assert!(errors[1].starts_with("per_domain_concurrency"));
            assert!(errors[2].starts_with("domain_delay_ms"));
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}
