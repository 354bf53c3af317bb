use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use pulse_app::platform::config::{
    load_file_config, resolve, CliOverrides, ConfigError, FileConfig,
};
use tempfile::tempdir;

#[test]
fn defaults_mirror_pipeline_defaults() {
    let config = resolve(FileConfig::default(), None, CliOverrides::default()).unwrap();

    assert_eq!(config.pipeline.api_base_url, "http://localhost:8000");
    assert_eq!(config.pipeline.max_comments, 200);
    assert_eq!(config.pipeline.top_comments, 25);
    assert_eq!(config.pipeline.request_timeout, Duration::from_secs(30));
    assert_eq!(config.output_dir, PathBuf::from("./output"));
}

#[test]
fn partial_ron_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pulse.ron");
    std::fs::write(
        &path,
        r#"(
            api_base_url: "http://backend:9000",
            max_comments: 50,
        )"#,
    )
    .unwrap();

    let file = load_file_config(Some(&path)).unwrap();

    assert_eq!(file.api_base_url, "http://backend:9000");
    assert_eq!(file.max_comments, 50);
    assert_eq!(file.page_size, 100);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pulse.ron");
    std::fs::write(&path, "(max_comments: \"lots\")").unwrap();

    let err = load_file_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pulse.ron");
    std::fs::write(&path, "(max_coments: 5)").unwrap();

    assert!(load_file_config(Some(&path)).is_err());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_file_config(Some(&dir.path().join("absent.ron"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn api_key_precedence() {
    let file = FileConfig {
        api_key: "from-file".to_string(),
        ..FileConfig::default()
    };

    let from_file = resolve(file.clone(), Some("from-env".to_string()), CliOverrides::default())
        .unwrap();
    assert_eq!(from_file.pipeline.api_key, "from-file");

    let from_env = resolve(
        FileConfig::default(),
        Some("from-env".to_string()),
        CliOverrides::default(),
    )
    .unwrap();
    assert_eq!(from_env.pipeline.api_key, "from-env");

    let from_cli = resolve(
        file,
        Some("from-env".to_string()),
        CliOverrides {
            api_key: Some("from-cli".to_string()),
            ..CliOverrides::default()
        },
    )
    .unwrap();
    assert_eq!(from_cli.pipeline.api_key, "from-cli");
}

#[test]
fn cli_flags_override_file_values() {
    let file = FileConfig {
        max_comments: 50,
        ..FileConfig::default()
    };
    let config = resolve(
        file,
        None,
        CliOverrides {
            api_base_url: Some("https://scores.example.com".to_string()),
            max_comments: Some(120),
            output_dir: Some(PathBuf::from("/tmp/pulse-out")),
            ..CliOverrides::default()
        },
    )
    .unwrap();

    assert_eq!(config.pipeline.api_base_url, "https://scores.example.com");
    assert_eq!(config.pipeline.max_comments, 120);
    assert_eq!(config.output_dir, PathBuf::from("/tmp/pulse-out"));
}

#[test]
fn invalid_values_are_rejected() {
    let bad_url = FileConfig {
        api_base_url: "localhost:8000".to_string(),
        ..FileConfig::default()
    };
    assert!(matches!(
        resolve(bad_url, None, CliOverrides::default()),
        Err(ConfigError::Invalid(pulse_engine::ConfigError::UnsupportedScheme {
            field: "api_base_url",
            ..
        }))
    ));

    let zero = CliOverrides {
        max_comments: Some(0),
        ..CliOverrides::default()
    };
    assert!(matches!(
        resolve(FileConfig::default(), None, zero),
        Err(ConfigError::Invalid(pulse_engine::ConfigError::Zero {
            field: "max_comments"
        }))
    ));
}
