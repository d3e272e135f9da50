//! Config file loading against real files on disk.

#![allow(clippy::unwrap_used)]

use std::fs;

use loopdeck::config::Config;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.timing.poll_interval_ms, 2000);
    assert_eq!(config.timing.recency_window_ms, 3000);
    assert_eq!(config.timing.auto_hide_ms, 8000);
    assert_eq!(config.playback.volume_step, 10);
}

#[test]
fn partial_file_overrides_only_named_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[backend]
base_url = "http://192.168.1.20:5000"

[timing]
poll_interval_ms = 500
minimize_grace_ms = 250

[playback]
volume_step = 5
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.backend.base_url, "http://192.168.1.20:5000");
    assert_eq!(config.timing.poll_interval_ms, 500);
    assert_eq!(config.timing.minimize_grace_ms, 250);
    // Unnamed fields keep their defaults.
    assert_eq!(config.timing.recency_window_ms, 3000);
    assert_eq!(config.timing.endpoint_debounce_ms, 150);
    assert_eq!(config.timing.button_debounce_ms, 200);
    assert_eq!(config.timing.command_timeout_ms, 3000);
    assert_eq!(config.timing.auto_hide_ms, 8000);
    assert_eq!(config.playback.volume_step, 5);
}

#[test]
fn malformed_file_is_an_error_not_a_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "backend = not valid toml {{").unwrap();

    assert!(Config::load_from(&path).is_err());
}
