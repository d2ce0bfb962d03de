// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use std::fs;
use notes_backend_lib::config::{LogFormat, SessionMode, Settings, StorageKind};
use tempfile::tempdir;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.bind_addr.port(), 3000);
    assert_eq!(settings.storage, StorageKind::File);
    assert_eq!(settings.log_format, LogFormat::Pretty);
    assert_eq!(settings.session.mode, SessionMode::Stateless);
    assert_eq!(settings.jwt.expires_in_minutes, 60);
    assert_eq!(settings.jwt.clock_skew_secs, 300);
    assert_eq!(settings.lockout.max_failed_attempts, 5);
    assert_eq!(settings.lockout.lockout_minutes, 5);
    assert!(settings.jwt.key.is_none());
}

#[test]
fn test_load_from_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.yaml");
    fs::write(
        &path,
        "storage: memory\nlog_format: json\njwt:\n  key: yaml-key\n  expires_in_minutes: 15\nsession:\n  mode: strict\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.storage, StorageKind::Memory);
    assert_eq!(settings.log_format, LogFormat::Json);
    assert_eq!(settings.jwt.key.as_deref(), Some("yaml-key"));
    assert_eq!(settings.jwt.expires_in_minutes, 15);
    assert_eq!(settings.session.mode, SessionMode::Strict);
    // untouched sections keep their defaults
    assert_eq!(settings.jwt.issuer, "notes-api");
    assert_eq!(settings.password_requirements.min_length, 8);
}

#[test]
fn test_load_from_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, r#"{ "lockout": { "max_failed_attempts": 3, "lockout_minutes": 10 } }"#).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.lockout.max_failed_attempts, 3);
    assert_eq!(settings.lockout.lockout_minutes, 10);
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.toml");
    fs::write(&path, "[jwt]\nexpires_in_minutes = 0\n").unwrap();
    assert!(Settings::load_from(&path).is_err());

    fs::write(&path, "[session]\nmode = \"sometimes\"\n").unwrap();
    assert!(Settings::load_from(&path).is_err());
}
