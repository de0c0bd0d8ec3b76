use super::*;
use crate::kernel::services::ports::config::{AUTO_SAVE_EDITOR, AUTO_SAVE_INTERVAL};
use crate::kernel::services::ports::ConfigurationExt;
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let service = ConfigService::load(dir.path().join("settings.json"));

    assert!(!service.auto_save_enabled());
    assert_eq!(service.auto_save_interval(), Duration::from_secs(5));
}

#[test]
fn test_load_reads_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "AutoSaveEditor": true, "AutoSaveInterval": 1500 }"#).unwrap();

    let service = ConfigService::load(&path);
    assert!(service.auto_save_enabled());
    assert_eq!(service.auto_save_interval(), Duration::from_millis(1500));
}

#[test]
fn test_malformed_file_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "not json").unwrap();

    let service = ConfigService::load(&path);
    assert!(service.roaming_value(AUTO_SAVE_EDITOR).is_none());
}

#[test]
fn test_save_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let service = ConfigService::load(&path);
    service.set_roaming_value(AUTO_SAVE_EDITOR, json!(true));
    service.set_roaming_value(AUTO_SAVE_INTERVAL, json!(800));
    service.save().unwrap();

    let reloaded = ConfigService::load(&path);
    assert!(reloaded.auto_save_enabled());
    assert_eq!(reloaded.auto_save_interval(), Duration::from_millis(800));
}

#[test]
fn test_in_memory_save_is_noop() {
    let service = ConfigService::in_memory();
    service.set_roaming_value(AUTO_SAVE_EDITOR, json!(true));
    assert!(service.save().is_ok());
    assert!(service.path().is_none());
    assert!(service.auto_save_enabled());
}
