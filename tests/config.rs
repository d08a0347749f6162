//! Configuration system tests
//!
//! Tests for config paths and engine config loading/saving.

use caret::config::EngineConfig;
use caret::config_paths;
use caret::editable::EffectAllowed;
use tempfile::TempDir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_caret() {
    let Some(dir) = config_paths::config_dir() else {
        return;
    };
    assert!(dir.to_string_lossy().contains("caret"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let Some(path) = config_paths::config_file() else {
        return;
    };
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) else {
        return;
    };
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Engine Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = EngineConfig::default();
    assert_eq!(config.cursor_delay_ms, 1000);
    assert_eq!(config.cursor_duration_ms, 600);
    assert!(config.style_copy_paste);
    assert_eq!(config.drop_effect_allowed, EffectAllowed::CopyMove);
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = EngineConfig {
        cursor_delay_ms: 500,
        style_copy_paste: false,
        drop_effect_allowed: EffectAllowed::Copy,
        ..EngineConfig::default()
    };

    config.save_to(&path).unwrap();
    assert!(path.exists());
    assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
}

#[test]
fn test_partial_yaml_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "cursor_duration_ms: 250\ndrop_effect_allowed: move\n").unwrap();

    let config = EngineConfig::load_from(&path).unwrap();
    assert_eq!(config.cursor_duration_ms, 250);
    assert_eq!(config.drop_effect_allowed, EffectAllowed::Move);
    assert_eq!(config.cursor_delay_ms, 1000);
    assert!(config.style_copy_paste);
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "cursor_delay_ms: [not, a, number]\n").unwrap();

    let err = EngineConfig::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = EngineConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read config"));
}
