//! Unit tests for sketch pad settings.

use digitpad::settings::{SettingsError, SketchSettings};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let settings = SketchSettings::default();
    assert_eq!(settings.brush_width, 20.0);
    assert_eq!(settings.settle_delay(), Duration::from_millis(400));
    assert_eq!((settings.canvas_width, settings.canvas_height), (400, 400));
    assert_eq!(settings.ink_color, [0, 0, 0, 255]);
    assert!(!settings.offload_classification);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_empty_object_is_default() {
    let settings = SketchSettings::from_json_str("{}").unwrap();
    assert_eq!(settings, SketchSettings::default());
}

#[test]
fn test_partial_settings_keep_other_defaults() {
    let settings =
        SketchSettings::from_json_str(r#"{"brush_width": 12.5, "offload_classification": true}"#)
            .unwrap();
    assert_eq!(settings.brush_width, 12.5);
    assert!(settings.offload_classification);
    assert_eq!(settings.settle_delay_ms, 400);
}

#[test]
fn test_rejects_non_positive_brush() {
    for json in [r#"{"brush_width": 0.0}"#, r#"{"brush_width": -4.0}"#] {
        let err = SketchSettings::from_json_str(json).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)), "{}", json);
    }
}

#[test]
fn test_rejects_empty_canvas() {
    let err = SketchSettings::from_json_str(r#"{"canvas_width": 0}"#).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
}

#[test]
fn test_rejects_transparent_ink() {
    let err = SketchSettings::from_json_str(r#"{"ink_color": [0, 0, 0, 0]}"#).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert!(err.to_string().contains("ink_color"));
}

#[test]
fn test_malformed_json() {
    let err = SketchSettings::from_json_str("{brush_width: }").unwrap_err();
    assert!(matches!(err, SettingsError::Json(_)));
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    std::fs::write(&path, r#"{"settle_delay_ms": 250, "canvas_width": 280}"#).unwrap();

    let settings = SketchSettings::load(&path).unwrap();
    assert_eq!(settings.settle_delay(), Duration::from_millis(250));
    assert_eq!(settings.canvas_width, 280);
    assert_eq!(settings.canvas_height, 400);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = SketchSettings::load(&temp_dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let settings = SketchSettings {
        brush_width: 8.0,
        ink_color: [20, 40, 60, 200],
        ..SketchSettings::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

    assert_eq!(SketchSettings::load(&path).unwrap(), settings);
}
