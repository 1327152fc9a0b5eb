//! Integration tests for application state persistence.

use imagelab_rs::config::{AppState, UiPreferences, MAX_RECENT_IMAGES};

#[test]
fn test_app_state_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("app_state.json");

    let mut state = AppState::default();
    state.ui_preferences.live_mode = false;
    state.ui_preferences.debounce_ms = 400;
    state.add_recent_image("/photos/cat.png");
    state.add_recent_image("/photos/dog.png");
    state.save_to(&path).expect("save");

    let loaded = AppState::load_from(&path).expect("load");
    assert!(!loaded.ui_preferences.live_mode);
    assert_eq!(loaded.ui_preferences.debounce_ms, 400);
    assert_eq!(loaded.recent_images.len(), 2);
    // Most recent first.
    assert_eq!(
        loaded.recent_images[0].path,
        std::path::PathBuf::from("/photos/dog.png")
    );
}

#[test]
fn test_malformed_state_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("app_state.json");
    std::fs::write(&path, "{ this is not json").expect("write");
    assert!(AppState::load_from(&path).is_err());
}

#[test]
fn test_partial_state_file_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("app_state.json");
    // Older state files may predate newer preference fields.
    std::fs::write(&path, r#"{"recent_images": []}"#).expect("write");
    let loaded = AppState::load_from(&path).expect("load");
    let defaults = UiPreferences::default();
    assert_eq!(loaded.ui_preferences.live_mode, defaults.live_mode);
    assert_eq!(loaded.ui_preferences.debounce_ms, defaults.debounce_ms);
}

#[test]
fn test_recents_capped() {
    let mut state = AppState::default();
    for i in 0..(MAX_RECENT_IMAGES + 5) {
        state.add_recent_image(format!("/photos/{i}.png"));
    }
    assert_eq!(state.recent_images.len(), MAX_RECENT_IMAGES);
}
