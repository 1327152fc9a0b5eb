//! Configuration module for ImageLab.
//!
//! Handles application state persistence: recently opened images and UI
//! preferences (theme, live mode, debounce interval). State is stored as
//! JSON in the platform-appropriate data directory:
//!
//! - **Linux**: `~/.local/share/dev.imagelab.imagelab-rs/`
//! - **macOS**: `~/Library/Application Support/dev.imagelab.imagelab-rs/`
//! - **Windows**: `%APPDATA%\dev.imagelab.imagelab-rs\`
//!
//! Pipelines themselves are never persisted to disk — they travel through
//! the clipboard only.

use crate::error::{ImageLabError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Application identifier for data directories.
pub const APP_ID: &str = "dev.imagelab.imagelab-rs";

/// App state filename.
pub const APP_STATE_FILE: &str = "app_state.json";

/// Maximum number of recent images to remember.
pub const MAX_RECENT_IMAGES: usize = 10;

/// Get the application data directory path.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists.
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ImageLabError::Config("could not determine app data directory".to_string())
    })?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ImageLabError::Config(format!("failed to create app data directory: {e}"))
        })?;
    }
    Ok(dir)
}

/// Get the path to the app state file.
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Recent Image Entry ====================

/// Information about a recently opened image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentImage {
    pub path: PathBuf,
    /// Last opened timestamp (Unix seconds).
    pub last_opened: u64,
}

impl RecentImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            path: path.into(),
            last_opened: now,
        }
    }
}

// ==================== UI Preferences ====================

/// User-facing preferences persisted across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    pub dark_mode: bool,
    /// Whether edits trigger automatic, debounced re-runs.
    pub live_mode: bool,
    /// Settle delay between the last edit and the automatic re-run.
    pub debounce_ms: u64,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            live_mode: true,
            debounce_ms: crate::pipeline::DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

// ==================== App State ====================

/// Persistent application state (recent images, preferences).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub recent_images: Vec<RecentImage>,
    pub ui_preferences: UiPreferences,
}

impl AppState {
    /// Load the app state from the default location, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        match app_state_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("failed to load app state: {e}, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load app state from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| ImageLabError::Config(format!("invalid app state file: {e}")))
    }

    /// Save the app state to the default location.
    pub fn save(&self) -> Result<()> {
        ensure_app_data_dir()?;
        let path = app_state_path()
            .ok_or_else(|| ImageLabError::Config("no app state path".to_string()))?;
        self.save_to(&path)
    }

    /// Save app state to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| ImageLabError::Config(format!("failed to serialize app state: {e}")))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Record an image at the top of the recents list, deduplicated and
    /// truncated to [`MAX_RECENT_IMAGES`].
    pub fn add_recent_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.recent_images.retain(|r| r.path != path);
        self.recent_images.insert(0, RecentImage::new(path));
        self.recent_images.truncate(MAX_RECENT_IMAGES);
    }

    /// Drop recents whose files no longer exist.
    pub fn cleanup_missing_images(&mut self) {
        self.recent_images.retain(|r| r.path.exists());
    }
}
