// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application services — owns the persisted editor settings and knows where
// exports go. Shared with Dioxus components via `use_context::<AppServices>()`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use retusche_core::EditorConfig;
use retusche_core::error::Result;
use tracing::{info, warn};

use super::data_dir;

/// Cheaply cloneable handle to the settings store.
#[derive(Clone)]
pub struct AppServices {
    /// `None` when running without persistent storage.
    data_dir: Option<PathBuf>,
    config: Arc<Mutex<EditorConfig>>,
}

impl AppServices {
    /// Resolve the data directory and load saved settings (defaults when
    /// there are none or they cannot be read).
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising app services");
        Ok(Self::with_data_dir(dir))
    }

    /// Services rooted at an explicit directory.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        let config = load_config(&dir).unwrap_or_default();
        Self {
            data_dir: Some(dir),
            config: Arc::new(Mutex::new(config)),
        }
    }

    /// In-memory services: default settings, nothing persisted.
    pub fn fallback() -> Self {
        Self {
            data_dir: None,
            config: Arc::new(Mutex::new(EditorConfig::default())),
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> EditorConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Validate, update, and persist the config.
    pub fn save_config(&self, config: &EditorConfig) -> Result<()> {
        config.validate()?;
        *self.config.lock().expect("config lock poisoned") = config.clone();
        match &self.data_dir {
            Some(dir) => persist_config(dir, config),
            None => {
                warn!("no data directory; settings kept for this session only");
                Ok(())
            }
        }
    }

    // -- Exports -------------------------------------------------------------

    /// Default folder offered by the save dialog.
    pub fn exports_dir(&self) -> Option<PathBuf> {
        let dir = self.data_dir.as_ref()?.join("exports");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                warn!(error = %e, "exports directory unavailable");
                None
            }
        }
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<EditorConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<EditorConfig>(&data) {
        Ok(config) if config.validate().is_ok() => Some(config),
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "ignoring unreadable or invalid settings file");
            None
        }
    }
}

/// Read a settings file given on the command line. Unlike the persisted
/// file, errors here are reported.
pub fn read_config_file(path: &Path) -> Result<EditorConfig> {
    let data = std::fs::read_to_string(path)?;
    let config: EditorConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}

fn persist_config(data_dir: &Path, config: &EditorConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retusche_core::{MaskMode, RetuscheError};

    #[test]
    fn saved_settings_reload() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let config = EditorConfig {
            tolerance: 25.0,
            mask_mode: MaskMode::Lasso,
            ..EditorConfig::default()
        };
        svc.save_config(&config).unwrap();

        let reloaded = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.config(), config);
    }

    #[test]
    fn invalid_settings_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let bad = EditorConfig {
            stroke_width: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            svc.save_config(&bad),
            Err(RetuscheError::InvalidConfig(_))
        ));
        assert_eq!(svc.config(), EditorConfig::default());
        assert!(!dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(svc.config(), EditorConfig::default());
    }

    #[test]
    fn explicit_config_file_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "blur_sigma": 0.0 }"#).unwrap();
        assert!(matches!(
            read_config_file(&path),
            Err(RetuscheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fallback_keeps_settings_in_memory() {
        let svc = AppServices::fallback();
        let config = EditorConfig {
            brightness_factor: 2.0,
            ..EditorConfig::default()
        };
        svc.save_config(&config).unwrap();
        assert_eq!(svc.config().brightness_factor, 2.0);
        assert!(svc.exports_dir().is_none());
    }
}
