// usbtop - Configuration
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Application settings management using a local JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capture::USBMON_DIR;
use crate::stats::WINDOW_SECOND;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Statistics window length in seconds.
    #[serde(default = "default_window_duration")]
    pub window_duration: f64,
    /// Delay between two refreshes of the display.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Directory holding the usbmon text files.
    #[serde(default = "default_usbmon_dir")]
    pub usbmon_dir: PathBuf,
    /// Show lifetime mean bandwidth columns.
    #[serde(default)]
    pub show_mean: bool,
}

fn default_window_duration() -> f64 { WINDOW_SECOND }
fn default_refresh_interval_ms() -> u64 { 250 }
fn default_usbmon_dir() -> PathBuf { PathBuf::from(USBMON_DIR) }

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_duration: default_window_duration(),
            refresh_interval_ms: default_refresh_interval_ms(),
            usbmon_dir: default_usbmon_dir(),
            show_mean: false,
        }
    }
}

impl AppSettings {
    /// Reject values the statistics engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.window_duration.is_finite() && self.window_duration > 0.0) {
            bail!(
                "Window duration must be a positive number of seconds, got {}",
                self.window_duration
            );
        }
        if self.refresh_interval_ms == 0 {
            bail!("Refresh interval must be at least 1 ms");
        }
        Ok(())
    }
}

/// Settings manager that persists to a JSON file.
#[derive(Debug)]
pub struct Settings {
    settings: AppSettings,
    path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create a new Settings instance, loading from the user config dir.
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("usbtop")
            .join("settings.json");
        Self::load(path)
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to parse settings: {}", e);
                        AppSettings::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings: {}", e);
                    AppSettings::default()
                }
            }
        } else {
            AppSettings::default()
        };

        Self { settings, path }
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.settings)
            .context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to save settings to {}", self.path.display()))?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Current values.
    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    /// Get the window duration in seconds.
    pub fn window_duration(&self) -> f64 {
        self.settings.window_duration
    }

    /// Set the window duration in seconds.
    pub fn set_window_duration(&mut self, seconds: f64) {
        self.settings.window_duration = seconds;
    }

    /// Get the refresh interval in milliseconds.
    pub fn refresh_interval_ms(&self) -> u64 {
        self.settings.refresh_interval_ms
    }

    /// Set the refresh interval in milliseconds.
    pub fn set_refresh_interval_ms(&mut self, ms: u64) {
        self.settings.refresh_interval_ms = ms;
    }

    /// Get the usbmon directory.
    pub fn usbmon_dir(&self) -> &Path {
        &self.settings.usbmon_dir
    }

    /// Set the usbmon directory.
    pub fn set_usbmon_dir(&mut self, dir: PathBuf) {
        self.settings.usbmon_dir = dir;
    }

    /// Get whether mean bandwidth columns are shown.
    pub fn show_mean(&self) -> bool {
        self.settings.show_mean
    }

    /// Set whether mean bandwidth columns are shown.
    pub fn set_show_mean(&mut self, enabled: bool) {
        self.settings.show_mean = enabled;
    }
}
