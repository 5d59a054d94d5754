// usbtop - Command Line
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Command-line options. Every option overrides the saved settings for the
//! current run only, unless `--save-settings` is given.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::stats::WINDOW_MINUTE;

/// Live per-device USB bandwidth monitor.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "usbtop", version, about)]
pub struct Cli {
    /// List capturable USB buses and exit
    #[arg(short, long)]
    pub list: bool,

    /// Only monitor this bus (repeatable)
    #[arg(short = 'b', long = "bus", value_name = "ID")]
    pub buses: Vec<u16>,

    /// Statistics window in seconds
    #[arg(short, long, value_name = "SECS", conflicts_with = "minute")]
    pub window: Option<f64>,

    /// Use a one-minute statistics window
    #[arg(long)]
    pub minute: bool,

    /// Refresh interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub interval: Option<u64>,

    /// Write CSV rows to PATH instead of the console table ("-" for stdout)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Show lifetime mean bandwidth columns
    #[arg(long)]
    pub mean: bool,

    /// Directory holding the usbmon text files
    #[arg(long, value_name = "DIR")]
    pub usbmon_dir: Option<PathBuf>,

    /// Persist the effective settings as the new defaults
    #[arg(long)]
    pub save_settings: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if self.minute {
            settings.set_window_duration(WINDOW_MINUTE);
        } else if let Some(window) = self.window {
            settings.set_window_duration(window);
        }
        if let Some(ms) = self.interval {
            settings.set_refresh_interval_ms(ms);
        }
        if self.mean {
            settings.set_show_mean(true);
        }
        if let Some(dir) = &self.usbmon_dir {
            settings.set_usbmon_dir(dir.clone());
        }
    }
}
