// usbtop - Library Root
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! usbtop - live per-device USB bandwidth statistics.
//!
//! ```text
//! usbmon → capture → UsbBuses → DirectionalStats → SampleWindow
//!                        └── snapshot ──► output (console / CSV)
//! ```

pub mod application;
pub mod bus;
pub mod capture;
pub mod cli;
pub mod clock;
pub mod config;
pub mod output;
pub mod stats;
