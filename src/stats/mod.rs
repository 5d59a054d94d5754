// usbtop - Statistics Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Windowed bandwidth and packet-rate statistics.
//!
//! One [`SampleWindow`] accumulates the samples of one direction of one
//! device. [`DirectionalStats`] pairs the two directions of a device. All
//! windows created from the same [`StatsContext`] share its window duration
//! and its lifetime baseline `t0`.

mod context;
mod directional;
pub mod models;
mod window;

pub use context::{StatsContext, WINDOW_MINUTE, WINDOW_SECOND};
pub use directional::{DirectionalStats, Direction};
pub use models::{ClosedWindow, Sample, WindowSnapshot};
pub use window::SampleWindow;
