// usbtop - Process Clock
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Monotonic seconds since process start, shared by capture and rendering.

use std::time::Instant;

/// Clock anchored at a fixed epoch.
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    epoch: Instant,
}

impl Default for ProcessClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessClock {
    /// Start a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Seconds elapsed since the epoch.
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}
