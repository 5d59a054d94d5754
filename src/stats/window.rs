// usbtop - Sample Window
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Resetting time window for one traffic direction of one device.
//!
//! Samples accumulate into an open window. When a sample arrives at least
//! `window_duration` seconds after the window started, the open window is
//! closed into a [`ClosedWindow`] record and a new window starts at that
//! sample. Readers only ever see closed windows, so the reported rate lags by
//! up to one window but never divides by a near-zero elapsed time.
//!
//! # Concurrency
//!
//! ```text
//! capture thread ── push ──► OpenWindow (mutex, writer only)
//!                        └─► ClosedWindow (rwlock, once per closure)
//! render thread ── bandwidth_instant / sample_rate ──► ClosedWindow copy
//! ```
//!
//! Lifetime totals are atomics and never need a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::context::StatsContext;
use super::models::{ClosedWindow, Sample, WindowSnapshot};

/// Initial capacity of the open-window sample buffer.
const INITIAL_BUFFER_SIZE: usize = 128;

/// State of the window currently accumulating.
#[derive(Debug)]
struct OpenWindow {
    /// `None` until the first sample arrives.
    start: Option<f64>,
    bytes: u64,
    samples: Vec<Sample>,
}

impl Default for OpenWindow {
    fn default() -> Self {
        Self {
            start: None,
            bytes: 0,
            samples: Vec::with_capacity(INITIAL_BUFFER_SIZE),
        }
    }
}

/// Windowed accumulator for one direction of one device.
#[derive(Debug)]
pub struct SampleWindow {
    context: Arc<StatsContext>,
    total_samples: AtomicU64,
    total_bytes: AtomicU64,
    open: Mutex<OpenWindow>,
    closed: RwLock<ClosedWindow>,
}

impl SampleWindow {
    /// Create an empty window bound to a shared context.
    pub fn new(context: Arc<StatsContext>) -> Self {
        Self {
            context,
            total_samples: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            open: Mutex::new(OpenWindow::default()),
            closed: RwLock::new(ClosedWindow::default()),
        }
    }

    /// Record one packet of `size` bytes seen at `timestamp` seconds.
    ///
    /// Samples older than the open window's start are folded into the open
    /// window; the start time never moves backwards.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is NaN or infinite.
    pub fn push(&self, timestamp: f64, size: u64) {
        assert!(
            timestamp.is_finite(),
            "sample timestamp must be finite, got {}",
            timestamp
        );

        self.context.observe_sample(timestamp);
        self.total_samples.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(size, Ordering::Relaxed);

        let sample = Sample { timestamp, size };
        let mut open = lock(&self.open);
        let start = *open.start.get_or_insert(timestamp);
        let elapsed = timestamp - start;

        if elapsed >= self.context.window_duration() {
            let closed = ClosedWindow {
                bandwidth: open.bytes as f64 / elapsed,
                sample_rate: open.samples.len() as u64,
            };
            *self.closed.write().unwrap_or_else(PoisonError::into_inner) = closed;

            open.start = Some(timestamp);
            open.bytes = size;
            open.samples.clear();
            open.samples.push(sample);
        } else {
            open.bytes += size;
            open.samples.push(sample);
        }
    }

    /// Bandwidth of the last closed window in bytes/sec, 0 before any window
    /// has closed.
    pub fn bandwidth_instant(&self) -> f64 {
        self.closed_window().bandwidth
    }

    /// Packet count of the last closed window, 0 before any window has closed.
    pub fn sample_rate(&self) -> u64 {
        self.closed_window().sample_rate
    }

    /// Lifetime mean bandwidth in bytes/sec as of `now`.
    ///
    /// Returns 0 when no sample has been seen yet or when `now` is not after
    /// the first sample.
    pub fn bandwidth_mean(&self, now: f64) -> f64 {
        let Some(t0) = self.context.t0() else {
            return 0.0;
        };
        let elapsed = now - t0;
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.total_bytes() as f64 / elapsed
    }

    /// Copy of the last closed window.
    pub fn closed_window(&self) -> ClosedWindow {
        *self.closed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent view of this window for renderers.
    pub fn snapshot(&self, now: f64) -> WindowSnapshot {
        let closed = self.closed_window();
        WindowSnapshot {
            bandwidth_instant: closed.bandwidth,
            sample_rate: closed.sample_rate,
            bandwidth_mean: self.bandwidth_mean(now),
            total_bytes: self.total_bytes(),
            total_samples: self.total_samples(),
        }
    }

    /// Lifetime byte count.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    /// Lifetime packet count.
    pub fn total_samples(&self) -> u64 {
        self.total_samples.load(Ordering::Relaxed)
    }

    /// Start time of the open window, `None` before the first sample.
    pub fn window_start(&self) -> Option<f64> {
        lock(&self.open).start
    }

    /// Bytes accumulated in the open window.
    pub fn window_bytes(&self) -> u64 {
        lock(&self.open).bytes
    }

    /// Samples inside the open window.
    pub fn current_samples(&self) -> Vec<Sample> {
        lock(&self.open).samples.clone()
    }
}

fn lock(open: &Mutex<OpenWindow>) -> MutexGuard<'_, OpenWindow> {
    open.lock().unwrap_or_else(PoisonError::into_inner)
}
