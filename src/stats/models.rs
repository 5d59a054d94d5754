// usbtop - Statistics Models
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Data structures for windowed statistics.

/// One observed packet: when it was seen and how many bytes it carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the process epoch.
    pub timestamp: f64,
    pub size: u64,
}

/// Result of the most recently closed window.
///
/// Published as a single value so the bandwidth and the sample rate a
/// reader sees always come from the same closure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClosedWindow {
    /// Bytes per second over the closed window.
    pub bandwidth: f64,
    /// Number of packets in the closed window.
    pub sample_rate: u64,
}

/// Renderer-ready view of one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSnapshot {
    /// Bandwidth of the last closed window, bytes/sec.
    pub bandwidth_instant: f64,
    /// Packets in the last closed window.
    pub sample_rate: u64,
    /// Lifetime mean bandwidth, bytes/sec.
    pub bandwidth_mean: f64,
    pub total_bytes: u64,
    pub total_samples: u64,
}
