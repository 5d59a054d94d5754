// usbtop - Directional Statistics
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Per-device pair of sample windows, one per transfer direction.

use std::sync::Arc;

use super::context::StatsContext;
use super::window::SampleWindow;

/// Direction of a USB transfer relative to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Device to host (IN endpoints).
    FromDevice = 0,
    /// Host to device (OUT endpoints).
    ToDevice = 1,
}

impl Direction {
    /// Convert a raw capture-layer tag.
    ///
    /// # Panics
    ///
    /// Panics on any tag other than `0` or `1`; a misrouted sample would
    /// silently corrupt both directions.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::FromDevice,
            1 => Self::ToDevice,
            other => panic!("invalid USB transfer direction tag: {}", other),
        }
    }
}

/// Statistics for both directions of one device.
#[derive(Debug)]
pub struct DirectionalStats {
    from_device: SampleWindow,
    to_device: SampleWindow,
}

impl DirectionalStats {
    /// Create empty statistics sharing `context`.
    pub fn new(context: &Arc<StatsContext>) -> Self {
        Self {
            from_device: SampleWindow::new(Arc::clone(context)),
            to_device: SampleWindow::new(Arc::clone(context)),
        }
    }

    /// Record one packet in the window matching `direction`.
    pub fn push(&self, timestamp: f64, size: u64, direction: Direction) {
        self.window(direction).push(timestamp, size);
    }

    /// Window for `direction`.
    pub fn window(&self, direction: Direction) -> &SampleWindow {
        match direction {
            Direction::FromDevice => &self.from_device,
            Direction::ToDevice => &self.to_device,
        }
    }

    pub fn from_device(&self) -> &SampleWindow {
        &self.from_device
    }

    pub fn to_device(&self) -> &SampleWindow {
        &self.to_device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_isolation() {
        let ctx = Arc::new(StatsContext::new(1.0));
        let stats = DirectionalStats::new(&ctx);

        stats.push(0.0, 4096, Direction::ToDevice);
        stats.push(0.5, 4096, Direction::ToDevice);
        stats.push(1.5, 4096, Direction::ToDevice);

        let from = stats.from_device();
        assert_eq!(from.total_bytes(), 0);
        assert_eq!(from.total_samples(), 0);
        assert_eq!(from.window_start(), None);
        assert_eq!(from.window_bytes(), 0);
        assert!(from.current_samples().is_empty());
        assert_eq!(from.bandwidth_instant(), 0.0);
        assert_eq!(from.sample_rate(), 0);

        let to = stats.to_device();
        assert_eq!(to.total_bytes(), 3 * 4096);
        assert_eq!(to.sample_rate(), 2);
    }

    #[test]
    fn test_window_lookup() {
        let ctx = Arc::new(StatsContext::new(1.0));
        let stats = DirectionalStats::new(&ctx);
        stats.push(0.0, 12, Direction::FromDevice);
        assert_eq!(stats.window(Direction::FromDevice).total_bytes(), 12);
        assert_eq!(stats.window(Direction::ToDevice).total_bytes(), 0);
    }

    #[test]
    fn test_direction_tags() {
        assert_eq!(Direction::from_tag(0), Direction::FromDevice);
        assert_eq!(Direction::from_tag(1), Direction::ToDevice);
    }

    #[test]
    #[should_panic(expected = "invalid USB transfer direction")]
    fn test_invalid_direction_tag() {
        let _ = Direction::from_tag(2);
    }
}
