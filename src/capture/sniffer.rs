// usbtop - Capture Loop
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Blocking read loop feeding usbmon events into the registry.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::debug;

use super::usbmon::parse_line;
use crate::bus::UsbBuses;
use crate::clock::ProcessClock;

/// Counters for one capture run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureStats {
    /// Lines read.
    pub lines: u64,
    /// Events that carried payload and were pushed.
    pub packets: u64,
    /// Lines that did not parse.
    pub skipped: u64,
}

/// Read usbmon lines from `reader` until EOF. `stop` is checked before each
/// line, so a read that never returns is not interrupted by it.
///
/// Packets are stamped with `clock` when read, so their timestamps share
/// the renderer's time base.
pub fn capture_bus<R: BufRead>(
    mut reader: R,
    buses: &UsbBuses,
    clock: &ProcessClock,
    stop: &AtomicBool,
) -> Result<CaptureStats> {
    let mut stats = CaptureStats::default();
    let mut line = String::new();

    while !stop.load(Ordering::Relaxed) {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .context("Failed to read usbmon event")?;
        if read == 0 {
            break;
        }
        stats.lines += 1;

        match parse_line(&line) {
            Some(event) => {
                if let Some(packet) = event.to_packet(clock.now()) {
                    buses.push(&packet);
                    stats.packets += 1;
                }
            }
            None => {
                stats.skipped += 1;
                debug!("Skipping malformed usbmon line: {}", line.trim_end());
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsContext;
    use std::io::Cursor;
    use std::sync::Arc;

    const TRACE: &str = "\
ffff8880a1b2c3d4 3575914555 S Ci:1:001:0 s a3 00 0000 0003 0004 4 <
ffff8880a1b2c3d4 3575914560 C Ci:1:001:0 0 4 = 01050000
ffff8880c0ffee00 4128379752 S Bo:1:005:2 -115 31 = 55534243
ffff8880c0ffee00 4128379808 C Bo:1:005:2 0 31 >
not a usbmon line
ffff8880aaaa0000 1254441283 C Ii:1:003:1 0:8 8 = 0000000000000000
";

    #[test]
    fn test_capture_trace() {
        let buses = UsbBuses::new(Arc::new(StatsContext::new(1.0)));
        let clock = ProcessClock::new();
        let stop = AtomicBool::new(false);

        let stats = capture_bus(Cursor::new(TRACE), &buses, &clock, &stop).unwrap();
        assert_eq!(
            stats,
            CaptureStats {
                lines: 6,
                packets: 3,
                skipped: 1,
            }
        );

        assert_eq!(buses.device(1, 1).unwrap().from_device().total_bytes(), 4);
        assert_eq!(buses.device(1, 5).unwrap().to_device().total_bytes(), 31);
        assert_eq!(buses.device(1, 5).unwrap().from_device().total_bytes(), 0);
        assert_eq!(buses.device(1, 3).unwrap().from_device().total_samples(), 1);
        assert!(buses.context().t0().is_some());
    }

    #[test]
    fn test_capture_honors_stop() {
        let buses = UsbBuses::new(Arc::new(StatsContext::new(1.0)));
        let stop = AtomicBool::new(true);

        let stats = capture_bus(Cursor::new(TRACE), &buses, &ProcessClock::new(), &stop).unwrap();
        assert_eq!(stats, CaptureStats::default());
        assert!(buses.bus_ids().is_empty());
    }
}
