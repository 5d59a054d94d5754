// usbtop - Console Output
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Top-like console table, redrawn on every refresh.

use std::io::Write;

use anyhow::{Context, Result};

use super::format::format_rate;
use super::Renderer;
use crate::bus::{BusSnapshot, BusTotals};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";
const SEPARATOR: &str = "  ---------------------------------------------------------------------------";

/// Renders a table per bus followed by its totals.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
    show_mean: bool,
    clear_screen: bool,
    packet_unit: String,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Create a renderer writing to `out` for windows of `window_duration`
    /// seconds.
    pub fn new(out: W, window_duration: f64) -> Self {
        Self {
            out,
            show_mean: false,
            clear_screen: true,
            packet_unit: packet_unit(window_duration),
        }
    }

    /// Also print lifetime mean bandwidth columns.
    pub fn with_mean(mut self, show_mean: bool) -> Self {
        self.show_mean = show_mean;
        self
    }

    /// Clear the terminal before each refresh.
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Consume the renderer and return its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_bus(&mut self, bus: &BusSnapshot) -> std::io::Result<()> {
        write!(
            self.out,
            "Bus ID {} ({})\tBW to device\tBW from device\tNb to device\tNb from device",
            bus.id, bus.description
        )?;
        if self.show_mean {
            write!(self.out, "\tMean to device\tMean from device")?;
        }
        writeln!(self.out)?;

        for dev in &bus.devices {
            write!(
                self.out,
                "  Device ID {:>3}:\t\t{}\t{}\t{} {}\t{} {}",
                dev.id,
                format_rate(dev.to_device.bandwidth_instant),
                format_rate(dev.from_device.bandwidth_instant),
                dev.to_device.sample_rate,
                self.packet_unit,
                dev.from_device.sample_rate,
                self.packet_unit,
            )?;
            if self.show_mean {
                write!(
                    self.out,
                    "\t{}\t{}",
                    format_rate(dev.to_device.bandwidth_mean),
                    format_rate(dev.from_device.bandwidth_mean)
                )?;
            }
            writeln!(self.out)?;
        }

        self.write_totals(&bus.totals())?;
        writeln!(self.out)
    }

    fn write_totals(&mut self, totals: &BusTotals) -> std::io::Result<()> {
        writeln!(self.out, "{}", SEPARATOR)?;
        write!(
            self.out,
            "  Total:\t\t\t{}\t{}\t{} {}\t{} {}",
            format_rate(totals.bw_to_device),
            format_rate(totals.bw_from_device),
            totals.pkts_to_device,
            self.packet_unit,
            totals.pkts_from_device,
            self.packet_unit,
        )?;
        if self.show_mean {
            write!(
                self.out,
                "\t{}\t{}",
                format_rate(totals.mean_to_device),
                format_rate(totals.mean_from_device)
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, snapshots: &[BusSnapshot]) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN).context("Failed to clear screen")?;
        }

        if snapshots.is_empty() {
            self.write_totals(&BusTotals::default())
                .context("Failed to write statistics")?;
        }
        for bus in snapshots {
            self.write_bus(bus).context("Failed to write statistics")?;
        }

        self.out.flush().context("Failed to flush output")
    }
}

/// Unit label for per-window packet counts.
fn packet_unit(window_duration: f64) -> String {
    if window_duration == 1.0 {
        "pkts/s".to_string()
    } else {
        format!("pkts/{}s", window_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::DeviceSnapshot;
    use crate::stats::WindowSnapshot;

    fn render(renderer: ConsoleRenderer<Vec<u8>>, snapshots: &[BusSnapshot]) -> String {
        let mut renderer = renderer;
        renderer.render(snapshots).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn window(bw: f64, pkts: u64, mean: f64) -> WindowSnapshot {
        WindowSnapshot {
            bandwidth_instant: bw,
            sample_rate: pkts,
            bandwidth_mean: mean,
            ..Default::default()
        }
    }

    fn bus() -> BusSnapshot {
        BusSnapshot {
            id: 1,
            description: "xHCI Host Controller".to_string(),
            devices: vec![
                DeviceSnapshot {
                    id: 2,
                    to_device: window(1000.0, 10, 50.0),
                    from_device: window(2_000_000.0, 400, 100.0),
                },
                DeviceSnapshot {
                    id: 17,
                    to_device: window(200.0, 2, 0.0),
                    from_device: window(0.0, 0, 0.0),
                },
            ],
        }
    }

    #[test]
    fn test_empty_registry_renders_zero_total() {
        let out = render(ConsoleRenderer::new(Vec::new(), 1.0).with_clear_screen(false), &[]);
        assert_eq!(
            out,
            format!("{}\n  Total:\t\t\t0.00 b/s\t0.00 b/s\t0 pkts/s\t0 pkts/s\n", SEPARATOR)
        );
    }

    #[test]
    fn test_bus_table() {
        let out = render(ConsoleRenderer::new(Vec::new(), 1.0).with_clear_screen(false), &[bus()]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Bus ID 1 (xHCI Host Controller)\tBW to device\tBW from device\tNb to device\tNb from device"
        );
        assert_eq!(lines[1], "  Device ID   2:\t\t1.00 kb/s\t2.00 Mb/s\t10 pkts/s\t400 pkts/s");
        assert_eq!(lines[2], "  Device ID  17:\t\t200.00 b/s\t0.00 b/s\t2 pkts/s\t0 pkts/s");
        assert_eq!(lines[3], SEPARATOR);
        assert_eq!(lines[4], "  Total:\t\t\t1.20 kb/s\t2.00 Mb/s\t12 pkts/s\t400 pkts/s");
        assert_eq!(lines[5], "");
    }

    #[test]
    fn test_mean_columns_and_minute_window() {
        let out = render(
            ConsoleRenderer::new(Vec::new(), 60.0)
                .with_clear_screen(false)
                .with_mean(true),
            &[bus()],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("\tMean to device\tMean from device"));
        assert_eq!(
            lines[1],
            "  Device ID   2:\t\t1.00 kb/s\t2.00 Mb/s\t10 pkts/60s\t400 pkts/60s\t50.00 b/s\t100.00 b/s"
        );
        assert!(lines[4].ends_with("\t50.00 b/s\t100.00 b/s"));
    }

    #[test]
    fn test_empty_registry_end_to_end() {
        use crate::bus::UsbBuses;
        use crate::stats::StatsContext;
        use std::sync::Arc;

        let buses = UsbBuses::new(Arc::new(StatsContext::new(1.0)));
        let out = render(
            ConsoleRenderer::new(Vec::new(), 1.0).with_clear_screen(false),
            &buses.snapshot(10.0),
        );
        assert!(out.contains("  Total:\t\t\t0.00 b/s\t0.00 b/s\t0 pkts/s\t0 pkts/s"));
    }

    #[test]
    fn test_clear_screen() {
        let out = render(ConsoleRenderer::new(Vec::new(), 1.0), &[]);
        assert!(out.starts_with(CLEAR_SCREEN));
    }
}
