// usbtop - CSV Output
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Append-only CSV log, one row per device per refresh.

use std::io::Write;

use anyhow::{Context, Result};

use super::Renderer;
use crate::bus::{BusSnapshot, BusTotals};

const HEADER: &str = "time,bus,device,bw_to_device,bw_from_device,pkts_to_device,pkts_from_device,mean_to_device,mean_from_device";

/// Writes statistics as CSV rows.
#[derive(Debug)]
pub struct CsvRenderer<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> CsvRenderer<W> {
    /// Create a renderer writing to `out`. The header is written with the
    /// first refresh.
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Consume the renderer and return its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_rows(&mut self, time: &str, snapshots: &[BusSnapshot]) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{}", HEADER)?;
            self.header_written = true;
        }

        if snapshots.is_empty() {
            self.write_totals(time, "all", &BusTotals::default())?;
        }
        for bus in snapshots {
            let bus_id = bus.id.to_string();
            for dev in &bus.devices {
                writeln!(
                    self.out,
                    "{},{},{},{:.2},{:.2},{},{},{:.2},{:.2}",
                    time,
                    bus_id,
                    dev.id,
                    dev.to_device.bandwidth_instant,
                    dev.from_device.bandwidth_instant,
                    dev.to_device.sample_rate,
                    dev.from_device.sample_rate,
                    dev.to_device.bandwidth_mean,
                    dev.from_device.bandwidth_mean,
                )?;
            }
            self.write_totals(time, &bus_id, &bus.totals())?;
        }
        self.out.flush()
    }

    fn write_totals(&mut self, time: &str, bus: &str, totals: &BusTotals) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{},{},total,{:.2},{:.2},{},{},{:.2},{:.2}",
            time,
            bus,
            totals.bw_to_device,
            totals.bw_from_device,
            totals.pkts_to_device,
            totals.pkts_from_device,
            totals.mean_to_device,
            totals.mean_from_device,
        )
    }
}

impl<W: Write> Renderer for CsvRenderer<W> {
    fn render(&mut self, snapshots: &[BusSnapshot]) -> Result<()> {
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        self.write_rows(&time, snapshots)
            .context("Failed to write CSV statistics")
    }
}
