// usbtop - Application
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Application lifecycle: settings, capture threads and the render loop.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::bus::UsbBuses;
use crate::capture::{attached_devices, capture_bus, list_buses, BusInfo, SYSFS_USB_DEVICES};
use crate::cli::Cli;
use crate::clock::ProcessClock;
use crate::config::Settings;
use crate::output::{ConsoleRenderer, CsvRenderer, Renderer};
use crate::stats::StatsContext;

/// How often devices unplugged from a monitored bus are dropped.
const PRUNE_INTERVAL: Duration = Duration::from_secs(2);

/// The running monitor.
#[derive(Debug)]
pub struct Application {
    settings: Settings,
    cli: Cli,
}

impl Application {
    /// Load settings, apply command-line overrides and validate them.
    pub fn new(cli: Cli) -> Result<Self> {
        let mut settings = Settings::new();
        cli.apply(&mut settings);
        settings.get().validate()?;

        if cli.save_settings {
            settings.save()?;
        }

        Ok(Self { settings, cli })
    }

    /// Run until Ctrl-C, or list buses and return when `--list` was given.
    pub async fn run(self) -> Result<()> {
        let available = list_buses(self.settings.usbmon_dir())?;

        if self.cli.list {
            let mut out = io::stdout().lock();
            write_bus_list(&mut out, &available)?;
            return Ok(());
        }

        let selected = select_buses(available, &self.cli.buses)?;
        let context = Arc::new(StatsContext::new(self.settings.window_duration()));
        let registry = Arc::new(UsbBuses::new(context));
        let clock = ProcessClock::new();
        let stop = Arc::new(AtomicBool::new(false));

        for bus in selected {
            registry.add_bus(bus.id, &bus.description);
            spawn_capture(bus, Arc::clone(&registry), clock, Arc::clone(&stop))?;
        }

        let mut renderer = self.renderer()?;
        let mut ticker = tokio::time::interval(Duration::from_millis(self.settings.refresh_interval_ms()));
        let mut pruner = tokio::time::interval(PRUNE_INTERVAL);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!(
            "Refreshing every {} ms with a {} s window",
            self.settings.refresh_interval_ms(),
            self.settings.window_duration()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    renderer.render(&registry.snapshot(clock.now()))?;
                }
                _ = pruner.tick() => {
                    prune_detached(&registry, Path::new(SYSFS_USB_DEVICES));
                }
                result = &mut shutdown => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("Interrupted, stopping capture");
                    break;
                }
            }
        }

        // Only seen after a read returns; threads blocked on a silent bus
        // are not joined and end with the process.
        stop.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn renderer(&self) -> Result<Box<dyn Renderer>> {
        let renderer: Box<dyn Renderer> = match &self.cli.csv {
            Some(path) if path.as_os_str() == "-" => Box::new(CsvRenderer::new(io::stdout())),
            Some(path) => Box::new(CsvRenderer::new(BufWriter::new(create_csv(path)?))),
            None => Box::new(
                ConsoleRenderer::new(io::stdout(), self.settings.window_duration())
                    .with_mean(self.settings.show_mean()),
            ),
        };
        Ok(renderer)
    }
}

fn create_csv(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create CSV file {}", path.display()))
}

/// Start a named thread reading `bus` into `registry`.
fn spawn_capture(
    bus: BusInfo,
    registry: Arc<UsbBuses>,
    clock: ProcessClock,
    stop: Arc<AtomicBool>,
) -> Result<()> {
    let id = bus.id;
    let file = File::open(&bus.path)
        .with_context(|| format!("Failed to open {} (are you root?)", bus.path.display()))?;

    thread::Builder::new()
        .name(format!("capture-bus{}", id))
        .spawn(move || {
            match capture_bus(BufReader::new(file), &registry, &clock, &stop) {
                Ok(stats) => info!(
                    "Capture on bus {} finished: {} packets, {} malformed lines",
                    id, stats.packets, stats.skipped
                ),
                Err(e) => warn!("Capture on bus {} failed: {:#}", id, e),
            }
        })
        .with_context(|| format!("Failed to start capture thread for bus {}", id))?;

    Ok(())
}

/// Drop registry devices that are no longer attached according to sysfs.
/// Buses whose sysfs entries cannot be read are left alone.
fn prune_detached(registry: &UsbBuses, sysfs_dir: &Path) {
    for bus_id in registry.bus_ids() {
        match attached_devices(sysfs_dir, bus_id) {
            Ok(attached) => {
                for device_id in registry.prune_devices(bus_id, &attached) {
                    info!("Device {} detached from bus {}", device_id, bus_id);
                }
            }
            Err(e) => debug!("Not pruning bus {}: {:#}", bus_id, e),
        }
    }
}

/// Keep the buses named by `filter`, or all of them when it is empty.
fn select_buses(available: Vec<BusInfo>, filter: &[u16]) -> Result<Vec<BusInfo>> {
    if filter.is_empty() {
        if available.is_empty() {
            bail!("No USB bus found to monitor");
        }
        return Ok(available);
    }

    for id in filter {
        if !available.iter().any(|bus| bus.id == *id) {
            warn!("Bus {} is not available for capture", id);
        }
    }

    let selected: Vec<BusInfo> = available
        .into_iter()
        .filter(|bus| filter.contains(&bus.id))
        .collect();
    if selected.is_empty() {
        bail!("None of the requested buses can be captured");
    }
    Ok(selected)
}

fn write_bus_list<W: Write>(out: &mut W, buses: &[BusInfo]) -> Result<()> {
    for bus in buses {
        writeln!(out, "usbmon{}\t{}", bus.id, bus.description).context("Failed to write bus list")?;
    }
    Ok(())
}
