// usbtop - Bus Discovery
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Enumerate the buses usbmon can capture.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::SYSFS_USB_DEVICES;

/// A capturable bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusInfo {
    pub id: u16,
    pub description: String,
    /// usbmon text file for this bus.
    pub path: PathBuf,
}

/// List the per-bus usbmon files in `usbmon_dir`, ordered by bus id.
///
/// `0u` aggregates every bus and is skipped.
pub fn list_buses(usbmon_dir: &Path) -> Result<Vec<BusInfo>> {
    let entries = fs::read_dir(usbmon_dir).with_context(|| {
        format!(
            "Failed to read {} (is the usbmon module loaded and debugfs mounted?)",
            usbmon_dir.display()
        )
    })?;

    let mut buses = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", usbmon_dir.display()))?;
        let name = entry.file_name();
        let Some(id) = name.to_str().and_then(parse_bus_file_name) else {
            continue;
        };
        if id == 0 {
            continue;
        }
        buses.push(BusInfo {
            id,
            description: bus_description(Path::new(SYSFS_USB_DEVICES), id),
            path: entry.path(),
        });
    }

    buses.sort_by_key(|bus| bus.id);
    debug!("Found {} usbmon buses in {}", buses.len(), usbmon_dir.display());
    Ok(buses)
}

/// Human-readable name of bus `id`, read from the root hub's `product`
/// attribute under `sysfs_dir`.
pub fn bus_description(sysfs_dir: &Path, id: u16) -> String {
    fs::read_to_string(sysfs_dir.join(format!("usb{}", id)).join("product"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("USB bus number {}", id))
}

/// Device numbers currently attached to bus `bus_id`, read from the `devnum`
/// attribute of the root hub `usb<N>` and of every `<N>-*` device entry
/// under `sysfs_dir`. Interface entries (`1-1:1.0`) are skipped.
///
/// Fails when the root hub entry is missing, so an unreadable sysfs never
/// looks like a bus with nothing plugged in.
pub fn attached_devices(sysfs_dir: &Path, bus_id: u16) -> Result<BTreeSet<u16>> {
    let root_hub = sysfs_dir.join(format!("usb{}", bus_id));
    let mut devices = BTreeSet::new();
    devices.insert(read_devnum(&root_hub)?);

    let prefix = format!("{}-", bus_id);
    let entries = fs::read_dir(sysfs_dir)
        .with_context(|| format!("Failed to read {}", sysfs_dir.display()))?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(&prefix) || name.contains(':') {
            continue;
        }
        match read_devnum(&entry.path()) {
            Ok(devnum) => {
                devices.insert(devnum);
            }
            // Unplugged between listing and reading
            Err(e) => debug!("Skipping {}: {:#}", name, e),
        }
    }

    Ok(devices)
}

fn read_devnum(device_dir: &Path) -> Result<u16> {
    let path = device_dir.join("devnum");
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    content
        .trim()
        .parse()
        .with_context(|| format!("Invalid device number in {}", path.display()))
}

/// `"3u"` → `Some(3)`; anything else (`"3t"`, `"3s"`, `"u"`) → `None`.
fn parse_bus_file_name(name: &str) -> Option<u16> {
    name.strip_suffix('u')?.parse().ok()
}
