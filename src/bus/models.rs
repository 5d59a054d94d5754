// usbtop - Bus Models
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Packets flowing into the registry and snapshots flowing out of it.

use crate::stats::{Direction, WindowSnapshot};

/// One packet observed by the capture layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsbPacket {
    /// Seconds since the process epoch.
    pub timestamp: f64,
    pub size: u64,
    pub direction: Direction,
    pub device_id: u16,
    pub bus_id: u16,
}

/// Statistics of one device at the time of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub id: u16,
    pub to_device: WindowSnapshot,
    pub from_device: WindowSnapshot,
}

/// Statistics of one bus at the time of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BusSnapshot {
    pub id: u16,
    pub description: String,
    /// Devices ordered by id.
    pub devices: Vec<DeviceSnapshot>,
}

/// Per-bus sums over all devices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BusTotals {
    pub bw_to_device: f64,
    pub bw_from_device: f64,
    pub pkts_to_device: u64,
    pub pkts_from_device: u64,
    pub mean_to_device: f64,
    pub mean_from_device: f64,
}

impl BusTotals {
    /// Sum the rows of `devices`.
    pub fn from_devices(devices: &[DeviceSnapshot]) -> Self {
        devices.iter().fold(Self::default(), |mut acc, dev| {
            acc.bw_to_device += dev.to_device.bandwidth_instant;
            acc.bw_from_device += dev.from_device.bandwidth_instant;
            acc.pkts_to_device += dev.to_device.sample_rate;
            acc.pkts_from_device += dev.from_device.sample_rate;
            acc.mean_to_device += dev.to_device.bandwidth_mean;
            acc.mean_from_device += dev.from_device.bandwidth_mean;
            acc
        })
    }
}

impl BusSnapshot {
    /// Sums over every device on this bus.
    pub fn totals(&self) -> BusTotals {
        BusTotals::from_devices(&self.devices)
    }
}
