// usbtop - Bus Registry
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Thread-safe map of buses and the per-device statistics they own.
//!
//! Capture threads call [`UsbBuses::push`]; the renderer calls
//! [`UsbBuses::snapshot`]. The registry lock only covers device lookup and
//! insertion. Samples are pushed into the device statistics after the lock
//! is released.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::models::{BusSnapshot, DeviceSnapshot, UsbPacket};
use crate::stats::{DirectionalStats, StatsContext};

/// A USB bus and the devices seen on it.
#[derive(Debug)]
pub struct UsbBus {
    id: u16,
    description: String,
    devices: BTreeMap<u16, Arc<DirectionalStats>>,
}

impl UsbBus {
    /// Create an empty bus.
    pub fn new(id: u16, description: &str) -> Self {
        Self {
            id,
            description: description.to_string(),
            devices: BTreeMap::new(),
        }
    }

    /// Statistics for `device_id`, if the device has been seen.
    pub fn device(&self, device_id: u16) -> Option<&Arc<DirectionalStats>> {
        self.devices.get(&device_id)
    }

    fn snapshot(&self, now: f64) -> BusSnapshot {
        BusSnapshot {
            id: self.id,
            description: self.description.clone(),
            devices: self
                .devices
                .iter()
                .map(|(&id, stats)| DeviceSnapshot {
                    id,
                    to_device: stats.to_device().snapshot(now),
                    from_device: stats.from_device().snapshot(now),
                })
                .collect(),
        }
    }
}

/// All buses known to the process.
#[derive(Debug)]
pub struct UsbBuses {
    context: Arc<StatsContext>,
    buses: RwLock<BTreeMap<u16, UsbBus>>,
}

impl UsbBuses {
    /// Create an empty registry whose devices share `context`.
    pub fn new(context: Arc<StatsContext>) -> Self {
        Self {
            context,
            buses: RwLock::new(BTreeMap::new()),
        }
    }

    /// Shared statistics configuration.
    pub fn context(&self) -> &Arc<StatsContext> {
        &self.context
    }

    /// Register a bus. An existing bus keeps its devices and gets the new
    /// description.
    pub fn add_bus(&self, id: u16, description: &str) {
        let mut buses = self.buses.write().unwrap_or_else(PoisonError::into_inner);
        buses
            .entry(id)
            .and_modify(|bus| bus.description = description.to_string())
            .or_insert_with(|| UsbBus::new(id, description));
        info!("Monitoring bus {} ({})", id, description);
    }

    /// Record one packet, creating its bus and device on first sight.
    pub fn push(&self, packet: &UsbPacket) {
        let stats = self.device_stats(packet.bus_id, packet.device_id);
        stats.push(packet.timestamp, packet.size, packet.direction);
    }

    /// Forget a device, e.g. after it was unplugged. Returns whether it was
    /// known.
    pub fn remove_device(&self, bus_id: u16, device_id: u16) -> bool {
        let mut buses = self.buses.write().unwrap_or_else(PoisonError::into_inner);
        let removed = buses
            .get_mut(&bus_id)
            .map(|bus| bus.devices.remove(&device_id).is_some())
            .unwrap_or(false);
        if removed {
            debug!("Removed device {} from bus {}", device_id, bus_id);
        }
        removed
    }

    /// Forget every device of `bus_id` that is not in `attached`. Returns
    /// the removed device ids, ascending.
    pub fn prune_devices(&self, bus_id: u16, attached: &BTreeSet<u16>) -> Vec<u16> {
        let detached: Vec<u16> = self
            .device_ids(bus_id)
            .into_iter()
            .filter(|id| !attached.contains(id))
            .collect();
        detached
            .into_iter()
            .filter(|&id| self.remove_device(bus_id, id))
            .collect()
    }

    /// Ids of the devices seen on `bus_id`, ascending.
    pub fn device_ids(&self, bus_id: u16) -> Vec<u16> {
        self.buses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&bus_id)
            .map(|bus| bus.devices.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of all known buses, ascending.
    pub fn bus_ids(&self) -> Vec<u16> {
        self.buses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Statistics for one device, if known.
    pub fn device(&self, bus_id: u16, device_id: u16) -> Option<Arc<DirectionalStats>> {
        self.buses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&bus_id)
            .and_then(|bus| bus.device(device_id))
            .cloned()
    }

    /// Read-only view of every bus as of `now`, ordered by bus id.
    pub fn snapshot(&self, now: f64) -> Vec<BusSnapshot> {
        self.buses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|bus| bus.snapshot(now))
            .collect()
    }

    fn device_stats(&self, bus_id: u16, device_id: u16) -> Arc<DirectionalStats> {
        if let Some(stats) = self.device(bus_id, device_id) {
            return stats;
        }

        let mut buses = self.buses.write().unwrap_or_else(PoisonError::into_inner);
        let bus = buses.entry(bus_id).or_insert_with(|| {
            UsbBus::new(bus_id, &format!("USB bus number {}", bus_id))
        });
        let context = &self.context;
        let stats = bus.devices.entry(device_id).or_insert_with(|| {
            debug!("New device {} on bus {}", device_id, bus_id);
            Arc::new(DirectionalStats::new(context))
        });
        Arc::clone(stats)
    }
}
